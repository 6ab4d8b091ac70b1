use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, warn};

use super::{AssignmentService, error_response};
use crate::errors::AcademyError;
use crate::models::ApiResponse;
use crate::models::assignments::{requests::SubmitExamRequest, responses::FinalizeResponse};
use crate::models::auth::entities::AuthenticatedUser;
use crate::saga::FinalizeOutcome;
use crate::utils::validate_submission;

pub async fn submit_exam(
    service: &AssignmentService,
    request: &HttpRequest,
    caller: AuthenticatedUser,
    assignment_id: i64,
    req: SubmitExamRequest,
) -> ActixResult<HttpResponse> {
    // 授权
    let guard = service.get_guard(request);
    if let Err(e) = guard.authorize(caller.id, assignment_id).await {
        return Ok(error_response(&e));
    }

    // 数据校验
    let validation = validate_submission(&req);
    if !validation.is_valid {
        return Ok(error_response(&AcademyError::validation(
            validation.error_message(),
        )));
    }

    let coordinator = service.get_coordinator(request);

    match coordinator
        .finalize(assignment_id, caller.id, req.summary, req.results)
        .await
    {
        Ok(outcome) => {
            let message = if outcome.is_already_finalized() {
                "考试已提交"
            } else {
                "交卷成功"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                finalize_response(assignment_id, &outcome),
                message,
            )))
        }
        Err(e) => {
            if e.is_critical() {
                error!(assignment_id, "Submission left stores inconsistent: {}", e);
            } else {
                warn!(assignment_id, "Submission failed: {}", e);
            }
            Ok(error_response(&e))
        }
    }
}

fn finalize_response(assignment_id: i64, outcome: &FinalizeOutcome) -> FinalizeResponse {
    FinalizeResponse {
        assignment_id,
        status: outcome.status(),
        already_finalized: outcome.is_already_finalized(),
        rows_written: outcome.rows_written(),
    }
}
