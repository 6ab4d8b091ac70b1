use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, error_response};
use crate::models::ApiResponse;
use crate::models::auth::entities::AuthenticatedUser;
use crate::models::problem_results::responses::ProblemResultListResponse;

pub async fn list_results(
    service: &AssignmentService,
    request: &HttpRequest,
    caller: AuthenticatedUser,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    if let Err(e) = service
        .get_guard(request)
        .authorize_read(caller, assignment_id)
        .await
    {
        return Ok(error_response(&e));
    }

    match service
        .get_result_log(request)
        .list_results(assignment_id)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ProblemResultListResponse {
                assignment_id,
                items,
            },
            "查询成功",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
