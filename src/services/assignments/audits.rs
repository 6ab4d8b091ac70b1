use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, error_response};
use crate::models::ApiResponse;
use crate::models::audits::responses::SubmissionAuditListResponse;

// 角色检查由路由上的 RequireRole 完成
pub async fn list_audits(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    match service
        .get_audit_store(request)
        .list_audits(assignment_id)
        .await
    {
        Ok(audits) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionAuditListResponse {
                assignment_id,
                audits,
            },
            "查询成功",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
