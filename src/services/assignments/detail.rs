use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, error_response};
use crate::models::ApiResponse;
use crate::models::auth::entities::AuthenticatedUser;

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    caller: AuthenticatedUser,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    match service
        .get_guard(request)
        .authorize_read(caller, assignment_id)
        .await
    {
        Ok(assignment) => Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "查询成功"))),
        Err(e) => Ok(error_response(&e)),
    }
}
