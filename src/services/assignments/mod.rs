pub mod audits;
pub mod detail;
pub mod guard;
pub mod results;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::sync::Arc;

use crate::errors::AcademyError;
use crate::models::ApiResponse;
use crate::models::assignments::requests::SubmitExamRequest;
use crate::models::auth::entities::AuthenticatedUser;
use crate::saga::SubmissionCoordinator;
use crate::storage::{ResultLogStore, SubmissionAuditStore};

pub use guard::{AuthorizationGuard, OwnershipGuard};

pub struct AssignmentService {
    guard: Option<Arc<dyn AuthorizationGuard>>,
    coordinator: Option<SubmissionCoordinator>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self {
            guard: None,
            coordinator: None,
        }
    }

    pub(crate) fn get_guard(&self, request: &HttpRequest) -> Arc<dyn AuthorizationGuard> {
        if let Some(guard) = &self.guard {
            guard.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn AuthorizationGuard>>>()
                .expect("AuthorizationGuard not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_coordinator(&self, request: &HttpRequest) -> SubmissionCoordinator {
        if let Some(coordinator) = &self.coordinator {
            coordinator.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<SubmissionCoordinator>>()
                .expect("SubmissionCoordinator not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_result_log(&self, request: &HttpRequest) -> Arc<dyn ResultLogStore> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ResultLogStore>>>()
            .expect("ResultLogStore not found in app data")
            .get_ref()
            .clone()
    }

    pub(crate) fn get_audit_store(&self, request: &HttpRequest) -> Arc<dyn SubmissionAuditStore> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn SubmissionAuditStore>>>()
            .expect("SubmissionAuditStore not found in app data")
            .get_ref()
            .clone()
    }

    /// 交卷
    pub async fn submit_exam(
        &self,
        request: &HttpRequest,
        caller: AuthenticatedUser,
        assignment_id: i64,
        req: SubmitExamRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_exam(self, request, caller, assignment_id, req).await
    }

    /// 获取考试分配详情
    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        caller: AuthenticatedUser,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, request, caller, assignment_id).await
    }

    /// 列出逐题结果
    pub async fn list_results(
        &self,
        request: &HttpRequest,
        caller: AuthenticatedUser,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        results::list_results(self, request, caller, assignment_id).await
    }

    /// 列出提交审计轨迹
    pub async fn list_audits(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        audits::list_audits(self, request, assignment_id).await
    }
}

/// 领域错误对应的 HTTP 状态码
pub fn status_for_error(err: &AcademyError) -> StatusCode {
    match err {
        AcademyError::NotFound(_) => StatusCode::NOT_FOUND,
        AcademyError::Authorization(_) => StatusCode::FORBIDDEN,
        AcademyError::Authentication(_) => StatusCode::UNAUTHORIZED,
        AcademyError::Validation(_) => StatusCode::BAD_REQUEST,
        AcademyError::AssignmentState(_) => StatusCode::CONFLICT,
        AcademyError::CriticalInconsistency(_) => StatusCode::INTERNAL_SERVER_ERROR,
        e if e.is_retryable() => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn error_response(err: &AcademyError) -> HttpResponse {
    HttpResponse::build(status_for_error(err)).json(ApiResponse::<()>::from_error(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for_error(&AcademyError::not_found("x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for_error(&AcademyError::authorization("x")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for_error(&AcademyError::assignment_state("x")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for_error(&AcademyError::submission_write("x")),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for_error(&AcademyError::critical_inconsistency("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
