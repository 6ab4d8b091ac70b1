use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireJWT, RequireRole};
use crate::models::assignments::requests::SubmitExamRequest;
use crate::models::auth::entities::{AuthenticatedUser, CallerRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::AssignmentService;

// 懒加载的全局 AssignmentService 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

fn current_user(req: &HttpRequest) -> Result<AuthenticatedUser, HttpResponse> {
    RequireJWT::extract_user(req).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "无法获取用户信息",
        ))
    })
}

// 交卷
pub async fn submit_exam(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<SubmitExamRequest>,
) -> ActixResult<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(resp) => return Ok(resp),
    };

    ASSIGNMENT_SERVICE
        .submit_exam(&req, user, path.into_inner(), body.into_inner())
        .await
}

// 获取考试分配详情
pub async fn get_assignment(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(resp) => return Ok(resp),
    };

    ASSIGNMENT_SERVICE
        .get_assignment(&req, user, path.into_inner())
        .await
}

// 获取逐题结果
pub async fn list_results(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    let user = match current_user(&req) {
        Ok(u) => u,
        Err(resp) => return Ok(resp),
    };

    ASSIGNMENT_SERVICE
        .list_results(&req, user, path.into_inner())
        .await
}

// 获取提交审计轨迹（教师、管理员）
pub async fn list_audits(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_audits(&req, path.into_inner())
        .await
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .route("/{id}", web::get().to(get_assignment))
            .route("/{id}/submit", web::post().to(submit_exam))
            .route("/{id}/results", web::get().to(list_results))
            .service(
                web::resource("/{id}/audits")
                    .wrap(RequireRole::new_any(CallerRole::staff_roles()))
                    .route(web::get().to(list_audits)),
            ),
    );
}
