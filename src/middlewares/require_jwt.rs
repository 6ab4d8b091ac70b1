/*!
 * JWT 认证中间件
 *
 * 令牌由外部认证服务签发，这里只校验签名、有效期和类型，
 * 不查询用户库。校验通过后把 [`AuthenticatedUser`] 写入请求扩展。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RequireJWT;
 *
 * web::scope("/api/v1/assignments")
 *     .wrap(RequireJWT)
 *     .route("/{id}", web::get().to(get_assignment));
 *
 * async fn get_assignment(req: HttpRequest) -> ActixResult<HttpResponse> {
 *     let user = RequireJWT::extract_user(&req);
 *     // ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 客户端在请求头中包含 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 中间件提取并验证JWT令牌
 * 3. 如果令牌有效，将调用方信息存储在请求扩展中，继续处理请求
 * 4. 如果令牌无效或缺失，返回401未授权错误
 */

use crate::models::ErrorCode;
use crate::models::auth::entities::{AuthenticatedUser, CallerRole};
use crate::utils::jwt::Claims;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

/// 从 Claims 构造调用方
pub(crate) fn user_from_claims(claims: &Claims) -> Result<AuthenticatedUser, String> {
    let id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| "Invalid user ID in JWT".to_string())?;
    let role = claims
        .role
        .parse::<CallerRole>()
        .map_err(|_| "Invalid role in JWT".to_string())?;
    Ok(AuthenticatedUser { id, role })
}

// 辅助函数：提取并验证 JWT access token
fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<AuthenticatedUser, String> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = crate::utils::jwt::JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    user_from_claims(&claims)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    actix_web::HttpResponse::NoContent()
                        .finish()
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req) {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取调用方信息
impl RequireJWT {
    /// 从请求扩展中提取调用方
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_user(req: &actix_web::HttpRequest) -> Option<AuthenticatedUser> {
        req.extensions().get::<AuthenticatedUser>().copied()
    }

    /// 从请求扩展中提取用户ID
    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        Self::extract_user(req).map(|user| user.id)
    }

    /// 从请求扩展中提取用户角色
    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<CallerRole> {
        Self::extract_user(req).map(|user| user.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(sub: &str, role: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            role: role.to_string(),
            token_type: "access".to_string(),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_user_from_claims() {
        let user = user_from_claims(&claims("42", "student")).unwrap();
        assert_eq!(
            user,
            AuthenticatedUser {
                id: 42,
                role: CallerRole::Student
            }
        );
    }

    #[test]
    fn test_invalid_claims_are_rejected() {
        assert!(user_from_claims(&claims("abc", "student")).is_err());
        assert!(user_from_claims(&claims("42", "superuser")).is_err());
    }
}
