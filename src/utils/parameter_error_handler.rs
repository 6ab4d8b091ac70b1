//! 请求参数解析失败时统一返回 `ApiResponse` 错误信封

use actix_web::{
    HttpRequest, HttpResponse, error,
    error::{JsonPayloadError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> error::Error {
    debug!("JSON payload rejected for {}: {}", req.path(), err);
    let message = format!("Invalid JSON payload: {err}");
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, message));
    error::InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> error::Error {
    debug!("Query string rejected for {}: {}", req.path(), err);
    let message = format!("Invalid query parameters: {err}");
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, message));
    error::InternalError::from_response(err, response).into()
}
