use serde::Serialize;
use ts_rs::TS;

use crate::errors::AcademyError;

/// API 响应错误码
///
/// 提交相关的错误码中，`SubmissionRetryable` 与 `SubmissionInconsistent`
/// 必须保持区分：前者可以直接重试，后者需要运维介入。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/error-code.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,

    // 考试分配
    AssignmentNotFound = 4000,
    AssignmentPermissionDenied = 4001,
    AssignmentStateInvalid = 4002,

    // 提交
    SubmissionValidationFailed = 4100,
    SubmissionRetryable = 4101,
    SubmissionInconsistent = 4102,
}

impl From<&AcademyError> for ErrorCode {
    fn from(err: &AcademyError) -> Self {
        match err {
            AcademyError::NotFound(_) => ErrorCode::AssignmentNotFound,
            AcademyError::Authorization(_) => ErrorCode::AssignmentPermissionDenied,
            AcademyError::Authentication(_) => ErrorCode::Unauthorized,
            AcademyError::AssignmentState(_) => ErrorCode::AssignmentStateInvalid,
            AcademyError::Validation(_) => ErrorCode::SubmissionValidationFailed,
            AcademyError::CriticalInconsistency(_) => ErrorCode::SubmissionInconsistent,
            e if e.is_retryable() => ErrorCode::SubmissionRetryable,
            _ => ErrorCode::InternalServerError,
        }
    }
}
