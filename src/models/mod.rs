//! 业务数据模型
//!
//! 与 `entity` 中的数据库实体分离，存储层负责两者之间的转换。

pub mod assignments;
pub mod audits;
pub mod auth;
pub mod common;
pub mod problem_results;

pub use common::error_code::ErrorCode;
pub use common::response::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
