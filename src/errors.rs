//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 提交事务（saga）相关的错误额外区分“可重试”与“严重不一致”两类。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_academy_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum AcademyError {
            $($variant(String),)*
        }

        impl AcademyError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AcademyError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AcademyError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AcademyError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl AcademyError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AcademyError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_academy_errors! {
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    AssignmentState("E014", "Assignment State Error"),
    StoreTimeout("E015", "Store Timeout"),
    SubmissionWrite("E016", "Submission Write Failed"),
    CriticalInconsistency("E017", "Critical Cross-Store Inconsistency"),
    Internal("E018", "Internal Error"),
}

impl AcademyError {
    /// 调用方可以安全重试：没有持久化任何改动，或补偿已经恢复一致
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AcademyError::SubmissionWrite(_)
                | AcademyError::StoreTimeout(_)
                | AcademyError::DatabaseConnection(_)
                | AcademyError::DatabaseOperation(_)
        )
    }

    /// 两个存储已经分叉，需要人工介入
    pub fn is_critical(&self) -> bool {
        matches!(self, AcademyError::CriticalInconsistency(_))
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AcademyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AcademyError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AcademyError {
    fn from(err: sea_orm::DbErr) -> Self {
        AcademyError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AcademyError {
    fn from(err: std::io::Error) -> Self {
        AcademyError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AcademyError {
    fn from(err: serde_json::Error) -> Self {
        AcademyError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AcademyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AcademyError::database_config("test").code(), "E003");
        assert_eq!(AcademyError::validation("test").code(), "E007");
        assert_eq!(AcademyError::authentication("test").code(), "E012");
        assert_eq!(AcademyError::critical_inconsistency("test").code(), "E017");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AcademyError::store_timeout("test").error_type(),
            "Store Timeout"
        );
        assert_eq!(
            AcademyError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = AcademyError::assignment_state("Assignment is expired");
        assert_eq!(err.message(), "Assignment is expired");
    }

    #[test]
    fn test_format_simple() {
        let err = AcademyError::submission_write("result log unavailable");
        let formatted = err.format_simple();
        assert!(formatted.contains("Submission Write Failed"));
        assert!(formatted.contains("result log unavailable"));
    }

    #[test]
    fn test_retryable_and_critical_are_disjoint() {
        let transient = AcademyError::submission_write("x");
        assert!(transient.is_retryable());
        assert!(!transient.is_critical());

        let critical = AcademyError::critical_inconsistency("x");
        assert!(critical.is_critical());
        assert!(!critical.is_retryable());

        assert!(!AcademyError::not_found("x").is_retryable());
        assert!(!AcademyError::authorization("x").is_retryable());
    }

    #[test]
    fn test_db_err_conversion() {
        let err: AcademyError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));
    }
}
