//! 交卷 saga
//!
//! 考试状态（系统记录库）与逐题结果（结果日志库）之间没有共享事务，
//! 由协调器并发双写，再根据两侧结果决定提交或补偿。

mod audit;
mod compensation;
mod coordinator;
mod decision;

pub use audit::AuditRecorder;
pub use compensation::{CompensationContext, CompensationHandler};
pub use coordinator::{FinalizeOutcome, SubmissionCoordinator};
pub use decision::{CompensationDirection, SagaDecision, decide};
