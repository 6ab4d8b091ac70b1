//! 存储层
//!
//! 提交流程涉及两个彼此独立、没有共享事务协调者的存储：
//! - 系统记录库：考试分配（状态、计时、成绩）与提交审计，见 [`sea_orm_storage`]
//! - 结果日志库：逐题作答结果，只追加写，见 [`result_log`]
//!
//! 适配器只返回带类型的 `Result`，是否可重试由提交协调器决定。

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::errors::{AcademyError, Result};
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentStatus},
        requests::{ProblemResultEntry, SubmissionSummary},
    },
    audits::entities::{NewSubmissionAudit, SubmissionAudit},
    problem_results::entities::ProblemResult,
};

pub mod blob_dump;
pub mod connection;
pub mod result_log;
pub mod sea_orm_storage;

/// 写入考试终态的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionWrite {
    /// 本次请求完成了 in_progress → 终态
    Applied(AssignmentStatus),
    /// 记录已处于终态（并发的重复提交先完成），本次没有写入
    AlreadyTerminal(AssignmentStatus),
}

/// 结果日志追加报告
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendReport {
    // 实际新插入的行数，重放时已存在的行不计入
    pub rows_written: u64,
    // 成功提交的批次数
    pub batches: usize,
}

#[async_trait::async_trait]
pub trait AssignmentStore: Send + Sync {
    // 通过ID获取考试分配
    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    // in_progress → completed/graded，并写入计时与成绩汇总
    async fn set_completed(
        &self,
        assignment_id: i64,
        summary: &SubmissionSummary,
    ) -> Result<CompletionWrite>;
    // 补偿：无条件回退到 in_progress，不清理其他字段
    async fn revert_to_in_progress(&self, assignment_id: i64) -> Result<()>;
}

#[async_trait::async_trait]
pub trait ResultLogStore: Send + Sync {
    // 分批追加题目结果，已存在的 (assignment_id, problem_id) 跳过
    async fn append_results(
        &self,
        assignment_id: i64,
        student_id: i64,
        results: &[ProblemResultEntry],
    ) -> Result<AppendReport>;
    // 按复合键删除，不存在的行视为成功
    async fn delete_results(&self, assignment_id: i64, problem_ids: &[i64]) -> Result<u64>;
    // 列出某次考试的全部结果
    async fn list_results(&self, assignment_id: i64) -> Result<Vec<ProblemResult>>;
}

#[async_trait::async_trait]
pub trait SubmissionAuditStore: Send + Sync {
    async fn record_audit(&self, audit: NewSubmissionAudit) -> Result<()>;
    async fn list_audits(&self, assignment_id: i64) -> Result<Vec<SubmissionAudit>>;
}

/// 为单次存储调用设置时限，超时按失败处理
pub(crate) async fn bounded<T, F>(timeout: Duration, operation: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(AcademyError::store_timeout(format!(
            "{operation} timed out after {}s",
            timeout.as_secs_f64()
        ))),
    }
}

pub async fn create_storage() -> Result<Arc<sea_orm_storage::SeaOrmStorage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

pub async fn create_result_log() -> Result<Arc<dyn ResultLogStore>> {
    let config = AppConfig::get();
    let result_log = result_log::SeaOrmResultLog::new_async(&config.result_log).await?;
    Ok(Arc::new(result_log))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bounded_passes_through_result() {
        let value = bounded(Duration::from_secs(1), "noop", async { Ok(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_bounded_turns_elapsed_into_store_timeout() {
        let result: Result<()> = bounded(Duration::from_millis(10), "slow write", async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.code(), "E015");
        assert!(err.is_retryable());
        assert!(err.message().contains("slow write"));
    }
}
