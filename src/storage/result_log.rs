//! 结果日志存储（逐题作答结果）
//!
//! 与系统记录库使用不同的连接池和迁移表。写入只追加，
//! 按批次提交，(assignment_id, problem_id) 冲突时跳过已有行，重放不会产生重复。

use std::time::Duration;

use async_trait::async_trait;
use migration::{MigratorTrait, ResultLogMigrator};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, Set,
    TransactionTrait, TryInsertResult,
};
use tracing::{debug, info, warn};

use crate::config::ResultLogConfig;
use crate::entity::prelude::ProblemResults;
use crate::entity::problem_results::{ActiveModel, Column};
use crate::errors::{AcademyError, Result};
use crate::models::assignments::requests::ProblemResultEntry;
use crate::models::problem_results::entities::ProblemResult;
use crate::storage::{AppendReport, ResultLogStore, bounded};

/// 每批写入的默认行数
pub const DEFAULT_BATCH_SIZE: usize = 500;

#[derive(Clone)]
pub struct SeaOrmResultLog {
    db: DatabaseConnection,
    batch_size: usize,
    timeout: Duration,
}

impl SeaOrmResultLog {
    pub async fn new_async(config: &ResultLogConfig) -> Result<Self> {
        let db =
            super::connection::connect(&config.url, config.pool_size, config.timeout).await?;

        ResultLogMigrator::up(&db, None)
            .await
            .map_err(|e| AcademyError::database_operation(format!("结果日志库迁移失败: {e}")))?;

        info!(
            "Result log store ready: {} (batch size {})",
            config.url, config.batch_size
        );

        Ok(Self::from_connection(
            db,
            config.batch_size,
            Duration::from_secs(config.timeout),
        ))
    }

    /// 使用已有连接创建实例（迁移由调用方负责）
    pub fn from_connection(db: DatabaseConnection, batch_size: usize, timeout: Duration) -> Self {
        Self {
            db,
            batch_size: batch_size.max(1),
            timeout,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 写入单个批次，整批在一个事务内提交
    async fn append_batch(
        &self,
        assignment_id: i64,
        student_id: i64,
        batch: &[ProblemResultEntry],
    ) -> Result<u64> {
        let written_at = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AcademyError::database_operation(format!("开启结果日志事务失败: {e}")))?;

        let mut inserted = 0u64;
        for entry in batch {
            let model = to_active_model(assignment_id, student_id, entry, written_at);
            let mut on_conflict = OnConflict::columns([Column::AssignmentId, Column::ProblemId]);
            on_conflict.do_nothing();

            let result = ProblemResults::insert(model)
                .on_conflict(on_conflict)
                .do_nothing()
                .exec(&txn)
                .await
                .map_err(|e| {
                    AcademyError::database_operation(format!(
                        "写入题目结果失败 (problem_id={}): {e}",
                        entry.problem_id
                    ))
                })?;

            if let TryInsertResult::Inserted(_) = result {
                inserted += 1;
            }
        }

        txn.commit()
            .await
            .map_err(|e| AcademyError::database_operation(format!("提交结果日志事务失败: {e}")))?;

        Ok(inserted)
    }

    async fn append_results_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        results: &[ProblemResultEntry],
    ) -> Result<AppendReport> {
        let mut report = AppendReport::default();

        for (index, batch) in results.chunks(self.batch_size).enumerate() {
            // 任一批失败立即中止，之前已提交的批次保留，由补偿删除
            let inserted = bounded(
                self.timeout,
                "append_results",
                self.append_batch(assignment_id, student_id, batch),
            )
            .await
            .map_err(|e| {
                warn!(
                    assignment_id,
                    batch = index,
                    committed_batches = report.batches,
                    "Result log batch failed: {}",
                    e
                );
                e
            })?;

            report.rows_written += inserted;
            report.batches += 1;
            debug!(assignment_id, batch = index, inserted, "Result log batch committed");
        }

        Ok(report)
    }

    async fn delete_results_impl(&self, assignment_id: i64, problem_ids: &[i64]) -> Result<u64> {
        let mut deleted = 0u64;

        for chunk in problem_ids.chunks(self.batch_size) {
            let result = ProblemResults::delete_many()
                .filter(Column::AssignmentId.eq(assignment_id))
                .filter(Column::ProblemId.is_in(chunk.iter().copied()))
                .exec(&self.db)
                .await
                .map_err(|e| AcademyError::database_operation(format!("删除题目结果失败: {e}")))?;
            deleted += result.rows_affected;
        }

        Ok(deleted)
    }

    async fn list_results_impl(&self, assignment_id: i64) -> Result<Vec<ProblemResult>> {
        let rows = ProblemResults::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by(Column::ProblemId, Order::Asc)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询题目结果失败: {e}")))?;

        Ok(rows.into_iter().map(|m| m.into_problem_result()).collect())
    }
}

fn to_active_model(
    assignment_id: i64,
    student_id: i64,
    entry: &ProblemResultEntry,
    written_at: i64,
) -> ActiveModel {
    ActiveModel {
        assignment_id: Set(assignment_id),
        problem_id: Set(entry.problem_id),
        student_id: Set(student_id),
        correctness: Set(entry.correctness),
        time_taken_seconds: Set(entry.time_taken_seconds),
        submitted_answer: Set(entry.submitted_answer.clone()),
        meta_tag: Set(entry.meta_tag.map(|tag| tag.to_string())),
        answer_change_count: Set(entry.answer_change_count),
        written_at: Set(written_at),
    }
}

#[async_trait]
impl ResultLogStore for SeaOrmResultLog {
    async fn append_results(
        &self,
        assignment_id: i64,
        student_id: i64,
        results: &[ProblemResultEntry],
    ) -> Result<AppendReport> {
        self.append_results_impl(assignment_id, student_id, results)
            .await
    }

    async fn delete_results(&self, assignment_id: i64, problem_ids: &[i64]) -> Result<u64> {
        bounded(
            self.timeout,
            "delete_results",
            self.delete_results_impl(assignment_id, problem_ids),
        )
        .await
    }

    async fn list_results(&self, assignment_id: i64) -> Result<Vec<ProblemResult>> {
        bounded(
            self.timeout,
            "list_results",
            self.list_results_impl(assignment_id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::problem_results::entities::MetaCognitionTag;
    use sea_orm::Database;

    async fn memory_log(batch_size: usize) -> SeaOrmResultLog {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        ResultLogMigrator::up(&db, None).await.unwrap();
        SeaOrmResultLog::from_connection(db, batch_size, Duration::from_secs(5))
    }

    fn entry(problem_id: i64) -> ProblemResultEntry {
        ProblemResultEntry {
            problem_id,
            correctness: Some(problem_id % 2 == 0),
            time_taken_seconds: 30,
            submitted_answer: Some(format!("answer-{problem_id}")),
            meta_tag: Some(MetaCognitionTag::Unsure),
            answer_change_count: 1,
        }
    }

    #[tokio::test]
    async fn test_zero_batch_size_is_clamped() {
        let log = memory_log(0).await;
        assert_eq!(log.batch_size(), 1);
    }

    #[tokio::test]
    async fn test_append_splits_into_batches() {
        let log = memory_log(2).await;
        let entries: Vec<_> = (1..=5).map(entry).collect();

        let report = log.append_results(10, 7, &entries).await.unwrap();
        assert_eq!(report.rows_written, 5);
        assert_eq!(report.batches, 3);

        let rows = log.list_results(10).await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.problem_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(rows[0].meta_tag, Some(MetaCognitionTag::Unsure));
        assert_eq!(rows[0].student_id, 7);
    }

    #[tokio::test]
    async fn test_replay_skips_existing_rows() {
        let log = memory_log(DEFAULT_BATCH_SIZE).await;
        let entries: Vec<_> = (1..=3).map(entry).collect();

        log.append_results(10, 7, &entries).await.unwrap();
        let replay = log.append_results(10, 7, &entries).await.unwrap();

        assert_eq!(replay.rows_written, 0);
        assert_eq!(log.list_results(10).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_by_composite_key() {
        let log = memory_log(DEFAULT_BATCH_SIZE).await;
        log.append_results(10, 7, &[entry(1), entry(2)]).await.unwrap();
        log.append_results(11, 7, &[entry(1)]).await.unwrap();

        // 不存在的键视为成功
        let deleted = log.delete_results(10, &[1, 2, 99]).await.unwrap();
        assert_eq!(deleted, 2);
        assert!(log.list_results(10).await.unwrap().is_empty());
        assert_eq!(log.list_results(11).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_append_writes_nothing() {
        let log = memory_log(DEFAULT_BATCH_SIZE).await;
        let report = log.append_results(10, 7, &[]).await.unwrap();
        assert_eq!(report, AppendReport::default());
    }
}
