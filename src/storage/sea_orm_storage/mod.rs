//! SeaORM 存储实现（系统记录库）
//!
//! 持有考试分配表与提交审计表，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod submission_audits;

use crate::config::AppConfig;
use crate::errors::{AcademyError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    // 单次请求时限
    pub(crate) timeout: Duration,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db = super::connection::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await?;

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AcademyError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", config.database.url);

        Ok(Self::from_connection(
            db,
            Duration::from_secs(config.database.timeout),
        ))
    }

    /// 使用已有连接创建实例（迁移由调用方负责）
    pub fn from_connection(db: DatabaseConnection, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

// Storage trait 实现
use crate::models::{
    assignments::{entities::Assignment, requests::SubmissionSummary},
    audits::entities::{NewSubmissionAudit, SubmissionAudit},
};
use crate::storage::{AssignmentStore, CompletionWrite, SubmissionAuditStore, bounded};
use async_trait::async_trait;

#[async_trait]
impl AssignmentStore for SeaOrmStorage {
    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        bounded(
            self.timeout,
            "get_assignment",
            self.get_assignment_impl(assignment_id),
        )
        .await
    }

    async fn set_completed(
        &self,
        assignment_id: i64,
        summary: &SubmissionSummary,
    ) -> Result<CompletionWrite> {
        bounded(
            self.timeout,
            "set_completed",
            self.set_completed_impl(assignment_id, summary),
        )
        .await
    }

    async fn revert_to_in_progress(&self, assignment_id: i64) -> Result<()> {
        bounded(
            self.timeout,
            "revert_to_in_progress",
            self.revert_to_in_progress_impl(assignment_id),
        )
        .await
    }
}

#[async_trait]
impl SubmissionAuditStore for SeaOrmStorage {
    async fn record_audit(&self, audit: NewSubmissionAudit) -> Result<()> {
        bounded(self.timeout, "record_audit", self.record_audit_impl(audit)).await
    }

    async fn list_audits(&self, assignment_id: i64) -> Result<Vec<SubmissionAudit>> {
        bounded(
            self.timeout,
            "list_audits",
            self.list_audits_impl(assignment_id),
        )
        .await
    }
}
