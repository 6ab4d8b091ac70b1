//! 提交审计存储操作

use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, Set};

use crate::entity::prelude::SubmissionAudits;
use crate::entity::submission_audits::{ActiveModel, Column};
use crate::errors::{AcademyError, Result};
use crate::models::audits::entities::{NewSubmissionAudit, SubmissionAudit};

use super::SeaOrmStorage;

impl SeaOrmStorage {
    /// 写入审计记录
    pub(crate) async fn record_audit_impl(&self, audit: NewSubmissionAudit) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            assignment_id: Set(audit.assignment_id),
            stage: Set(audit.stage.to_string()),
            action: Set(audit.action.to_string()),
            assignment_write_ok: Set(audit.assignment_write_ok),
            log_write_ok: Set(audit.log_write_ok),
            success: Set(audit.success),
            detail: Set(audit.detail),
            recorded_at: Set(now),
            ..Default::default()
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("创建审计日志失败: {e}")))?;

        Ok(())
    }

    /// 获取某次考试的审计轨迹
    pub(crate) async fn list_audits_impl(&self, assignment_id: i64) -> Result<Vec<SubmissionAudit>> {
        let audits = SubmissionAudits::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by(Column::Id, Order::Asc)
            .all(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("获取审计日志失败: {e}")))?;

        Ok(audits.into_iter().map(|a| a.into_audit()).collect())
    }
}
