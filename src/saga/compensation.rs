//! 补偿处理
//!
//! 只在协调器做出决策后直接调用。补偿本身失败意味着两个存储已经分叉，
//! 升级为 `CriticalInconsistency`，并写入 critical 审计记录。
//!
//! 超时的写入不代表没有落库：考试状态写入报告失败时，仍需回读确认
//! 本次的完成时间是否已经写入。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use super::audit::AuditRecorder;
use super::decision::CompensationDirection;
use crate::errors::{AcademyError, Result};
use crate::models::audits::entities::{AuditAction, AuditStage, NewSubmissionAudit};
use crate::storage::{AssignmentStore, ResultLogStore};

/// 补偿所需的上下文
#[derive(Debug, Clone, Default)]
pub struct CompensationContext {
    // 本次提交的完整题目 ID 集合，与分批方式无关
    pub problem_ids: Vec<i64>,
    pub assignment_error: Option<String>,
    pub log_error: Option<String>,
    // 本次提交写入的完成时间，用于识别超时后实际已落库的状态写入
    pub completed_at: Option<DateTime<Utc>>,
}

impl CompensationContext {
    /// 两侧写入结果的简述，用于日志和审计
    pub fn describe(&self) -> String {
        let assignment = self.assignment_error.as_deref().unwrap_or("ok");
        let log = self.log_error.as_deref().unwrap_or("ok");
        format!("assignment write: {assignment}; result log write: {log}")
    }
}

#[derive(Clone)]
pub struct CompensationHandler {
    assignments: Arc<dyn AssignmentStore>,
    result_log: Arc<dyn ResultLogStore>,
    audit: AuditRecorder,
}

impl CompensationHandler {
    pub fn new(
        assignments: Arc<dyn AssignmentStore>,
        result_log: Arc<dyn ResultLogStore>,
        audit: AuditRecorder,
    ) -> Self {
        Self {
            assignments,
            result_log,
            audit,
        }
    }

    pub async fn compensate(
        &self,
        direction: CompensationDirection,
        assignment_id: i64,
        context: &CompensationContext,
    ) -> Result<()> {
        warn!(
            assignment_id,
            %direction,
            cause = %context.describe(),
            "Running compensation for partial submission write"
        );

        let outcome = match direction {
            CompensationDirection::RevertAssignment => {
                self.revert_assignment(assignment_id, context).await
            }
            CompensationDirection::DeleteLogRows => {
                self.delete_log_rows(assignment_id, context).await
            }
        };

        let (assignment_write_ok, log_write_ok) = match direction {
            CompensationDirection::RevertAssignment => (Some(true), Some(false)),
            CompensationDirection::DeleteLogRows => (Some(false), Some(true)),
        };
        let action = match direction {
            CompensationDirection::RevertAssignment => AuditAction::RevertAssignment,
            CompensationDirection::DeleteLogRows => AuditAction::DeleteLogRows,
        };

        match outcome {
            Ok(detail) => {
                info!(assignment_id, %direction, "Compensation succeeded: {}", detail);
                self.audit
                    .record(NewSubmissionAudit {
                        assignment_id,
                        stage: AuditStage::Compensation,
                        action,
                        assignment_write_ok,
                        log_write_ok,
                        success: true,
                        detail: Some(detail),
                    })
                    .await;
                Ok(())
            }
            Err(e) => {
                error!(
                    assignment_id,
                    %direction,
                    error_code = e.code(),
                    "CRITICAL: compensation failed, stores are inconsistent: {}",
                    e
                );
                let detail = format!(
                    "{direction} failed: {}; original failure: {}",
                    e.message(),
                    context.describe()
                );
                self.audit
                    .record(NewSubmissionAudit {
                        assignment_id,
                        stage: AuditStage::Critical,
                        action,
                        assignment_write_ok,
                        log_write_ok,
                        success: false,
                        detail: Some(detail.clone()),
                    })
                    .await;
                Err(AcademyError::critical_inconsistency(format!(
                    "assignment {assignment_id}: {detail}"
                )))
            }
        }
    }

    /// 回退考试状态，再清理结果日志中可能已提交的前几批
    async fn revert_assignment(
        &self,
        assignment_id: i64,
        context: &CompensationContext,
    ) -> Result<String> {
        self.assignments.revert_to_in_progress(assignment_id).await?;

        if context.problem_ids.is_empty() {
            return Ok("status reverted to in_progress".to_string());
        }

        let swept = self
            .result_log
            .delete_results(assignment_id, &context.problem_ids)
            .await?;
        Ok(format!(
            "status reverted to in_progress; swept {swept} partially written result rows"
        ))
    }

    /// 删除本次写入的结果行；若考试状态其实已经写入（超时后落库），一并回退
    async fn delete_log_rows(
        &self,
        assignment_id: i64,
        context: &CompensationContext,
    ) -> Result<String> {
        let deleted = self
            .result_log
            .delete_results(assignment_id, &context.problem_ids)
            .await?;
        let mut detail = format!(
            "deleted {deleted} of {} result rows",
            context.problem_ids.len()
        );
        if self.revert_if_landed(assignment_id, context).await? {
            detail.push_str("; status write had landed, reverted to in_progress");
        }
        Ok(detail)
    }

    /// 两侧都失败后的清理，不属于补偿
    ///
    /// 结果日志可能已提交前几批，按完整题目集合清理；清理失败只记录，
    /// 重试时由幂等写入吸收。考试状态若实际已写入则必须回退，回退失败
    /// 与补偿失败同样视为严重不一致。
    pub async fn cleanup(&self, assignment_id: i64, context: &CompensationContext) -> Result<()> {
        let reverted = match self.revert_if_landed(assignment_id, context).await {
            Ok(reverted) => reverted,
            Err(e) => {
                error!(
                    assignment_id,
                    error_code = e.code(),
                    "CRITICAL: landed status write could not be reverted: {}",
                    e
                );
                let detail = format!(
                    "revert of landed status write failed: {}; original failure: {}",
                    e.message(),
                    context.describe()
                );
                self.audit
                    .record(NewSubmissionAudit {
                        assignment_id,
                        stage: AuditStage::Critical,
                        action: AuditAction::RevertAssignment,
                        assignment_write_ok: Some(false),
                        log_write_ok: Some(false),
                        success: false,
                        detail: Some(detail.clone()),
                    })
                    .await;
                return Err(AcademyError::critical_inconsistency(format!(
                    "assignment {assignment_id}: {detail}"
                )));
            }
        };

        let (success, mut detail) = if context.problem_ids.is_empty() {
            (true, "no result rows to sweep".to_string())
        } else {
            match self
                .result_log
                .delete_results(assignment_id, &context.problem_ids)
                .await
            {
                Ok(swept) => (true, format!("swept {swept} partially written result rows")),
                Err(e) => {
                    warn!(assignment_id, "Result log sweep failed: {}", e);
                    (false, format!("result log sweep failed: {}", e.message()))
                }
            }
        };
        if reverted {
            detail.push_str("; status write had landed, reverted to in_progress");
        }

        info!(assignment_id, success, "Cleanup after failed submission: {}", detail);
        self.audit
            .record(NewSubmissionAudit {
                assignment_id,
                stage: AuditStage::Cleanup,
                action: AuditAction::SweepLogRows,
                assignment_write_ok: Some(false),
                log_write_ok: Some(false),
                success,
                detail: Some(detail),
            })
            .await;
        Ok(())
    }

    /// 回读考试分配：处于终态且完成时间与本次提交一致，说明本次写入已落库
    async fn revert_if_landed(
        &self,
        assignment_id: i64,
        context: &CompensationContext,
    ) -> Result<bool> {
        let Some(completed_at) = context.completed_at else {
            return Ok(false);
        };
        let landed = match self.assignments.get_assignment(assignment_id).await? {
            Some(assignment) => {
                assignment.status.is_terminal()
                    && assignment.completed_at.map(|t| t.timestamp())
                        == Some(completed_at.timestamp())
            }
            None => false,
        };
        if !landed {
            return Ok(false);
        }

        warn!(
            assignment_id,
            "Status write reported failure but landed, reverting"
        );
        self.assignments.revert_to_in_progress(assignment_id).await?;
        Ok(true)
    }
}
