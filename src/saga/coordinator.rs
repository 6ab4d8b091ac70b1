//! 交卷协调器
//!
//! 并发写入考试状态与结果日志，两侧都完成后按决策表处理，必要时补偿。
//! 写入阶段在独立的 tokio 任务中运行，请求被取消也不会中断已发出的写入。

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::audit::AuditRecorder;
use super::compensation::{CompensationContext, CompensationHandler};
use super::decision::{CompensationDirection, SagaDecision, decide};
use crate::errors::{AcademyError, Result};
use crate::models::assignments::{
    entities::AssignmentStatus,
    requests::{ProblemResultEntry, SubmissionSummary, SubmitExamRequest},
};
use crate::models::audits::entities::{AuditAction, AuditStage, NewSubmissionAudit};
use crate::storage::blob_dump::{BlobDump, SubmissionDump};
use crate::storage::{AssignmentStore, CompletionWrite, ResultLogStore, SubmissionAuditStore};

/// 交卷结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// 本次请求完成了交卷
    Finalized {
        status: AssignmentStatus,
        rows_written: u64,
    },
    /// 已是终态，没有发生写入
    AlreadyFinalized { status: AssignmentStatus },
}

impl FinalizeOutcome {
    pub fn status(&self) -> AssignmentStatus {
        match self {
            FinalizeOutcome::Finalized { status, .. } => *status,
            FinalizeOutcome::AlreadyFinalized { status } => *status,
        }
    }

    /// 本次请求写入的结果行数，已交卷时没有写入
    pub fn rows_written(&self) -> Option<u64> {
        match self {
            FinalizeOutcome::Finalized { rows_written, .. } => Some(*rows_written),
            FinalizeOutcome::AlreadyFinalized { .. } => None,
        }
    }

    pub fn is_already_finalized(&self) -> bool {
        matches!(self, FinalizeOutcome::AlreadyFinalized { .. })
    }
}

#[derive(Clone)]
pub struct SubmissionCoordinator {
    assignments: Arc<dyn AssignmentStore>,
    result_log: Arc<dyn ResultLogStore>,
    audit: AuditRecorder,
    compensation: CompensationHandler,
    blob_dump: Option<Arc<dyn BlobDump>>,
}

impl SubmissionCoordinator {
    pub fn new(
        assignments: Arc<dyn AssignmentStore>,
        result_log: Arc<dyn ResultLogStore>,
        audits: Arc<dyn SubmissionAuditStore>,
    ) -> Self {
        let audit = AuditRecorder::new(audits);
        let compensation =
            CompensationHandler::new(assignments.clone(), result_log.clone(), audit.clone());
        Self {
            assignments,
            result_log,
            audit,
            compensation,
            blob_dump: None,
        }
    }

    pub fn with_blob_dump(mut self, blob_dump: Arc<dyn BlobDump>) -> Self {
        self.blob_dump = Some(blob_dump);
        self
    }

    /// 交卷
    ///
    /// 前置检查失败（不存在、非本人、状态不对）时不发生任何写入；
    /// 已是终态时直接返回 `AlreadyFinalized`。
    pub async fn finalize(
        &self,
        assignment_id: i64,
        caller_id: i64,
        summary: SubmissionSummary,
        results: Vec<ProblemResultEntry>,
    ) -> Result<FinalizeOutcome> {
        let assignment = match self.assignments.get_assignment(assignment_id).await? {
            Some(assignment) => assignment,
            None => {
                self.reject(assignment_id, "assignment not found").await;
                return Err(AcademyError::not_found(format!(
                    "考试分配不存在: {assignment_id}"
                )));
            }
        };

        if assignment.student_id != caller_id {
            self.reject(assignment_id, &format!("caller {caller_id} is not the owner"))
                .await;
            return Err(AcademyError::authorization(format!(
                "无权提交考试分配 {assignment_id}"
            )));
        }

        if assignment.status.is_terminal() {
            info!(
                assignment_id,
                status = %assignment.status,
                "Assignment already finalized, skipping writes"
            );
            self.audit
                .record(NewSubmissionAudit {
                    assignment_id,
                    stage: AuditStage::Precondition,
                    action: AuditAction::AlreadyFinalized,
                    assignment_write_ok: None,
                    log_write_ok: None,
                    success: true,
                    detail: Some(format!("status already {}", assignment.status)),
                })
                .await;
            return Ok(FinalizeOutcome::AlreadyFinalized {
                status: assignment.status,
            });
        }

        if assignment.status != AssignmentStatus::InProgress {
            self.reject(
                assignment_id,
                &format!("status {} cannot be finalized", assignment.status),
            )
            .await;
            return Err(AcademyError::assignment_state(format!(
                "考试分配 {assignment_id} 当前状态为 {}，无法交卷",
                assignment.status
            )));
        }

        self.spawn_blob_dump(assignment_id, assignment.student_id, &summary, &results);

        // 写入阶段脱离请求生命周期运行
        let coordinator = self.clone();
        let student_id = assignment.student_id;
        let handle = tokio::spawn(async move {
            coordinator
                .write_and_settle(assignment_id, student_id, summary, results)
                .await
        });

        handle
            .await
            .map_err(|e| AcademyError::internal(format!("交卷任务异常退出: {e}")))?
    }

    async fn write_and_settle(
        &self,
        assignment_id: i64,
        student_id: i64,
        summary: SubmissionSummary,
        results: Vec<ProblemResultEntry>,
    ) -> Result<FinalizeOutcome> {
        // 两侧都必须完成，一侧失败不取消另一侧
        let (assignment_write, log_write) = tokio::join!(
            self.assignments.set_completed(assignment_id, &summary),
            self.result_log
                .append_results(assignment_id, student_id, &results),
        );

        if let Ok(CompletionWrite::AlreadyTerminal(status)) = assignment_write {
            // 并发的重复提交已经完成，不回退也不删除对方的数据
            warn!(
                assignment_id,
                %status,
                "Concurrent finalize detected, treating as already finalized"
            );
            self.audit
                .record(NewSubmissionAudit {
                    assignment_id,
                    stage: AuditStage::Decision,
                    action: AuditAction::ConcurrentFinalize,
                    assignment_write_ok: None,
                    log_write_ok: Some(log_write.is_ok()),
                    success: true,
                    detail: Some(format!("status already {status}")),
                })
                .await;
            return Ok(FinalizeOutcome::AlreadyFinalized { status });
        }

        let assignment_write_ok = assignment_write.is_ok();
        let log_write_ok = log_write.is_ok();
        let decision = decide(assignment_write_ok, log_write_ok);

        debug!(
            assignment_id,
            assignment_write_ok,
            log_write_ok,
            ?decision,
            "Submission writes settled"
        );

        let context = CompensationContext {
            problem_ids: results.iter().map(|r| r.problem_id).collect(),
            assignment_error: assignment_write.as_ref().err().map(|e| e.to_string()),
            log_error: log_write.as_ref().err().map(|e| e.to_string()),
            completed_at: Some(summary.end_time),
        };

        match decision {
            SagaDecision::Commit => {
                let status = match assignment_write {
                    Ok(CompletionWrite::Applied(status)) => status,
                    _ => AssignmentStatus::completion_target(summary.correct_rate_percent),
                };
                let report = log_write.unwrap_or_default();

                info!(
                    assignment_id,
                    %status,
                    rows_written = report.rows_written,
                    batches = report.batches,
                    "Submission finalized"
                );
                self.record_decision(
                    assignment_id,
                    AuditAction::Committed,
                    true,
                    true,
                    Some(format!(
                        "{} rows in {} batches",
                        report.rows_written, report.batches
                    )),
                )
                .await;

                Ok(FinalizeOutcome::Finalized {
                    status,
                    rows_written: report.rows_written,
                })
            }
            SagaDecision::NothingToUndo => {
                warn!(
                    assignment_id,
                    "Both submission writes failed: {}",
                    context.describe()
                );
                self.record_decision(
                    assignment_id,
                    AuditAction::NothingToUndo,
                    false,
                    false,
                    Some(context.describe()),
                )
                .await;

                // 不补偿，但清理可能残留的数据
                self.compensation.cleanup(assignment_id, &context).await?;

                Err(AcademyError::submission_write(format!(
                    "交卷失败，请重试 ({})",
                    context.describe()
                )))
            }
            SagaDecision::Compensate(direction) => {
                let action = match direction {
                    CompensationDirection::RevertAssignment => AuditAction::RevertAssignment,
                    CompensationDirection::DeleteLogRows => AuditAction::DeleteLogRows,
                };
                self.record_decision(
                    assignment_id,
                    action,
                    assignment_write_ok,
                    log_write_ok,
                    Some(context.describe()),
                )
                .await;

                self.compensation
                    .compensate(direction, assignment_id, &context)
                    .await?;

                Err(AcademyError::submission_write(format!(
                    "交卷失败，已回滚，请重试 ({})",
                    context.describe()
                )))
            }
        }
    }

    async fn reject(&self, assignment_id: i64, reason: &str) {
        info!(assignment_id, "Submission rejected before writes: {}", reason);
        self.audit
            .record(NewSubmissionAudit {
                assignment_id,
                stage: AuditStage::Precondition,
                action: AuditAction::Rejected,
                assignment_write_ok: None,
                log_write_ok: None,
                success: false,
                detail: Some(reason.to_string()),
            })
            .await;
    }

    async fn record_decision(
        &self,
        assignment_id: i64,
        action: AuditAction,
        assignment_write_ok: bool,
        log_write_ok: bool,
        detail: Option<String>,
    ) {
        self.audit
            .record(NewSubmissionAudit {
                assignment_id,
                stage: AuditStage::Decision,
                action,
                assignment_write_ok: Some(assignment_write_ok),
                log_write_ok: Some(log_write_ok),
                success: assignment_write_ok && log_write_ok,
                detail,
            })
            .await;
    }

    /// 原始数据转储，不等待结果
    fn spawn_blob_dump(
        &self,
        assignment_id: i64,
        student_id: i64,
        summary: &SubmissionSummary,
        results: &[ProblemResultEntry],
    ) {
        let Some(blob_dump) = self.blob_dump.clone() else {
            return;
        };

        let dump = SubmissionDump {
            assignment_id,
            student_id,
            received_at: chrono::Utc::now(),
            payload: SubmitExamRequest {
                summary: summary.clone(),
                results: results.to_vec(),
            },
        };

        tokio::spawn(async move {
            match blob_dump.write_dump(dump).await {
                Ok(path) => debug!(assignment_id, "Submission dump written to {}", path.display()),
                Err(e) => warn!(assignment_id, "Submission dump failed: {}", e),
            }
        });
    }
}
