//! 审计记录
//!
//! 每个决策和补偿都写入 submission_audits 表并同步输出到 tracing。
//! 审计写入失败只记录日志，不改变交卷结果。

use std::sync::Arc;

use tracing::{info, warn};

use crate::models::audits::entities::NewSubmissionAudit;
use crate::storage::SubmissionAuditStore;

#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn SubmissionAuditStore>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn SubmissionAuditStore>) -> Self {
        Self { store }
    }

    pub async fn record(&self, audit: NewSubmissionAudit) {
        info!(
            assignment_id = audit.assignment_id,
            stage = %audit.stage,
            action = %audit.action,
            assignment_write_ok = ?audit.assignment_write_ok,
            log_write_ok = ?audit.log_write_ok,
            success = audit.success,
            detail = audit.detail.as_deref().unwrap_or(""),
            "submission audit"
        );

        let assignment_id = audit.assignment_id;
        if let Err(e) = self.store.record_audit(audit).await {
            warn!(assignment_id, "Failed to persist submission audit: {}", e);
        }
    }
}
