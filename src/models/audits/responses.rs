use serde::Serialize;
use ts_rs::TS;

use super::entities::SubmissionAudit;

/// 某次考试的提交审计轨迹，按记录时间升序
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct SubmissionAuditListResponse {
    pub assignment_id: i64,
    pub audits: Vec<SubmissionAudit>,
}
