use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 审计记录所属的提交阶段
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub enum AuditStage {
    Precondition, // 写入前的检查
    Decision,     // 双写完成后的决策
    Compensation, // 补偿动作
    Critical,     // 补偿失败，两个存储已分叉
    Cleanup,      // 两侧都失败后的清理
}

impl AuditStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStage::Precondition => "precondition",
            AuditStage::Decision => "decision",
            AuditStage::Compensation => "compensation",
            AuditStage::Critical => "critical",
            AuditStage::Cleanup => "cleanup",
        }
    }
}

impl std::fmt::Display for AuditStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 审计动作
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub enum AuditAction {
    Rejected,           // 前置检查未通过
    AlreadyFinalized,   // 已是终态，幂等返回
    Committed,          // 两侧都写入成功
    NothingToUndo,      // 两侧都失败
    RevertAssignment,   // 回退考试状态
    DeleteLogRows,      // 删除已写入的结果行
    ConcurrentFinalize, // 并发的重复提交已先完成
    SweepLogRows,       // 清理残留的结果行
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Rejected => "rejected",
            AuditAction::AlreadyFinalized => "already_finalized",
            AuditAction::Committed => "committed",
            AuditAction::NothingToUndo => "nothing_to_undo",
            AuditAction::RevertAssignment => "revert_assignment",
            AuditAction::DeleteLogRows => "delete_log_rows",
            AuditAction::ConcurrentFinalize => "concurrent_finalize",
            AuditAction::SweepLogRows => "sweep_log_rows",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 待写入的审计记录
#[derive(Debug, Clone)]
pub struct NewSubmissionAudit {
    pub assignment_id: i64,
    pub stage: AuditStage,
    pub action: AuditAction,
    pub assignment_write_ok: Option<bool>,
    pub log_write_ok: Option<bool>,
    pub success: bool,
    pub detail: Option<String>,
}

/// 已持久化的审计记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit.ts")]
pub struct SubmissionAudit {
    pub id: i64,
    pub assignment_id: i64,
    pub stage: String,
    pub action: String,
    pub assignment_write_ok: Option<bool>,
    pub log_write_ok: Option<bool>,
    pub success: bool,
    pub detail: Option<String>,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}
