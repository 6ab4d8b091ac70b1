//! 双写完成后的决策表

use serde::Serialize;

/// 补偿方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationDirection {
    /// 考试状态已写入、结果日志失败：回退到 in_progress，并清理已提交的前几批结果
    RevertAssignment,
    /// 结果日志已写入、考试状态失败：删除本次提交的结果行
    DeleteLogRows,
}

impl CompensationDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompensationDirection::RevertAssignment => "revert_assignment",
            CompensationDirection::DeleteLogRows => "delete_log_rows",
        }
    }
}

impl std::fmt::Display for CompensationDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SagaDecision {
    Commit,
    NothingToUndo,
    Compensate(CompensationDirection),
}

/// | assignment | log   | 动作                 |
/// |------------|-------|----------------------|
/// | ok         | ok    | 成功                 |
/// | err        | err   | 失败，无需补偿       |
/// | ok         | err   | 回退考试状态         |
/// | err        | ok    | 删除已写入的结果行   |
///
/// 结果日志失败时可能已有前几批落库，回退时按完整题目集合一并清理。
pub fn decide(assignment_write_ok: bool, log_write_ok: bool) -> SagaDecision {
    match (assignment_write_ok, log_write_ok) {
        (true, true) => SagaDecision::Commit,
        (false, false) => SagaDecision::NothingToUndo,
        (true, false) => SagaDecision::Compensate(CompensationDirection::RevertAssignment),
        (false, true) => SagaDecision::Compensate(CompensationDirection::DeleteLogRows),
    }
}
