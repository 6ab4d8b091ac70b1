use serde::Serialize;
use ts_rs::TS;

use super::entities::AssignmentStatus;

/// 交卷结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct FinalizeResponse {
    pub assignment_id: i64,
    pub status: AssignmentStatus,
    // 重复提交时为 true，此时没有发生任何写入
    pub already_finalized: bool,
    // 本次写入的结果行数，重复提交时为空
    pub rows_written: Option<u64>,
}
