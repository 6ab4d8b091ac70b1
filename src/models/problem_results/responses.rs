use serde::Serialize;
use ts_rs::TS;

use super::entities::ProblemResult;

/// 某次考试的题目结果列表（无分页）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/problem-result.ts")]
pub struct ProblemResultListResponse {
    pub assignment_id: i64,
    pub items: Vec<ProblemResult>,
}
