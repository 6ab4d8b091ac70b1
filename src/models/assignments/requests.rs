use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::problem_results::entities::MetaCognitionTag;

/// 考试汇总信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmissionSummary {
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,
    // 去除暂停后的纯作答时长
    pub pure_time_seconds: i64,
    // 正确率 0-100，为空表示未自动评分
    #[serde(default)]
    pub correct_rate_percent: Option<f64>,
    pub answer_change_total_count: i32,
}

impl SubmissionSummary {
    /// 考试总耗时（结束时间 - 开始时间）
    pub fn total_duration_seconds(&self) -> i64 {
        self.end_time
            .signed_duration_since(self.start_time)
            .num_seconds()
    }
}

/// 单题作答记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct ProblemResultEntry {
    pub problem_id: i64,
    #[serde(default)]
    pub correctness: Option<bool>,
    pub time_taken_seconds: i64,
    #[serde(default)]
    pub submitted_answer: Option<String>,
    #[serde(default)]
    pub meta_tag: Option<MetaCognitionTag>,
    pub answer_change_count: i32,
}

/// 交卷请求
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmitExamRequest {
    pub summary: SubmissionSummary,
    #[serde(default)]
    pub results: Vec<ProblemResultEntry>,
}
