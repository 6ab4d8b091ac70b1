use std::collections::HashSet;

use crate::models::assignments::requests::SubmitExamRequest;

/// 交卷数据校验结果
#[derive(Debug, Clone)]
pub struct SubmissionValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl SubmissionValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 校验交卷数据
///
/// 只做结构性检查，不涉及考试状态：
/// - 结束时间不早于开始时间
/// - 时长、计数不为负
/// - 正确率在 0-100 之间
/// - 题目 ID 不重复
pub fn validate_submission(req: &SubmitExamRequest) -> SubmissionValidationResult {
    let mut errors = Vec::new();
    let summary = &req.summary;

    // 1. 时间顺序
    if summary.end_time < summary.start_time {
        errors.push("End time must not be earlier than start time");
    }

    // 2. 汇总数值
    if summary.pure_time_seconds < 0 {
        errors.push("Pure time must not be negative");
    }
    if summary.answer_change_total_count < 0 {
        errors.push("Answer change total count must not be negative");
    }

    // 3. 正确率范围
    if let Some(rate) = summary.correct_rate_percent
        && !(0.0..=100.0).contains(&rate)
    {
        errors.push("Correct rate must be between 0 and 100");
    }

    // 4. 单题数据
    if req
        .results
        .iter()
        .any(|r| r.time_taken_seconds < 0 || r.answer_change_count < 0)
    {
        errors.push("Per-problem time and change count must not be negative");
    }

    let mut seen = HashSet::with_capacity(req.results.len());
    if !req.results.iter().all(|r| seen.insert(r.problem_id)) {
        errors.push("Problem ids must be unique within a submission");
    }

    SubmissionValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::requests::{ProblemResultEntry, SubmissionSummary};
    use chrono::{Duration, Utc};

    fn request(results: Vec<ProblemResultEntry>) -> SubmitExamRequest {
        let start = Utc::now();
        SubmitExamRequest {
            summary: SubmissionSummary {
                start_time: start,
                end_time: start + Duration::seconds(600),
                pure_time_seconds: 540,
                correct_rate_percent: Some(80.0),
                answer_change_total_count: 3,
            },
            results,
        }
    }

    fn entry(problem_id: i64) -> ProblemResultEntry {
        ProblemResultEntry {
            problem_id,
            correctness: Some(true),
            time_taken_seconds: 30,
            submitted_answer: None,
            meta_tag: None,
            answer_change_count: 0,
        }
    }

    #[test]
    fn test_valid_submission() {
        assert!(validate_submission(&request(vec![entry(1), entry(2)])).is_valid);
        // 没有作答记录的考试同样合法
        assert!(validate_submission(&request(vec![])).is_valid);
    }

    #[test]
    fn test_end_before_start() {
        let mut req = request(vec![]);
        req.summary.end_time = req.summary.start_time - Duration::seconds(1);
        let result = validate_submission(&req);
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"End time must not be earlier than start time")
        );
    }

    #[test]
    fn test_correct_rate_out_of_range() {
        let mut req = request(vec![]);
        req.summary.correct_rate_percent = Some(100.5);
        assert!(!validate_submission(&req).is_valid);

        req.summary.correct_rate_percent = None;
        assert!(validate_submission(&req).is_valid);
    }

    #[test]
    fn test_negative_values() {
        let mut bad = entry(1);
        bad.time_taken_seconds = -1;
        let mut req = request(vec![bad]);
        req.summary.pure_time_seconds = -5;

        let result = validate_submission(&req);
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_duplicate_problem_ids() {
        let result = validate_submission(&request(vec![entry(1), entry(2), entry(1)]));
        assert!(!result.is_valid);
        assert_eq!(
            result.error_message(),
            "Problem ids must be unique within a submission"
        );
    }
}
