use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 考试分配状态
//
// assigned → not_started → in_progress → {completed, graded} → expired
// 提交流程只负责 in_progress → {completed, graded}，以及补偿时的反向回退。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum AssignmentStatus {
    Assigned,   // 已分配
    NotStarted, // 未开始
    InProgress, // 作答中
    Completed,  // 已完成（未评分）
    Graded,     // 已评分
    Expired,    // 已过期
}

impl AssignmentStatus {
    pub const ASSIGNED: &'static str = "assigned";
    pub const NOT_STARTED: &'static str = "not_started";
    pub const IN_PROGRESS: &'static str = "in_progress";
    pub const COMPLETED: &'static str = "completed";
    pub const GRADED: &'static str = "graded";
    pub const EXPIRED: &'static str = "expired";

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => Self::ASSIGNED,
            AssignmentStatus::NotStarted => Self::NOT_STARTED,
            AssignmentStatus::InProgress => Self::IN_PROGRESS,
            AssignmentStatus::Completed => Self::COMPLETED,
            AssignmentStatus::Graded => Self::GRADED,
            AssignmentStatus::Expired => Self::EXPIRED,
        }
    }

    /// 已提交终态，再次提交直接视为成功
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssignmentStatus::Completed | AssignmentStatus::Graded)
    }

    /// 提交完成后的目标状态：带正确率即视为已自动评分
    pub fn completion_target(correct_rate_percent: Option<f64>) -> Self {
        if correct_rate_percent.is_some() {
            AssignmentStatus::Graded
        } else {
            AssignmentStatus::Completed
        }
    }
}

impl<'de> Deserialize<'de> for AssignmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AssignmentStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的考试状态: '{s}'. 支持的状态: assigned, not_started, in_progress, completed, graded, expired"
            ))
        })
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assigned" => Ok(AssignmentStatus::Assigned),
            "not_started" => Ok(AssignmentStatus::NotStarted),
            "in_progress" => Ok(AssignmentStatus::InProgress),
            "completed" => Ok(AssignmentStatus::Completed),
            "graded" => Ok(AssignmentStatus::Graded),
            "expired" => Ok(AssignmentStatus::Expired),
            _ => Err(format!("Invalid assignment status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 关联的考试 ID
    pub exam_id: i64,
    // 作答学生 ID（所有者）
    pub student_id: i64,
    pub status: AssignmentStatus,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    // 正确率 (0-100)
    pub correct_rate: Option<f64>,
    pub pure_time_seconds: Option<i64>,
    pub total_duration_seconds: Option<i64>,
    pub answer_change_total_count: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            AssignmentStatus::Assigned,
            AssignmentStatus::NotStarted,
            AssignmentStatus::InProgress,
            AssignmentStatus::Completed,
            AssignmentStatus::Graded,
            AssignmentStatus::Expired,
        ] {
            assert_eq!(status.to_string().parse::<AssignmentStatus>(), Ok(status));
        }
        assert!("finished".parse::<AssignmentStatus>().is_err());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(AssignmentStatus::Completed.is_terminal());
        assert!(AssignmentStatus::Graded.is_terminal());
        assert!(!AssignmentStatus::InProgress.is_terminal());
        assert!(!AssignmentStatus::Expired.is_terminal());
    }

    #[test]
    fn test_completion_target_depends_on_correct_rate() {
        assert_eq!(
            AssignmentStatus::completion_target(Some(80.0)),
            AssignmentStatus::Graded
        );
        assert_eq!(
            AssignmentStatus::completion_target(Some(0.0)),
            AssignmentStatus::Graded
        );
        assert_eq!(
            AssignmentStatus::completion_target(None),
            AssignmentStatus::Completed
        );
    }

    #[test]
    fn test_status_deserialize_rejects_unknown() {
        let ok: AssignmentStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(ok, AssignmentStatus::InProgress);
        assert!(serde_json::from_str::<AssignmentStatus>("\"done\"").is_err());
    }
}
