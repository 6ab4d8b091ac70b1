use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生自评的元认知标签
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/problem-result.ts")]
pub enum MetaCognitionTag {
    Confident, // 确定会做
    Unsure,    // 不太确定
    Guessed,   // 猜的
    NoIdea,    // 完全不会
}

impl MetaCognitionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaCognitionTag::Confident => "confident",
            MetaCognitionTag::Unsure => "unsure",
            MetaCognitionTag::Guessed => "guessed",
            MetaCognitionTag::NoIdea => "no_idea",
        }
    }
}

impl<'de> Deserialize<'de> for MetaCognitionTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<MetaCognitionTag>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的自评标签: '{s}'. 支持的标签: confident, unsure, guessed, no_idea"
            ))
        })
    }
}

impl std::fmt::Display for MetaCognitionTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MetaCognitionTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confident" => Ok(MetaCognitionTag::Confident),
            "unsure" => Ok(MetaCognitionTag::Unsure),
            "guessed" => Ok(MetaCognitionTag::Guessed),
            "no_idea" => Ok(MetaCognitionTag::NoIdea),
            _ => Err(format!("Invalid meta-cognition tag: {s}")),
        }
    }
}

/// 单题作答结果，(assignment_id, problem_id) 唯一
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/problem-result.ts")]
pub struct ProblemResult {
    pub assignment_id: i64,
    pub problem_id: i64,
    pub student_id: i64,
    pub correctness: Option<bool>,
    pub time_taken_seconds: i64,
    pub submitted_answer: Option<String>,
    pub meta_tag: Option<MetaCognitionTag>,
    pub answer_change_count: i32,
    pub written_at: chrono::DateTime<chrono::Utc>,
}
