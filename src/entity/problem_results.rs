//! 题目作答结果实体（结果日志库）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "problem_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub assignment_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub problem_id: i64,
    pub student_id: i64,
    pub correctness: Option<bool>,
    pub time_taken_seconds: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub submitted_answer: Option<String>,
    pub meta_tag: Option<String>,
    pub answer_change_count: i32,
    pub written_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_problem_result(self) -> crate::models::problem_results::entities::ProblemResult {
        use crate::models::problem_results::entities::{MetaCognitionTag, ProblemResult};
        use chrono::{DateTime, Utc};

        ProblemResult {
            assignment_id: self.assignment_id,
            problem_id: self.problem_id,
            student_id: self.student_id,
            correctness: self.correctness,
            time_taken_seconds: self.time_taken_seconds,
            submitted_answer: self.submitted_answer,
            meta_tag: self
                .meta_tag
                .and_then(|tag| tag.parse::<MetaCognitionTag>().ok()),
            answer_change_count: self.answer_change_count,
            written_at: DateTime::<Utc>::from_timestamp(self.written_at, 0).unwrap_or_default(),
        }
    }
}
