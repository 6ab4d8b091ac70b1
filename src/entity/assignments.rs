//! 考试分配实体（系统记录库）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub status: String,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub correct_rate: Option<f64>,
    pub pure_time_seconds: Option<i64>,
    pub total_duration_seconds: Option<i64>,
    pub answer_change_total_count: Option<i32>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::entities::{Assignment, AssignmentStatus};
        use chrono::{DateTime, Utc};

        Assignment {
            id: self.id,
            exam_id: self.exam_id,
            student_id: self.student_id,
            // 无法识别的状态按已过期处理，提交流程会拒绝写入
            status: self
                .status
                .parse::<AssignmentStatus>()
                .unwrap_or(AssignmentStatus::Expired),
            started_at: self
                .started_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            completed_at: self
                .completed_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            correct_rate: self.correct_rate,
            pure_time_seconds: self.pure_time_seconds,
            total_duration_seconds: self.total_duration_seconds,
            answer_change_total_count: self.answer_change_total_count,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
