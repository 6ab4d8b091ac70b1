//! 提交审计实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submission_audits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub stage: String,
    pub action: String,
    pub assignment_write_ok: Option<bool>,
    pub log_write_ok: Option<bool>,
    pub success: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub detail: Option<String>,
    pub recorded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_audit(self) -> crate::models::audits::entities::SubmissionAudit {
        use crate::models::audits::entities::SubmissionAudit;
        use chrono::{DateTime, Utc};

        SubmissionAudit {
            id: self.id,
            assignment_id: self.assignment_id,
            stage: self.stage,
            action: self.action,
            assignment_write_ok: self.assignment_write_ok,
            log_write_ok: self.log_write_ok,
            success: self.success,
            detail: self.detail,
            recorded_at: DateTime::<Utc>::from_timestamp(self.recorded_at, 0).unwrap_or_default(),
        }
    }
}
