//! 考试分配存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{AcademyError, Result};
use crate::models::assignments::{
    entities::{Assignment, AssignmentStatus},
    requests::SubmissionSummary,
};
use crate::storage::CompletionWrite;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::warn;

impl SeaOrmStorage {
    /// 创建考试分配
    ///
    /// 分配考试本身属于外部流程，这里只提供最小实现供初始化数据和测试使用。
    pub async fn create_assignment_impl(
        &self,
        exam_id: i64,
        student_id: i64,
        status: AssignmentStatus,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            exam_id: Set(exam_id),
            student_id: Set(student_id),
            status: Set(status.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("创建考试分配失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取考试分配
    pub async fn get_assignment_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("查询考试分配失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 交卷：仅当当前状态为 in_progress 时写入终态
    pub async fn set_completed_impl(
        &self,
        assignment_id: i64,
        summary: &SubmissionSummary,
    ) -> Result<CompletionWrite> {
        let target = AssignmentStatus::completion_target(summary.correct_rate_percent);
        let now = chrono::Utc::now().timestamp();

        let result = Assignments::update_many()
            .col_expr(Column::Status, Expr::value(target.as_str()))
            .col_expr(Column::StartedAt, Expr::value(summary.start_time.timestamp()))
            .col_expr(Column::CompletedAt, Expr::value(summary.end_time.timestamp()))
            .col_expr(Column::CorrectRate, Expr::value(summary.correct_rate_percent))
            .col_expr(
                Column::PureTimeSeconds,
                Expr::value(summary.pure_time_seconds),
            )
            .col_expr(
                Column::TotalDurationSeconds,
                Expr::value(summary.total_duration_seconds()),
            )
            .col_expr(
                Column::AnswerChangeTotalCount,
                Expr::value(summary.answer_change_total_count),
            )
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(assignment_id))
            .filter(Column::Status.eq(AssignmentStatus::IN_PROGRESS))
            .exec(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("写入交卷状态失败: {e}")))?;

        if result.rows_affected > 0 {
            return Ok(CompletionWrite::Applied(target));
        }

        // 条件更新未命中：区分记录不存在、已是终态和其他状态
        match self.get_assignment_impl(assignment_id).await? {
            None => Err(AcademyError::not_found(format!(
                "考试分配不存在: {assignment_id}"
            ))),
            Some(current) if current.status.is_terminal() => {
                Ok(CompletionWrite::AlreadyTerminal(current.status))
            }
            Some(current) => Err(AcademyError::assignment_state(format!(
                "考试分配 {assignment_id} 当前状态为 {}，无法交卷",
                current.status
            ))),
        }
    }

    /// 补偿：回退到 in_progress
    ///
    /// 这是状态单调前进规则唯一允许的例外，必须留下日志。
    pub async fn revert_to_in_progress_impl(&self, assignment_id: i64) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        let result = Assignments::update_many()
            .col_expr(Column::Status, Expr::value(AssignmentStatus::IN_PROGRESS))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(assignment_id))
            .exec(&self.db)
            .await
            .map_err(|e| AcademyError::database_operation(format!("回退考试状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(AcademyError::not_found(format!(
                "考试分配不存在: {assignment_id}"
            )));
        }

        warn!(
            assignment_id,
            "Assignment status reverted to in_progress by compensation (controlled regression)"
        );
        Ok(())
    }
}
