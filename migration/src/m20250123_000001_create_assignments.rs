use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建考试分配表（系统记录库）
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignments::ExamId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Assignments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::Status).string().not_null())
                    .col(ColumnDef::new(Assignments::StartedAt).big_integer().null())
                    .col(ColumnDef::new(Assignments::CompletedAt).big_integer().null())
                    .col(ColumnDef::new(Assignments::CorrectRate).double().null())
                    .col(
                        ColumnDef::new(Assignments::PureTimeSeconds)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::TotalDurationSeconds)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::AnswerChangeTotalCount)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建提交审计表
        manager
            .create_table(
                Table::create()
                    .table(SubmissionAudits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubmissionAudits::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubmissionAudits::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubmissionAudits::Stage).string().not_null())
                    .col(ColumnDef::new(SubmissionAudits::Action).string().not_null())
                    .col(
                        ColumnDef::new(SubmissionAudits::AssignmentWriteOk)
                            .boolean()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SubmissionAudits::LogWriteOk)
                            .boolean()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SubmissionAudits::Success)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubmissionAudits::Detail).text().null())
                    .col(
                        ColumnDef::new(SubmissionAudits::RecordedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_student_id")
                    .table(Assignments::Table)
                    .col(Assignments::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assignments_exam_id")
                    .table(Assignments::Table)
                    .col(Assignments::ExamId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submission_audits_assignment_id")
                    .table(SubmissionAudits::Table)
                    .col(SubmissionAudits::AssignmentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubmissionAudits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    ExamId,
    StudentId,
    Status,
    StartedAt,
    CompletedAt,
    CorrectRate,
    PureTimeSeconds,
    TotalDurationSeconds,
    AnswerChangeTotalCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SubmissionAudits {
    #[sea_orm(iden = "submission_audits")]
    Table,
    Id,
    AssignmentId,
    Stage,
    Action,
    AssignmentWriteOk,
    LogWriteOk,
    Success,
    Detail,
    RecordedAt,
}
