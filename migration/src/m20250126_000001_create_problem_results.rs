use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 题目作答结果表（结果日志库） ====================
        // (assignment_id, problem_id) 复合主键即幂等键
        manager
            .create_table(
                Table::create()
                    .table(ProblemResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProblemResults::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProblemResults::ProblemId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProblemResults::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProblemResults::Correctness).boolean().null())
                    .col(
                        ColumnDef::new(ProblemResults::TimeTakenSeconds)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProblemResults::SubmittedAnswer).text().null())
                    .col(ColumnDef::new(ProblemResults::MetaTag).string().null())
                    .col(
                        ColumnDef::new(ProblemResults::AnswerChangeCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProblemResults::WrittenAt)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ProblemResults::AssignmentId)
                            .col(ProblemResults::ProblemId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_problem_results_student_id")
                    .table(ProblemResults::Table)
                    .col(ProblemResults::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProblemResults::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ProblemResults {
    #[sea_orm(iden = "problem_results")]
    Table,
    AssignmentId,
    ProblemId,
    StudentId,
    Correctness,
    TimeTakenSeconds,
    SubmittedAnswer,
    MetaTag,
    AnswerChangeCount,
    WrittenAt,
}
