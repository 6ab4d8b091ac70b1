pub use sea_orm_migration::prelude::*;

mod m20250123_000001_create_assignments;
mod m20250126_000001_create_problem_results;

/// 系统记录库迁移（考试分配 + 提交审计）
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250123_000001_create_assignments::Migration)]
    }
}

/// 结果日志库迁移，与系统记录库相互独立
pub struct ResultLogMigrator;

#[async_trait::async_trait]
impl MigratorTrait for ResultLogMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250126_000001_create_problem_results::Migration)]
    }

    // 两个库可能指向同一个 URL（开发环境），迁移记录表必须分开
    fn migration_table_name() -> DynIden {
        Alias::new("seaql_result_log_migrations").into_iden()
    }
}
