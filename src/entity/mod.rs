//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! `assignments`、`submission_audits` 位于系统记录库，
//! `problem_results` 位于独立的结果日志库，两者之间没有外键。

pub mod prelude;

pub mod assignments;
pub mod problem_results;
pub mod submission_audits;
