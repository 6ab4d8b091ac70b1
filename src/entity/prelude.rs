//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::problem_results::{
    ActiveModel as ProblemResultActiveModel, Entity as ProblemResults,
    Model as ProblemResultModel,
};
pub use super::submission_audits::{
    ActiveModel as SubmissionAuditActiveModel, Entity as SubmissionAudits,
    Model as SubmissionAuditModel,
};
