//! 授权守卫
//!
//! 只确认调用方是考试分配的所有者。已交卷的分配不在这里拦截，
//! 由协调器按幂等规则返回“已交卷”。

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::{AcademyError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::auth::entities::AuthenticatedUser;
use crate::storage::AssignmentStore;

#[async_trait]
pub trait AuthorizationGuard: Send + Sync {
    /// 仅所有者可以通过
    async fn authorize(&self, caller_id: i64, assignment_id: i64) -> Result<Assignment>;

    /// 所有者或教师、管理员可以读取
    async fn authorize_read(
        &self,
        caller: AuthenticatedUser,
        assignment_id: i64,
    ) -> Result<Assignment>;
}

pub struct OwnershipGuard {
    assignments: Arc<dyn AssignmentStore>,
}

impl OwnershipGuard {
    pub fn new(assignments: Arc<dyn AssignmentStore>) -> Self {
        Self { assignments }
    }

    async fn load(&self, assignment_id: i64) -> Result<Assignment> {
        self.assignments
            .get_assignment(assignment_id)
            .await?
            .ok_or_else(|| AcademyError::not_found(format!("考试分配不存在: {assignment_id}")))
    }
}

#[async_trait]
impl AuthorizationGuard for OwnershipGuard {
    async fn authorize(&self, caller_id: i64, assignment_id: i64) -> Result<Assignment> {
        let assignment = self.load(assignment_id).await?;
        if assignment.student_id != caller_id {
            return Err(AcademyError::authorization(format!(
                "无权访问考试分配 {assignment_id}"
            )));
        }
        Ok(assignment)
    }

    async fn authorize_read(
        &self,
        caller: AuthenticatedUser,
        assignment_id: i64,
    ) -> Result<Assignment> {
        let assignment = self.load(assignment_id).await?;
        if assignment.student_id != caller.id && !caller.role.is_staff() {
            return Err(AcademyError::authorization(format!(
                "无权访问考试分配 {assignment_id}"
            )));
        }
        Ok(assignment)
    }
}
