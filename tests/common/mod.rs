#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use academy_exam_server::errors::{AcademyError, Result};
use academy_exam_server::models::assignments::entities::{Assignment, AssignmentStatus};
use academy_exam_server::models::assignments::requests::{ProblemResultEntry, SubmissionSummary};
use academy_exam_server::models::problem_results::entities::ProblemResult;
use academy_exam_server::saga::SubmissionCoordinator;
use academy_exam_server::storage::result_log::SeaOrmResultLog;
use academy_exam_server::storage::sea_orm_storage::SeaOrmStorage;
use academy_exam_server::storage::{
    AppendReport, AssignmentStore, CompletionWrite, ResultLogStore, SubmissionAuditStore,
};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use migration::{Migrator, MigratorTrait, ResultLogMigrator};
use sea_orm::Database;

pub const STUDENT_ID: i64 = 1001;
pub const EXAM_ID: i64 = 77;

/// 两个互相独立的内存数据库
pub struct Harness {
    pub storage: Arc<SeaOrmStorage>,
    pub result_log: Arc<SeaOrmResultLog>,
}

impl Harness {
    pub async fn new(batch_size: usize) -> Self {
        let record_db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&record_db, None).await.unwrap();

        let log_db = Database::connect("sqlite::memory:").await.unwrap();
        ResultLogMigrator::up(&log_db, None).await.unwrap();

        Self {
            storage: Arc::new(SeaOrmStorage::from_connection(
                record_db,
                Duration::from_secs(5),
            )),
            result_log: Arc::new(SeaOrmResultLog::from_connection(
                log_db,
                batch_size,
                Duration::from_secs(5),
            )),
        }
    }

    pub async fn seed(&self, status: AssignmentStatus) -> Assignment {
        self.storage
            .create_assignment_impl(EXAM_ID, STUDENT_ID, status)
            .await
            .unwrap()
    }

    pub fn coordinator(&self) -> SubmissionCoordinator {
        SubmissionCoordinator::new(
            self.storage.clone(),
            self.result_log.clone(),
            self.storage.clone(),
        )
    }

    pub fn coordinator_with(
        &self,
        assignments: Arc<dyn AssignmentStore>,
        result_log: Arc<dyn ResultLogStore>,
    ) -> SubmissionCoordinator {
        SubmissionCoordinator::new(assignments, result_log, self.storage.clone())
    }

    pub async fn status(&self, assignment_id: i64) -> AssignmentStatus {
        self.storage
            .get_assignment(assignment_id)
            .await
            .unwrap()
            .unwrap()
            .status
    }

    pub async fn rows(&self, assignment_id: i64) -> Vec<ProblemResult> {
        self.result_log.list_results(assignment_id).await.unwrap()
    }

    pub async fn audit_actions(&self, assignment_id: i64) -> Vec<(String, String, bool)> {
        self.storage
            .list_audits(assignment_id)
            .await
            .unwrap()
            .into_iter()
            .map(|a| (a.stage, a.action, a.success))
            .collect()
    }
}

/// t0 = 2025-03-07 09:00:00Z，作答 600 秒
pub fn summary(correct_rate_percent: Option<f64>) -> SubmissionSummary {
    let t0 = Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap();
    SubmissionSummary {
        start_time: t0,
        end_time: t0 + chrono::Duration::seconds(600),
        pure_time_seconds: 540,
        correct_rate_percent,
        answer_change_total_count: 3,
    }
}

pub fn entry(problem_id: i64, correct: bool, seconds: i64) -> ProblemResultEntry {
    ProblemResultEntry {
        problem_id,
        correctness: Some(correct),
        time_taken_seconds: seconds,
        submitted_answer: Some(format!("answer-{problem_id}")),
        meta_tag: None,
        answer_change_count: 1,
    }
}

pub fn entries(count: i64) -> Vec<ProblemResultEntry> {
    (1..=count).map(|id| entry(id, id % 2 == 0, 20)).collect()
}

/// 可注入故障的考试分配存储
pub struct FaultyAssignments {
    inner: Arc<SeaOrmStorage>,
    pub fail_set_completed: bool,
    // 写入已提交，但调用方只看到超时
    pub land_then_timeout: bool,
    pub fail_revert: bool,
    // 读取时返回 in_progress，模拟并发提交之间的过期读
    pub stale_read: bool,
    pub set_completed_calls: AtomicUsize,
    pub revert_calls: AtomicUsize,
}

impl FaultyAssignments {
    pub fn new(inner: Arc<SeaOrmStorage>) -> Self {
        Self {
            inner,
            fail_set_completed: false,
            land_then_timeout: false,
            fail_revert: false,
            stale_read: false,
            set_completed_calls: AtomicUsize::new(0),
            revert_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_completed_calls(&self) -> usize {
        self.set_completed_calls.load(Ordering::SeqCst)
    }

    pub fn revert_calls(&self) -> usize {
        self.revert_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssignmentStore for FaultyAssignments {
    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let assignment = self.inner.get_assignment(assignment_id).await?;
        if self.stale_read {
            return Ok(assignment.map(|mut a| {
                a.status = AssignmentStatus::InProgress;
                a
            }));
        }
        Ok(assignment)
    }

    async fn set_completed(
        &self,
        assignment_id: i64,
        summary: &SubmissionSummary,
    ) -> Result<CompletionWrite> {
        self.set_completed_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_set_completed {
            return Err(AcademyError::store_timeout("set_completed timed out after 5s"));
        }
        let written = self.inner.set_completed(assignment_id, summary).await?;
        if self.land_then_timeout {
            return Err(AcademyError::store_timeout("set_completed timed out after 5s"));
        }
        Ok(written)
    }

    async fn revert_to_in_progress(&self, assignment_id: i64) -> Result<()> {
        self.revert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_revert {
            return Err(AcademyError::database_connection("assignment store unreachable"));
        }
        self.inner.revert_to_in_progress(assignment_id).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendFault {
    None,
    // 第一批就失败
    Immediately,
    // 前 n 批提交成功后失败
    AfterBatches(usize),
}

/// 可注入故障的结果日志存储
pub struct FaultyResultLog {
    inner: Arc<SeaOrmResultLog>,
    pub append_fault: AppendFault,
    pub fail_delete: bool,
    pub append_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
}

impl FaultyResultLog {
    pub fn new(inner: Arc<SeaOrmResultLog>) -> Self {
        Self {
            inner,
            append_fault: AppendFault::None,
            fail_delete: false,
            append_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
        }
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResultLogStore for FaultyResultLog {
    async fn append_results(
        &self,
        assignment_id: i64,
        student_id: i64,
        results: &[ProblemResultEntry],
    ) -> Result<AppendReport> {
        self.append_calls.fetch_add(1, Ordering::SeqCst);
        match self.append_fault {
            AppendFault::None => {
                self.inner
                    .append_results(assignment_id, student_id, results)
                    .await
            }
            AppendFault::Immediately => Err(AcademyError::database_operation(
                "result log rejected batch 0",
            )),
            AppendFault::AfterBatches(n) => {
                let committed = (n * self.inner.batch_size()).min(results.len());
                self.inner
                    .append_results(assignment_id, student_id, &results[..committed])
                    .await?;
                Err(AcademyError::database_operation(format!(
                    "result log rejected batch {n}"
                )))
            }
        }
    }

    async fn delete_results(&self, assignment_id: i64, problem_ids: &[i64]) -> Result<u64> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete {
            return Err(AcademyError::database_connection("result log unreachable"));
        }
        self.inner.delete_results(assignment_id, problem_ids).await
    }

    async fn list_results(&self, assignment_id: i64) -> Result<Vec<ProblemResult>> {
        self.inner.list_results(assignment_id).await
    }
}
