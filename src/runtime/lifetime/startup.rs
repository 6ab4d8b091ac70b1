use crate::config::AppConfig;
use crate::errors::{AcademyError, Result};
use crate::saga::SubmissionCoordinator;
use crate::services::assignments::{AuthorizationGuard, OwnershipGuard};
use crate::storage::blob_dump::FileBlobDump;
use crate::storage::{AssignmentStore, ResultLogStore, SubmissionAuditStore};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct StartupContext {
    pub assignments: Arc<dyn AssignmentStore>,
    pub audits: Arc<dyn SubmissionAuditStore>,
    pub result_log: Arc<dyn ResultLogStore>,
    pub guard: Arc<dyn AuthorizationGuard>,
    pub coordinator: SubmissionCoordinator,
}

/// 准备服务器启动的上下文
/// 包括两个存储的连接与迁移、授权守卫和交卷协调器
pub async fn prepare_server_startup() -> Result<StartupContext> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| AcademyError::internal("Failed to install rustls crypto provider"))?;

    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("System-of-record storage initialized and migrations completed");

    let result_log = crate::storage::create_result_log().await?;
    warn!("Result log storage initialized and migrations completed");

    let assignments: Arc<dyn AssignmentStore> = storage.clone();
    let audits: Arc<dyn SubmissionAuditStore> = storage;

    let mut coordinator =
        SubmissionCoordinator::new(assignments.clone(), result_log.clone(), audits.clone());
    if config.blob_dump.enabled {
        debug!("Submission blob dump enabled at {}", config.blob_dump.dir);
        coordinator = coordinator.with_blob_dump(Arc::new(FileBlobDump::new(&config.blob_dump.dir)));
    } else {
        warn!("Submission blob dump disabled");
    }

    let guard: Arc<dyn AuthorizationGuard> = Arc::new(OwnershipGuard::new(assignments.clone()));

    Ok(StartupContext {
        assignments,
        audits,
        result_log,
        guard,
        coordinator,
    })
}
