//! 数据库连接
//!
//! 系统记录库与结果日志库共用同一套连接逻辑，但各自持有独立的连接池。

use crate::errors::{AcademyError, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

/// 按 URL 建立连接，SQLite 走专用的 WAL 配置
pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
    let db_url = build_database_url(url)?;
    if db_url.starts_with("sqlite:") {
        connect_sqlite(&db_url, pool_size, timeout).await
    } else {
        connect_generic(&db_url, pool_size, timeout).await
    }
}

/// SQLite 专用连接（WAL + pragma 优化）
async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
    use sea_orm::SqlxSqliteConnector;
    use sea_orm::sqlx::sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
    };
    use std::str::FromStr;

    let opt = SqliteConnectOptions::from_str(url)
        .map_err(|e| AcademyError::database_config(format!("SQLite URL 解析失败: {e}")))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5))
        .pragma("cache_size", "-64000")
        .pragma("temp_store", "memory");

    let pool = SqlitePoolOptions::new()
        .max_connections(pool_size)
        .min_connections(1)
        .test_before_acquire(true)
        .acquire_timeout(Duration::from_secs(timeout))
        .idle_timeout(Duration::from_secs(300))
        .connect_with(opt)
        .await
        .map_err(|e| AcademyError::database_connection(format!("SQLite 连接失败: {e}")))?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// 通用连接（PostgreSQL、MySQL 等）
async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(url);
    opt.max_connections(pool_size)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(timeout))
        .acquire_timeout(Duration::from_secs(timeout))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(false)
        .sqlx_logging_level(tracing::log::LevelFilter::Debug);

    Database::connect(opt)
        .await
        .map_err(|e| AcademyError::database_connection(format!("无法连接到数据库: {e}")))
}

/// 从 URL 自动推断数据库类型并构建连接 URL
pub fn build_database_url(url: &str) -> Result<String> {
    if url.starts_with("sqlite:") {
        Ok(url.to_string())
    } else if url.ends_with(".db") || url.ends_with(".sqlite") {
        Ok(format!("sqlite://{}?mode=rwc", url))
    } else if url.starts_with("postgres://")
        || url.starts_with("postgresql://")
        || url.starts_with("mysql://")
        || url.starts_with("mariadb://")
    {
        Ok(url.to_string())
    } else {
        Err(AcademyError::database_config(format!(
            "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
        )))
    }
}
