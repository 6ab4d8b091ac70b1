//! 原始交卷数据转储
//!
//! 只写不读，失败只记录日志，不影响交卷结果。
//! 路径按日期分区：`{dir}/{YYYY}/{MM}/{DD}/{assignment_id}-{uuid}.json`

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::errors::{AcademyError, Result};
use crate::models::assignments::requests::SubmitExamRequest;

/// 转储内容：原始请求 + 考试 ID + 学生 ID + 服务器时间
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionDump {
    pub assignment_id: i64,
    pub student_id: i64,
    pub received_at: DateTime<Utc>,
    pub payload: SubmitExamRequest,
}

#[async_trait::async_trait]
pub trait BlobDump: Send + Sync {
    async fn write_dump(&self, dump: SubmissionDump) -> Result<PathBuf>;
}

/// 写入本地目录
pub struct FileBlobDump {
    root: PathBuf,
}

impl FileBlobDump {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 生成日期分区路径
    pub fn dump_path(&self, dump: &SubmissionDump) -> PathBuf {
        let ts = dump.received_at;
        self.root
            .join(format!("{:04}", ts.year()))
            .join(format!("{:02}", ts.month()))
            .join(format!("{:02}", ts.day()))
            .join(format!(
                "{}-{}.json",
                dump.assignment_id,
                uuid::Uuid::new_v4()
            ))
    }
}

fn write_json(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}

#[async_trait::async_trait]
impl BlobDump for FileBlobDump {
    async fn write_dump(&self, dump: SubmissionDump) -> Result<PathBuf> {
        let path = self.dump_path(&dump);
        let bytes = serde_json::to_vec_pretty(&dump)?;

        let target = path.clone();
        tokio::task::spawn_blocking(move || write_json(&target, &bytes))
            .await
            .map_err(|e| AcademyError::file_operation(format!("转储任务异常退出: {e}")))??;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::requests::SubmissionSummary;
    use chrono::TimeZone;

    fn sample_dump() -> SubmissionDump {
        let start = Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap();
        SubmissionDump {
            assignment_id: 42,
            student_id: 7,
            received_at: start + chrono::Duration::seconds(600),
            payload: SubmitExamRequest {
                summary: SubmissionSummary {
                    start_time: start,
                    end_time: start + chrono::Duration::seconds(600),
                    pure_time_seconds: 540,
                    correct_rate_percent: Some(80.0),
                    answer_change_total_count: 3,
                },
                results: vec![],
            },
        }
    }

    #[test]
    fn test_dump_path_is_date_partitioned() {
        let dump = FileBlobDump::new("/var/dumps");
        let path = dump.dump_path(&sample_dump());

        assert!(path.starts_with("/var/dumps/2025/03/07"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("42-"));
        assert!(name.ends_with(".json"));
    }

    #[tokio::test]
    async fn test_write_dump_creates_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let dump = FileBlobDump::new(dir.path());

        let path = dump.write_dump(sample_dump()).await.unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["assignment_id"], 42);
        assert_eq!(value["student_id"], 7);
        assert_eq!(value["payload"]["summary"]["pure_time_seconds"], 540);
    }
}
