//! 订单文档备份轮转
//!
//! 每次写入前把当前 `orders.json` 原样复制到备份目录，只保留最新的 N 份。
//! 备份失败只记录日志，不阻塞写入。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

const BACKUP_PREFIX: &str = "orders-";
const BACKUP_SUFFIX: &str = ".json";
const SEQUENCE_WIDTH: usize = 10;

/// 默认保留份数
pub const DEFAULT_BACKUP_KEEP: usize = 10;

/// 备份文件名: `orders-<YYYY-MM-DDTHH-MM-SS-mmmZ>-<10 位序号>.json`
pub fn backup_file_name(at: DateTime<Utc>, sequence: u64) -> String {
    format!(
        "{BACKUP_PREFIX}{}-{sequence:0width$}{BACKUP_SUFFIX}",
        at.format("%Y-%m-%dT%H-%M-%S-%3fZ"),
        width = SEQUENCE_WIDTH
    )
}

/// 从备份文件名解析序号，旧格式 (无序号) 返回 `None`
pub fn parse_backup_sequence(file_name: &str) -> Option<u64> {
    let stem = backup_stem(file_name)?;
    let (_, last) = stem.rsplit_once('-')?;
    if last.len() == SEQUENCE_WIDTH && last.bytes().all(|b| b.is_ascii_digit()) {
        last.parse().ok()
    } else {
        None
    }
}

fn backup_stem(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(BACKUP_SUFFIX)
        .filter(|stem| !stem.is_empty())
}

/// 备份目录中的一份快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub path: PathBuf,
    pub sequence: Option<u64>,
    pub modified: SystemTime,
}

impl BackupEntry {
    /// 越大越新: 有序号的总比旧格式新，旧格式之间按修改时间
    fn sort_key(&self) -> (Option<u64>, SystemTime) {
        (self.sequence, self.modified)
    }
}

/// 备份轮转器
#[derive(Debug, Clone)]
pub struct BackupRotator {
    source: PathBuf,
    dir: PathBuf,
    keep: usize,
}

impl BackupRotator {
    pub fn new(source: impl Into<PathBuf>, dir: impl Into<PathBuf>, keep: usize) -> Self {
        Self {
            source: source.into(),
            dir: dir.into(),
            keep,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn keep(&self) -> usize {
        self.keep
    }

    /// 为当前订单文档创建快照
    ///
    /// 文档不存在时什么也不做。返回新快照路径；失败记录日志并返回 `None`。
    pub async fn create_backup(&self) -> Option<PathBuf> {
        match self.try_create_backup().await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(
                    source = %self.source.display(),
                    dir = %self.dir.display(),
                    error = %e,
                    "Failed to back up orders document"
                );
                None
            }
        }
    }

    async fn try_create_backup(&self) -> std::io::Result<Option<PathBuf>> {
        match tokio::fs::metadata(&self.source).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let next = self
            .list_backups()
            .await?
            .iter()
            .filter_map(|entry| entry.sequence)
            .max()
            .map_or(1, |seq| seq + 1);

        let path = self.dir.join(backup_file_name(Utc::now(), next));
        tokio::fs::copy(&self.source, &path).await?;
        tracing::debug!(backup = %path.display(), sequence = next, "Orders backup created");

        self.clean_old_backups().await;
        Ok(Some(path))
    }

    /// 删除超出保留份数的旧快照，返回删除数量
    pub async fn clean_old_backups(&self) -> usize {
        let backups = match self.list_backups().await {
            Ok(backups) => backups,
            Err(e) => {
                tracing::warn!(dir = %self.dir.display(), error = %e, "Failed to list backups");
                return 0;
            }
        };

        let mut removed = 0;
        for entry in backups.iter().skip(self.keep) {
            match tokio::fs::remove_file(&entry.path).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(
                    backup = %entry.path.display(),
                    error = %e,
                    "Failed to remove old backup"
                ),
            }
        }

        if removed > 0 {
            tracing::debug!(removed, keep = self.keep, "Old backups pruned");
        }
        removed
    }

    /// 列出 `orders-*.json` 快照，最新的在前
    pub async fn list_backups(&self) -> std::io::Result<Vec<BackupEntry>> {
        let mut dir = match tokio::fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if backup_stem(name).is_none() {
                continue;
            }
            // 可能已被并发清理
            let Ok(meta) = entry.metadata().await else {
                continue;
            };
            if !meta.is_file() {
                continue;
            }
            entries.push(BackupEntry {
                path: entry.path(),
                sequence: parse_backup_sequence(name),
                modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            });
        }

        entries.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
        Ok(entries)
    }
}
