//! 订单存储写锁
//!
//! 以排他创建 (`create_new`) 的锁文件作为互斥原语，同一数据目录下的
//! 多个进程也会互斥。
//!
//! - [`LockManager::acquire`] 在超时内重试，成功返回 [`LockGuard`]
//! - [`LockGuard`] 持有本次获取的所有权令牌，释放时校验令牌
//! - 同进程内的释放通过 `Notify` 立即唤醒等待者，跨进程持有者按固定间隔重查

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::sync::Notify;
use tokio::time::Instant;

use super::error::{StoreError, StoreResult};

/// 锁被占用时的重试间隔
pub const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// 锁文件管理器
#[derive(Debug, Clone)]
pub struct LockManager {
    path: PathBuf,
    retry_interval: Duration,
    released: Arc<Notify>,
}

impl LockManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retry_interval: LOCK_RETRY_INTERVAL,
            released: Arc::new(Notify::new()),
        }
    }

    /// 锁文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 锁文件当前是否存在 (任意持有者)
    pub fn is_locked(&self) -> bool {
        self.path.exists()
    }

    /// 获取锁
    ///
    /// 至少尝试一次；锁文件已存在时等待释放通知或重试间隔，
    /// 超过 `timeout` 返回 [`StoreError::LockTimeout`]。
    /// 其他 I/O 错误立即返回 [`StoreError::Lock`]。
    pub async fn acquire(&self, timeout: Duration) -> StoreResult<LockGuard> {
        let started = Instant::now();
        let token = format!("{}:{}", std::process::id(), uuid::Uuid::new_v4());

        loop {
            // 先登记通知再尝试创建，避免错过两者之间发生的释放
            let notified = self.released.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            match self.try_create(&token).await {
                Ok(()) => {
                    tracing::debug!(
                        path = %self.path.display(),
                        waited_ms = started.elapsed().as_millis() as u64,
                        "Order store lock acquired"
                    );
                    return Ok(LockGuard {
                        path: self.path.clone(),
                        token,
                        released: self.released.clone(),
                        held: true,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(source) => {
                    return Err(StoreError::Lock {
                        path: self.path.clone(),
                        source,
                    });
                }
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                let holder = tokio::fs::read_to_string(&self.path)
                    .await
                    .unwrap_or_default();
                tracing::warn!(
                    path = %self.path.display(),
                    holder = %holder,
                    waited_ms = elapsed.as_millis() as u64,
                    "Timed out waiting for order store lock"
                );
                return Err(StoreError::LockTimeout {
                    path: self.path.clone(),
                    waited_ms: elapsed.as_millis() as u64,
                });
            }

            let wait = self.retry_interval.min(timeout - elapsed);
            let _ = tokio::time::timeout(wait, notified).await;
        }
    }

    /// 排他创建锁文件并写入令牌，写入失败时删除半成品
    async fn try_create(&self, token: &str) -> std::io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await?;

        let written = async {
            file.write_all(token.as_bytes()).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            let _ = tokio::fs::remove_file(&self.path).await;
            return Err(e);
        }
        Ok(())
    }
}

/// 锁的所有权凭证
///
/// 调用 [`release`](Self::release) 或 drop 时释放。只有锁文件内容仍是本凭证的
/// 令牌时才删除锁文件。
#[derive(Debug)]
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard {
    path: PathBuf,
    token: String,
    released: Arc<Notify>,
    held: bool,
}

impl LockGuard {
    /// 本次获取的所有权令牌 (`<pid>:<uuid>`)
    pub fn token(&self) -> &str {
        &self.token
    }

    /// 释放锁 (异步 I/O)
    pub async fn release(mut self) {
        if !self.held {
            return;
        }
        self.held = false;

        let owner = tokio::fs::read_to_string(&self.path).await;
        let removal = match &owner {
            Ok(owner) if *owner == self.token => Some(tokio::fs::remove_file(&self.path).await),
            _ => None,
        };
        self.finish_release(owner, removal);
    }

    /// drop 时的同步释放路径
    fn release_blocking(&mut self) {
        if !self.held {
            return;
        }
        self.held = false;

        let owner = std::fs::read_to_string(&self.path);
        let removal = match &owner {
            Ok(owner) if *owner == self.token => Some(std::fs::remove_file(&self.path)),
            _ => None,
        };
        self.finish_release(owner, removal);
    }

    /// `removal` 仅在锁文件属于本凭证时存在
    fn finish_release(&self, owner: io::Result<String>, removal: Option<io::Result<()>>) {
        match (owner, removal) {
            (Ok(_), Some(Err(e))) if e.kind() != ErrorKind::NotFound => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Error releasing order store lock"
                );
            }
            (Ok(_), Some(_)) => {}
            (Ok(owner), None) => {
                tracing::warn!(
                    path = %self.path.display(),
                    owner = %owner,
                    "Lock marker belongs to another holder, leaving it in place"
                );
            }
            (Err(e), _) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Lock marker already removed");
            }
            (Err(e), _) => {
                tracing::error!(
                    path = %self.path.display(),
                    error = %e,
                    "Error reading lock marker on release"
                );
            }
        }

        self.released.notify_waiters();
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.release_blocking();
    }
}
