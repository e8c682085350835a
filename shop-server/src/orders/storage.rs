//! 订单 JSON 文件存储
//!
//! 整个订单集合保存为一个 pretty-printed JSON 数组:
//!
//! ```text
//! <data_dir>/
//! ├── orders.json          # 订单集合
//! ├── orders.json.tmp      # 写入中的临时文件
//! ├── .orders.lock         # 写锁标记
//! └── backups/             # 写前快照
//! ```
//!
//! 写入流程: 加锁 → 备份 → 写临时文件并 fsync → rename 覆盖 → 释放锁。
//! rename 是原子的，读者只会看到写入前或写入后的完整文档。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use shared::models::Order;
use tokio::io::AsyncWriteExt;

use super::backup::{BackupRotator, DEFAULT_BACKUP_KEEP};
use super::error::{StoreError, StoreResult};
use super::lock::LockManager;

pub const ORDERS_FILE: &str = "orders.json";
pub const TEMP_FILE: &str = "orders.json.tmp";
pub const LOCK_FILE: &str = ".orders.lock";
pub const BACKUP_DIR: &str = "backups";

/// 默认加锁超时
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(5000);

/// 存储选项
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub lock_timeout: Duration,
    pub backup_keep: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            backup_keep: DEFAULT_BACKUP_KEEP,
        }
    }
}

/// 订单存储
#[derive(Debug, Clone)]
pub struct OrderStore {
    orders_path: PathBuf,
    temp_path: PathBuf,
    lock: LockManager,
    backups: BackupRotator,
    lock_timeout: Duration,
}

impl OrderStore {
    /// 打开数据目录 (不存在则创建)
    pub async fn open(data_dir: impl AsRef<Path>, options: StoreOptions) -> StoreResult<Self> {
        let data_dir = data_dir.as_ref();
        let backup_dir = data_dir.join(BACKUP_DIR);

        for dir in [data_dir, backup_dir.as_path()] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| StoreError::Write {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        let orders_path = data_dir.join(ORDERS_FILE);
        tracing::info!(
            path = %orders_path.display(),
            lock_timeout_ms = options.lock_timeout.as_millis() as u64,
            backup_keep = options.backup_keep,
            "Order store opened"
        );

        Ok(Self {
            backups: BackupRotator::new(&orders_path, backup_dir, options.backup_keep),
            lock: LockManager::new(data_dir.join(LOCK_FILE)),
            temp_path: data_dir.join(TEMP_FILE),
            orders_path,
            lock_timeout: options.lock_timeout,
        })
    }

    pub fn orders_path(&self) -> &Path {
        &self.orders_path
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    pub fn lock_path(&self) -> &Path {
        self.lock.path()
    }

    pub fn backups(&self) -> &BackupRotator {
        &self.backups
    }

    /// 读取整个订单集合；文档不存在或为空白时返回空集合
    pub async fn read_orders(&self) -> StoreResult<Vec<Order>> {
        let content = match tokio::fs::read_to_string(&self.orders_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.orders_path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.orders_path.clone(),
            source,
        })
    }

    /// 用 `orders` 整体替换订单集合
    pub async fn write_orders(&self, orders: &[Order]) -> StoreResult<()> {
        let guard = self.lock.acquire(self.lock_timeout).await?;
        let result = self.commit(orders).await;
        guard.release().await;
        result
    }

    /// 在同一次加锁内读取、修改并写回订单集合
    ///
    /// `f` 的返回值原样返回。读取失败时不写入。
    pub async fn update<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut Vec<Order>) -> T,
    {
        let guard = self.lock.acquire(self.lock_timeout).await?;
        let result = async {
            let mut orders = self.read_orders().await?;
            let output = f(&mut orders);
            self.commit(&orders).await?;
            Ok(output)
        }
        .await;
        guard.release().await;
        result
    }

    /// 调用方必须持有写锁
    async fn commit(&self, orders: &[Order]) -> StoreResult<()> {
        self.backups.create_backup().await;

        let bytes = serde_json::to_vec_pretty(orders)?;

        if let Err(source) = self.write_temp(&bytes).await {
            self.discard_temp().await;
            return Err(StoreError::Write {
                path: self.temp_path.clone(),
                source,
            });
        }

        if let Err(source) = tokio::fs::rename(&self.temp_path, &self.orders_path).await {
            self.discard_temp().await;
            return Err(StoreError::Write {
                path: self.orders_path.clone(),
                source,
            });
        }

        tracing::debug!(count = orders.len(), "Orders document written");
        Ok(())
    }

    async fn write_temp(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = tokio::fs::File::create(&self.temp_path).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await
    }

    async fn discard_temp(&self) {
        if let Err(e) = tokio::fs::remove_file(&self.temp_path).await
            && e.kind() != ErrorKind::NotFound
        {
            tracing::warn!(
                path = %self.temp_path.display(),
                error = %e,
                "Failed to remove temporary orders file"
            );
        }
    }
}
