//! Order persistence
//!
//! - [`lock`]: exclusive-create lock marker with ownership guard
//! - [`backup`]: pre-write snapshots, newest N retained
//! - [`storage`]: JSON document store with atomic rename writes
//! - [`service`]: id/date assignment on top of the store
//! - [`money`]: decimal helpers for totals

pub mod backup;
pub mod error;
pub mod lock;
pub mod money;
pub mod service;
pub mod storage;

pub use backup::{BackupEntry, BackupRotator, DEFAULT_BACKUP_KEEP};
pub use error::{StoreError, StoreResult};
pub use lock::{LockGuard, LockManager};
pub use service::OrderService;
pub use storage::{DEFAULT_LOCK_TIMEOUT, OrderStore, StoreOptions};
