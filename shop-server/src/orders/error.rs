//! Order store errors

use std::path::PathBuf;
use thiserror::Error;

/// Storage errors
///
/// | Variant | Class |
/// |---------|-------|
/// | `LockTimeout`, `Lock` | could not obtain exclusive access |
/// | `Read`, `Parse` | read failure |
/// | `Serialize`, `Write` | write failure |
///
/// Backup failures never surface here; they are logged by the rotator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Timed out after {waited_ms}ms waiting for lock {}", path.display())]
    LockTimeout { path: PathBuf, waited_ms: u64 },

    #[error("Failed to create lock marker {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed orders document {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Lock could not be obtained (timeout or marker I/O)
    pub fn is_lock_failure(&self) -> bool {
        matches!(self, Self::LockTimeout { .. } | Self::Lock { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
