//! Error types for the referral ledger.

use thiserror::Error;

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the storage engine behind the ledger.
///
/// None of these are retried; callers must treat them as a failed
/// credit or purge.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage engine error (I/O, lock timeout, corruption reported by RocksDB)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A key or row that the ledger wrote but can no longer decode
    #[error("Corrupt ledger entry: {0}")]
    Corrupt(String),
}

impl From<rocksdb::Error> for Error {
    fn from(e: rocksdb::Error) -> Self {
        Error::Storage(e.to_string())
    }
}
