//! Application context shared by every handler.

use crate::config::Config;
use crate::error::Result;
use crate::platform::Platform;
use reftrack_ledger::Ledger;
use std::sync::Arc;

/// Everything a handler needs, built once at startup.
pub struct AppContext<P> {
    pub config: Config,
    pub ledger: Arc<Ledger>,
    pub platform: P,
}

impl<P: Platform> AppContext<P> {
    pub fn new(config: Config, ledger: Arc<Ledger>, platform: P) -> Self {
        Self {
            config,
            ledger,
            platform,
        }
    }

    /// Run a ledger operation on the blocking pool; RocksDB calls block.
    pub async fn with_ledger<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Ledger) -> reftrack_ledger::Result<T> + Send + 'static,
    {
        let ledger = Arc::clone(&self.ledger);
        let value = tokio::task::spawn_blocking(move || op(&ledger)).await??;
        Ok(value)
    }
}
