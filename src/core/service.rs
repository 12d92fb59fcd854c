//! BSSID lock service facade

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    backend::NetworkManager,
    core::{error::LockError, failure_log::FailureLog, locker::BssidLocker, types::LockResult},
};

/// Runs lock operations for callers that must stay responsive
///
/// Each lock runs on its own tokio task. Overlapping callers are queued so
/// that only one lock talks to the network manager at a time; each of them
/// still re-reads the full state when its turn comes.
pub struct LockService<B: NetworkManager> {
    locker: Arc<BssidLocker<B>>,
    in_flight: Mutex<()>,
}

impl<B: NetworkManager> LockService<B> {
    /// Create a new lock service
    pub fn new(backend: Arc<B>, failure_log: FailureLog) -> Self {
        Self {
            locker: Arc::new(BssidLocker::new(backend, failure_log)),
            in_flight: Mutex::new(()),
        }
    }

    /// Lock the active Wi-Fi connection to its current access point
    pub async fn lock(&self) -> LockResult {
        let _guard = self.in_flight.lock().await;
        debug!("Starting BSSID lock");

        let locker = self.locker.clone();
        match tokio::spawn(async move { locker.lock().await }).await {
            Ok(result) => result,
            Err(e) => {
                self.locker
                    .fail(LockError::Unexpected(format!("lock task failed: {e}")))
                    .await
            }
        }
    }
}
