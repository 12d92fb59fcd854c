//! Mock network manager for testing

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::backend::NetworkManager;
use crate::core::error::{ManagerError, ManagerResult};

/// Internal state for the mock backend
#[derive(Debug, Clone, Default)]
struct MockState {
    device_status: String,
    wifi_active: String,
    active_connections: String,
    wifi_bssids: String,
    stored_bssid: String,
    query_failure: Option<ManagerError>,
    modify_failure: Option<ManagerError>,
    queries: usize,
    writes: Vec<(String, String)>,
}

/// Mock network manager for testing
///
/// Holds canned terse tables for each query and records every write.
/// Successful writes update the stored BSSID so that a subsequent lock sees
/// the profile as already pinned.
#[derive(Debug, Clone)]
pub struct MockNetworkManager {
    inner: Arc<Mutex<MockState>>,
}

impl MockNetworkManager {
    /// Create a mock with empty tables
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Mock describing one associated wifi device
    ///
    /// `wlan0` is connected to `ssid` through the profile `connection`, the
    /// scan table maps `ssid` to `bssid` and the profile stores `stored`.
    pub async fn associated(ssid: &str, connection: &str, bssid: &str, stored: &str) -> Self {
        let mock = Self::new();
        mock.set_device_status("lo:loopback\nwlan0:wifi\n").await;
        mock.set_wifi_active(&format!("no:Neighbour\nyes:{}\n", escape(ssid)))
            .await;
        mock.set_active_connections(&format!("{}:wlan0\n", escape(connection)))
            .await;
        mock.set_wifi_bssids(&format!("{}:{}\n", escape(ssid), escape(bssid)))
            .await;
        mock.set_stored_bssid(&escape(stored)).await;
        mock
    }

    pub async fn set_device_status(&self, table: &str) {
        self.inner.lock().await.device_status = table.to_string();
    }

    pub async fn set_wifi_active(&self, table: &str) {
        self.inner.lock().await.wifi_active = table.to_string();
    }

    pub async fn set_active_connections(&self, table: &str) {
        self.inner.lock().await.active_connections = table.to_string();
    }

    pub async fn set_wifi_bssids(&self, table: &str) {
        self.inner.lock().await.wifi_bssids = table.to_string();
    }

    /// Raw value returned for the profile's `wifi.bssid` field
    pub async fn set_stored_bssid(&self, value: &str) {
        self.inner.lock().await.stored_bssid = value.to_string();
    }

    /// Make every read query fail with `error`
    pub async fn set_query_failure(&self, error: Option<ManagerError>) {
        self.inner.lock().await.query_failure = error;
    }

    /// Make the modify operation fail with `error`
    pub async fn set_modify_failure(&self, error: Option<ManagerError>) {
        self.inner.lock().await.modify_failure = error;
    }

    /// Writes issued so far as `(connection, bssid)` pairs
    pub async fn writes(&self) -> Vec<(String, String)> {
        self.inner.lock().await.writes.clone()
    }

    /// Number of read queries issued so far
    pub async fn queries(&self) -> usize {
        self.inner.lock().await.queries
    }

    async fn query(&self, select: impl FnOnce(&MockState) -> String) -> ManagerResult<String> {
        let mut state = self.inner.lock().await;
        state.queries += 1;
        match &state.query_failure {
            Some(error) => Err(error.clone()),
            None => Ok(select(&state)),
        }
    }
}

impl Default for MockNetworkManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape a value the way nmcli terse output does
pub fn escape(value: &str) -> String {
    value.replace('\\', r"\\").replace(':', r"\:")
}

impl NetworkManager for MockNetworkManager {
    async fn device_status(&self) -> ManagerResult<String> {
        self.query(|s| s.device_status.clone()).await
    }

    async fn wifi_active(&self) -> ManagerResult<String> {
        self.query(|s| s.wifi_active.clone()).await
    }

    async fn active_connections(&self) -> ManagerResult<String> {
        self.query(|s| s.active_connections.clone()).await
    }

    async fn wifi_bssids(&self) -> ManagerResult<String> {
        self.query(|s| s.wifi_bssids.clone()).await
    }

    async fn connection_bssid(&self, _connection: &str) -> ManagerResult<String> {
        self.query(|s| format!("{}\n", s.stored_bssid)).await
    }

    async fn set_connection_bssid(&self, connection: &str, bssid: &str) -> ManagerResult<()> {
        let mut state = self.inner.lock().await;
        state.writes.push((connection.to_string(), bssid.to_string()));
        if let Some(error) = &state.modify_failure {
            return Err(error.clone());
        }
        state.stored_bssid = escape(bssid);
        Ok(())
    }
}
