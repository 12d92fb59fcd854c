//! Network manager trait definition

use trait_variant::make;

use crate::core::error::ManagerResult;

/// Abstraction over the network manager's query/execute interface
///
/// Read queries return the raw terse table printed by the manager; parsing
/// lives in the core so that every step can be exercised against a mock.
#[make(Send)]
pub trait NetworkManager: Send + Sync + 'static {
    /// Device table with the columns `DEVICE,TYPE`
    async fn device_status(&self) -> ManagerResult<String>;

    /// Wi-Fi scan table with the columns `ACTIVE,SSID`
    async fn wifi_active(&self) -> ManagerResult<String>;

    /// Active connection table with the columns `NAME,DEVICE`
    async fn active_connections(&self) -> ManagerResult<String>;

    /// Wi-Fi scan table with the columns `SSID,BSSID`
    async fn wifi_bssids(&self) -> ManagerResult<String>;

    /// The `wifi.bssid` field stored in a connection profile
    ///
    /// An empty value means the profile is not pinned to an access point.
    async fn connection_bssid(&self, connection: &str) -> ManagerResult<String>;

    /// Pin a connection profile to `bssid`
    async fn set_connection_bssid(&self, connection: &str, bssid: &str) -> ManagerResult<()>;
}
