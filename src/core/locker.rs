//! Lock the active Wi-Fi connection profile to its current access point
//!
//! The lock runs as a fixed pipeline against the network manager:
//!
//! 1. resolve the first `wifi` device
//! 2. resolve the active SSID
//! 3. resolve the connection profile bound to the device
//! 4. resolve the BSSID the scan table reports for the SSID
//! 5. compare it with the BSSID already stored in the profile
//! 6. write it into the profile unless it is already there
//!
//! The first failing step aborts the operation. No step is retried.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    backend::NetworkManager,
    core::{
        error::LockError,
        failure_log::FailureLog,
        terse::{normalize_bssid, rows},
        types::{LockResult, LockTarget},
    },
};

const WIFI_TYPE: &str = "wifi";
const ACTIVE_YES: &str = "yes";

/// Performs the lock-to-current-access-point operation
pub struct BssidLocker<B: NetworkManager> {
    backend: Arc<B>,
    failure_log: FailureLog,
}

/// What the pipeline decided to do with a resolved target
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Locked(LockTarget),
    AlreadyLocked(LockTarget),
}

impl<B: NetworkManager> BssidLocker<B> {
    /// Create a new locker writing failures to `failure_log`
    pub fn new(backend: Arc<B>, failure_log: FailureLog) -> Self {
        Self {
            backend,
            failure_log,
        }
    }

    /// Lock the active connection to its access point
    ///
    /// Never fails: every error is logged in full and turned into a
    /// [`LockResult`] with a terse message.
    pub async fn lock(&self) -> LockResult {
        match self.run().await {
            Ok(Outcome::Locked(target)) => {
                info!(
                    device = %target.device,
                    "Locked SSID '{}' (connection: {}) to BSSID {}.",
                    target.ssid, target.connection, target.bssid
                );
                LockResult::success(target)
            }
            Ok(Outcome::AlreadyLocked(target)) => {
                let message = format!(
                    "BSSID already locked for SSID '{}' ({}).",
                    target.ssid, target.connection
                );
                info!(device = %target.device, "{}", message);
                LockResult::already_locked(target, message)
            }
            Err(err) => self.fail(err).await,
        }
    }

    /// Record `err` in full and return the terse failure handed to callers
    pub async fn fail(&self, err: LockError) -> LockResult {
        self.failure_log.record(&err.to_string()).await;
        LockResult::failure(err.caller_message())
    }

    async fn run(&self) -> Result<Outcome, LockError> {
        let target = self.resolve_target().await?;

        let current = self.backend.connection_bssid(&target.connection).await?;
        if is_locked_to(&current, &target.bssid) {
            return Ok(Outcome::AlreadyLocked(target));
        }
        debug!(
            "Connection {} stores BSSID '{}', locking to {}",
            target.connection,
            current.trim(),
            target.bssid
        );

        // exit status of the modify call is the only confirmation
        self.backend
            .set_connection_bssid(&target.connection, &target.bssid)
            .await?;

        Ok(Outcome::Locked(target))
    }

    /// Steps 1 to 4: everything needed before touching the profile
    async fn resolve_target(&self) -> Result<LockTarget, LockError> {
        let device =
            find_wifi_device(&self.backend.device_status().await?).ok_or(LockError::NoWifiDevice)?;
        debug!("Wi-Fi device: {}", device);

        let ssid =
            find_active_ssid(&self.backend.wifi_active().await?).ok_or(LockError::NoActiveSsid)?;
        debug!("Active SSID: {}", ssid);

        let connection = find_connection_for_device(
            &self.backend.active_connections().await?,
            &device,
        )
        .ok_or_else(|| LockError::NoActiveConnection {
            device: device.clone(),
        })?;
        debug!("Active connection: {}", connection);

        let bssid = find_bssid_for_ssid(&self.backend.wifi_bssids().await?, &ssid)
            .ok_or_else(|| LockError::NoBssidForSsid { ssid: ssid.clone() })?;
        debug!("Target BSSID: {}", bssid);

        Ok(LockTarget {
            device,
            ssid,
            connection,
            bssid,
        })
    }
}

/// First device of type `wifi` in a `DEVICE,TYPE` table
fn find_wifi_device(table: &str) -> Option<String> {
    rows(table)
        .find(|fields| fields.get(1).map(String::as_str) == Some(WIFI_TYPE))
        .and_then(|mut fields| non_empty(fields.swap_remove(0)))
}

/// SSID of the first active row in an `ACTIVE,SSID` table
fn find_active_ssid(table: &str) -> Option<String> {
    rows(table)
        .find(|fields| fields[0] == ACTIVE_YES)
        .and_then(|mut fields| non_empty(take_field(&mut fields, 1)))
}

/// Connection bound to `device` in a `NAME,DEVICE` table
fn find_connection_for_device(table: &str, device: &str) -> Option<String> {
    rows(table)
        .find(|fields| fields.get(1).map(String::as_str) == Some(device))
        .and_then(|mut fields| non_empty(fields.swap_remove(0)))
}

/// BSSID of the first row whose SSID equals `ssid` in an `SSID,BSSID` table
///
/// The SSID must match the whole field; a network whose name merely starts
/// with `ssid` does not count.
fn find_bssid_for_ssid(table: &str, ssid: &str) -> Option<String> {
    rows(table)
        .find(|fields| fields[0] == ssid)
        .and_then(|mut fields| non_empty(take_field(&mut fields, 1)))
}

/// Whether the profile's stored `wifi.bssid` already equals `target`
fn is_locked_to(stored: &str, target: &str) -> bool {
    let stored = normalize_bssid(stored);
    !stored.is_empty() && stored == normalize_bssid(target)
}

fn take_field(fields: &mut Vec<String>, index: usize) -> String {
    if index < fields.len() {
        fields.swap_remove(index)
    } else {
        String::new()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::MockNetworkManager,
        core::{
            error::ManagerError,
            failure_log::FAILURE_LOG_FILE,
            types::LockStatus,
        },
    };
    use pretty_assertions::assert_eq;
    use tempfile::{TempDir, tempdir};

    fn locker(backend: &MockNetworkManager) -> (BssidLocker<MockNetworkManager>, TempDir) {
        let dir = tempdir().unwrap();
        let locker = BssidLocker::new(Arc::new(backend.clone()), FailureLog::in_dir(dir.path()));
        (locker, dir)
    }

    fn failure_log(dir: &TempDir) -> String {
        std::fs::read_to_string(dir.path().join(FAILURE_LOG_FILE)).unwrap_or_default()
    }

    async fn home_net(stored: &str) -> MockNetworkManager {
        MockNetworkManager::associated("HomeNet", "HomeNet Profile", "AA:11:BB:22:CC:33", stored)
            .await
    }

    #[test]
    fn test_find_wifi_device_skips_other_types() {
        let table = "eth0:ethernet\nlo:loopback\nwlan0:wifi\nwlan1:wifi\n";
        assert_eq!(find_wifi_device(table), Some("wlan0".into()));
        assert_eq!(find_wifi_device("eth0:ethernet\n"), None);
        assert_eq!(find_wifi_device("p2p-dev-wlan0:wifi-p2p\n"), None);
    }

    #[test]
    fn test_find_active_ssid() {
        assert_eq!(
            find_active_ssid("no:Other\nyes:Cafe\\:2G\n"),
            Some("Cafe:2G".into())
        );
        assert_eq!(find_active_ssid("no:Other\n"), None);
        // hidden network
        assert_eq!(find_active_ssid("yes:\n"), None);
    }

    #[test]
    fn test_find_connection_for_device_matches_whole_column() {
        let table = "Wired:eth0\nGuest:wlan00\nHome\\: Upstairs:wlan0\n";
        assert_eq!(
            find_connection_for_device(table, "wlan0"),
            Some("Home: Upstairs".into())
        );
        assert_eq!(find_connection_for_device(table, "wlan1"), None);
    }

    #[test]
    fn test_find_bssid_for_ssid_requires_exact_ssid() {
        let table = "HomeNet-5G:11\\:11\\:11\\:11\\:11\\:11\n\
                     HomeNet:22\\:22\\:22\\:22\\:22\\:22\n";
        assert_eq!(
            find_bssid_for_ssid(table, "HomeNet"),
            Some("22:22:22:22:22:22".into())
        );
        assert_eq!(find_bssid_for_ssid(table, "Home"), None);
    }

    #[test]
    fn test_find_bssid_for_ssid_first_match_wins() {
        let table = "Mesh:AA\\:AA\\:AA\\:AA\\:AA\\:AA\nMesh:BB\\:BB\\:BB\\:BB\\:BB\\:BB\n";
        assert_eq!(
            find_bssid_for_ssid(table, "Mesh"),
            Some("AA:AA:AA:AA:AA:AA".into())
        );
    }

    #[test]
    fn test_find_bssid_for_ssid_with_escaped_ssid() {
        let table = "Cafe\\:2G:AA\\:BB\\:CC\\:DD\\:EE\\:FF\n";
        assert_eq!(
            find_bssid_for_ssid(table, "Cafe:2G"),
            Some("AA:BB:CC:DD:EE:FF".into())
        );
        assert_eq!(find_bssid_for_ssid(table, "Cafe"), None);
    }

    #[test]
    fn test_find_bssid_for_ssid_empty_bssid() {
        assert_eq!(find_bssid_for_ssid("HomeNet:\n", "HomeNet"), None);
        assert_eq!(find_bssid_for_ssid("HomeNet\n", "HomeNet"), None);
    }

    #[test]
    fn test_is_locked_to() {
        assert!(is_locked_to("AA\\:BB\\:CC\n", "aa:bb:cc"));
        assert!(is_locked_to("aa:bb:cc", "AA:BB:CC"));
        assert!(!is_locked_to("", "AA:BB:CC"));
        assert!(!is_locked_to("AA:BB:CD", "AA:BB:CC"));
    }

    #[tokio::test]
    async fn test_lock_writes_target_bssid() {
        let backend = home_net("").await;
        let (locker, dir) = locker(&backend);

        let result = locker.lock().await;

        assert_eq!(
            result,
            LockResult {
                status: LockStatus::Success,
                message: None,
                ssid: Some("HomeNet".into()),
                bssid: Some("AA:11:BB:22:CC:33".into()),
                connection: Some("HomeNet Profile".into()),
            }
        );
        assert_eq!(
            backend.writes().await,
            vec![("HomeNet Profile".to_string(), "AA:11:BB:22:CC:33".to_string())]
        );
        assert_eq!(failure_log(&dir), "");
    }

    #[tokio::test]
    async fn test_lock_replaces_different_bssid() {
        let backend = home_net("00:00:00:00:00:01").await;
        let (locker, _dir) = locker(&backend);

        assert_eq!(locker.lock().await.status, LockStatus::Success);
        assert_eq!(backend.writes().await.len(), 1);
    }

    #[tokio::test]
    async fn test_lock_is_idempotent() {
        let backend = home_net("aa:11:bb:22:cc:33").await;
        let (locker, _dir) = locker(&backend);

        let result = locker.lock().await;

        assert_eq!(result.status, LockStatus::Partial);
        assert_eq!(
            result.message.as_deref(),
            Some("BSSID already locked for SSID 'HomeNet' (HomeNet Profile).")
        );
        assert_eq!(result.bssid.as_deref(), Some("AA:11:BB:22:CC:33"));
        assert!(backend.writes().await.is_empty());
    }

    #[tokio::test]
    async fn test_second_lock_sees_first_write() {
        let backend = home_net("").await;
        let (locker, _dir) = locker(&backend);

        assert_eq!(locker.lock().await.status, LockStatus::Success);
        assert_eq!(locker.lock().await.status, LockStatus::Partial);
        assert_eq!(backend.writes().await.len(), 1);
        // five queries per invocation, nothing cached between them
        assert_eq!(backend.queries().await, 10);
    }

    #[tokio::test]
    async fn test_no_wifi_device() {
        let backend = home_net("").await;
        backend.set_device_status("eth0:ethernet\n").await;
        let (locker, dir) = locker(&backend);

        let result = locker.lock().await;

        assert_eq!(result, LockResult::failure("No Wi-Fi device found."));
        assert!(backend.writes().await.is_empty());
        assert!(failure_log(&dir).contains("No Wi-Fi device found."));
    }

    #[tokio::test]
    async fn test_no_active_ssid() {
        let backend = home_net("").await;
        backend.set_wifi_active("no:HomeNet\n").await;
        let (locker, _dir) = locker(&backend);

        let result = locker.lock().await;

        assert_eq!(result, LockResult::failure("No active Wi-Fi SSID found."));
        assert!(backend.writes().await.is_empty());
    }

    #[tokio::test]
    async fn test_no_active_connection() {
        let backend = home_net("").await;
        backend.set_active_connections("Wired:eth0\n").await;
        let (locker, _dir) = locker(&backend);

        let result = locker.lock().await;

        assert_eq!(
            result,
            LockResult::failure("No active connection profile for device wlan0.")
        );
        assert!(backend.writes().await.is_empty());
    }

    #[tokio::test]
    async fn test_no_bssid_for_ssid() {
        let backend = home_net("").await;
        backend
            .set_wifi_bssids("HomeNet-5G:AA\\:11\\:BB\\:22\\:CC\\:44\n")
            .await;
        let (locker, _dir) = locker(&backend);

        let result = locker.lock().await;

        assert_eq!(
            result,
            LockResult::failure("Could not find BSSID for SSID HomeNet.")
        );
        assert!(backend.writes().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_hides_output_from_caller() {
        let backend = home_net("").await;
        backend
            .set_modify_failure(Some(ManagerError::CommandFailed {
                code: Some(10),
                output: "Error: Failed to modify connection 'HomeNet Profile': permission denied\n"
                    .into(),
            }))
            .await;
        let (locker, dir) = locker(&backend);

        let result = locker.lock().await;

        assert_eq!(result, LockResult::failure("nmcli returned an error."));
        assert_eq!(backend.writes().await.len(), 1);
        let log = failure_log(&dir);
        assert!(log.contains(
            "nmcli error: Error: Failed to modify connection 'HomeNet Profile': permission denied"
        ));
    }

    #[tokio::test]
    async fn test_failed_query_is_command_failure() {
        let backend = home_net("").await;
        backend
            .set_query_failure(Some(ManagerError::CommandFailed {
                code: Some(8),
                output: "Error: NetworkManager is not running.".into(),
            }))
            .await;
        let (locker, dir) = locker(&backend);

        let result = locker.lock().await;

        assert_eq!(result, LockResult::failure("nmcli returned an error."));
        assert!(backend.writes().await.is_empty());
        assert!(failure_log(&dir).contains("NetworkManager is not running."));
    }

    #[tokio::test]
    async fn test_missing_nmcli_is_unexpected() {
        let backend = home_net("").await;
        backend
            .set_query_failure(Some(ManagerError::Spawn {
                program: "nmcli".into(),
                reason: "No such file or directory (os error 2)".into(),
            }))
            .await;
        let (locker, dir) = locker(&backend);

        let result = locker.lock().await;

        assert_eq!(result, LockResult::failure("Unexpected error occurred."));
        assert!(failure_log(&dir).contains("Unexpected error: failed to run nmcli"));
    }
}
