//! Domain types for BSSID locking

use serde::{Deserialize, Serialize};

/// Outcome reported to the caller of a lock operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockStatus {
    /// The connection profile was modified
    Success,
    /// The profile was already locked to the target BSSID; nothing was written
    Partial,
    /// The operation aborted
    Failure,
}

/// Everything resolved from the network manager before the commit step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockTarget {
    /// Wi-Fi device name (e.g. `wlan0`)
    pub device: String,
    /// SSID currently associated on the device
    pub ssid: String,
    /// Name of the connection profile bound to the device
    pub connection: String,
    /// BSSID the scan table reports for the SSID
    pub bssid: String,
}

/// Result object returned by a lock operation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockResult {
    pub status: LockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bssid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
}

impl LockResult {
    pub fn success(target: LockTarget) -> Self {
        Self {
            status: LockStatus::Success,
            message: None,
            ssid: Some(target.ssid),
            bssid: Some(target.bssid),
            connection: Some(target.connection),
        }
    }

    pub fn already_locked(target: LockTarget, message: String) -> Self {
        Self {
            status: LockStatus::Partial,
            message: Some(message),
            ssid: Some(target.ssid),
            bssid: Some(target.bssid),
            connection: Some(target.connection),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: LockStatus::Failure,
            message: Some(message.into()),
            ssid: None,
            bssid: None,
            connection: None,
        }
    }

    /// `true` for success and partial results
    pub fn is_ok(&self) -> bool {
        self.status != LockStatus::Failure
    }
}

/// Session identifier for transport connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn target() -> LockTarget {
        LockTarget {
            device: "wlan0".into(),
            ssid: "HomeNet".into(),
            connection: "HomeNet Profile".into(),
            bssid: "AA:11:BB:22:CC:33".into(),
        }
    }

    #[test]
    fn test_success_serialization_omits_message() {
        let json = serde_json::to_value(LockResult::success(target())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "success",
                "ssid": "HomeNet",
                "bssid": "AA:11:BB:22:CC:33",
                "connection": "HomeNet Profile",
            })
        );
    }

    #[test]
    fn test_failure_serialization_carries_only_message() {
        let json = serde_json::to_value(LockResult::failure("No Wi-Fi device found.")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "failure",
                "message": "No Wi-Fi device found.",
            })
        );
    }

    #[test]
    fn test_partial_is_ok() {
        let result = LockResult::already_locked(target(), "already".into());
        assert_eq!(result.status, LockStatus::Partial);
        assert!(result.is_ok());
        assert!(!LockResult::failure("x").is_ok());
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let result: LockResult = serde_json::from_str(r#"{"status":"failure"}"#).unwrap();
        assert_eq!(result.status, LockStatus::Failure);
        assert_eq!(result.message, None);
    }
}
