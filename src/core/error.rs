//! Error types for the BSSID lock service

use thiserror::Error;

/// Result type for network manager backend operations
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors raised while talking to the network manager
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    #[error("nmcli exited with {}", describe_code(.code))]
    CommandFailed {
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Combined stdout and stderr of the failed invocation
        output: String,
    },

    #[error("failed to run {program}: {reason}")]
    Spawn { program: String, reason: String },
}

impl ManagerError {
    /// Diagnostic text for a failed command: its raw output, or the exit
    /// status when the command printed nothing.
    pub fn detail(&self) -> String {
        match self {
            ManagerError::CommandFailed { output, .. } if !output.trim().is_empty() => {
                output.trim().to_string()
            }
            other => other.to_string(),
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "no exit status (terminated by signal)".to_string(),
    }
}

/// Coarse classification of a lock failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockErrorKind {
    /// Device, SSID, connection or BSSID could not be resolved
    Precondition,
    /// The network manager exited with a non-zero status
    ExternalCommand,
    /// Anything else
    Unexpected,
}

/// Errors that abort a lock operation
///
/// `Display` carries the full diagnostic meant for the logs;
/// [`LockError::caller_message`] is what gets handed back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    #[error("No Wi-Fi device found.")]
    NoWifiDevice,

    #[error("No active Wi-Fi SSID found.")]
    NoActiveSsid,

    #[error("No active connection profile for device {device}.")]
    NoActiveConnection { device: String },

    #[error("Could not find BSSID for SSID {ssid}.")]
    NoBssidForSsid { ssid: String },

    #[error("nmcli error: {}", .0.detail())]
    Manager(ManagerError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl LockError {
    pub fn kind(&self) -> LockErrorKind {
        match self {
            LockError::NoWifiDevice
            | LockError::NoActiveSsid
            | LockError::NoActiveConnection { .. }
            | LockError::NoBssidForSsid { .. } => LockErrorKind::Precondition,
            LockError::Manager(_) => LockErrorKind::ExternalCommand,
            LockError::Unexpected(_) => LockErrorKind::Unexpected,
        }
    }

    /// Terse message safe to hand back to a UI; never contains raw command output
    pub fn caller_message(&self) -> String {
        match self.kind() {
            LockErrorKind::Precondition => self.to_string(),
            LockErrorKind::ExternalCommand => "nmcli returned an error.".to_string(),
            LockErrorKind::Unexpected => "Unexpected error occurred.".to_string(),
        }
    }
}

impl From<ManagerError> for LockError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::CommandFailed { .. } => LockError::Manager(err),
            ManagerError::Spawn { .. } => LockError::Unexpected(err.to_string()),
        }
    }
}

/// Errors related to the transport layer
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
