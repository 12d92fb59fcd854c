//! BSSID Lock
//!
//! Pins the active NetworkManager Wi-Fi connection profile to the access
//! point (BSSID) it is currently associated with, so the device stops
//! roaming between access points that share the SSID.
//!
//! The lock can be run once from the command line or requested over a
//! Unix domain socket (JSON-RPC 2.0).

pub mod backend;
pub mod config;
pub mod core;
pub mod protocol;
pub mod transport;

pub use core::{
    error::{LockError, LockErrorKind, ManagerError, TransportError},
    types::{LockResult, LockStatus, LockTarget},
};
