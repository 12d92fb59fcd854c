//! NetworkManager backend driving the `nmcli` command line tool

use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::{
    backend::NetworkManager,
    core::error::{ManagerError, ManagerResult},
};

const DEVICE_STATUS: &[&str] = &["-t", "-f", "DEVICE,TYPE", "device", "status"];
const WIFI_ACTIVE: &[&str] = &["-t", "-f", "ACTIVE,SSID", "device", "wifi"];
const ACTIVE_CONNECTIONS: &[&str] = &["-t", "-f", "NAME,DEVICE", "connection", "show", "--active"];
const WIFI_BSSIDS: &[&str] = &["-t", "-f", "SSID,BSSID", "device", "wifi", "list"];

/// Connection profile field holding the pinned access point
const BSSID_FIELD: &str = "wifi.bssid";

/// `nmcli` backed implementation of [`NetworkManager`]
#[derive(Debug, Clone)]
pub struct NmcliBackend {
    program: String,
}

impl NmcliBackend {
    /// Create a backend running `program` (usually `nmcli`)
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn connection_bssid_args(connection: &str) -> [&str; 5] {
        ["-g", BSSID_FIELD, "connection", "show", connection]
    }

    fn modify_args<'a>(connection: &'a str, bssid: &'a str) -> [&'a str; 5] {
        ["connection", "modify", connection, BSSID_FIELD, bssid]
    }

    /// Run nmcli and return its stdout
    ///
    /// A non-zero exit yields [`ManagerError::CommandFailed`] carrying stdout
    /// followed by stderr.
    async fn run(&self, args: &[&str]) -> ManagerResult<String> {
        debug!("Running {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            // keep column values untranslated
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| ManagerError::Spawn {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("{} exited with {}", self.program, output.status);
            return Err(ManagerError::CommandFailed {
                code: output.status.code(),
                output: combine_output(stdout, &stderr),
            });
        }

        Ok(stdout)
    }
}

/// Append stderr to stdout, keeping the two on separate lines
fn combine_output(mut stdout: String, stderr: &str) -> String {
    if !stdout.is_empty() && !stdout.ends_with('\n') && !stderr.is_empty() {
        stdout.push('\n');
    }
    stdout.push_str(stderr);
    stdout
}

impl Default for NmcliBackend {
    fn default() -> Self {
        Self::new("nmcli")
    }
}

impl NetworkManager for NmcliBackend {
    async fn device_status(&self) -> ManagerResult<String> {
        self.run(DEVICE_STATUS).await
    }

    async fn wifi_active(&self) -> ManagerResult<String> {
        self.run(WIFI_ACTIVE).await
    }

    async fn active_connections(&self) -> ManagerResult<String> {
        self.run(ACTIVE_CONNECTIONS).await
    }

    async fn wifi_bssids(&self) -> ManagerResult<String> {
        self.run(WIFI_BSSIDS).await
    }

    async fn connection_bssid(&self, connection: &str) -> ManagerResult<String> {
        self.run(&Self::connection_bssid_args(connection)).await
    }

    async fn set_connection_bssid(&self, connection: &str, bssid: &str) -> ManagerResult<()> {
        self.run(&Self::modify_args(connection, bssid)).await?;
        debug!("Set {} of {} to {}", BSSID_FIELD, connection, bssid);
        Ok(())
    }
}
