//! Command-line argument parsing

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[clap(name = "bssid-lock", version, author)]
#[clap(about = "Lock the active Wi-Fi connection to its current access point")]
pub struct CliArgs {
    /// nmcli executable to run
    #[clap(long = "nmcli", default_value = "nmcli")]
    pub nmcli_path: String,

    /// Directory for the failure log (bssid-lock.log)
    #[clap(long)]
    pub log_dir: Option<PathBuf>,

    /// Serve lock requests on a Unix socket instead of locking once
    #[clap(long)]
    pub serve: bool,

    /// Path for Unix socket
    #[clap(long, default_value = "/run/bssid-lock.sock")]
    pub socket_path: String,

    /// Socket file permissions (octal, e.g., 660)
    #[clap(long, default_value = "660")]
    pub socket_mode: String,
}
