//! Runtime settings

use std::path::PathBuf;

use crate::config::CliArgs;

const DEFAULT_SOCKET_MODE: u32 = 0o660;

/// Runtime configuration settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub nmcli_path: String,
    pub log_dir: Option<PathBuf>,
    pub serve: bool,
    pub socket_path: String,
    pub socket_mode: u32,
}

impl From<CliArgs> for Settings {
    fn from(args: CliArgs) -> Self {
        // Parse octal socket mode
        let socket_mode =
            u32::from_str_radix(&args.socket_mode, 8).unwrap_or(DEFAULT_SOCKET_MODE);

        Settings {
            nmcli_path: args.nmcli_path,
            log_dir: args.log_dir,
            serve: args.serve,
            socket_path: args.socket_path,
            socket_mode,
        }
    }
}
