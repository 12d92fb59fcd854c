//! BSSID Lock - Main Entry Point

use std::{process::ExitCode, sync::Arc};

use bssid_lock::{
    backend::NmcliBackend,
    config::{CliArgs, Settings},
    core::{failure_log::FailureLog, service::LockService},
    transport::unix_socket::UnixSocketServer,
};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bssid_lock=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::from(CliArgs::parse());
    info!(?settings, "BSSID lock backend loaded");

    let failure_log = match &settings.log_dir {
        Some(dir) => FailureLog::in_dir(dir),
        None => FailureLog::disabled(),
    };
    let backend = Arc::new(NmcliBackend::new(settings.nmcli_path.clone()));
    let service = Arc::new(LockService::new(backend, failure_log));

    if !settings.serve {
        let result = service.lock().await;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(if result.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    let server = UnixSocketServer::new(
        settings.socket_path.clone(),
        settings.socket_mode,
        service,
    );
    let listener = server.bind().await?;

    #[cfg(feature = "systemd")]
    if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Ready]) {
        error!("Failed to notify systemd: {}", e);
    }

    tokio::select! {
        result = server.serve(listener) => {
            if let Err(e) = result {
                error!("Unix socket server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully");
        }
        _ = shutdown_signal() => {
            info!("Received SIGTERM, shutting down gracefully");
        }
    }

    info!("BSSID lock backend unloading");
    if let Err(e) = tokio::fs::remove_file(&settings.socket_path).await {
        error!("Failed to remove socket {}: {}", settings.socket_path, e);
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!("Failed to register SIGTERM handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    // On non-Unix platforms, just wait forever
    std::future::pending::<()>().await
}
