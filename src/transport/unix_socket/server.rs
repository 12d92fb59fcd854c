//! Unix socket server implementation

use std::{os::unix::fs::PermissionsExt, path::Path, sync::Arc};
use tokio::{
    fs,
    net::{UnixListener, UnixStream},
};
use tracing::{error, info, warn};

use crate::{
    backend::NetworkManager,
    core::{error::TransportResult, service::LockService},
    transport::unix_socket::{
        handler::RequestHandler,
        session::{SessionReader, UnixSocketSession},
    },
};

/// Unix socket server
pub struct UnixSocketServer<B: NetworkManager> {
    socket_path: String,
    socket_mode: u32,
    handler: Arc<RequestHandler<B>>,
}

impl<B: NetworkManager> UnixSocketServer<B> {
    /// Create a new Unix socket server
    pub fn new(socket_path: String, socket_mode: u32, lock_service: Arc<LockService<B>>) -> Self {
        Self {
            socket_path,
            socket_mode,
            handler: Arc::new(RequestHandler::new(lock_service)),
        }
    }

    /// Bind the socket, replacing a stale socket file
    pub async fn bind(&self) -> TransportResult<UnixListener> {
        if Path::new(&self.socket_path).exists() {
            fs::remove_file(&self.socket_path).await?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        fs::set_permissions(
            &self.socket_path,
            std::fs::Permissions::from_mode(self.socket_mode),
        )
        .await?;

        info!(
            "Unix socket server listening on {} (mode {:o})",
            self.socket_path, self.socket_mode
        );
        Ok(listener)
    }

    /// Accept clients until the listener fails
    pub async fn serve(&self, listener: UnixListener) -> TransportResult<()> {
        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let handler = self.handler.clone();
                    tokio::spawn(async move {
                        if let Err(e) = Self::handle_client(stream, handler).await {
                            error!("Error handling client: {}", e);
                        }
                    });
                }
                Err(e) => {
                    warn!("Error accepting connection: {}", e);
                }
            }
        }
    }

    async fn handle_client(
        stream: UnixStream,
        handler: Arc<RequestHandler<B>>,
    ) -> TransportResult<()> {
        let (read_half, write_half) = stream.into_split();
        let mut session = UnixSocketSession::new(write_half);
        let mut reader = SessionReader::new(read_half);

        info!("New client connected: {}", session.id());

        while let Some(line) = reader.read_line().await? {
            if let Some(response) = handler.handle_line(&line).await {
                session.send_response(&response).await?;
            }
        }

        info!("Client disconnected: {}", session.id());
        Ok(())
    }
}
