//! JSON-RPC request handler for Unix socket transport

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use crate::{
    backend::NetworkManager,
    core::service::LockService,
    protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Request, RequestId},
};

const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request handler
pub struct RequestHandler<B: NetworkManager> {
    lock_service: Arc<LockService<B>>,
}

impl<B: NetworkManager> RequestHandler<B> {
    /// Create a new request handler
    pub fn new(lock_service: Arc<LockService<B>>) -> Self {
        Self { lock_service }
    }

    /// Handle one line received from a client
    ///
    /// Returns `None` when there is nothing to answer: empty lines and
    /// messages without a usable id.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        if line.trim().is_empty() {
            return None;
        }

        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => Some(self.handle_request(request).await),
            Err(e) => {
                warn!("Invalid JSON-RPC request: {}", e);
                Self::reject(line)
            }
        }
    }

    /// Handle a JSON-RPC request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        if request.jsonrpc != JSONRPC_VERSION {
            warn!("Unsupported JSON-RPC version: {:?}", request.jsonrpc);
            return JsonRpcResponse::error(
                JsonRpcError::invalid_request(format!(
                    "Unsupported jsonrpc version, expected \"{JSONRPC_VERSION}\""
                )),
                request.id,
            );
        }

        match request.request {
            Request::LockBssid => self.handle_lock_bssid(request.id).await,
        }
    }

    async fn handle_lock_bssid(&self, id: RequestId) -> JsonRpcResponse {
        JsonRpcResponse::success(self.lock_service.lock().await, id)
    }

    /// Error response for a well-formed message that is not a known request
    fn reject(line: &str) -> Option<JsonRpcResponse> {
        let message: Value = serde_json::from_str(line).ok()?;
        let id = serde_json::from_value::<RequestId>(message.get("id")?.clone()).ok()?;

        let error = match message.get("method") {
            Some(Value::String(_)) => JsonRpcError::method_not_found(),
            _ => JsonRpcError::invalid_request("Missing method"),
        };
        Some(JsonRpcResponse::error(error, id))
    }
}
