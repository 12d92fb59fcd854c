//! Protocol message definitions

pub mod jsonrpc;
pub mod request;

pub use {
    jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestId},
    request::Request,
};
