//! Transports exposing the lock operation to clients

pub mod unix_socket;
