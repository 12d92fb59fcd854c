//! Core business logic module

pub mod error;
pub mod failure_log;
pub mod locker;
pub mod service;
pub mod terse;
pub mod types;
