//! # mt-core
//!
//! Core crate for the mt-gateway order runner, providing:
//!
//! - **Types** (`types`) — enums, symbol/tick data, order request/result structs
//! - **Configuration** (`config`) — JSON run config deserialization
//! - **Error types** (`error`) — domain-specific `MtError` via thiserror
//! - **Prices** (`price`) — tick-size normalization
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod config;
pub mod error;
pub mod logging;
pub mod price;
pub mod types;

// Re-export types at crate root for convenience.
pub use types::*;
