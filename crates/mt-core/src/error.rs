//! Typed error definitions for the order flows.
//!
//! [`MtError`] names each fatal outcome a run can end in. All variants
//! implement `std::error::Error` via `thiserror`, so they convert into
//! `anyhow::Error` at the binary boundary and can still be downcast there.

use thiserror::Error;

use crate::types::TradeRetcode;

/// Fatal outcomes of a run. None of them is retried.
#[derive(Debug, Error)]
pub enum MtError {
    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    /// The terminal connection could not be established.
    #[error("terminal initialization failed: {0}")]
    Connect(String),

    /// The terminal does not know the symbol.
    #[error("symbol {0} not found")]
    UnknownSymbol(String),

    /// The symbol exists but could not be added to Market Watch.
    #[error("failed to select {symbol}: {reason}")]
    SymbolSelect { symbol: String, reason: String },

    /// A tick could not be retrieved; treated as a broken connection.
    #[error("failed to get tick for {symbol}: {reason}")]
    TickUnavailable { symbol: String, reason: String },

    /// A price or protective level is not positive once snapped to the tick grid.
    #[error("invalid {field} {value} for {symbol}: must be positive")]
    InvalidPrice { symbol: String, field: &'static str, value: f64 },

    /// Order submission produced no result at all.
    #[error("order send returned no result for {symbol} ({reason}) - check terminal connection and trading permissions")]
    NoResult { symbol: String, reason: String },

    /// The broker answered with a non-success return code.
    #[error("order failed: {comment} (retcode: {retcode})")]
    Rejected { symbol: String, retcode: TradeRetcode, comment: String },

    /// HTTP or bridge-level failure talking to the terminal.
    #[error("transport error: {0}")]
    Transport(String),

    /// A terminal response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}
