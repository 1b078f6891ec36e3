//! Trading-related data structures — order requests, results, and reports.
//!
//! An [`OrderRequest`] is built by the flow layer, handed to a terminal, and
//! answered with at most one [`OrderResult`]. Nothing is retried.

use serde::{Deserialize, Serialize};

use super::enums::{Direction, FillingMode, TimeInForce, TradeAction, TradeRetcode};

// ---------------------------------------------------------------------------
// Order request (flow → terminal)
// ---------------------------------------------------------------------------

/// A single market order to submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub action: TradeAction,
    /// Terminal symbol name.
    pub symbol: String,
    /// Buy or sell.
    pub direction: Direction,
    /// Size in lots.
    pub volume: f64,
    /// Requested execution price (ask for buys, bid for sells).
    pub price: f64,
    /// Stop-loss level, `None` when unset.
    pub stop_loss: Option<f64>,
    /// Take-profit level, `None` when unset.
    pub take_profit: Option<f64>,
    /// Maximum slippage in points.
    pub deviation: u32,
    /// Caller-assigned attribution number.
    pub magic: u64,
    pub filling: FillingMode,
    pub time_in_force: TimeInForce,
    /// Free-text order comment.
    pub comment: Option<String>,
}

// ---------------------------------------------------------------------------
// Order result (terminal → flow)
// ---------------------------------------------------------------------------

/// The terminal's answer to one [`OrderRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResult {
    pub retcode: TradeRetcode,
    /// Broker comment, surfaced verbatim on rejection.
    #[serde(default)]
    pub comment: String,
    /// Order ticket.
    #[serde(default)]
    pub order: u64,
    /// Deal ticket, when a deal was executed.
    #[serde(default)]
    pub deal: u64,
    /// Executed price.
    #[serde(default)]
    pub price: f64,
    /// Executed volume.
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub bid: f64,
    #[serde(default)]
    pub ask: f64,
    /// Terminal-side request id.
    #[serde(default)]
    pub request_id: u64,
}

impl OrderResult {
    /// A result carrying only a code and comment.
    pub fn with_code(retcode: TradeRetcode, comment: impl Into<String>) -> Self {
        Self {
            retcode,
            comment: comment.into(),
            order: 0,
            deal: 0,
            price: 0.0,
            volume: 0.0,
            bid: 0.0,
            ask: 0.0,
            request_id: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderReport {
    pub symbol: String,
    pub direction: Direction,
    pub ticket: u64,
    pub executed_price: f64,
    pub executed_volume: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub retcode: TradeRetcode,
}
