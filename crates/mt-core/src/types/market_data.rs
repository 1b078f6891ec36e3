//! Market data read from the terminal: symbol metadata and tick snapshots.
//!
//! Both are point-in-time copies owned by the caller. The terminal remains the
//! source of truth; the only thing this crate ever changes on the terminal
//! side is a symbol's Market Watch visibility.
//!
//! # Timestamp convention
//!
//! Tick timestamps are **milliseconds since Unix epoch**, matching the
//! terminal's `time_msc` field.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Symbol metadata
// ---------------------------------------------------------------------------

/// Instrument metadata as reported by the terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Terminal symbol name (e.g. `"HK50.cash"`, `"BTCUSD"`).
    pub name: String,
    /// Whether the symbol is currently shown in Market Watch.
    #[serde(default)]
    pub visible: bool,
    /// Minimum price increment. Non-positive means unknown.
    #[serde(default)]
    pub trade_tick_size: f64,
    /// Number of decimal places in quotes.
    #[serde(default)]
    pub digits: u32,
    /// Value of one point.
    #[serde(default)]
    pub point: f64,
    #[serde(default)]
    pub volume_min: f64,
    #[serde(default)]
    pub volume_max: f64,
    #[serde(default)]
    pub volume_step: f64,
    #[serde(default)]
    pub description: String,
}

impl SymbolInfo {
    /// Minimal metadata with just a name, visibility and tick size.
    pub fn new(name: impl Into<String>, visible: bool, trade_tick_size: f64) -> Self {
        Self {
            name: name.into(),
            visible,
            trade_tick_size,
            digits: 0,
            point: 0.0,
            volume_min: 0.0,
            volume_max: 0.0,
            volume_step: 0.0,
            description: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tick
// ---------------------------------------------------------------------------

/// Latest bid/ask for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub bid: f64,
    pub ask: f64,
    /// Milliseconds since epoch (`time_msc`). Zero if the terminal omitted it.
    #[serde(default, alias = "time_msc")]
    pub time_ms: u64,
}

impl TickSnapshot {
    pub fn new(bid: f64, ask: f64) -> Self {
        Self { bid, ask, time_ms: 0 }
    }

    /// Ask minus bid.
    #[inline]
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }
}
