//! # mt-td
//!
//! Trading-terminal clients.
//!
//! Each terminal implements the [`Terminal`] trait, which provides a uniform
//! interface for the connection lifecycle, symbol metadata, tick snapshots,
//! and order submission. The lifecycle is: `connect()` → queries / one
//! order → `shutdown()`.
//!
//! ## Terminals
//!
//! | Kind    | Module  | Transport                        |
//! |---------|---------|----------------------------------|
//! | `rest`  | `rest`  | HTTP JSON bridge to the terminal |
//! | `paper` | `paper` | In-memory scripted simulation    |

pub mod paper;
pub mod registry;
pub mod rest;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use mt_core::{OrderRequest, OrderResult, SymbolInfo, TickSnapshot};

/// Trait implemented by all terminal clients.
///
/// # Lifecycle
///
/// 1. Construct via the terminal-specific `new(config)`.
/// 2. Call [`connect`](Terminal::connect) to attach to the terminal.
/// 3. Query with [`symbol_info`](Terminal::symbol_info),
///    [`symbol_info_tick`](Terminal::symbol_info_tick), and submit with
///    [`order_send`](Terminal::order_send).
/// 4. Call [`shutdown`](Terminal::shutdown) to release the connection.
///
/// `Ok(None)` is the terminal's own "no data" answer; `Err` means the call
/// itself failed. Callers treat both as fatal for ticks and order results.
#[async_trait]
pub trait Terminal: Send + Sync {
    /// Human-readable terminal name.
    fn name(&self) -> &str;

    /// Attach to the terminal within `timeout`.
    async fn connect(&mut self, timeout: Duration) -> Result<()>;

    /// Metadata for `symbol`, or `None` if the terminal does not know it.
    async fn symbol_info(&self, symbol: &str) -> Result<Option<SymbolInfo>>;

    /// Show or hide `symbol` in Market Watch. Returns whether it succeeded.
    async fn symbol_select(&self, symbol: &str, enable: bool) -> Result<bool>;

    /// Latest tick for `symbol`, or `None` if none is available.
    async fn symbol_info_tick(&self, symbol: &str) -> Result<Option<TickSnapshot>>;

    /// Submit one order. `None` means the terminal produced no result.
    async fn order_send(&self, request: &OrderRequest) -> Result<Option<OrderResult>>;

    /// Release the connection.
    async fn shutdown(&mut self) -> Result<()>;
}
