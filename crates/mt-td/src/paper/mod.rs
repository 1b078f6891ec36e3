//! Paper terminal — an in-memory, scripted stand-in for a live terminal.
//!
//! Ticks come from a per-symbol script; order results from a fixed
//! configured answer. Every submitted request is recorded, and lifecycle
//! calls are counted so callers can check the connection was released.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use mt_core::config::PaperConfig;
use mt_core::error::MtError;
use mt_core::{OrderRequest, OrderResult, SymbolInfo, TickSnapshot, TradeRetcode};
use tracing::{debug, info};

use crate::Terminal;

/// Call counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaperStats {
    pub connects: u32,
    pub shutdowns: u32,
    pub tick_requests: u32,
    pub select_calls: u32,
}

#[derive(Debug)]
struct PaperState {
    symbols: HashMap<String, SymbolInfo>,
    cursors: HashMap<String, usize>,
    sent: Vec<OrderRequest>,
    next_ticket: u64,
    stats: PaperStats,
}

/// Scripted terminal. See the module docs.
pub struct PaperTerminal {
    config: PaperConfig,
    state: Mutex<PaperState>,
    connected: bool,
}

impl PaperTerminal {
    pub fn new(config: PaperConfig) -> Self {
        let symbols = config.symbols.iter().map(|s| (s.name.clone(), s.clone())).collect();
        Self {
            config,
            state: Mutex::new(PaperState {
                symbols,
                cursors: HashMap::new(),
                sent: Vec::new(),
                next_ticket: 1_000_001,
                stats: PaperStats::default(),
            }),
            connected: false,
        }
    }

    /// Lock the state; a poisoned lock still holds consistent data here.
    fn state(&self) -> MutexGuard<'_, PaperState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connected {
            Ok(())
        } else {
            Err(anyhow!("paper terminal not connected"))
        }
    }

    /// Lifecycle and query counters so far.
    pub fn stats(&self) -> PaperStats {
        self.state().stats
    }

    /// Every order request received, in order.
    pub fn sent_orders(&self) -> Vec<OrderRequest> {
        self.state().sent.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or_default()
}

#[async_trait]
impl Terminal for PaperTerminal {
    fn name(&self) -> &str {
        "paper"
    }

    async fn connect(&mut self, _timeout: Duration) -> Result<()> {
        self.state().stats.connects += 1;
        if self.config.connect_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.connect_delay_ms)).await;
        }
        if self.config.fail_connect {
            return Err(MtError::Connect("paper terminal configured to refuse connections".into()).into());
        }
        self.connected = true;
        info!("[paper] connected ({} symbols)", self.config.symbols.len());
        Ok(())
    }

    async fn symbol_info(&self, symbol: &str) -> Result<Option<SymbolInfo>> {
        self.ensure_connected()?;
        Ok(self.state().symbols.get(symbol).cloned())
    }

    async fn symbol_select(&self, symbol: &str, enable: bool) -> Result<bool> {
        self.ensure_connected()?;
        let mut state = self.state();
        state.stats.select_calls += 1;
        if self.config.reject_symbol_select {
            return Ok(false);
        }
        match state.symbols.get_mut(symbol) {
            Some(info) => {
                info.visible = enable;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn symbol_info_tick(&self, symbol: &str) -> Result<Option<TickSnapshot>> {
        self.ensure_connected()?;
        let mut state = self.state();
        state.stats.tick_requests += 1;
        let Some(script) = self.config.ticks.get(symbol).filter(|s| !s.is_empty()) else {
            return Ok(None);
        };
        let cursor = state.cursors.entry(symbol.to_string()).or_insert(0);
        let entry = script[(*cursor).min(script.len() - 1)];
        *cursor += 1;
        Ok(entry.map(|mut tick| {
            if tick.time_ms == 0 {
                tick.time_ms = now_ms();
            }
            tick
        }))
    }

    async fn order_send(&self, request: &OrderRequest) -> Result<Option<OrderResult>> {
        self.ensure_connected()?;
        let mut state = self.state();
        state.sent.push(request.clone());
        debug!("[paper] order received: {request:?}");

        if self.config.order_result_missing {
            return Ok(None);
        }

        let mut result = OrderResult::with_code(self.config.order_retcode, self.config.order_comment.clone());
        if result.retcode == TradeRetcode::Done {
            let ticket = state.next_ticket;
            state.next_ticket += 1;
            result.order = ticket;
            result.deal = ticket;
            result.price = request.price;
            result.volume = request.volume;
            result.request_id = ticket;
        }
        Ok(Some(result))
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.state().stats.shutdowns += 1;
        self.connected = false;
        if self.config.fail_shutdown {
            return Err(MtError::Transport("paper terminal configured to fail on shutdown".into()).into());
        }
        info!("[paper] connection closed");
        Ok(())
    }
}
