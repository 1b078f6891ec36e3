//! Configuration parsing for a single order run.
//!
//! A run reads one JSON file with three blocks: module metadata for logging,
//! the terminal to talk to, and the order plan itself.
//!
//! # Example config (wait-and-buy over the REST bridge)
//!
//! ```json
//! {
//!   "module": { "module_name": "buy_hk50", "log_path": "/tmp/log" },
//!   "terminal": {
//!     "kind": "rest",
//!     "rest": { "base_url": "http://127.0.0.1:8000" }
//!   },
//!   "order": {
//!     "symbol": "HK50.cash", "direction": "buy", "volume": 0.5,
//!     "trigger": { "bid_below": 26400.0, "poll_interval_ms": 1000 }
//!   },
//!   "live_status": true
//! }
//! ```

use std::collections::HashMap;

use anyhow::Context;
use serde::Deserialize;

use crate::error::MtError;
use crate::types::{Direction, SymbolInfo, TickSnapshot, TradeRetcode};

/// Top-level run config, deserialized from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Module metadata (name, log path).
    #[serde(default)]
    pub module: Option<ModuleMeta>,

    /// Which terminal to connect to.
    pub terminal: TerminalConfig,

    /// The one order this run places.
    pub order: OrderPlan,

    /// Overwrite a single stderr line with the live bid while waiting.
    #[serde(default)]
    pub live_status: bool,
}

impl AppConfig {
    /// Returns the module name, falling back to the order symbol.
    pub fn module_name(&self) -> String {
        self.module
            .as_ref()
            .and_then(|m| m.module_name.clone())
            .unwrap_or_else(|| format!("mt-{}", self.order.symbol))
    }

    /// Returns the log path.
    pub fn log_path(&self) -> Option<String> {
        self.module.as_ref().and_then(|m| m.log_path.clone())
    }

    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), MtError> {
        self.order.validate()?;
        match self.terminal.kind.to_lowercase().as_str() {
            "rest" | "paper" => Ok(()),
            other => Err(MtError::Config(format!("unknown terminal kind: {other}"))),
        }
    }
}

/// Module metadata block.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleMeta {
    pub module_name: Option<String>,
    pub log_path: Option<String>,
}

// ---------------------------------------------------------------------------
// Terminal
// ---------------------------------------------------------------------------

/// Terminal selection plus the settings block for each kind.
#[derive(Debug, Clone, Deserialize)]
pub struct TerminalConfig {
    /// Terminal kind: `"rest"` or `"paper"`.
    pub kind: String,

    /// How long to wait for the terminal connection (seconds).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// REST bridge settings (required when `kind` is `"rest"`).
    pub rest: Option<RestConfig>,

    /// Paper terminal settings (required when `kind` is `"paper"`).
    pub paper: Option<PaperConfig>,
}

/// Settings for the HTTP bridge in front of the trading terminal.
#[derive(Debug, Clone, Deserialize)]
pub struct RestConfig {
    /// Bridge base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Trading account number. Omit to use the account already logged in.
    pub login: Option<u64>,

    /// Account password.
    pub password: Option<String>,

    /// Broker trade server name.
    pub server: Option<String>,

    /// Path to the terminal executable on the bridge host.
    pub path: Option<String>,

    /// Per-request HTTP timeout (milliseconds).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            login: None,
            password: None,
            server: None,
            path: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Scripted in-memory terminal for dry runs.
#[derive(Debug, Clone, Deserialize)]
pub struct PaperConfig {
    /// Symbols the terminal knows about.
    #[serde(default)]
    pub symbols: Vec<SymbolInfo>,

    /// Tick script per symbol. `null` entries simulate a failed fetch; the
    /// last entry repeats once the script runs out.
    #[serde(default)]
    pub ticks: HashMap<String, Vec<Option<TickSnapshot>>>,

    /// Return code every order receives.
    #[serde(default = "default_paper_retcode")]
    pub order_retcode: TradeRetcode,

    /// Broker comment attached to every order result.
    #[serde(default = "default_paper_comment")]
    pub order_comment: String,

    /// Answer order submissions with no result at all.
    #[serde(default)]
    pub order_result_missing: bool,

    /// Refuse to make hidden symbols visible.
    #[serde(default)]
    pub reject_symbol_select: bool,

    /// Fail every connection attempt.
    #[serde(default)]
    pub fail_connect: bool,

    /// Delay before a connection attempt completes, in milliseconds.
    #[serde(default)]
    pub connect_delay_ms: u64,

    /// Report an error when the connection is closed.
    #[serde(default)]
    pub fail_shutdown: bool,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            ticks: HashMap::new(),
            order_retcode: default_paper_retcode(),
            order_comment: default_paper_comment(),
            order_result_missing: false,
            reject_symbol_select: false,
            fail_connect: false,
            connect_delay_ms: 0,
            fail_shutdown: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Order plan
// ---------------------------------------------------------------------------

/// What to trade, and optionally what to wait for first.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderPlan {
    /// Terminal symbol name.
    pub symbol: String,

    pub direction: Direction,

    /// Size in lots.
    pub volume: f64,

    /// Stop-loss level. Absent or `0` means no stop-loss.
    #[serde(default)]
    pub stop_loss: Option<f64>,

    /// Take-profit level. Absent or `0` means no take-profit.
    #[serde(default)]
    pub take_profit: Option<f64>,

    /// Maximum slippage in points.
    #[serde(default = "default_deviation")]
    pub deviation: u32,

    /// Attribution number stamped on the order.
    #[serde(default = "default_magic")]
    pub magic: u64,

    /// Wait for this condition before placing the order.
    #[serde(default)]
    pub trigger: Option<PriceTrigger>,

    /// Order comment passed through to the broker.
    #[serde(default)]
    pub comment: Option<String>,
}

impl OrderPlan {
    /// Stop-loss with `0` folded into "unset".
    pub fn effective_stop_loss(&self) -> Option<f64> {
        self.stop_loss.filter(|v| *v > 0.0)
    }

    /// Take-profit with `0` folded into "unset".
    pub fn effective_take_profit(&self) -> Option<f64> {
        self.take_profit.filter(|v| *v > 0.0)
    }

    pub fn validate(&self) -> Result<(), MtError> {
        if self.symbol.trim().is_empty() {
            return Err(MtError::Config("order.symbol is empty".into()));
        }
        if !(self.volume > 0.0) {
            return Err(MtError::Config(format!("order.volume must be positive, got {}", self.volume)));
        }
        for (name, level) in [("stop_loss", self.stop_loss), ("take_profit", self.take_profit)] {
            if let Some(v) = level {
                if v < 0.0 || !v.is_finite() {
                    return Err(MtError::Config(format!("order.{name} must be a non-negative price, got {v}")));
                }
            }
        }
        if let Some(ref trigger) = self.trigger {
            if !(trigger.bid_below > 0.0) {
                return Err(MtError::Config(format!(
                    "order.trigger.bid_below must be positive, got {}",
                    trigger.bid_below
                )));
            }
            if trigger.poll_interval_ms == 0 {
                return Err(MtError::Config("order.trigger.poll_interval_ms must be > 0".into()));
            }
        }
        Ok(())
    }
}

/// Fire once the bid drops strictly below `bid_below`.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceTrigger {
    pub bid_below: f64,

    /// Delay between polls (milliseconds).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

// ---------------------------------------------------------------------------
// Default helpers (used by serde)
// ---------------------------------------------------------------------------

fn default_connect_timeout_secs() -> u64 {
    60
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".into()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_paper_retcode() -> TradeRetcode {
    TradeRetcode::Done
}

fn default_paper_comment() -> String {
    "Request executed".into()
}

fn default_deviation() -> u32 {
    20
}

fn default_magic() -> u64 {
    234_000
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

/// Parse a config from a JSON string and validate it.
pub fn parse_config(content: &str) -> anyhow::Result<AppConfig> {
    let config: AppConfig = serde_json::from_str(content).context("invalid config JSON")?;
    config.validate()?;
    Ok(config)
}

/// Load, parse, and validate a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<AppConfig> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&content)
}
