//! REST bridge terminal.
//!
//! Talks JSON over HTTP to a bridge process that owns the actual trading
//! terminal session.
//!
//! # Endpoints
//!
//! | Operation        | Method | Path                     |
//! |------------------|--------|--------------------------|
//! | Initialize       | POST   | `/api/initialize`        |
//! | Last error       | GET    | `/api/last_error`        |
//! | Symbol info      | GET    | `/api/symbol_info`       |
//! | Symbol select    | POST   | `/api/symbol_select`     |
//! | Latest tick      | GET    | `/api/symbol_info_tick`  |
//! | Send order       | POST   | `/api/order_send`        |
//! | Shutdown         | POST   | `/api/shutdown`          |

pub mod wire;

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use mt_core::config::RestConfig;
use mt_core::error::MtError;
use mt_core::{OrderRequest, OrderResult, SymbolInfo, TickSnapshot};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use self::wire::{InitializeBody, SymbolSelectBody, WireOrderRequest, unwrap_envelope};
use crate::Terminal;

/// Terminal client for the HTTP bridge.
pub struct RestTerminal {
    /// Shared HTTP client.
    http: reqwest::Client,
    /// Bridge settings.
    config: RestConfig,
    /// Set after a successful `initialize`.
    connected: bool,
}

impl RestTerminal {
    /// Create a new client (no requests sent yet).
    pub fn new(config: RestConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            config,
            connected: false,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Read a response body and unwrap its envelope.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response, op: &str) -> Result<Option<T>> {
        let status = resp.status();
        let text = resp.text().await.with_context(|| format!("{op}: failed to read response body"))?;
        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(body) => unwrap_envelope(body, op),
            Err(_) if !status.is_success() => Err(MtError::Transport(format!("{op}: HTTP {status}")).into()),
            Err(e) => Err(MtError::Parse(format!("{op}: {e}")).into()),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, symbol: &str, op: &str) -> Result<Option<T>> {
        let resp = self
            .http
            .get(self.url(path))
            .query(&[("symbol", symbol)])
            .send()
            .await
            .with_context(|| format!("{op} request failed"))?;
        Self::decode(resp, op).await
    }

    async fn post<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        op: &str,
    ) -> Result<Option<T>> {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("{op} request failed"))?;
        Self::decode(resp, op).await
    }

    /// The terminal's last error as `(code, message)`.
    pub async fn last_error(&self) -> Result<Option<(i64, String)>> {
        let resp = self
            .http
            .get(self.url("/api/last_error"))
            .send()
            .await
            .context("last_error request failed")?;
        Self::decode(resp, "last_error").await
    }

    async fn initialize(&self, timeout: Duration) -> Result<()> {
        let body = InitializeBody {
            path: self.config.path.as_deref(),
            login: self.config.login,
            password: self.config.password.as_deref(),
            server: self.config.server.as_deref(),
            timeout: timeout.as_millis() as u64,
        };
        let ok: Option<bool> = self.post("/api/initialize", &body, "initialize").await?;
        if ok == Some(true) {
            return Ok(());
        }
        let detail = match self.last_error().await {
            Ok(Some((code, msg))) => format!("({code}, {msg})"),
            Ok(None) => "no error detail".to_string(),
            Err(e) => format!("last_error unavailable: {e}"),
        };
        Err(anyhow!("initialize returned false: {detail}"))
    }
}

#[async_trait]
impl Terminal for RestTerminal {
    fn name(&self) -> &str {
        "rest"
    }

    async fn connect(&mut self, timeout: Duration) -> Result<()> {
        info!("[rest] connecting to terminal bridge at {}", self.config.base_url);
        match tokio::time::timeout(timeout, self.initialize(timeout)).await {
            Ok(Ok(())) => {
                self.connected = true;
                info!("[rest] terminal initialized");
                Ok(())
            }
            Ok(Err(e)) => Err(MtError::Connect(format!("{e:#}")).into()),
            Err(_) => Err(MtError::Connect(format!("timed out after {timeout:?}")).into()),
        }
    }

    async fn symbol_info(&self, symbol: &str) -> Result<Option<SymbolInfo>> {
        self.get("/api/symbol_info", symbol, "symbol_info").await
    }

    async fn symbol_select(&self, symbol: &str, enable: bool) -> Result<bool> {
        let body = SymbolSelectBody { symbol, enable };
        let ok: Option<bool> = self.post("/api/symbol_select", &body, "symbol_select").await?;
        Ok(ok.unwrap_or(false))
    }

    async fn symbol_info_tick(&self, symbol: &str) -> Result<Option<TickSnapshot>> {
        let tick = self.get("/api/symbol_info_tick", symbol, "symbol_info_tick").await?;
        debug!("[rest] {symbol} tick: {tick:?}");
        Ok(tick)
    }

    async fn order_send(&self, request: &OrderRequest) -> Result<Option<OrderResult>> {
        let body = WireOrderRequest::from(request);
        debug!("[rest] order_send body: {}", serde_json::to_string(&body).unwrap_or_default());
        self.post("/api/order_send", &body, "order_send").await
    }

    async fn shutdown(&mut self) -> Result<()> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;
        let res: Result<Option<serde_json::Value>> = self.post("/api/shutdown", &serde_json::json!({}), "shutdown").await;
        match res {
            Ok(_) => {
                info!("[rest] terminal connection closed");
                Ok(())
            }
            Err(e) => {
                warn!("[rest] shutdown failed: {e:#}");
                Err(e)
            }
        }
    }
}
