//! JSON wire format of the terminal bridge.
//!
//! Every response is an envelope:
//!
//! - Success: `{"result": <data>}` (`<data>` may be `null`)
//! - Error: `{"error": "error message"}`
//!
//! Bodies are handled as raw `serde_json::Value` first so a bridge error is
//! reported with its own message rather than a serde mismatch.

use anyhow::Result;
use mt_core::OrderRequest;
use mt_core::error::MtError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Unwrap an envelope into its `result`, mapping `null` to `None`.
pub fn unwrap_envelope<T: DeserializeOwned>(body: serde_json::Value, op: &str) -> Result<Option<T>> {
    if let Some(err) = body.get("error") {
        let msg = err.as_str().map(str::to_owned).unwrap_or_else(|| err.to_string());
        return Err(MtError::Transport(format!("{op}: {msg}")).into());
    }
    let Some(result) = body.get("result") else {
        return Err(MtError::Parse(format!("{op}: response has neither result nor error")).into());
    };
    if result.is_null() {
        return Ok(None);
    }
    let value = serde_json::from_value(result.clone()).map_err(|e| MtError::Parse(format!("{op}: {e}")))?;
    Ok(Some(value))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// `POST /api/initialize` body. Unset fields attach to the running terminal
/// as-is.
#[derive(Debug, Serialize)]
pub struct InitializeBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<&'a str>,
    /// Terminal-side connection timeout (milliseconds).
    pub timeout: u64,
}

/// `POST /api/symbol_select` body.
#[derive(Debug, Serialize)]
pub struct SymbolSelectBody<'a> {
    pub symbol: &'a str,
    pub enable: bool,
}

/// `POST /api/order_send` body, keyed and coded like the terminal's own
/// trade request structure.
#[derive(Debug, Serialize, PartialEq)]
pub struct WireOrderRequest<'a> {
    pub action: u32,
    pub symbol: &'a str,
    pub volume: f64,
    #[serde(rename = "type")]
    pub order_type: u32,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tp: Option<f64>,
    pub deviation: u32,
    pub magic: u64,
    pub type_time: u32,
    pub type_filling: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<&'a str>,
}

impl<'a> From<&'a OrderRequest> for WireOrderRequest<'a> {
    fn from(req: &'a OrderRequest) -> Self {
        Self {
            action: req.action.code(),
            symbol: &req.symbol,
            volume: req.volume,
            order_type: req.direction.order_type_code(),
            price: req.price,
            sl: req.stop_loss,
            tp: req.take_profit,
            deviation: req.deviation,
            magic: req.magic,
            type_time: req.time_in_force.code(),
            type_filling: req.filling.code(),
            comment: req.comment.as_deref(),
        }
    }
}
