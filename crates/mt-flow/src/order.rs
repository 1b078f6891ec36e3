//! Order construction and risk-level validation.
//!
//! Levels are checked against the reference price (bid for sells, ask for
//! buys) before normalization. A level on the wrong side produces a
//! [`RiskWarning`], which is logged and returned but never blocks the order.
//! Price, stop-loss, and take-profit are then snapped to the tick grid with
//! [`normalize_to_tick`]; anything that is not positive afterwards is fatal.

use mt_core::config::OrderPlan;
use mt_core::error::MtError;
use mt_core::price::{is_tick_aligned, normalize_level, normalize_to_tick};
use mt_core::{Direction, FillingMode, OrderRequest, SymbolInfo, TickSnapshot, TimeInForce, TradeAction};
use tracing::{info, warn};

/// A stop-loss or take-profit on the wrong side of the market.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RiskWarning {
    StopLossWrongSide {
        direction: Direction,
        stop_loss: f64,
        reference: f64,
    },
    TakeProfitWrongSide {
        direction: Direction,
        take_profit: f64,
        reference: f64,
    },
}

impl std::fmt::Display for RiskWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::StopLossWrongSide {
                direction,
                stop_loss,
                reference,
            } => {
                let side = if direction == Direction::Sell { "above" } else { "below" };
                write!(
                    f,
                    "Stop loss ({stop_loss}) should be {side} current price ({reference}) for {direction} orders"
                )
            }
            Self::TakeProfitWrongSide {
                direction,
                take_profit,
                reference,
            } => {
                let side = if direction == Direction::Sell { "below" } else { "above" };
                write!(
                    f,
                    "Take profit ({take_profit}) should be {side} current price ({reference}) for {direction} orders"
                )
            }
        }
    }
}

/// Price an order executes against: bid when selling, ask when buying.
#[inline]
pub fn reference_price(direction: Direction, tick: &TickSnapshot) -> f64 {
    match direction {
        Direction::Buy => tick.ask,
        Direction::Sell => tick.bid,
    }
}

/// Directional sanity of stop-loss / take-profit against `reference`.
///
/// Sell: SL must be above, TP below. Buy: SL below, TP above. Equality is
/// a warning. Unset levels are not checked.
pub fn check_risk_levels(
    direction: Direction,
    reference: f64,
    stop_loss: Option<f64>,
    take_profit: Option<f64>,
) -> Vec<RiskWarning> {
    let mut warnings = Vec::new();
    if let Some(sl) = stop_loss {
        let wrong = match direction {
            Direction::Sell => sl <= reference,
            Direction::Buy => sl >= reference,
        };
        if wrong {
            warnings.push(RiskWarning::StopLossWrongSide {
                direction,
                stop_loss: sl,
                reference,
            });
        }
    }
    if let Some(tp) = take_profit {
        let wrong = match direction {
            Direction::Sell => tp >= reference,
            Direction::Buy => tp <= reference,
        };
        if wrong {
            warnings.push(RiskWarning::TakeProfitWrongSide {
                direction,
                take_profit: tp,
                reference,
            });
        }
    }
    warnings
}

/// An order ready to submit, with the warnings raised while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedOrder {
    pub request: OrderRequest,
    /// Un-normalized reference price the levels were checked against.
    pub reference_price: f64,
    pub warnings: Vec<RiskWarning>,
}

/// Reject a normalized value that is zero, negative, or not a number.
fn ensure_positive(symbol: &str, field: &'static str, value: f64) -> Result<f64, MtError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(MtError::InvalidPrice {
            symbol: symbol.to_string(),
            field,
            value,
        })
    }
}

/// Build the request for `plan` from a fresh `tick`.
///
/// Fails with [`MtError::InvalidPrice`] when the reference price, or a set
/// stop-loss / take-profit, is not positive after normalization.
pub fn prepare_order(plan: &OrderPlan, info: &SymbolInfo, tick: &TickSnapshot) -> Result<PreparedOrder, MtError> {
    let reference = reference_price(plan.direction, tick);
    let stop_loss = plan.effective_stop_loss();
    let take_profit = plan.effective_take_profit();
    info!(
        "current price for {}: bid={}, ask={}, spread={}, using price={reference}",
        plan.symbol,
        tick.bid,
        tick.ask,
        tick.spread()
    );

    let warnings = check_risk_levels(plan.direction, reference, stop_loss, take_profit);
    for w in &warnings {
        warn!("{w}");
    }

    let tick_size = info.trade_tick_size;
    let price = ensure_positive(&plan.symbol, "price", normalize_to_tick(reference, tick_size))?;
    let stop_loss = normalize_level(stop_loss, tick_size)
        .map(|v| ensure_positive(&plan.symbol, "stop loss", v))
        .transpose()?;
    let take_profit = normalize_level(take_profit, tick_size)
        .map(|v| ensure_positive(&plan.symbol, "take profit", v))
        .transpose()?;
    debug_assert!(is_tick_aligned(price, tick_size), "price {price} off the {tick_size} grid");

    let request = OrderRequest {
        action: TradeAction::Deal,
        symbol: plan.symbol.clone(),
        direction: plan.direction,
        volume: plan.volume,
        price,
        stop_loss,
        take_profit,
        deviation: plan.deviation,
        magic: plan.magic,
        filling: FillingMode::Ioc,
        time_in_force: TimeInForce::Gtc,
        comment: plan.comment.clone(),
    };

    Ok(PreparedOrder {
        request,
        reference_price: reference,
        warnings,
    })
}
