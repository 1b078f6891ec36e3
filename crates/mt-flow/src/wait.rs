//! Price-threshold wait loop.
//!
//! Two states: [`WaitState::Waiting`] until a polled bid is strictly below the
//! threshold, then [`WaitState::Triggered`]. The loop has no deadline; callers
//! cancel it by dropping the future (the pause between polls is a tokio timer).
//! A failed tick fetch ends the wait with an error.

use std::io::Write;
use std::time::Duration;

use mt_core::TickSnapshot;
use mt_core::config::PriceTrigger;
use mt_core::error::MtError;
use mt_td::Terminal;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitState {
    Waiting,
    Triggered,
}

/// Classify one polled bid against the threshold.
#[inline]
pub fn evaluate(bid: f64, bid_below: f64) -> WaitState {
    if bid < bid_below { WaitState::Triggered } else { WaitState::Waiting }
}

/// The poll that ended the wait.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerHit {
    pub tick: TickSnapshot,
    /// 1-based index of the triggering poll.
    pub polls: u64,
}

/// Fetch a tick; an absent tick or a failed call is fatal.
pub async fn fetch_tick<T: Terminal + ?Sized>(terminal: &T, symbol: &str) -> Result<TickSnapshot, MtError> {
    match terminal.symbol_info_tick(symbol).await {
        Ok(Some(tick)) => Ok(tick),
        Ok(None) => Err(MtError::TickUnavailable {
            symbol: symbol.to_string(),
            reason: "terminal returned no tick".into(),
        }),
        Err(e) => Err(MtError::TickUnavailable {
            symbol: symbol.to_string(),
            reason: format!("{e:#}"),
        }),
    }
}

/// Poll until the bid drops strictly below `trigger.bid_below`.
///
/// With `live_status`, the current bid is rewritten in place on stderr.
pub async fn wait_for_trigger<T: Terminal + ?Sized>(
    terminal: &T,
    symbol: &str,
    trigger: &PriceTrigger,
    live_status: bool,
) -> Result<TriggerHit, MtError> {
    let interval = Duration::from_millis(trigger.poll_interval_ms);
    info!(
        "monitoring {symbol} - waiting for bid to drop below {} (poll every {:?})",
        trigger.bid_below, interval
    );

    let mut polls = 0u64;
    loop {
        let tick = fetch_tick(terminal, symbol).await?;
        polls += 1;
        debug!(symbol, bid = tick.bid, ask = tick.ask, polls, "polled tick");

        if live_status {
            let mut err = std::io::stderr();
            let _ = write!(err, "\rCurrent price: {} (target: < {})", tick.bid, trigger.bid_below);
            let _ = err.flush();
        }

        if evaluate(tick.bid, trigger.bid_below) == WaitState::Triggered {
            if live_status {
                eprintln!();
            }
            info!("price dropped below {}! current bid: {} (poll #{polls})", trigger.bid_below, tick.bid);
            return Ok(TriggerHit { tick, polls });
        }

        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use mt_core::SymbolInfo;
    use mt_core::config::PaperConfig;
    use mt_td::paper::PaperTerminal;

    use super::*;

    async fn scripted(bids: &[Option<f64>]) -> PaperTerminal {
        let script = bids.iter().map(|b| b.map(|bid| TickSnapshot::new(bid, bid + 2.0))).collect();
        let mut ticks = HashMap::new();
        ticks.insert("HK50.cash".to_string(), script);
        let mut t = PaperTerminal::new(PaperConfig {
            symbols: vec![SymbolInfo::new("HK50.cash", true, 1.0)],
            ticks,
            ..PaperConfig::default()
        });
        t.connect(Duration::from_secs(1)).await.unwrap();
        t
    }

    fn trigger(bid_below: f64) -> PriceTrigger {
        PriceTrigger {
            bid_below,
            poll_interval_ms: 1,
        }
    }

    #[test]
    fn strictly_below_triggers() {
        assert_eq!(evaluate(26399.0, 26400.0), WaitState::Triggered);
        assert_eq!(evaluate(26400.0, 26400.0), WaitState::Waiting);
        assert_eq!(evaluate(26410.0, 26400.0), WaitState::Waiting);
    }

    #[tokio::test]
    async fn triggers_on_third_poll() {
        let t = scripted(&[Some(26410.0), Some(26405.0), Some(26399.0), Some(26390.0)]).await;
        let hit = wait_for_trigger(&t, "HK50.cash", &trigger(26400.0), false).await.unwrap();
        assert_eq!(hit.polls, 3);
        assert_eq!(hit.tick.bid, 26399.0);
        assert_eq!(t.stats().tick_requests, 3);
    }

    #[tokio::test]
    async fn bid_equal_to_threshold_keeps_waiting() {
        let t = scripted(&[Some(26400.0), Some(26400.0), Some(26399.5)]).await;
        let hit = wait_for_trigger(&t, "HK50.cash", &trigger(26400.0), false).await.unwrap();
        assert_eq!(hit.polls, 3);
    }

    #[tokio::test]
    async fn failed_poll_is_fatal() {
        let t = scripted(&[Some(26410.0), None, Some(26000.0)]).await;
        let err = wait_for_trigger(&t, "HK50.cash", &trigger(26400.0), false).await.unwrap_err();
        assert!(matches!(err, MtError::TickUnavailable { ref symbol, .. } if symbol == "HK50.cash"));
        assert_eq!(t.stats().tick_requests, 2);
    }

    #[tokio::test]
    async fn wait_is_cancellable_by_dropping() {
        let t = scripted(&[Some(26500.0)]).await;
        let res = tokio::time::timeout(
            Duration::from_millis(30),
            wait_for_trigger(&t, "HK50.cash", &trigger(26400.0), false),
        )
        .await;
        assert!(res.is_err());
        assert!(t.stats().tick_requests >= 1);
    }
}
