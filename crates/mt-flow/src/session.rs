//! Connection session — runs one order plan with guaranteed release.
//!
//! ```text
//! select! { connect , cancel } ──cancel──▶ shutdown ──▶ Cancelled
//!    │
//!    ├──fail──▶ Err(Connect)                (nothing to release)
//!    │
//!    ▼
//! select! { arm_plan(..) , cancel } ──cancel──▶ shutdown ──▶ Cancelled
//!    │
//!    ▼
//! place_order(..) ──▶ shutdown ──▶ outcome
//! ```
//!
//! `cancel` is pinned once and polled from the first await, so an interrupt
//! while connecting is seen too. Only connecting, resolution, and the wait
//! are raced against it. Pricing and submission run to completion once the
//! trigger fired, so a cancelled run never leaves an order in flight.

use std::future::Future;
use std::time::Duration;

use mt_core::{OrderReport, SymbolInfo};
use mt_core::config::{AppConfig, OrderPlan};
use mt_core::error::MtError;
use mt_td::Terminal;
use tracing::{info, warn};

use crate::order::prepare_order;
use crate::resolve::resolve_symbol;
use crate::submit::submit_order;
use crate::wait::{fetch_tick, wait_for_trigger};

/// Knobs that are not part of the order itself.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub connect_timeout: Duration,
    pub live_status: bool,
}

impl RunOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(config.terminal.connect_timeout_secs),
            live_status: config.live_status,
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(60),
            live_status: false,
        }
    }
}

/// How a run ended when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(OrderReport),
    /// Interrupted by the caller before an order was sent.
    Cancelled,
}

/// Resolve the symbol and, if the plan has a trigger, wait for it.
pub async fn arm_plan<T: Terminal + ?Sized>(
    terminal: &T,
    plan: &OrderPlan,
    live_status: bool,
) -> Result<SymbolInfo, MtError> {
    let info = resolve_symbol(terminal, &plan.symbol).await?;
    if let Some(ref trigger) = plan.trigger {
        wait_for_trigger(terminal, &plan.symbol, trigger, live_status).await?;
    }
    Ok(info)
}

/// Price, build, and submit the order from a freshly fetched tick.
pub async fn place_order<T: Terminal + ?Sized>(
    terminal: &T,
    plan: &OrderPlan,
    info: &SymbolInfo,
) -> Result<OrderReport, MtError> {
    // Never price off the tick that fired the trigger.
    let tick = fetch_tick(terminal, &plan.symbol).await?;
    let prepared = prepare_order(plan, info, &tick)?;
    submit_order(terminal, &prepared.request).await
}

/// Connect, run `plan` until it finishes or `cancel` resolves, and always
/// shut the connection down afterwards.
pub async fn run<T, C>(terminal: &mut T, plan: &OrderPlan, options: RunOptions, cancel: C) -> Result<RunOutcome, MtError>
where
    T: Terminal + ?Sized,
    C: Future<Output = ()>,
{
    tokio::pin!(cancel);

    let connected = tokio::select! {
        res = terminal.connect(options.connect_timeout) => Some(res),
        () = &mut cancel => None,
    };
    let Some(connected) = connected else {
        info!("cancelled while connecting to {} terminal", terminal.name());
        release(terminal).await;
        return Ok(RunOutcome::Cancelled);
    };
    if let Err(e) = connected {
        return Err(match e.downcast::<MtError>() {
            Ok(MtError::Connect(msg)) => MtError::Connect(msg),
            Ok(other) => MtError::Connect(other.to_string()),
            Err(e) => MtError::Connect(format!("{e:#}")),
        });
    }
    info!("connected to {} terminal", terminal.name());

    let outcome = {
        let connected: &T = terminal;
        let armed = tokio::select! {
            res = arm_plan(connected, plan, options.live_status) => res.map(Some),
            () = &mut cancel => {
                if options.live_status {
                    eprintln!();
                }
                info!("monitoring cancelled by user");
                Ok(None)
            }
        };
        match armed {
            Ok(Some(symbol)) => place_order(connected, plan, &symbol).await.map(RunOutcome::Completed),
            Ok(None) => Ok(RunOutcome::Cancelled),
            Err(e) => Err(e),
        }
    };

    release(terminal).await;
    outcome
}

/// Close the connection; a failure here only warns.
async fn release<T: Terminal + ?Sized>(terminal: &mut T) {
    match terminal.shutdown().await {
        Ok(()) => info!("{} terminal connection closed", terminal.name()),
        Err(e) => warn!("failed to close {} terminal connection: {e:#}", terminal.name()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use mt_core::config::{PaperConfig, PriceTrigger};
    use mt_core::{Direction, TickSnapshot, TradeRetcode};
    use mt_td::paper::PaperTerminal;

    use super::*;

    fn paper(symbol: SymbolInfo, script: Vec<Option<TickSnapshot>>) -> PaperConfig {
        let mut ticks = HashMap::new();
        ticks.insert(symbol.name.clone(), script);
        PaperConfig {
            symbols: vec![symbol],
            ticks,
            ..PaperConfig::default()
        }
    }

    fn buy_plan() -> OrderPlan {
        OrderPlan {
            symbol: "HK50.cash".into(),
            direction: Direction::Buy,
            volume: 0.5,
            stop_loss: None,
            take_profit: None,
            deviation: 20,
            magic: 234000,
            trigger: Some(PriceTrigger {
                bid_below: 26400.0,
                poll_interval_ms: 1,
            }),
            comment: None,
        }
    }

    fn sell_plan() -> OrderPlan {
        OrderPlan {
            symbol: "BTCUSD".into(),
            direction: Direction::Sell,
            volume: 0.01,
            stop_loss: Some(93000.0),
            take_profit: Some(90000.0),
            deviation: 20,
            magic: 234000,
            trigger: None,
            comment: None,
        }
    }

    fn never() -> std::future::Pending<()> {
        std::future::pending()
    }

    #[tokio::test]
    async fn buy_triggers_then_uses_fresh_ask() {
        let mut t = PaperTerminal::new(paper(
            SymbolInfo::new("HK50.cash", false, 0.5),
            vec![
                Some(TickSnapshot::new(26410.0, 26412.0)),
                Some(TickSnapshot::new(26405.0, 26407.0)),
                Some(TickSnapshot::new(26399.0, 26401.0)),
                Some(TickSnapshot::new(26398.0, 26400.5)),
            ],
        ));
        let outcome = run(&mut t, &buy_plan(), RunOptions::default(), never()).await.unwrap();

        let RunOutcome::Completed(report) = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(report.executed_price, 26400.5);
        assert_eq!(report.executed_volume, 0.5);
        let sent = t.sent_orders();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].price, 26400.5);
        assert_eq!(sent[0].direction, Direction::Buy);
        assert_eq!(sent[0].stop_loss, None);
        // three polls plus the fresh pre-order tick
        assert_eq!(t.stats().tick_requests, 4);
        assert_eq!(t.stats().shutdowns, 1);
        assert!(!t.is_connected());
    }

    #[tokio::test]
    async fn sell_submits_immediately_with_levels() {
        let mut t = PaperTerminal::new(paper(
            SymbolInfo::new("BTCUSD", true, 0.5),
            vec![Some(TickSnapshot::new(91000.0, 91015.0))],
        ));
        let outcome = run(&mut t, &sell_plan(), RunOptions::default(), never()).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Completed(_)));
        let sent = t.sent_orders();
        assert_eq!(sent[0].price, 91000.0);
        assert_eq!(sent[0].stop_loss, Some(93000.0));
        assert_eq!(sent[0].take_profit, Some(90000.0));
        assert_eq!(t.stats().tick_requests, 1);
        assert_eq!(t.stats().shutdowns, 1);
    }

    #[tokio::test]
    async fn rejected_order_is_fatal_and_releases() {
        let mut config = paper(
            SymbolInfo::new("BTCUSD", true, 0.5),
            vec![Some(TickSnapshot::new(91000.0, 91015.0))],
        );
        config.order_retcode = TradeRetcode::NoMoney;
        config.order_comment = "No money".into();
        let mut t = PaperTerminal::new(config);

        let err = run(&mut t, &sell_plan(), RunOptions::default(), never()).await.unwrap_err();
        assert!(matches!(err, MtError::Rejected { ref comment, .. } if comment == "No money"));
        assert_eq!(t.stats().shutdowns, 1);
    }

    #[tokio::test]
    async fn missing_order_result_is_fatal_and_releases() {
        let mut config = paper(
            SymbolInfo::new("BTCUSD", true, 0.5),
            vec![Some(TickSnapshot::new(91000.0, 91015.0))],
        );
        config.order_result_missing = true;
        let mut t = PaperTerminal::new(config);

        let err = run(&mut t, &sell_plan(), RunOptions::default(), never()).await.unwrap_err();
        assert!(matches!(err, MtError::NoResult { .. }));
        assert_eq!(t.stats().shutdowns, 1);
    }

    #[tokio::test]
    async fn failed_tick_during_wait_releases_without_order() {
        let mut t = PaperTerminal::new(paper(
            SymbolInfo::new("HK50.cash", true, 0.5),
            vec![Some(TickSnapshot::new(26410.0, 26412.0)), None],
        ));
        let err = run(&mut t, &buy_plan(), RunOptions::default(), never()).await.unwrap_err();
        assert!(matches!(err, MtError::TickUnavailable { .. }));
        assert!(t.sent_orders().is_empty());
        assert_eq!(t.stats().shutdowns, 1);
    }

    #[tokio::test]
    async fn unknown_symbol_releases() {
        let mut t = PaperTerminal::new(paper(SymbolInfo::new("BTCUSD", true, 0.5), vec![]));
        let err = run(&mut t, &buy_plan(), RunOptions::default(), never()).await.unwrap_err();
        assert!(matches!(err, MtError::UnknownSymbol(_)));
        assert_eq!(t.stats().shutdowns, 1);
    }

    #[tokio::test]
    async fn cancellation_releases_and_sends_nothing() {
        let mut t = PaperTerminal::new(paper(
            SymbolInfo::new("HK50.cash", true, 0.5),
            vec![Some(TickSnapshot::new(26500.0, 26502.0))],
        ));
        let cancel = tokio::time::sleep(Duration::from_millis(25));
        let outcome = run(&mut t, &buy_plan(), RunOptions::default(), cancel).await.unwrap();
        assert_eq!(outcome, RunOutcome::Cancelled);
        assert!(t.sent_orders().is_empty());
        assert!(t.stats().tick_requests >= 1);
        assert_eq!(t.stats().shutdowns, 1);
    }

    #[tokio::test]
    async fn failed_connect_runs_nothing() {
        let mut config = paper(
            SymbolInfo::new("BTCUSD", true, 0.5),
            vec![Some(TickSnapshot::new(91000.0, 91015.0))],
        );
        config.fail_connect = true;
        let mut t = PaperTerminal::new(config);

        let err = run(&mut t, &sell_plan(), RunOptions::default(), never()).await.unwrap_err();
        assert!(matches!(err, MtError::Connect(_)));
        assert_eq!(t.stats().connects, 1);
        assert_eq!(t.stats().tick_requests, 0);
        assert_eq!(t.stats().shutdowns, 0);
    }

    #[tokio::test]
    async fn works_through_a_boxed_terminal() {
        let mut t: Box<dyn Terminal> = Box::new(PaperTerminal::new(paper(
            SymbolInfo::new("BTCUSD", true, 0.5),
            vec![Some(TickSnapshot::new(91000.0, 91015.0))],
        )));
        let outcome = run(t.as_mut(), &sell_plan(), RunOptions::default(), never()).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn cancel_during_slow_connect_returns_promptly() {
        let mut config = paper(
            SymbolInfo::new("BTCUSD", true, 0.5),
            vec![Some(TickSnapshot::new(91000.0, 91015.0))],
        );
        config.connect_delay_ms = 5_000;
        let mut t = PaperTerminal::new(config);

        let started = std::time::Instant::now();
        let outcome = run(&mut t, &sell_plan(), RunOptions::default(), std::future::ready(())).await.unwrap();
        assert_eq!(outcome, RunOutcome::Cancelled);
        assert!(started.elapsed() < Duration::from_secs(1), "took {:?}", started.elapsed());
        assert_eq!(t.stats().connects, 1);
        assert_eq!(t.stats().tick_requests, 0);
        assert_eq!(t.stats().shutdowns, 1);
        assert!(t.sent_orders().is_empty());
    }

    #[tokio::test]
    async fn shutdown_failure_keeps_the_run_outcome() {
        let mut config = paper(
            SymbolInfo::new("BTCUSD", true, 0.5),
            vec![Some(TickSnapshot::new(91000.0, 91015.0))],
        );
        config.fail_shutdown = true;
        let mut t = PaperTerminal::new(config.clone());
        let outcome = run(&mut t, &sell_plan(), RunOptions::default(), never()).await.unwrap();
        assert!(matches!(outcome, RunOutcome::Completed(_)));
        assert_eq!(t.stats().shutdowns, 1);

        config.order_retcode = TradeRetcode::NoMoney;
        config.order_comment = "No money".into();
        let mut t = PaperTerminal::new(config);
        let err = run(&mut t, &sell_plan(), RunOptions::default(), never()).await.unwrap_err();
        assert!(matches!(err, MtError::Rejected { .. }));
        assert_eq!(t.stats().shutdowns, 1);
    }

    #[tokio::test]
    async fn zero_quote_is_fatal_and_sends_nothing() {
        let mut t = PaperTerminal::new(paper(
            SymbolInfo::new("BTCUSD", true, 0.5),
            vec![Some(TickSnapshot::new(0.0, 0.0))],
        ));
        let err = run(&mut t, &sell_plan(), RunOptions::default(), never()).await.unwrap_err();
        assert!(matches!(err, MtError::InvalidPrice { .. }));
        assert!(t.sent_orders().is_empty());
        assert_eq!(t.stats().shutdowns, 1);
    }
}
