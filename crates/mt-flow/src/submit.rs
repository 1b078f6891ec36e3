//! Order submission and result interpretation.
//!
//! Exactly one `order_send` per run. An absent result and any return code
//! other than `Done` are fatal; the broker comment is carried verbatim.

use mt_core::error::MtError;
use mt_core::{OrderReport, OrderRequest, OrderResult};
use mt_td::Terminal;
use tracing::{error, info};

/// Turn the terminal's answer into a report or a fatal error.
pub fn interpret_result(request: &OrderRequest, result: Option<OrderResult>) -> Result<OrderReport, MtError> {
    let Some(result) = result else {
        return Err(MtError::NoResult {
            symbol: request.symbol.clone(),
            reason: "terminal returned no result".into(),
        });
    };

    if !result.retcode.is_success() {
        return Err(MtError::Rejected {
            symbol: request.symbol.clone(),
            retcode: result.retcode,
            comment: result.comment,
        });
    }

    Ok(OrderReport {
        symbol: request.symbol.clone(),
        direction: request.direction,
        ticket: result.order,
        executed_price: result.price,
        executed_volume: result.volume,
        stop_loss: request.stop_loss,
        take_profit: request.take_profit,
        retcode: result.retcode,
    })
}

/// Send `request` once and interpret the answer.
pub async fn submit_order<T: Terminal + ?Sized>(terminal: &T, request: &OrderRequest) -> Result<OrderReport, MtError> {
    info!(
        "sending {} order: symbol={}, volume={}, price={}, sl={:?}, tp={:?}, deviation={}, magic={}",
        request.direction,
        request.symbol,
        request.volume,
        request.price,
        request.stop_loss,
        request.take_profit,
        request.deviation,
        request.magic,
    );

    let result = match terminal.order_send(request).await {
        Ok(result) => result,
        Err(e) => {
            let err = MtError::NoResult {
                symbol: request.symbol.clone(),
                reason: format!("{e:#}"),
            };
            error!("{err}");
            return Err(err);
        }
    };

    if let Some(ref r) = result {
        info!("order result: retcode={}, comment={}", r.retcode, r.comment);
    }

    match interpret_result(request, result) {
        Ok(report) => {
            info!(
                "order executed successfully! ticket={}, price={}, volume={}, sl={:?}, tp={:?}",
                report.ticket, report.executed_price, report.executed_volume, report.stop_loss, report.take_profit
            );
            Ok(report)
        }
        Err(e) => {
            error!("{e}");
            Err(e)
        }
    }
}
