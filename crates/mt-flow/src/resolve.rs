//! Symbol resolution — the gate in front of every price read.

use mt_core::SymbolInfo;
use mt_core::error::MtError;
use mt_td::Terminal;
use tracing::info;

/// Look up `symbol` and make sure it is visible in Market Watch.
///
/// Unknown symbols and refused selections are fatal.
pub async fn resolve_symbol<T: Terminal + ?Sized>(terminal: &T, symbol: &str) -> Result<SymbolInfo, MtError> {
    let mut info = match terminal.symbol_info(symbol).await {
        Ok(Some(info)) => info,
        Ok(None) => return Err(MtError::UnknownSymbol(symbol.to_string())),
        Err(e) => {
            return Err(match e.downcast::<MtError>() {
                Ok(mt) => mt,
                Err(e) => MtError::Transport(format!("symbol_info({symbol}): {e:#}")),
            });
        }
    };
    info!(
        "symbol info found: {}, visible: {}, tick size: {}",
        info.name, info.visible, info.trade_tick_size
    );

    if !info.visible {
        info!("selecting symbol {symbol}");
        match terminal.symbol_select(symbol, true).await {
            Ok(true) => info.visible = true,
            Ok(false) => {
                return Err(MtError::SymbolSelect {
                    symbol: symbol.to_string(),
                    reason: "terminal refused to select the symbol".into(),
                });
            }
            Err(e) => {
                return Err(MtError::SymbolSelect {
                    symbol: symbol.to_string(),
                    reason: format!("{e:#}"),
                });
            }
        }
    }
    Ok(info)
}
