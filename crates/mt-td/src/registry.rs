//! Terminal registry — factory for creating terminals from config.

use anyhow::{Result, anyhow};
use mt_core::config::TerminalConfig;

use crate::Terminal;
use crate::paper::PaperTerminal;
use crate::rest::RestTerminal;

/// Create a [`Terminal`] based on the `kind` field in the config.
///
/// With `force_paper`, the `paper` block is used regardless of `kind`, so a
/// live config can be dry-run unchanged.
pub fn create_terminal(config: &TerminalConfig, force_paper: bool) -> Result<Box<dyn Terminal>> {
    let kind = if force_paper { "paper".to_string() } else { config.kind.to_lowercase() };

    match kind.as_str() {
        "rest" => {
            let rest = config.rest.clone().unwrap_or_default();
            Ok(Box::new(RestTerminal::new(rest)?))
        }
        "paper" => {
            let paper = config
                .paper
                .clone()
                .ok_or_else(|| anyhow!("terminal.paper block is required for the paper terminal"))?;
            Ok(Box::new(PaperTerminal::new(paper)))
        }
        other => Err(anyhow!("Unknown terminal kind: {other}")),
    }
}
