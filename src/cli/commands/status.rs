use anyhow::Result;

use super::{build_api, print_json};
use crate::config::ResolvedConfig;
use crate::inference::ConnectionStatus;
use crate::ui::Style;

/// Probes the backend once and reports the result.
pub async fn run_status(config: &ResolvedConfig, json: bool) -> Result<()> {
    let api = build_api(config)?;
    let report = api.connection_status().await;

    if json {
        return print_json(Ok(report));
    }

    let status = match report.status {
        ConnectionStatus::Connected => Style::success(report.status),
        ConnectionStatus::Connecting => Style::warning(report.status),
        ConnectionStatus::Disconnected | ConnectionStatus::Error => Style::error(report.status),
    };

    println!("{}", Style::header("Backend"));
    println!("  {}  {}", Style::label("endpoint"), Style::value(&report.endpoint));
    println!("  {}    {status}", Style::label("status"));
    if let Some(count) = report.model_count {
        println!("  {}    {count}", Style::label("models"));
    }
    if let Some(message) = &report.message {
        println!("  {}   {}", Style::label("details"), Style::secondary(message));
    }

    Ok(())
}
