//! Equity-curve and position-detail export (CSV).

use anyhow::{Context, Result};
use paperlab_core::domain::PortfolioSnapshot;
use std::path::Path;

pub fn write_equity_csv(path: &Path, equity_curve: &[PortfolioSnapshot]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create equity CSV {}", path.display()))?;
    writer.write_record(["session_date", "cash", "equity", "position_count"])?;
    for snap in equity_curve {
        writer.write_record([
            snap.session_date.to_string(),
            format!("{:.4}", snap.cash),
            format!("{:.4}", snap.equity),
            snap.positions.len().to_string(),
        ])?;
    }
    writer.flush().context("failed to flush equity CSV")?;
    Ok(())
}

/// Per-position detail: one row per (session, open position). Positions
/// iterate in symbol order, so output is stable across runs.
pub fn write_positions_csv(path: &Path, equity_curve: &[PortfolioSnapshot]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create positions CSV {}", path.display()))?;
    writer.write_record(["session_date", "symbol", "quantity", "average_cost", "opened"])?;
    for snap in equity_curve {
        for position in snap.positions.values() {
            writer.write_record([
                snap.session_date.to_string(),
                position.symbol.clone(),
                format!("{:.4}", position.quantity),
                format!("{:.4}", position.average_cost),
                position.opened.to_string(),
            ])?;
        }
    }
    writer.flush().context("failed to flush positions CSV")?;
    Ok(())
}
