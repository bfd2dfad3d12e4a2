//! Trade-tape and reject export (CSV).

use anyhow::{Context, Result};
use paperlab_core::domain::{Fill, OrderSide, RejectedOrder};
use std::path::Path;

fn side_label(side: OrderSide) -> &'static str {
    match side {
        OrderSide::Buy => "buy",
        OrderSide::Sell => "sell",
    }
}

/// One row per fill, in execution order.
pub fn write_trades_csv(path: &Path, fills: &[Fill]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create trades CSV {}", path.display()))?;
    writer.write_record([
        "session_date",
        "symbol",
        "side",
        "price",
        "quantity",
        "fee",
        "slippage_cost",
    ])?;
    for fill in fills {
        writer.write_record([
            fill.session_date.to_string(),
            fill.symbol.clone(),
            side_label(fill.side).to_owned(),
            format!("{:.4}", fill.price),
            format!("{:.4}", fill.quantity),
            format!("{:.4}", fill.fee),
            format!("{:.4}", fill.slippage_cost),
        ])?;
    }
    writer.flush().context("failed to flush trades CSV")?;
    Ok(())
}

/// One row per rejected order, in rejection order.
pub fn write_rejects_csv(path: &Path, rejects: &[RejectedOrder]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create rejects CSV {}", path.display()))?;
    writer.write_record(["session_date", "symbol", "side", "quantity", "reason"])?;
    for reject in rejects {
        writer.write_record([
            reject.session_date.to_string(),
            reject.symbol.clone(),
            side_label(reject.side).to_owned(),
            format!("{:.4}", reject.quantity),
            reject.reason.to_string(),
        ])?;
    }
    writer.flush().context("failed to flush rejects CSV")?;
    Ok(())
}
