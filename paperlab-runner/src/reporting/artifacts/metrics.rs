//! Metrics export (JSON).
//!
//! NaN metrics serialize as JSON `null`, so downstream consumers can tell
//! "undefined" apart from zero.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use crate::metrics::SummaryStats;
use crate::result::BacktestResult;
use crate::rolling::RollingMetrics;

#[derive(Serialize)]
struct MetricsDocument<'a> {
    run_id: &'a str,
    stats: &'a SummaryStats,
    rolling: &'a RollingMetrics,
}

pub fn write_metrics_json(path: &Path, result: &BacktestResult) -> Result<()> {
    let document = MetricsDocument {
        run_id: &result.run_id,
        stats: &result.stats,
        rolling: &result.rolling,
    };
    let json = serde_json::to_string_pretty(&document).context("failed to serialize metrics")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write metrics JSON {}", path.display()))?;
    Ok(())
}
