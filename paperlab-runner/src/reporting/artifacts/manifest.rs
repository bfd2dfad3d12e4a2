//! Run manifest export (JSON).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::RunConfig;
use crate::metrics::SummaryStats;
use crate::result::BacktestResult;

/// Small summary document for indexing runs without loading full results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub schema_version: u32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub session_count: usize,
    pub fill_count: usize,
    pub reject_count: usize,
    pub config: RunConfig,
    pub stats: SummaryStats,
}

pub fn write_manifest(path: &Path, result: &BacktestResult) -> Result<()> {
    let manifest = RunManifest {
        run_id: result.run_id.clone(),
        schema_version: result.schema_version,
        created_at: chrono::Utc::now(),
        session_count: result.equity_curve.len(),
        fill_count: result.fills.len(),
        reject_count: result.rejected_orders.len(),
        config: result.config.clone(),
        stats: result.stats.clone(),
    };
    let json = serde_json::to_string_pretty(&manifest).context("failed to serialize manifest")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write manifest {}", path.display()))?;
    Ok(())
}
