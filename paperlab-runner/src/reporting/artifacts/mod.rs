//! Artifact writer for persisting run outputs.
//!
//! Column names and order in the CSV artifacts are a compatibility surface
//! for downstream consumers and must not change between runs.

mod equity;
mod manifest;
mod metrics;
mod trades;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::result::BacktestResult;

pub use manifest::RunManifest;

/// Paths of everything one `save_run` call wrote.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub manifest: PathBuf,
    pub equity_csv: PathBuf,
    pub positions_csv: PathBuf,
    pub trades_csv: PathBuf,
    pub rejects_csv: PathBuf,
    pub metrics_json: PathBuf,
}

/// Writes all artifacts for a run under `<output_dir>/<run_id>/`.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)
            .context("failed to create artifact output directory")?;
        Ok(Self { output_dir })
    }

    /// Save the complete artifact set for one run.
    pub fn save_run(&self, result: &BacktestResult) -> Result<ArtifactPaths> {
        let run_dir = self.output_dir.join(&result.run_id);
        std::fs::create_dir_all(&run_dir).context("failed to create run artifact directory")?;

        let equity_csv = run_dir.join("equity.csv");
        equity::write_equity_csv(&equity_csv, &result.equity_curve)?;

        let positions_csv = run_dir.join("positions.csv");
        equity::write_positions_csv(&positions_csv, &result.equity_curve)?;

        let trades_csv = run_dir.join("trades.csv");
        trades::write_trades_csv(&trades_csv, &result.fills)?;

        let rejects_csv = run_dir.join("rejects.csv");
        trades::write_rejects_csv(&rejects_csv, &result.rejected_orders)?;

        let metrics_json = run_dir.join("metrics.json");
        metrics::write_metrics_json(&metrics_json, result)?;

        let manifest_path = run_dir.join("manifest.json");
        manifest::write_manifest(&manifest_path, result)?;

        Ok(ArtifactPaths {
            manifest: manifest_path,
            equity_csv,
            positions_csv,
            trades_csv,
            rejects_csv,
            metrics_json,
        })
    }
}
