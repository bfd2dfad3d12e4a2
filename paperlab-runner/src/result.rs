//! Completed-run result, serializable as a single document.

use crate::config::{RunConfig, RunId};
use crate::metrics::SummaryStats;
use crate::rolling::RollingMetrics;
use paperlab_core::domain::{ClosedTrade, Fill, PortfolioSnapshot, RejectedOrder};
use serde::{Deserialize, Serialize};

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Everything one run produced: raw engine output plus derived metrics.
///
/// Recomputable pieces (stats, rolling) are stored alongside the raw series
/// so artifacts stand alone without re-running the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub config: RunConfig,
    pub equity_curve: Vec<PortfolioSnapshot>,
    pub fills: Vec<Fill>,
    pub rejected_orders: Vec<RejectedOrder>,
    pub closed_trades: Vec<ClosedTrade>,
    pub stats: SummaryStats,
    pub rolling: RollingMetrics,
}

/// Default schema version for deserializing older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl BacktestResult {
    /// The equity series alone, in session order.
    pub fn equity_values(&self) -> Vec<f64> {
        self.equity_curve.iter().map(|s| s.equity).collect()
    }

    pub fn final_equity(&self) -> Option<f64> {
        self.equity_curve.last().map(|s| s.equity)
    }
}
