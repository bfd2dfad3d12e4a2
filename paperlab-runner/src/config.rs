//! Serializable run configuration.

use crate::metrics::MetricsConfig;
use chrono::NaiveDate;
use paperlab_core::engine::{EngineConfig, FillConfig};
use paperlab_core::error::EngineError;
use paperlab_core::strategy::{CrossSectional, MockStrategy, PairsMomentum, StrategyResolver};
use serde::{Deserialize, Serialize};

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

/// Everything needed to reproduce one backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Backtest start date (inclusive).
    pub start_date: NaiveDate,

    /// Backtest end date (inclusive).
    pub end_date: NaiveDate,

    pub initial_cash: f64,

    pub strategy: StrategyConfig,

    #[serde(default)]
    pub fill: FillConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Position accounting method. Only weighted-average is implemented;
    /// the field exists so configs state their assumption explicitly.
    #[serde(default = "default_average_cost_method")]
    pub average_cost_method: String,
}

fn default_average_cost_method() -> String {
    "weighted_average".to_owned()
}

/// Strategy selection (serializable enum).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Scripted resolver: each signal row maps straight to a target position.
    Mock,

    /// Long the top-N signals by confidence at equal weight.
    CrossSectional { top_n: usize, gross_exposure: f64 },

    /// Matched long/short legs grouped by pair id.
    PairsMomentum,
}

impl StrategyConfig {
    pub fn build(&self) -> Box<dyn StrategyResolver> {
        match *self {
            StrategyConfig::Mock => Box::new(MockStrategy),
            StrategyConfig::CrossSectional {
                top_n,
                gross_exposure,
            } => Box::new(CrossSectional::new(top_n, gross_exposure)),
            StrategyConfig::PairsMomentum => Box::new(PairsMomentum),
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Deterministic content hash. Two identical configs share a RunId, so
    /// artifact directories are stable across re-runs.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.average_cost_method != "weighted_average" {
            return Err(EngineError::Configuration(format!(
                "unsupported average_cost_method '{}' (only 'weighted_average' is implemented)",
                self.average_cost_method
            )));
        }
        self.engine_config().validate()
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            initial_cash: self.initial_cash,
            fill: self.fill,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paperlab_core::engine::FillPriceRule;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn base_config() -> RunConfig {
        RunConfig {
            start_date: d(1),
            end_date: d(31),
            initial_cash: 100_000.0,
            strategy: StrategyConfig::Mock,
            fill: FillConfig::default(),
            metrics: MetricsConfig::default(),
            average_cost_method: default_average_cost_method(),
        }
    }

    #[test]
    fn run_id_is_stable_and_content_sensitive() {
        let a = base_config();
        let b = base_config();
        assert_eq!(a.run_id(), b.run_id());

        let mut c = base_config();
        c.initial_cash = 200_000.0;
        assert_ne!(a.run_id(), c.run_id());
    }

    #[test]
    fn toml_round_trip() {
        let raw = r#"
            start_date = "2024-01-02"
            end_date = "2024-06-28"
            initial_cash = 250000.0

            [strategy]
            type = "cross_sectional"
            top_n = 5
            gross_exposure = 0.9

            [fill]
            slippage_bps = 5.0
            fee_per_share = 0.005
            fee_bps = 1.0
            fill_price_rule = "vwap_approx"

            [metrics]
            risk_free_rate = 0.02
            annualization_factor = 252.0
            rolling_window_sizes = [21, 63]
        "#;
        let config = RunConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.initial_cash, 250_000.0);
        assert_eq!(config.fill.fill_price_rule, FillPriceRule::VwapApprox);
        assert_eq!(config.metrics.rolling_window_sizes, vec![21, 63]);
        assert_eq!(config.average_cost_method, "weighted_average");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn fifo_accounting_rejected() {
        let mut config = base_config();
        config.average_cost_method = "fifo".to_owned();
        assert!(config.validate().is_err());
    }
}
