//! Rolling metric series — trailing-window variants keyed by window length.
//!
//! Indices before the first full window are NaN; the series never
//! extrapolates from a partial window. All series are aligned to the equity
//! curve (one value per session).

use crate::metrics::{mean, population_std, session_returns, MetricsConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rolling series for one window length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingSeries {
    pub window: usize,
    pub sharpe: Vec<f64>,
    pub volatility: Vec<f64>,
}

/// All rolling output: per-window series plus the running drawdown, which
/// needs no window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingMetrics {
    /// Keyed by window length, one entry per configured size.
    pub by_window: BTreeMap<usize, RollingSeries>,
    /// Running drawdown against the all-time peak, one value per session.
    pub drawdown: Vec<f64>,
}

impl RollingMetrics {
    pub fn compute(equity_curve: &[f64], config: &MetricsConfig) -> Self {
        let mut by_window = BTreeMap::new();
        for &window in &config.rolling_window_sizes {
            if window == 0 {
                continue;
            }
            by_window.insert(
                window,
                RollingSeries {
                    window,
                    sharpe: rolling_sharpe(equity_curve, window, config),
                    volatility: rolling_volatility(equity_curve, window, config),
                },
            );
        }
        Self {
            by_window,
            drawdown: running_drawdown(equity_curve),
        }
    }
}

/// Trailing-window annualized volatility: population stdev of the last
/// `window` session returns × √annualization_factor.
pub fn rolling_volatility(equity_curve: &[f64], window: usize, config: &MetricsConfig) -> Vec<f64> {
    let returns = session_returns(equity_curve);
    let mut out = vec![f64::NAN; equity_curve.len()];
    for i in 0..equity_curve.len() {
        // session i has returns[..i] behind it
        if i >= window {
            let slice = &returns[i - window..i];
            out[i] = population_std(slice) * config.annualization_factor.sqrt();
        }
    }
    out
}

/// Trailing-window annualized Sharpe. NaN before warm-up and for
/// zero-variance windows.
pub fn rolling_sharpe(equity_curve: &[f64], window: usize, config: &MetricsConfig) -> Vec<f64> {
    let returns = session_returns(equity_curve);
    let per_session_rf = config.risk_free_rate / config.annualization_factor;
    let mut out = vec![f64::NAN; equity_curve.len()];
    for i in 0..equity_curve.len() {
        if i >= window {
            let excess: Vec<f64> = returns[i - window..i]
                .iter()
                .map(|r| r - per_session_rf)
                .collect();
            let std = population_std(&excess);
            if std >= 1e-15 {
                out[i] = (mean(&excess) / std) * config.annualization_factor.sqrt();
            }
        }
    }
    out
}

/// Running drawdown: equity / running peak - 1, or 0 while the peak is
/// non-positive.
pub fn running_drawdown(equity_curve: &[f64]) -> Vec<f64> {
    let mut peak = f64::MIN;
    equity_curve
        .iter()
        .map(|&eq| {
            if eq > peak {
                peak = eq;
            }
            if peak > 0.0 {
                eq / peak - 1.0
            } else {
                0.0
            }
        })
        .collect()
}
