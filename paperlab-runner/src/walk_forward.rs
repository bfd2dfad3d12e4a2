//! Walk-forward evaluation — expanding in-sample windows with disjoint
//! out-of-sample windows.
//!
//! The session axis is split into folds: each fold's in-sample (IS) window
//! expands from the start of the data, and its out-of-sample (OOS) window is
//! the next fixed-size chunk. OOS windows never overlap, and every fold runs
//! as an independent backtest with its own ledger. The degradation ratio
//! (mean OOS Sharpe / mean IS Sharpe) flags configurations that only worked
//! in sample.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use chrono::NaiveDate;
use paperlab_core::data::MarketData;

use crate::config::RunConfig;
use crate::runner::{run_single, RunError};

// ─── Configuration ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkForwardConfig {
    /// Number of folds (default 5).
    pub n_folds: usize,
    /// Minimum in-sample sessions for the first fold (default 252).
    pub min_is_sessions: usize,
    /// Minimum out-of-sample sessions per fold (default 63).
    pub min_oos_sessions: usize,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self {
            n_folds: 5,
            min_is_sessions: 252,
            min_oos_sessions: 63,
        }
    }
}

// ─── Result types ────────────────────────────────────────────────────

/// One fold's window boundaries, as indices into the session axis.
/// IS is `[0, is_end)`, OOS is `[is_end, oos_end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldSpec {
    pub fold_index: usize,
    pub is_end: usize,
    pub oos_end: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldResult {
    pub fold_index: usize,
    pub is_sharpe: f64,
    pub oos_sharpe: f64,
    pub is_trades: usize,
    pub oos_trades: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkForwardResult {
    pub folds: Vec<FoldResult>,
    pub mean_is_sharpe: f64,
    pub mean_oos_sharpe: f64,
    /// Mean OOS Sharpe / mean IS Sharpe. None when the IS side is
    /// non-positive or undefined, where a ratio would mislead.
    pub degradation_ratio: Option<f64>,
}

#[derive(Debug, Error)]
pub enum WalkForwardError {
    #[error("insufficient data: {sessions} sessions cannot fit {n_folds} folds of at least {min_oos_sessions} OOS sessions after {min_is_sessions} IS sessions")]
    InsufficientData {
        sessions: usize,
        n_folds: usize,
        min_is_sessions: usize,
        min_oos_sessions: usize,
    },
    #[error("backtest error on fold {fold}: {source}")]
    BacktestFailed {
        fold: usize,
        #[source]
        source: RunError,
    },
}

// ─── Fold creation ───────────────────────────────────────────────────

/// Split `sessions` session indices into expanding-IS folds with equal,
/// disjoint OOS chunks.
pub fn create_folds(
    sessions: usize,
    config: &WalkForwardConfig,
) -> Result<Vec<FoldSpec>, WalkForwardError> {
    let insufficient = || WalkForwardError::InsufficientData {
        sessions,
        n_folds: config.n_folds,
        min_is_sessions: config.min_is_sessions,
        min_oos_sessions: config.min_oos_sessions,
    };

    if config.n_folds == 0 || config.min_is_sessions == 0 || sessions <= config.min_is_sessions {
        return Err(insufficient());
    }
    let oos_size = (sessions - config.min_is_sessions) / config.n_folds;
    if oos_size < config.min_oos_sessions.max(1) {
        return Err(insufficient());
    }

    let folds = (0..config.n_folds)
        .map(|fold_index| {
            let is_end = config.min_is_sessions + fold_index * oos_size;
            FoldSpec {
                fold_index,
                is_end,
                oos_end: is_end + oos_size,
            }
        })
        .collect();
    Ok(folds)
}

// ─── Evaluation ──────────────────────────────────────────────────────

/// Run the configuration over every fold's IS and OOS window.
///
/// The base config's date range is ignored; each fold derives its own
/// range from the data's session axis.
pub fn run_walk_forward(
    base: &RunConfig,
    data: &MarketData,
    config: &WalkForwardConfig,
) -> Result<WalkForwardResult, WalkForwardError> {
    let axis = data.session_dates();
    let folds = create_folds(axis.len(), config)?;

    let mut results = Vec::with_capacity(folds.len());
    for spec in &folds {
        let is_run = run_window(base, data, &axis[..spec.is_end], spec.fold_index)?;
        let oos_run = run_window(base, data, &axis[spec.is_end..spec.oos_end], spec.fold_index)?;
        results.push(FoldResult {
            fold_index: spec.fold_index,
            is_sharpe: is_run.0,
            oos_sharpe: oos_run.0,
            is_trades: is_run.1,
            oos_trades: oos_run.1,
        });
    }

    let mean_is_sharpe = finite_mean(results.iter().map(|f| f.is_sharpe));
    let mean_oos_sharpe = finite_mean(results.iter().map(|f| f.oos_sharpe));
    let degradation_ratio = if mean_is_sharpe.is_finite() && mean_is_sharpe > 0.0 {
        Some(mean_oos_sharpe / mean_is_sharpe)
    } else {
        None
    };

    Ok(WalkForwardResult {
        folds: results,
        mean_is_sharpe,
        mean_oos_sharpe,
        degradation_ratio,
    })
}

fn run_window(
    base: &RunConfig,
    data: &MarketData,
    window: &[NaiveDate],
    fold: usize,
) -> Result<(f64, usize), WalkForwardError> {
    let mut config = base.clone();
    config.start_date = window[0];
    config.end_date = window[window.len() - 1];
    let result =
        run_single(&config, data).map_err(|source| WalkForwardError::BacktestFailed {
            fold,
            source,
        })?;
    Ok((result.stats.sharpe, result.closed_trades.len()))
}

/// Mean over the finite values; NaN when every value is undefined.
fn finite_mean(values: impl Iterator<Item = f64>) -> f64 {
    let finite: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return f64::NAN;
    }
    finite.iter().sum::<f64>() / finite.len() as f64
}
