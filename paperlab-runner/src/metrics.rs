//! Performance metrics — pure functions over the equity curve and trades.
//!
//! Every metric is a pure function: equity series and/or closed trades in,
//! scalar out. Recomputable at any time from persisted artifacts. Undefined
//! values (zero variance, empty trade list, windows before warm-up) are
//! reported as NaN, never silently zero and never a divide-by-zero panic.
//! NaN serializes to JSON `null`.

use paperlab_core::domain::ClosedTrade;
use serde::{Deserialize, Serialize};

/// Metrics configuration, part of the run configuration surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub risk_free_rate: f64,
    #[serde(default = "default_annualization_factor")]
    pub annualization_factor: f64,
    #[serde(default = "default_rolling_window_sizes")]
    pub rolling_window_sizes: Vec<usize>,
}

fn default_annualization_factor() -> f64 {
    252.0
}

fn default_rolling_window_sizes() -> Vec<usize> {
    vec![63]
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            annualization_factor: default_annualization_factor(),
            rolling_window_sizes: default_rolling_window_sizes(),
        }
    }
}

/// Aggregate summary statistics for one completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub initial_equity: f64,
    pub final_equity: f64,
    pub total_return: f64,
    pub cagr: f64,
    pub annualized_volatility: f64,
    pub sharpe: f64,
    pub sortino: f64,
    pub max_drawdown: f64,
    /// Peak-to-trough duration of the deepest drawdown, in sessions.
    pub max_drawdown_sessions: usize,
    pub calmar: f64,
    pub hit_rate: f64,
    pub win_loss_ratio: f64,
    pub trade_count: usize,
}

impl SummaryStats {
    pub fn compute(equity_curve: &[f64], trades: &[ClosedTrade], config: &MetricsConfig) -> Self {
        let (dd, dd_sessions) = max_drawdown(equity_curve);
        Self {
            initial_equity: equity_curve.first().copied().unwrap_or(f64::NAN),
            final_equity: equity_curve.last().copied().unwrap_or(f64::NAN),
            total_return: total_return(equity_curve),
            cagr: cagr(equity_curve, config.annualization_factor),
            annualized_volatility: annualized_volatility(
                equity_curve,
                config.annualization_factor,
            ),
            sharpe: sharpe_ratio(equity_curve, config.risk_free_rate, config.annualization_factor),
            sortino: sortino_ratio(
                equity_curve,
                config.risk_free_rate,
                config.annualization_factor,
            ),
            max_drawdown: dd,
            max_drawdown_sessions: dd_sessions,
            calmar: calmar_ratio(equity_curve, config.annualization_factor),
            hit_rate: hit_rate(trades),
            win_loss_ratio: win_loss_ratio(trades),
            trade_count: trades.len(),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 || equity_curve[0] <= 0.0 {
        return f64::NAN;
    }
    (equity_curve[equity_curve.len() - 1] - equity_curve[0]) / equity_curve[0]
}

/// Compound annual growth rate, annualized by session count.
pub fn cagr(equity_curve: &[f64], annualization_factor: f64) -> f64 {
    if equity_curve.len() < 2 {
        return f64::NAN;
    }
    let initial = equity_curve[0];
    let last = equity_curve[equity_curve.len() - 1];
    if initial <= 0.0 || last <= 0.0 {
        return f64::NAN;
    }
    let years = equity_curve.len() as f64 / annualization_factor;
    (last / initial).powf(1.0 / years) - 1.0
}

/// Population standard deviation of session returns × √annualization_factor.
pub fn annualized_volatility(equity_curve: &[f64], annualization_factor: f64) -> f64 {
    let returns = session_returns(equity_curve);
    if returns.is_empty() {
        return f64::NAN;
    }
    population_std(&returns) * annualization_factor.sqrt()
}

/// Annualized Sharpe ratio from session returns.
///
/// NaN when the return series is empty or has zero variance.
pub fn sharpe_ratio(equity_curve: &[f64], risk_free_rate: f64, annualization_factor: f64) -> f64 {
    let returns = session_returns(equity_curve);
    if returns.is_empty() {
        return f64::NAN;
    }
    let per_session_rf = risk_free_rate / annualization_factor;
    let excess: Vec<f64> = returns.iter().map(|r| r - per_session_rf).collect();
    let std = population_std(&excess);
    if std < 1e-15 {
        return f64::NAN;
    }
    (mean(&excess) / std) * annualization_factor.sqrt()
}

/// Annualized Sortino ratio (downside deviation only).
///
/// NaN when there is no downside at all, matching the no-variance Sharpe
/// case rather than pretending infinite risk-adjusted return.
pub fn sortino_ratio(equity_curve: &[f64], risk_free_rate: f64, annualization_factor: f64) -> f64 {
    let returns = session_returns(equity_curve);
    if returns.is_empty() {
        return f64::NAN;
    }
    let per_session_rf = risk_free_rate / annualization_factor;
    let excess: Vec<f64> = returns.iter().map(|r| r - per_session_rf).collect();
    let downside_var = excess.iter().filter(|&&r| r < 0.0).map(|r| r * r).sum::<f64>()
        / excess.len() as f64;
    let downside_std = downside_var.sqrt();
    if downside_std < 1e-15 {
        return f64::NAN;
    }
    (mean(&excess) / downside_std) * annualization_factor.sqrt()
}

/// Maximum drawdown as a non-positive fraction, plus its peak-to-trough
/// duration in sessions.
///
/// Drawdown is (equity - peak) / peak against the running peak. Returns
/// (0.0, 0) for a monotonically non-decreasing curve.
pub fn max_drawdown(equity_curve: &[f64]) -> (f64, usize) {
    if equity_curve.len() < 2 {
        return (0.0, 0);
    }
    let mut peak = equity_curve[0];
    let mut peak_index = 0usize;
    let mut max_dd = 0.0_f64;
    let mut max_dd_sessions = 0usize;

    for (i, &eq) in equity_curve.iter().enumerate() {
        if eq > peak {
            peak = eq;
            peak_index = i;
        }
        if peak > 0.0 {
            let dd = (eq - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
                max_dd_sessions = i - peak_index;
            }
        }
    }
    (max_dd, max_dd_sessions)
}

/// Calmar ratio: CAGR / |max drawdown|. NaN when the drawdown is zero.
pub fn calmar_ratio(equity_curve: &[f64], annualization_factor: f64) -> f64 {
    let growth = cagr(equity_curve, annualization_factor);
    let (dd, _) = max_drawdown(equity_curve);
    if dd >= 0.0 {
        return f64::NAN;
    }
    growth / dd.abs()
}

/// Fraction of closed trades with positive realized P&L. NaN when the
/// trade list is empty.
pub fn hit_rate(trades: &[ClosedTrade]) -> f64 {
    if trades.is_empty() {
        return f64::NAN;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64
}

/// Average winning P&L over average losing P&L magnitude. NaN when either
/// side is empty.
pub fn win_loss_ratio(trades: &[ClosedTrade]) -> f64 {
    let wins: Vec<f64> = trades
        .iter()
        .filter(|t| t.realized_pnl > 0.0)
        .map(|t| t.realized_pnl)
        .collect();
    let losses: Vec<f64> = trades
        .iter()
        .filter(|t| t.realized_pnl < 0.0)
        .map(|t| t.realized_pnl.abs())
        .collect();
    if wins.is_empty() || losses.is_empty() {
        return f64::NAN;
    }
    mean(&wins) / mean(&losses)
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Session-over-session simple returns.
pub fn session_returns(equity_curve: &[f64]) -> Vec<f64> {
    if equity_curve.len() < 2 {
        return Vec::new();
    }
    equity_curve
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by N, not N-1).
pub(crate) fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}
