//! Session loop — the single-pass simulation driver.
//!
//! Each trading session: reveal the session's bars and signals, resolve
//! signals into orders against the pre-trade portfolio, price and apply each
//! order, then mark to market and snapshot. Signals resolved on session T
//! execute on session T; nothing from T+1 is visible.

use crate::data::MarketData;
use crate::domain::{ClosedTrade, Fill, PortfolioSnapshot, RejectedOrder};
use crate::engine::fill_model::{self, FillConfig};
use crate::engine::ledger::Ledger;
use crate::error::{EngineError, RejectReason};
use crate::strategy::StrategyResolver;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_cash: f64,
    #[serde(default)]
    pub fill: FillConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_cash: 100_000.0,
            fill: FillConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.initial_cash > 0.0) {
            return Err(EngineError::Configuration(format!(
                "initial_cash must be positive, got {}",
                self.initial_cash
            )));
        }
        if self.fill.slippage_bps < 0.0 {
            return Err(EngineError::Configuration(format!(
                "slippage_bps must be non-negative, got {}",
                self.fill.slippage_bps
            )));
        }
        if self.fill.fee_per_share < 0.0 || self.fill.fee_bps < 0.0 {
            return Err(EngineError::Configuration(
                "fees must be non-negative".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Everything a completed run produced, in session order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// One post-trade snapshot per session.
    pub equity_curve: Vec<PortfolioSnapshot>,
    pub fills: Vec<Fill>,
    pub rejected_orders: Vec<RejectedOrder>,
    pub closed_trades: Vec<ClosedTrade>,
}

impl RunResult {
    pub fn session_count(&self) -> usize {
        self.equity_curve.len()
    }

    pub fn final_equity(&self) -> Option<f64> {
        self.equity_curve.last().map(|s| s.equity)
    }
}

/// Run one backtest over the given sessions.
///
/// Fatal data-integrity errors abort the run; per-order rejects are
/// recorded in the result and the run continues. Orders are applied in
/// symbol order within a session so equal inputs always produce equal
/// output.
pub fn run_backtest(
    sessions: &[NaiveDate],
    data: &MarketData,
    strategy: &dyn StrategyResolver,
    config: &EngineConfig,
) -> Result<RunResult, EngineError> {
    config.validate()?;

    let mut ledger = Ledger::new(config.initial_cash);
    let mut result = RunResult {
        equity_curve: Vec::with_capacity(sessions.len()),
        fills: Vec::new(),
        rejected_orders: Vec::new(),
        closed_trades: Vec::new(),
    };

    for &date in sessions {
        let bars = data.bars_for(date);
        let signals = data.signals_for(date);

        for row in signals {
            if !bars.contains_key(row.symbol.as_str()) {
                return Err(EngineError::MissingBar {
                    symbol: row.symbol.clone(),
                    date,
                });
            }
        }

        let pre_trade_equity = ledger.mark_to_market(date, &bars)?;
        let snapshot = ledger.snapshot(date, pre_trade_equity);
        let mut orders = strategy.resolve(signals, &snapshot);
        orders.retain(|o| o.quantity > 1e-9);
        orders.sort_by(|a, b| a.symbol.cmp(&b.symbol));

        for order in &orders {
            let Some(bar) = bars.get(order.symbol.as_str()) else {
                return Err(EngineError::MissingBar {
                    symbol: order.symbol.clone(),
                    date,
                });
            };

            let fill = match fill_model::fill(order, bar, &config.fill) {
                Ok(fill) => fill,
                Err(reason) => {
                    result.rejected_orders.push(RejectedOrder {
                        symbol: order.symbol.clone(),
                        session_date: date,
                        side: order.side,
                        quantity: order.quantity,
                        reason,
                    });
                    continue;
                }
            };

            let impact = Ledger::cash_impact(&fill);
            if ledger.cash + impact < -1e-9 {
                result.rejected_orders.push(RejectedOrder {
                    symbol: order.symbol.clone(),
                    session_date: date,
                    side: order.side,
                    quantity: order.quantity,
                    reason: RejectReason::InsufficientFunds {
                        required: -impact,
                        available: ledger.cash,
                    },
                });
                continue;
            }

            let applied = ledger.apply(&fill);
            result.fills.push(fill);
            if let Some(closed) = applied.closed {
                result.closed_trades.push(closed);
            }
        }

        let equity = ledger.mark_to_market(date, &bars)?;
        result.equity_curve.push(ledger.snapshot(date, equity));
    }

    Ok(result)
}
