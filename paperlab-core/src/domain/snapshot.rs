//! Portfolio snapshots and closed-trade records.

use crate::domain::position::Position;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// End-of-session portfolio state. One per session, appended to the equity
/// curve, never mutated after creation.
///
/// Positions are keyed in a BTreeMap so serialized output is byte-identical
/// across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub session_date: NaiveDate,
    pub cash: f64,
    pub positions: BTreeMap<String, Position>,
    pub equity: f64,
}

impl PortfolioSnapshot {
    /// Snapshot of an all-cash portfolio (used by strategies before the
    /// first session).
    pub fn all_cash(session_date: NaiveDate, cash: f64) -> Self {
        Self {
            session_date,
            cash,
            positions: BTreeMap::new(),
            equity: cash,
        }
    }
}

/// One fully-closed position episode: open date through the fill that took
/// quantity back to zero. Input to hit-rate and win/loss metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub symbol: String,
    pub opened: NaiveDate,
    pub closed: NaiveDate,
    /// Peak absolute quantity over the episode.
    pub quantity: f64,
    pub realized_pnl: f64,
}

impl ClosedTrade {
    pub fn is_winner(&self) -> bool {
        self.realized_pnl > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_cash_snapshot_balances() {
        let snap =
            PortfolioSnapshot::all_cash(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 100_000.0);
        assert_eq!(snap.cash, snap.equity);
        assert!(snap.positions.is_empty());
    }

    #[test]
    fn winner_classification() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let trade = ClosedTrade {
            symbol: "SPY".into(),
            opened: date,
            closed: date,
            quantity: 10.0,
            realized_pnl: 50.0,
        };
        assert!(trade.is_winner());
    }
}
