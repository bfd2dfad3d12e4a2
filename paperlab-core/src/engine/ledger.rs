//! Portfolio ledger — cash and position accounting.
//!
//! Mutated only by the session loop, exactly once per session, in session
//! order. Average-cost method is weighted average, applied consistently for
//! adds, reductions, and flips.

use crate::domain::{Bar, ClosedTrade, Fill, PortfolioSnapshot, Position, Symbol};
use crate::error::EngineError;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Quantities below this are treated as a closed position.
const QTY_EPSILON: f64 = 1e-9;

/// Outcome of applying one fill.
#[derive(Debug, Clone)]
pub struct ApplyResult {
    /// Realized P&L produced by this fill (zero for pure adds).
    pub realized_pnl: f64,
    /// The closed-position record, when this fill took quantity to zero or
    /// flipped direction.
    pub closed: Option<ClosedTrade>,
}

/// Current cash plus open positions.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub cash: f64,
    pub positions: BTreeMap<Symbol, Position>,
    /// Peak absolute quantity per open episode, reported on close.
    peak_quantity: BTreeMap<Symbol, f64>,
}

impl Ledger {
    pub fn new(initial_cash: f64) -> Self {
        Self {
            cash: initial_cash,
            positions: BTreeMap::new(),
            peak_quantity: BTreeMap::new(),
        }
    }

    /// Cash change this fill would cause (negative = cash out).
    pub fn cash_impact(fill: &Fill) -> f64 {
        -(fill.signed_quantity() * fill.price) - fill.fee - fill.slippage_cost
    }

    /// Apply a fill: move cash, update or create the position with
    /// weighted-average cost, realize P&L on any quantity that closes or
    /// flips an existing position.
    pub fn apply(&mut self, fill: &Fill) -> ApplyResult {
        self.cash += Self::cash_impact(fill);

        let fill_qty = fill.signed_quantity();
        let Some(pos) = self.positions.get_mut(&fill.symbol) else {
            self.positions.insert(
                fill.symbol.clone(),
                Position::new(fill.symbol.clone(), fill_qty, fill.price, fill.session_date),
            );
            self.peak_quantity.insert(fill.symbol.clone(), fill_qty.abs());
            return ApplyResult {
                realized_pnl: 0.0,
                closed: None,
            };
        };

        if pos.quantity * fill_qty >= 0.0 {
            // Same direction: weighted-average cost.
            let total_abs = pos.quantity.abs() + fill_qty.abs();
            pos.average_cost = (pos.quantity.abs() * pos.average_cost
                + fill_qty.abs() * fill.price)
                / total_abs;
            pos.quantity += fill_qty;
            let peak = self.peak_quantity.entry(fill.symbol.clone()).or_insert(0.0);
            *peak = peak.max(pos.quantity.abs());
            return ApplyResult {
                realized_pnl: 0.0,
                closed: None,
            };
        }

        // Opposite direction: average-cost realization on the closed slice.
        let closing_qty = fill_qty.abs().min(pos.quantity.abs());
        let realized = (fill.price - pos.average_cost) * closing_qty * pos.quantity.signum();
        pos.realized_pnl += realized;
        let remaining = pos.quantity + fill_qty;

        if remaining.abs() < QTY_EPSILON {
            // Fully closed.
            let closed = ClosedTrade {
                symbol: pos.symbol.clone(),
                opened: pos.opened,
                closed: fill.session_date,
                quantity: self.peak_quantity.remove(&fill.symbol).unwrap_or(closing_qty),
                realized_pnl: pos.realized_pnl,
            };
            self.positions.remove(&fill.symbol);
            ApplyResult {
                realized_pnl: realized,
                closed: Some(closed),
            }
        } else if remaining.signum() == pos.quantity.signum() {
            // Reduced, same side. Average cost unchanged.
            pos.quantity = remaining;
            ApplyResult {
                realized_pnl: realized,
                closed: None,
            }
        } else {
            // Flipped: old episode closes at its average cost, the excess
            // opens a fresh episode at the fill price.
            let closed = ClosedTrade {
                symbol: pos.symbol.clone(),
                opened: pos.opened,
                closed: fill.session_date,
                quantity: self
                    .peak_quantity
                    .insert(fill.symbol.clone(), remaining.abs())
                    .unwrap_or(closing_qty),
                realized_pnl: pos.realized_pnl,
            };
            *pos = Position::new(fill.symbol.clone(), remaining, fill.price, fill.session_date);
            ApplyResult {
                realized_pnl: realized,
                closed: Some(closed),
            }
        }
    }

    /// Revalue every open position at the session's close.
    ///
    /// A held instrument with no bar is a fatal error — silently dropping
    /// its contribution would corrupt the equity curve.
    pub fn mark_to_market(
        &self,
        session_date: NaiveDate,
        bars: &BTreeMap<&str, &Bar>,
    ) -> Result<f64, EngineError> {
        let mut equity = self.cash;
        for (symbol, pos) in &self.positions {
            let bar = bars
                .get(symbol.as_str())
                .ok_or_else(|| EngineError::MissingPrice {
                    symbol: symbol.clone(),
                    date: session_date,
                })?;
            equity += pos.market_value(bar.close);
        }
        Ok(equity)
    }

    /// Pure read: no mutation.
    pub fn snapshot(&self, session_date: NaiveDate, equity: f64) -> PortfolioSnapshot {
        PortfolioSnapshot {
            session_date,
            cash: self.cash,
            positions: self.positions.clone(),
            equity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderSide;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn fill(side: OrderSide, price: f64, quantity: f64, day: u32) -> Fill {
        Fill {
            symbol: "SPY".into(),
            session_date: d(day),
            side,
            price,
            quantity,
            fee: 0.0,
            slippage_cost: 0.0,
        }
    }

    fn bars_at(close: f64) -> Bar {
        Bar {
            symbol: "SPY".into(),
            session_date: d(2),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn buy_creates_long_position() {
        let mut ledger = Ledger::new(100_000.0);
        let result = ledger.apply(&fill(OrderSide::Buy, 100.0, 50.0, 2));
        assert_eq!(result.realized_pnl, 0.0);
        assert!(result.closed.is_none());
        assert_eq!(ledger.cash, 95_000.0);
        let pos = &ledger.positions["SPY"];
        assert_eq!(pos.quantity, 50.0);
        assert_eq!(pos.average_cost, 100.0);
    }

    #[test]
    fn buy_averages_into_existing_long() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.apply(&fill(OrderSide::Buy, 100.0, 50.0, 2));
        ledger.apply(&fill(OrderSide::Buy, 110.0, 50.0, 3));
        let pos = &ledger.positions["SPY"];
        assert_eq!(pos.quantity, 100.0);
        assert!((pos.average_cost - 105.0).abs() < 1e-10);
    }

    #[test]
    fn sell_closes_long_with_realized_pnl() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.apply(&fill(OrderSide::Buy, 100.0, 50.0, 2));
        let result = ledger.apply(&fill(OrderSide::Sell, 110.0, 50.0, 5));
        assert!((result.realized_pnl - 500.0).abs() < 1e-10);
        let closed = result.closed.expect("position closed");
        assert_eq!(closed.opened, d(2));
        assert_eq!(closed.closed, d(5));
        assert_eq!(closed.quantity, 50.0);
        assert!((closed.realized_pnl - 500.0).abs() < 1e-10);
        assert!(ledger.positions.is_empty());
        assert!((ledger.cash - 100_500.0).abs() < 1e-10);
    }

    #[test]
    fn partial_sell_keeps_average_cost() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.apply(&fill(OrderSide::Buy, 100.0, 100.0, 2));
        let result = ledger.apply(&fill(OrderSide::Sell, 110.0, 30.0, 3));
        assert!((result.realized_pnl - 300.0).abs() < 1e-10);
        assert!(result.closed.is_none());
        let pos = &ledger.positions["SPY"];
        assert_eq!(pos.quantity, 70.0);
        assert_eq!(pos.average_cost, 100.0);
    }

    #[test]
    fn sell_opens_short_and_cover_realizes() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.apply(&fill(OrderSide::Sell, 100.0, 50.0, 2));
        assert!((ledger.cash - 105_000.0).abs() < 1e-10);
        assert_eq!(ledger.positions["SPY"].quantity, -50.0);

        let result = ledger.apply(&fill(OrderSide::Buy, 90.0, 50.0, 3));
        // Short from 100 covered at 90: (90 - 100) * 50 * sign(-1) = +500
        assert!((result.realized_pnl - 500.0).abs() < 1e-10);
        assert!(result.closed.is_some());
        assert!((ledger.cash - 100_500.0).abs() < 1e-10);
    }

    #[test]
    fn flip_long_to_short_closes_episode() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.apply(&fill(OrderSide::Buy, 100.0, 50.0, 2));
        let result = ledger.apply(&fill(OrderSide::Sell, 110.0, 80.0, 4));
        // 50 closed at +10 each; 30 open short at 110.
        assert!((result.realized_pnl - 500.0).abs() < 1e-10);
        let closed = result.closed.expect("old episode closed");
        assert_eq!(closed.quantity, 50.0);
        let pos = &ledger.positions["SPY"];
        assert_eq!(pos.quantity, -30.0);
        assert_eq!(pos.average_cost, 110.0);
        assert_eq!(pos.opened, d(4));
        assert_eq!(pos.realized_pnl, 0.0);
    }

    #[test]
    fn fees_and_slippage_come_out_of_cash() {
        let mut ledger = Ledger::new(100_000.0);
        let mut f = fill(OrderSide::Buy, 100.0, 50.0, 2);
        f.fee = 5.0;
        f.slippage_cost = 2.0;
        ledger.apply(&f);
        assert!((ledger.cash - (100_000.0 - 5_007.0)).abs() < 1e-10);
    }

    #[test]
    fn accounting_identity_holds_after_each_apply() {
        let mut ledger = Ledger::new(100_000.0);
        let fills = [
            fill(OrderSide::Buy, 100.0, 50.0, 2),
            fill(OrderSide::Buy, 102.0, 25.0, 3),
            fill(OrderSide::Sell, 101.0, 60.0, 4),
            fill(OrderSide::Sell, 99.0, 40.0, 5),
        ];
        for f in &fills {
            ledger.apply(f);
            let bar = bars_at(f.price);
            let mut bars = BTreeMap::new();
            bars.insert("SPY", &bar);
            let equity = ledger.mark_to_market(d(2), &bars).unwrap();
            let recomputed = ledger.cash
                + ledger
                    .positions
                    .values()
                    .map(|p| p.market_value(f.price))
                    .sum::<f64>();
            assert!(
                (equity - recomputed).abs() <= 1e-6 * equity.abs().max(1.0),
                "identity violated: {equity} vs {recomputed}"
            );
        }
    }

    #[test]
    fn mark_to_market_requires_every_held_price() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.apply(&fill(OrderSide::Buy, 100.0, 50.0, 2));
        let err = ledger.mark_to_market(d(3), &BTreeMap::new()).unwrap_err();
        match err {
            EngineError::MissingPrice { symbol, date } => {
                assert_eq!(symbol, "SPY");
                assert_eq!(date, d(3));
            }
            other => panic!("expected missing price, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_is_a_pure_read() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.apply(&fill(OrderSide::Buy, 100.0, 10.0, 2));
        let before = ledger.clone();
        let snap = ledger.snapshot(d(2), 100_050.0);
        assert_eq!(snap.cash, before.cash);
        assert_eq!(ledger.cash, before.cash);
        assert_eq!(ledger.positions.len(), before.positions.len());
        assert_eq!(snap.positions["SPY"].quantity, 10.0);
    }

    #[test]
    fn peak_quantity_reported_on_close() {
        let mut ledger = Ledger::new(100_000.0);
        ledger.apply(&fill(OrderSide::Buy, 100.0, 50.0, 2));
        ledger.apply(&fill(OrderSide::Buy, 100.0, 50.0, 3));
        ledger.apply(&fill(OrderSide::Sell, 100.0, 60.0, 4));
        let result = ledger.apply(&fill(OrderSide::Sell, 100.0, 40.0, 5));
        let closed = result.closed.expect("closed");
        assert_eq!(closed.quantity, 100.0);
    }
}
