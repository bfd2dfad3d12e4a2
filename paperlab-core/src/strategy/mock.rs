//! Mock resolver — maps each signal row straight to a target position.

use crate::domain::{Order, OrderSide, PortfolioSnapshot, SignalDirection, SignalRow};
use crate::strategy::{target_quantity, StrategyResolver};

/// Scripted resolver for tests and deterministic fixtures.
///
/// Each row becomes a target position: `Long` holds +target, `Short` holds
/// -target, `Flat` holds zero. The emitted order is the delta between the
/// target and the currently held quantity.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockStrategy;

impl StrategyResolver for MockStrategy {
    fn resolve(&self, signals: &[SignalRow], snapshot: &PortfolioSnapshot) -> Vec<Order> {
        let mut orders = Vec::new();
        for row in signals {
            let Some(quantity) = target_quantity(row, snapshot.equity) else {
                continue;
            };
            let desired = match row.direction {
                SignalDirection::Long => quantity,
                SignalDirection::Short => -quantity,
                SignalDirection::Flat => 0.0,
            };
            let held = snapshot
                .positions
                .get(&row.symbol)
                .map(|p| p.quantity)
                .unwrap_or(0.0);
            let delta = desired - held;
            if delta.abs() < 1e-9 {
                continue;
            }
            let side = if delta > 0.0 {
                OrderSide::Buy
            } else {
                OrderSide::Sell
            };
            orders.push(Order::market(
                row.symbol.clone(),
                row.session_date,
                side,
                delta.abs(),
            ));
        }
        orders
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Position, TargetSize};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn row(symbol: &str, direction: SignalDirection, quantity: f64) -> SignalRow {
        SignalRow {
            symbol: symbol.into(),
            session_date: d(),
            direction,
            target: TargetSize::Quantity(quantity),
            confidence: 1.0,
            metadata: BTreeMap::new(),
        }
    }

    #[test]
    fn long_signal_buys_to_target() {
        let snap = PortfolioSnapshot::all_cash(d(), 100_000.0);
        let orders = MockStrategy.resolve(&[row("SPY", SignalDirection::Long, 10.0)], &snap);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].side, OrderSide::Buy);
        assert_eq!(orders[0].quantity, 10.0);
    }

    #[test]
    fn flat_signal_closes_position() {
        let mut snap = PortfolioSnapshot::all_cash(d(), 100_000.0);
        snap.positions
            .insert("SPY".into(), Position::new("SPY", 10.0, 100.0, d()));
        let orders = MockStrategy.resolve(&[row("SPY", SignalDirection::Flat, 0.0)], &snap);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].side, OrderSide::Sell);
        assert_eq!(orders[0].quantity, 10.0);
    }

    #[test]
    fn already_at_target_emits_nothing() {
        let mut snap = PortfolioSnapshot::all_cash(d(), 100_000.0);
        snap.positions
            .insert("SPY".into(), Position::new("SPY", 10.0, 100.0, d()));
        let orders = MockStrategy.resolve(&[row("SPY", SignalDirection::Long, 10.0)], &snap);
        assert!(orders.is_empty());
    }

    #[test]
    fn short_signal_sells_through_zero() {
        let mut snap = PortfolioSnapshot::all_cash(d(), 100_000.0);
        snap.positions
            .insert("SPY".into(), Position::new("SPY", 10.0, 100.0, d()));
        let orders = MockStrategy.resolve(&[row("SPY", SignalDirection::Short, 5.0)], &snap);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].side, OrderSide::Sell);
        assert_eq!(orders[0].quantity, 15.0);
    }
}
