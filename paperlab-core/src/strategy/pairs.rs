//! Pairs-momentum resolver — matched long/short legs per pair.

use crate::domain::{Order, OrderSide, PortfolioSnapshot, SignalDirection, SignalRow};
use crate::strategy::{target_quantity, StrategyResolver};
use std::collections::BTreeMap;

/// Trades signal rows in matched pairs. Rows carry a `pair_id` in their
/// metadata; a pair is actionable only when it has exactly one long leg
/// and one short leg for the session. Incomplete pairs are ignored,
/// and a flat row closes whatever is held in that symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct PairsMomentum;

impl PairsMomentum {
    fn delta_order(
        symbol: &str,
        row: &SignalRow,
        desired: f64,
        snapshot: &PortfolioSnapshot,
    ) -> Option<Order> {
        let held = snapshot
            .positions
            .get(symbol)
            .map(|p| p.quantity)
            .unwrap_or(0.0);
        let delta = desired - held;
        if delta.abs() < 1e-9 {
            return None;
        }
        let side = if delta > 0.0 {
            OrderSide::Buy
        } else {
            OrderSide::Sell
        };
        Some(Order::market(
            symbol.to_owned(),
            row.session_date,
            side,
            delta.abs(),
        ))
    }
}

impl StrategyResolver for PairsMomentum {
    fn resolve(&self, signals: &[SignalRow], snapshot: &PortfolioSnapshot) -> Vec<Order> {
        let mut pairs: BTreeMap<i64, Vec<&SignalRow>> = BTreeMap::new();
        let mut orders = Vec::new();

        for row in signals {
            match row.direction {
                SignalDirection::Flat => {
                    if let Some(pos) = snapshot.positions.get(&row.symbol) {
                        let side = if pos.quantity > 0.0 {
                            OrderSide::Sell
                        } else {
                            OrderSide::Buy
                        };
                        orders.push(Order::market(
                            row.symbol.clone(),
                            row.session_date,
                            side,
                            pos.quantity.abs(),
                        ));
                    }
                }
                SignalDirection::Long | SignalDirection::Short => {
                    if let Some(id) = row.metadata.get("pair_id") {
                        pairs.entry(*id as i64).or_default().push(row);
                    }
                }
            }
        }

        for legs in pairs.values() {
            let long = legs
                .iter()
                .find(|r| r.direction == SignalDirection::Long);
            let short = legs
                .iter()
                .find(|r| r.direction == SignalDirection::Short);
            let (Some(long), Some(short)) = (long, short) else {
                continue;
            };
            if legs.len() != 2 {
                continue;
            }
            let (Some(long_qty), Some(short_qty)) = (
                target_quantity(long, snapshot.equity),
                target_quantity(short, snapshot.equity),
            ) else {
                continue;
            };
            if let Some(order) = Self::delta_order(&long.symbol, long, long_qty, snapshot) {
                orders.push(order);
            }
            if let Some(order) = Self::delta_order(&short.symbol, short, -short_qty, snapshot) {
                orders.push(order);
            }
        }

        orders
    }

    fn name(&self) -> &str {
        "pairs_momentum"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Position, TargetSize};
    use chrono::NaiveDate;

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn leg(symbol: &str, direction: SignalDirection, pair_id: f64, price: f64) -> SignalRow {
        let mut metadata = BTreeMap::new();
        metadata.insert("pair_id".into(), pair_id);
        metadata.insert("ref_close".into(), price);
        SignalRow {
            symbol: symbol.into(),
            session_date: d(),
            direction,
            target: TargetSize::Weight(0.5),
            confidence: 1.0,
            metadata,
        }
    }

    #[test]
    fn complete_pair_opens_both_legs() {
        let snap = PortfolioSnapshot::all_cash(d(), 100_000.0);
        let signals = vec![
            leg("AAA", SignalDirection::Long, 1.0, 100.0),
            leg("BBB", SignalDirection::Short, 1.0, 50.0),
        ];
        let orders = PairsMomentum.resolve(&signals, &snap);
        assert_eq!(orders.len(), 2);
        let long = orders.iter().find(|o| o.symbol == "AAA").unwrap();
        assert_eq!(long.side, OrderSide::Buy);
        assert_eq!(long.quantity, 500.0);
        let short = orders.iter().find(|o| o.symbol == "BBB").unwrap();
        assert_eq!(short.side, OrderSide::Sell);
        assert_eq!(short.quantity, 1000.0);
    }

    #[test]
    fn incomplete_pair_is_ignored() {
        let snap = PortfolioSnapshot::all_cash(d(), 100_000.0);
        let signals = vec![leg("AAA", SignalDirection::Long, 1.0, 100.0)];
        assert!(PairsMomentum.resolve(&signals, &snap).is_empty());
    }

    #[test]
    fn flat_row_closes_short_leg() {
        let mut snap = PortfolioSnapshot::all_cash(d(), 100_000.0);
        snap.positions
            .insert("BBB".into(), Position::new("BBB", -200.0, 50.0, d()));
        let mut row = leg("BBB", SignalDirection::Flat, 1.0, 50.0);
        row.metadata.clear();
        let orders = PairsMomentum.resolve(&[row], &snap);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].side, OrderSide::Buy);
        assert_eq!(orders[0].quantity, 200.0);
    }
}
