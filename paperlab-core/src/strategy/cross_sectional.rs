//! Cross-sectional resolver — long the highest-confidence names.

use crate::domain::{Order, OrderSide, PortfolioSnapshot, SignalDirection, SignalRow};
use crate::strategy::StrategyResolver;

/// Ranks the session's long signals by confidence and holds the top N at
/// equal weight, flattening anything held that fell out of the selection.
///
/// Ties in confidence break by symbol ascending so selection is
/// deterministic.
#[derive(Debug, Clone)]
pub struct CrossSectional {
    pub top_n: usize,
    /// Total fraction of equity spread across the selected names.
    pub gross_exposure: f64,
}

impl CrossSectional {
    pub fn new(top_n: usize, gross_exposure: f64) -> Self {
        Self {
            top_n,
            gross_exposure,
        }
    }
}

impl StrategyResolver for CrossSectional {
    fn resolve(&self, signals: &[SignalRow], snapshot: &PortfolioSnapshot) -> Vec<Order> {
        if self.top_n == 0 {
            return Vec::new();
        }

        let mut candidates: Vec<&SignalRow> = signals
            .iter()
            .filter(|row| row.direction == SignalDirection::Long && row.ref_close().is_some())
            .collect();
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        candidates.truncate(self.top_n);

        let per_name = self.gross_exposure / candidates.len().max(1) as f64;
        let mut orders = Vec::new();

        for row in &candidates {
            let Some(price) = row.ref_close() else {
                continue;
            };
            let desired = (per_name * snapshot.equity / price).floor().max(0.0);
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

        // Flatten holdings that are no longer selected.
        for (symbol, pos) in &snapshot.positions {
            if candidates.iter().any(|row| &row.symbol == symbol) {
                continue;
            }
            let Some(date) = signals.first().map(|r| r.session_date) else {
                continue;
            };
            let side = if pos.quantity > 0.0 {
                OrderSide::Sell
            } else {
                OrderSide::Buy
            };
            orders.push(Order::market(symbol.clone(), date, side, pos.quantity.abs()));
        }

        orders
    }

    fn name(&self) -> &str {
        "cross_sectional"
    }
}
