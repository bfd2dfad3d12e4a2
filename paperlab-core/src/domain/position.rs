//! Position — signed quantity with weighted-average cost.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Open position in one instrument. Quantity is signed: positive long,
/// negative short. Owned exclusively by the ledger; removed when quantity
/// returns to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub average_cost: f64,
    /// Realized P&L accumulated over this position episode.
    pub realized_pnl: f64,
    /// Session the episode opened.
    pub opened: NaiveDate,
}

impl Position {
    pub fn new(symbol: impl Into<String>, quantity: f64, average_cost: f64, opened: NaiveDate) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            average_cost,
            realized_pnl: 0.0,
            opened,
        }
    }

    pub fn is_long(&self) -> bool {
        self.quantity > 0.0
    }

    pub fn is_short(&self) -> bool {
        self.quantity < 0.0
    }

    /// Signed market value at a price.
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity * price
    }

    /// Unrealized P&L at a price.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity * (price - self.average_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    #[test]
    fn long_position_values() {
        let pos = Position::new("SPY", 10.0, 100.0, date());
        assert!(pos.is_long());
        assert_eq!(pos.market_value(105.0), 1050.0);
        assert_eq!(pos.unrealized_pnl(105.0), 50.0);
    }

    #[test]
    fn short_position_values() {
        let pos = Position::new("SPY", -10.0, 100.0, date());
        assert!(pos.is_short());
        assert_eq!(pos.market_value(95.0), -950.0);
        // Short gains when price falls: -10 * (95 - 100) = +50
        assert_eq!(pos.unrealized_pnl(95.0), 50.0);
    }
}
