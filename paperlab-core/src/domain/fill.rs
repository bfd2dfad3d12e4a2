//! Fills and rejected orders — the two kinds of trade-ledger entry.

use crate::domain::order::OrderSide;
use crate::error::RejectReason;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An executed order. Immutable once created; appended to the trade ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    pub symbol: String,
    pub session_date: NaiveDate,
    pub side: OrderSide,
    pub price: f64,
    pub quantity: f64,
    pub fee: f64,
    pub slippage_cost: f64,
}

impl Fill {
    /// Signed quantity: positive for buys, negative for sells.
    pub fn signed_quantity(&self) -> f64 {
        self.side.sign() * self.quantity
    }

    /// Gross notional traded (unsigned).
    pub fn notional(&self) -> f64 {
        self.price * self.quantity
    }
}

/// A rejected order, recorded with its reason so the run stays auditable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedOrder {
    pub symbol: String,
    pub session_date: NaiveDate,
    pub side: OrderSide,
    pub quantity: f64,
    pub reason: RejectReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(side: OrderSide) -> Fill {
        Fill {
            symbol: "SPY".into(),
            session_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            side,
            price: 100.0,
            quantity: 10.0,
            fee: 0.5,
            slippage_cost: 0.1,
        }
    }

    #[test]
    fn signed_quantity_follows_side() {
        assert_eq!(fill(OrderSide::Buy).signed_quantity(), 10.0);
        assert_eq!(fill(OrderSide::Sell).signed_quantity(), -10.0);
    }

    #[test]
    fn notional_is_unsigned() {
        assert_eq!(fill(OrderSide::Sell).notional(), 1000.0);
    }
}
