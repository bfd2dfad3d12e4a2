//! Orders — created by strategy resolution, consumed once by the fill model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// +1 for buys, -1 for sells.
    pub fn sign(&self) -> f64 {
        match self {
            OrderSide::Buy => 1.0,
            OrderSide::Sell => -1.0,
        }
    }
}

/// Order type. Daily-bar simulation fills everything at a bar reference
/// price, so market orders are the only type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Market,
}

/// An intended trade for one session. Not persisted past the fill (or
/// rejection) it produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub symbol: String,
    pub session_date: NaiveDate,
    pub side: OrderSide,
    pub quantity: f64,
    pub order_type: OrderType,
}

impl Order {
    pub fn market(symbol: impl Into<String>, session_date: NaiveDate, side: OrderSide, quantity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            session_date,
            side,
            quantity,
            order_type: OrderType::Market,
        }
    }
}
