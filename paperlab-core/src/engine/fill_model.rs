//! Fill model — pure order-to-fill pricing.
//!
//! Deterministic function of the order, the session's bar, and the
//! slippage/fee configuration. No side effects; the session loop applies
//! the result to the ledger.

use crate::domain::{Bar, Fill, Order, OrderSide};
use crate::error::RejectReason;
use serde::{Deserialize, Serialize};

/// Which bar price anchors the execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPriceRule {
    Close,
    Open,
    /// Typical price (high + low + close) / 3. Volume-aware: zero-volume
    /// bars cannot fill under this rule.
    VwapApprox,
}

/// Slippage and fee configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillConfig {
    /// Signed price degradation in basis points: buys pay up, sells
    /// receive less.
    pub slippage_bps: f64,
    /// Flat fee per share/unit.
    pub fee_per_share: f64,
    /// Fee as basis points of executed notional.
    pub fee_bps: f64,
    pub fill_price_rule: FillPriceRule,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            slippage_bps: 0.0,
            fee_per_share: 0.0,
            fee_bps: 0.0,
            fill_price_rule: FillPriceRule::Close,
        }
    }
}

/// Price an order against a bar. Fills the full requested quantity or
/// rejects; partial fills are a non-goal.
pub fn fill(order: &Order, bar: &Bar, config: &FillConfig) -> Result<Fill, RejectReason> {
    let reference = match config.fill_price_rule {
        FillPriceRule::Close => bar.close,
        FillPriceRule::Open => bar.open,
        FillPriceRule::VwapApprox => {
            if bar.volume == 0 {
                return Err(RejectReason::InsufficientLiquidity);
            }
            (bar.high + bar.low + bar.close) / 3.0
        }
    };

    let slip = reference * (config.slippage_bps / 10_000.0);
    let price = match order.side {
        OrderSide::Buy => reference + slip,
        OrderSide::Sell => reference - slip,
    };

    let notional = price * order.quantity;
    let fee = config.fee_per_share * order.quantity + notional * (config.fee_bps / 10_000.0);
    let slippage_cost = (price - reference).abs() * order.quantity;

    Ok(Fill {
        symbol: order.symbol.clone(),
        session_date: order.session_date,
        side: order.side,
        price,
        quantity: order.quantity,
        fee,
        slippage_cost,
    })
}
