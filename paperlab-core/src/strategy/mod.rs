//! Strategy resolution — the engine's one polymorphism point.
//!
//! A resolver translates the session's signal rows into target orders given
//! read-only portfolio state. It never sees bars, so look-ahead is
//! impossible by construction. Implementations must be deterministic given
//! identical inputs.

mod cross_sectional;
mod mock;
mod pairs;

pub use cross_sectional::CrossSectional;
pub use mock::MockStrategy;
pub use pairs::PairsMomentum;

use crate::domain::{Order, PortfolioSnapshot, SignalRow, TargetSize};

/// Translates signal rows into orders for the current session.
pub trait StrategyResolver: Send + Sync {
    fn resolve(&self, signals: &[SignalRow], snapshot: &PortfolioSnapshot) -> Vec<Order>;

    fn name(&self) -> &str;
}

/// Desired absolute quantity for a signal's target, or None when a
/// weight-sized signal lacks its reference close.
///
/// Weight sizing floors to whole units; quantity targets pass through.
pub(crate) fn target_quantity(row: &SignalRow, equity: f64) -> Option<f64> {
    match row.target {
        TargetSize::Quantity(q) => Some(q),
        TargetSize::Weight(w) => {
            let price = row.ref_close()?;
            Some((w * equity / price).floor().max(0.0))
        }
    }
}
