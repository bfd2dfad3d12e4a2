//! Domain types for the paper-execution engine.

pub mod bar;
pub mod fill;
pub mod order;
pub mod position;
pub mod signal;
pub mod snapshot;

pub use bar::Bar;
pub use fill::{Fill, RejectedOrder};
pub use order::{Order, OrderSide, OrderType};
pub use position::Position;
pub use signal::{SignalDirection, SignalRow, TargetSize};
pub use snapshot::{ClosedTrade, PortfolioSnapshot};

/// Symbol type alias.
pub type Symbol = String;
