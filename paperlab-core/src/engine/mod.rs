//! Simulation engine — session loop, fill pricing, and the ledger.
//!
//! The engine consumes aligned market data and runs one pass over the
//! session axis. Each session:
//!
//! 1. Reveal the session's bars and signal rows
//! 2. Resolve signals into orders against the pre-trade snapshot
//! 3. Price and apply each order (or record its rejection)
//! 4. Mark to market and append the post-trade snapshot

pub mod fill_model;
pub mod ledger;
pub mod session_loop;

pub use fill_model::{fill, FillConfig, FillPriceRule};
pub use ledger::{ApplyResult, Ledger};
pub use session_loop::{run_backtest, EngineConfig, RunResult};
