//! PaperLab Core — daily-bar simulation engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, signals, orders, fills, positions, snapshots)
//! - Session clock over a pluggable trading calendar
//! - Aligned market-data bundle with fail-fast validation
//! - Deterministic fill model (slippage + fees, no partial fills)
//! - Weighted-average-cost ledger with signed-quantity positions
//! - Single-pass session loop with a pre-trade/post-trade snapshot contract
//!
//! No I/O lives here. Loading data, computing metrics, sweeping parameters,
//! and writing artifacts all belong to the runner crate.

pub mod calendar;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod strategy;
