//! Error taxonomy for the engine.
//!
//! Two tiers:
//! - `EngineError`: data-integrity errors that abort the whole run. Any
//!   recovery would silently alter the simulated history, so there is none.
//! - `RejectReason`: per-order conditions. The order is recorded as rejected
//!   and the run continues. No retries anywhere — retrying a deterministic
//!   simulation step against identical inputs is meaningless.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal errors: abort the run before or during session processing.
///
/// Every variant names the session date and the offending identifier so the
/// caller can trace the failure back to the upstream data stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid session range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("session-date sets diverge across instruments: '{symbol}' at {date} ({detail})")]
    Alignment {
        symbol: String,
        date: NaiveDate,
        detail: String,
    },

    #[error("signal references '{symbol}' but no bar exists for session {date}")]
    MissingBar { symbol: String, date: NaiveDate },

    #[error("held position in '{symbol}' has no bar to mark against for session {date}")]
    MissingPrice { symbol: String, date: NaiveDate },

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Per-order rejection reasons. Recorded in the run's rejected-order log;
/// the rest of the session proceeds normally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Error)]
pub enum RejectReason {
    #[error("insufficient funds: order requires {required:.2}, cash available {available:.2}")]
    InsufficientFunds { required: f64, available: f64 },

    #[error("insufficient liquidity: zero-volume bar under a volume-aware fill rule")]
    InsufficientLiquidity,
}
