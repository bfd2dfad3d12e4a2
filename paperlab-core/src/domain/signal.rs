//! Signal rows — the read-only output of the upstream analytics layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction the upstream signal wants to be positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalDirection {
    Long,
    Short,
    Flat,
}

/// How the signal expresses its intended size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TargetSize {
    /// Fraction of portfolio equity (0.25 = 25%).
    Weight(f64),
    /// Absolute quantity in shares/units.
    Quantity(f64),
}

/// One signal row per instrument per session, at most.
///
/// Produced upstream (feature/indicator pipeline) and consumed read-only by
/// the strategy-resolution step. `metadata` carries strategy-facing numeric
/// features; weight-sized strategies expect the upstream close under
/// `"ref_close"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalRow {
    pub symbol: String,
    pub session_date: NaiveDate,
    pub direction: SignalDirection,
    pub target: TargetSize,
    pub confidence: f64,
    pub metadata: BTreeMap<String, f64>,
}

impl SignalRow {
    /// Reference close supplied by the analytics layer, if present.
    pub fn ref_close(&self) -> Option<f64> {
        self.metadata.get("ref_close").copied().filter(|p| *p > 0.0)
    }
}
