//! Aligned market data — the engine's read-only input bundle.
//!
//! Bars and signal rows come pre-computed from the upstream data/analytics
//! layer. Construction validates the input contract and fails fast rather
//! than padding or dropping: a misaligned dataset would silently change the
//! simulated history.

use crate::domain::{Bar, SignalRow, Symbol};
use crate::error::EngineError;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Per-instrument bar series plus per-session signal rows, validated so
/// that every symbol shares the same session-date axis.
#[derive(Debug, Clone, Default)]
pub struct MarketData {
    bars: BTreeMap<Symbol, BTreeMap<NaiveDate, Bar>>,
    signals: BTreeMap<NaiveDate, Vec<SignalRow>>,
}

impl MarketData {
    /// Build and validate. Errors:
    /// - duplicate bar for a (symbol, session) pair
    /// - session-date sets that diverge across symbols
    /// - signal row dated off the bar axis
    /// - more than one signal row per (symbol, session) pair
    pub fn new(bars: Vec<Bar>, signals: Vec<SignalRow>) -> Result<Self, EngineError> {
        let mut by_symbol: BTreeMap<Symbol, BTreeMap<NaiveDate, Bar>> = BTreeMap::new();
        for bar in bars {
            let series = by_symbol.entry(bar.symbol.clone()).or_default();
            if series.insert(bar.session_date, bar.clone()).is_some() {
                return Err(EngineError::Alignment {
                    symbol: bar.symbol,
                    date: bar.session_date,
                    detail: "duplicate bar for session".into(),
                });
            }
        }

        // All symbols must share the first symbol's date axis exactly.
        if let Some((reference_symbol, reference)) = by_symbol.iter().next() {
            let axis: Vec<NaiveDate> = reference.keys().copied().collect();
            for (symbol, series) in by_symbol.iter().skip(1) {
                for date in series.keys() {
                    if !reference.contains_key(date) {
                        return Err(EngineError::Alignment {
                            symbol: symbol.clone(),
                            date: *date,
                            detail: format!("session not present for '{reference_symbol}'"),
                        });
                    }
                }
                for date in &axis {
                    if !series.contains_key(date) {
                        return Err(EngineError::Alignment {
                            symbol: symbol.clone(),
                            date: *date,
                            detail: "session missing for this instrument".into(),
                        });
                    }
                }
            }
        }

        let mut by_date: BTreeMap<NaiveDate, Vec<SignalRow>> = BTreeMap::new();
        for row in signals {
            // A signal dated off the bar axis could never execute; dropping
            // it silently would change the simulated history.
            let on_axis = by_symbol
                .values()
                .next()
                .is_some_and(|series| series.contains_key(&row.session_date));
            if !on_axis {
                return Err(EngineError::MissingBar {
                    symbol: row.symbol,
                    date: row.session_date,
                });
            }
            let rows = by_date.entry(row.session_date).or_default();
            if rows.iter().any(|r| r.symbol == row.symbol) {
                return Err(EngineError::Alignment {
                    symbol: row.symbol,
                    date: row.session_date,
                    detail: "more than one signal row for session".into(),
                });
            }
            rows.push(row);
        }
        // Deterministic resolution order within a session.
        for rows in by_date.values_mut() {
            rows.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        }

        Ok(Self {
            bars: by_symbol,
            signals: by_date,
        })
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.bars.keys().map(|s| s.as_str())
    }

    /// The common session-date axis (identical for every symbol).
    pub fn session_dates(&self) -> Vec<NaiveDate> {
        self.bars
            .values()
            .next()
            .map(|series| series.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn bar(&self, symbol: &str, date: NaiveDate) -> Option<&Bar> {
        self.bars.get(symbol).and_then(|series| series.get(&date))
    }

    /// All bars for one session, keyed by symbol.
    pub fn bars_for(&self, date: NaiveDate) -> BTreeMap<&str, &Bar> {
        self.bars
            .iter()
            .filter_map(|(symbol, series)| series.get(&date).map(|bar| (symbol.as_str(), bar)))
            .collect()
    }

    /// Signal rows for one session, sorted by symbol.
    pub fn signals_for(&self, date: NaiveDate) -> &[SignalRow] {
        self.signals.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }
}
