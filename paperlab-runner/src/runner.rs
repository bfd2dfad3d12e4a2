//! Backtest runner — wires together the clock, engine, and metrics.
//!
//! The runner owns everything the engine core deliberately excludes:
//! building the session axis from the data's own calendar, constructing the
//! strategy from configuration, and deriving metrics from the raw run
//! output. A run either completes atomically or fails: partial equity
//! curves are not a valid output state.

use chrono::NaiveDate;
use thiserror::Error;

use paperlab_core::calendar::{ExplicitCalendar, SessionClock};
use paperlab_core::data::MarketData;
use paperlab_core::engine::run_backtest;
use paperlab_core::error::EngineError;

use crate::config::RunConfig;
use crate::metrics::SummaryStats;
use crate::result::{BacktestResult, SCHEMA_VERSION};
use crate::rolling::RollingMetrics;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("no sessions in range {start}..={end}")]
    EmptyRange { start: NaiveDate, end: NaiveDate },
}

/// Run one backtest over pre-loaded data — no I/O.
///
/// The session axis is the data's own date axis restricted to the
/// configured range; days absent from the data are not sessions.
pub fn run_single(config: &RunConfig, data: &MarketData) -> Result<BacktestResult, RunError> {
    config.validate()?;

    let calendar = ExplicitCalendar::new(data.session_dates());
    let clock = SessionClock::new(config.start_date, config.end_date, &calendar)?;
    let sessions: Vec<NaiveDate> = clock.collect();
    if sessions.is_empty() {
        return Err(RunError::EmptyRange {
            start: config.start_date,
            end: config.end_date,
        });
    }

    let strategy = config.strategy.build();
    let run = run_backtest(&sessions, data, strategy.as_ref(), &config.engine_config())?;

    let equity: Vec<f64> = run.equity_curve.iter().map(|s| s.equity).collect();
    let stats = SummaryStats::compute(&equity, &run.closed_trades, &config.metrics);
    let rolling = RollingMetrics::compute(&equity, &config.metrics);

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        config: config.clone(),
        equity_curve: run.equity_curve,
        fills: run.fills,
        rejected_orders: run.rejected_orders,
        closed_trades: run.closed_trades,
        stats,
        rolling,
    })
}

/// Parse a TOML config and run it. Convenience entry point for callers
/// holding raw config text.
pub fn run_from_toml(raw: &str, data: &MarketData) -> Result<BacktestResult, RunError> {
    let config = RunConfig::from_toml_str(raw)?;
    run_single(&config, data)
}
