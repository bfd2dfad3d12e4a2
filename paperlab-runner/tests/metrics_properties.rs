//! Property tests for metrics over generated run output.

use chrono::NaiveDate;
use paperlab_core::data::MarketData;
use paperlab_core::domain::{Bar, SignalDirection, SignalRow, TargetSize};
use paperlab_core::engine::FillConfig;
use paperlab_runner::metrics::max_drawdown;
use paperlab_runner::{run_single, MetricsConfig, RunConfig, StrategyConfig};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn d(day0: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(day0 as i64)
}

fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        (10.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0),
        5..40,
    )
}

/// Long-only plan: alternating long/flat signals at seeded sessions.
fn derive_plan(sessions: usize, seed: u64) -> Vec<(usize, SignalDirection, f64)> {
    let mut plan = Vec::new();
    let mut state = seed | 1;
    let mut long = true;
    for day in 0..sessions {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        if state % 3 == 0 {
            let direction = if long {
                SignalDirection::Long
            } else {
                SignalDirection::Flat
            };
            let qty = ((state >> 16) % 50 + 1) as f64;
            plan.push((day, direction, qty));
            long = !long;
        }
    }
    plan
}

fn make_data(closes: &[f64], plan: &[(usize, SignalDirection, f64)]) -> MarketData {
    let bars: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            symbol: "SPY".into(),
            session_date: d(i),
            open: close,
            high: close + 1.0,
            low: (close - 1.0).max(0.01),
            close,
            volume: 1_000_000,
        })
        .collect();
    let signals: Vec<SignalRow> = plan
        .iter()
        .map(|&(day, direction, qty)| SignalRow {
            symbol: "SPY".into(),
            session_date: d(day),
            direction,
            target: TargetSize::Quantity(qty),
            confidence: 1.0,
            metadata: BTreeMap::new(),
        })
        .collect();
    MarketData::new(bars, signals).unwrap()
}

fn config(sessions: usize) -> RunConfig {
    RunConfig {
        start_date: d(0),
        end_date: d(sessions - 1),
        initial_cash: 1_000_000.0,
        strategy: StrategyConfig::Mock,
        fill: FillConfig::default(),
        metrics: MetricsConfig::default(),
        average_cost_method: "weighted_average".to_owned(),
    }
}

proptest! {
    /// For any long-only run, equity stays non-negative, so the maximum
    /// drawdown is bounded: never positive, never below a total loss.
    #[test]
    fn max_drawdown_is_bounded(
        closes in arb_closes(),
        plan_seed in any::<u64>(),
    ) {
        let plan = derive_plan(closes.len(), plan_seed);
        let data = make_data(&closes, &plan);
        let result = run_single(&config(closes.len()), &data).unwrap();

        let equity = result.equity_values();
        for &value in &equity {
            prop_assert!(value >= 0.0, "long-only equity went negative: {value}");
        }

        let (drawdown, sessions_under_water) = max_drawdown(&equity);
        prop_assert!(drawdown <= 0.0, "drawdown positive: {drawdown}");
        prop_assert!(drawdown >= -1.0, "drawdown below total loss: {drawdown}");
        prop_assert!(sessions_under_water < equity.len());
        prop_assert_eq!(result.stats.max_drawdown, drawdown);
    }
}
