//! Parameter sweep utilities for grid and random search.
//!
//! Each run in a sweep is independent: it owns its own ledger and shares
//! nothing mutable with any other run, so runs parallelize freely across
//! threads. Cancellation is cooperative and checked only at run boundaries;
//! a run that has started always completes.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use paperlab_core::data::MarketData;

use crate::config::{RunConfig, StrategyConfig};
use crate::result::BacktestResult;
use crate::runner::{run_single, RunError};

/// Parameter grid specification.
#[derive(Debug, Clone)]
pub struct ParamGrid {
    pub slippage_bps: Vec<f64>,
    pub fee_bps: Vec<f64>,
    pub initial_cash: Vec<f64>,
    pub strategies: Vec<StrategyConfig>,
}

impl ParamGrid {
    /// Total number of configurations in this grid.
    pub fn size(&self) -> usize {
        self.slippage_bps.len()
            * self.fee_bps.len()
            * self.initial_cash.len()
            * self.strategies.len()
    }

    /// Generate every configuration in the grid, varying the base config
    /// one axis at a time. Deterministic order.
    pub fn generate_configs(&self, base: &RunConfig) -> Vec<RunConfig> {
        let mut configs = Vec::with_capacity(self.size());
        for &slippage in &self.slippage_bps {
            for &fee in &self.fee_bps {
                for &cash in &self.initial_cash {
                    for strategy in &self.strategies {
                        let mut config = base.clone();
                        config.fill.slippage_bps = slippage;
                        config.fill.fee_bps = fee;
                        config.initial_cash = cash;
                        config.strategy = strategy.clone();
                        configs.push(config);
                    }
                }
            }
        }
        configs
    }

    /// Sample `count` configurations without replacement, seeded so the
    /// same seed always picks the same subset.
    pub fn sample_configs(&self, base: &RunConfig, count: usize, seed: u64) -> Vec<RunConfig> {
        let mut configs = self.generate_configs(base);
        let mut rng = StdRng::seed_from_u64(seed);
        configs.shuffle(&mut rng);
        configs.truncate(count);
        configs
    }
}

/// Outcome of a sweep: completed results plus whether cancellation cut the
/// sweep short.
#[derive(Debug)]
pub struct SweepResults {
    results: Vec<BacktestResult>,
    by_run_id: HashMap<String, usize>,
    pub cancelled: bool,
}

impl SweepResults {
    fn new(results: Vec<BacktestResult>, cancelled: bool) -> Self {
        let by_run_id = results
            .iter()
            .enumerate()
            .map(|(i, r)| (r.run_id.clone(), i))
            .collect();
        Self {
            results,
            by_run_id,
            cancelled,
        }
    }

    pub fn all(&self) -> &[BacktestResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, run_id: &str) -> Option<&BacktestResult> {
        self.by_run_id.get(run_id).map(|&i| &self.results[i])
    }

    /// Results sorted by Sharpe, best first. Undefined Sharpe sorts last.
    pub fn sorted_by_sharpe(&self) -> Vec<&BacktestResult> {
        let mut sorted: Vec<_> = self.results.iter().collect();
        sorted.sort_by(|a, b| {
            let key = |r: &BacktestResult| {
                if r.stats.sharpe.is_nan() {
                    f64::NEG_INFINITY
                } else {
                    r.stats.sharpe
                }
            };
            key(b).partial_cmp(&key(a)).unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted
    }

    pub fn best(&self) -> Option<&BacktestResult> {
        self.sorted_by_sharpe().into_iter().next()
    }
}

/// Run every configuration against the same read-only data, in parallel.
///
/// The cancellation flag is consulted once per run, before it starts; runs
/// already in flight complete. A fatal error in any run fails the whole
/// sweep.
pub fn sweep(
    configs: &[RunConfig],
    data: &MarketData,
    cancel: &AtomicBool,
) -> Result<SweepResults, RunError> {
    let outcomes: Vec<Option<BacktestResult>> = configs
        .par_iter()
        .map(|config| {
            if cancel.load(Ordering::Relaxed) {
                return Ok(None);
            }
            run_single(config, data).map(Some)
        })
        .collect::<Result<Vec<_>, RunError>>()?;

    let cancelled = outcomes.iter().any(Option::is_none);
    let results = outcomes.into_iter().flatten().collect();
    Ok(SweepResults::new(results, cancelled))
}
