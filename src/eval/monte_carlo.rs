//! Monte Carlo aggregation of stop-loss savings.
//!
//! Each trial schedules one simulated path and benchmarks it; trials are
//! fully independent, so the loop parallelizes across the batch when the
//! `parallel` feature is enabled.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{PriceSeries, Result, SimulationBatch};
use crate::eval::savings::SavingsEvaluator;
use crate::procurement::QuarterlyScheduler;

/// Aggregate savings statistics across a simulation batch.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MonteCarloSavings {
    /// Mean savings across all trials.
    pub mean_savings: f64,
    /// Trials where the stop-loss schedule beat the flat-average benchmark.
    pub positive_trials: usize,
    /// Total trial count.
    pub trials: usize,
}

impl MonteCarloSavings {
    /// Empirical probability that the stop-loss strategy beats the benchmark.
    pub fn probability_of_savings(&self) -> f64 {
        self.positive_trials as f64 / self.trials as f64
    }
}

/// Runs scheduler and evaluator over every path of the batch and aggregates
/// the savings distribution. Any failing trial (e.g. a data gap) fails the
/// whole aggregation.
pub fn expected_savings(
    batch: &SimulationBatch,
    scheduler: &QuarterlyScheduler,
    evaluator: &SavingsEvaluator,
) -> Result<MonteCarloSavings> {
    let run_trial = |series: &PriceSeries| -> Result<f64> {
        let schedule = scheduler.run(series)?;
        Ok(evaluator.evaluate(series, &schedule)?.savings)
    };

    #[cfg(feature = "parallel")]
    let savings: Vec<f64> = batch.paths().par_iter().map(run_trial).collect::<Result<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let savings: Vec<f64> = batch.paths().iter().map(run_trial).collect::<Result<_>>()?;

    let trials = savings.len();
    let mean_savings = savings.iter().sum::<f64>() / trials as f64;
    let positive_trials = savings.iter().filter(|&&s| s > 0.0).count();

    Ok(MonteCarloSavings {
        mean_savings,
        positive_trials,
        trials,
    })
}
