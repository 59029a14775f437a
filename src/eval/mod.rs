//! Cost benchmarking of procurement schedules and Monte Carlo savings
//! aggregation.

pub mod monte_carlo;
pub mod savings;

pub use monte_carlo::{expected_savings, MonteCarloSavings};
pub use savings::{SavingsEvaluator, SavingsReport, DEFAULT_ANNUAL_VOLUME};
