//! Monte Carlo price-path simulation and its statistical reductions.

pub mod gbm;
pub mod stats;

pub use gbm::Gbm;
pub use stats::{confidence_interval, two_sided_z, ConfidenceBands, DEFAULT_CONFIDENCE_LEVEL};
