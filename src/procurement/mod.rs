//! Stop-loss procurement rule and its quarterly scheduling.

pub mod scheduler;
pub mod stop_loss;

pub use scheduler::QuarterlyScheduler;
pub use stop_loss::{StopLossProcurer, StopLossState, StopLossStep};
