//! Stopwatt models electricity procurement timing under a dynamic stop-loss
//! rule and benchmarks its economics against flat average-price purchasing.
//!
//! The crate combines a discrete-time geometric Brownian motion simulator for
//! daily price paths, the stop-loss procurement state machine with its
//! quarterly scheduler, and savings analytics that aggregate Monte Carlo
//! trials into expected savings and confidence bands.
//!
//! The procurement rule: buy as soon as the price exceeds the limit price,
//! defined as the lowest price observed so far plus a fixed spread. The limit
//! ratchets down with every new low and never rises. If a quarter closes
//! without a trigger, procurement falls back to the quarter's last day.
//!
//! Numerical considerations:
//! - Simulation is deterministic given a seed; Monte Carlo statistics are
//!   sampling-driven and tighten with the trial count.
//! - Confidence bands use the normal approximation
//!   `z * std / sqrt(n)` per simulated day.
//! - A calendar gap inside a procurement window is a hard error, never a
//!   silently dropped quarter.
//!
//! # Feature Flags
//! - `parallel`: enables Rayon-powered parallel Monte Carlo trial evaluation.
//!
//! # Quick Start
//! Run one procurement window against a handcrafted series:
//! ```rust
//! use chrono::NaiveDate;
//! use stopwatt::core::{PriceSeries, ProcurementWindow, QuarterId};
//! use stopwatt::procurement::StopLossProcurer;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let series = PriceSeries::from_daily(start, &[100.0, 98.0, 105.0]).unwrap();
//! let window =
//!     ProcurementWindow::new(QuarterId::Q1, start, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap())
//!         .unwrap();
//!
//! let result = StopLossProcurer::new(3.0).unwrap().run(&series, &window).unwrap();
//! assert_eq!(result.procurement_price, 105.0);
//! ```
//!
//! Schedule a simulated year and benchmark the savings:
//! ```rust
//! use chrono::NaiveDate;
//! use stopwatt::calendar::FiscalCalendar;
//! use stopwatt::eval::SavingsEvaluator;
//! use stopwatt::procurement::QuarterlyScheduler;
//! use stopwatt::sim::Gbm;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let series = Gbm::new(0.0002, 0.015)
//!     .unwrap()
//!     .simulate_path(85.0, start, 366, 42)
//!     .unwrap();
//!
//! let calendar = FiscalCalendar::calendar_year(2024).unwrap();
//! let schedule = QuarterlyScheduler::new(calendar, 4.0).unwrap().run(&series).unwrap();
//! assert_eq!(schedule.len(), 4);
//!
//! let report = SavingsEvaluator::default().evaluate(&series, &schedule).unwrap();
//! assert!(report.total_average_cost > 0.0);
//! ```
//!
//! Estimate the probability that the strategy beats the benchmark:
//! ```rust
//! use chrono::NaiveDate;
//! use stopwatt::calendar::FiscalCalendar;
//! use stopwatt::eval::{expected_savings, SavingsEvaluator};
//! use stopwatt::procurement::QuarterlyScheduler;
//! use stopwatt::sim::Gbm;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let batch = Gbm::new(0.0003, 0.02)
//!     .unwrap()
//!     .simulate_batch(85.0, start, 366, 100, 7)
//!     .unwrap();
//!
//! let scheduler =
//!     QuarterlyScheduler::new(FiscalCalendar::calendar_year(2024).unwrap(), 4.0).unwrap();
//! let outcome = expected_savings(&batch, &scheduler, &SavingsEvaluator::default()).unwrap();
//! let p = outcome.probability_of_savings();
//! assert!((0.0..=1.0).contains(&p));
//! ```

pub mod calendar;
pub mod core;
pub mod eval;
pub mod procurement;
pub mod sim;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::calendar::FiscalCalendar;
    pub use crate::core::*;
    pub use crate::eval::{expected_savings, MonteCarloSavings, SavingsEvaluator, SavingsReport};
    pub use crate::procurement::{QuarterlyScheduler, StopLossProcurer};
    pub use crate::sim::{confidence_interval, ConfidenceBands, Gbm};
}
