//! Crate-wide error and result types surfaced by the simulation, procurement,
//! and evaluation APIs.

use chrono::NaiveDate;

use crate::core::types::QuarterId;

/// Errors surfaced by the public API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcurementError {
    /// Input validation error.
    InvalidInput(String),
    /// A calendar date required by a procurement window is absent from the
    /// price series. Surfaced explicitly because silently skipping the window
    /// would leave the schedule incomplete.
    DataGap {
        /// Window in which the gap was encountered.
        quarter: QuarterId,
        /// First missing calendar date.
        date: NaiveDate,
    },
}

impl std::fmt::Display for ProcurementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::DataGap { quarter, date } => {
                write!(f, "data gap: {date} missing from series in {quarter}")
            }
        }
    }
}

impl std::error::Error for ProcurementError {}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, ProcurementError>;
