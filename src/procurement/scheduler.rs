//! Quarterly procurement scheduling.
//!
//! Runs the stop-loss rule once per fiscal window, in chronological order.
//! Windows are mutually independent and read disjoint slices of one immutable
//! series, so a data gap in any window fails the whole schedule rather than
//! silently dropping a quarter.

use crate::calendar::FiscalCalendar;
use crate::core::{PriceSeries, ProcurementSchedule, Result};
use crate::procurement::stop_loss::StopLossProcurer;

/// One stop-loss procurement decision per window of a fiscal calendar.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuarterlyScheduler {
    calendar: FiscalCalendar,
    procurer: StopLossProcurer,
}

impl QuarterlyScheduler {
    pub fn new(calendar: FiscalCalendar, spread: f64) -> Result<Self> {
        Ok(Self {
            calendar,
            procurer: StopLossProcurer::new(spread)?,
        })
    }

    pub fn calendar(&self) -> &FiscalCalendar {
        &self.calendar
    }

    pub fn spread(&self) -> f64 {
        self.procurer.spread()
    }

    /// Produces exactly one procurement result per calendar window.
    pub fn run(&self, series: &PriceSeries) -> Result<ProcurementSchedule> {
        let mut results = Vec::with_capacity(self.calendar.windows().len());
        for window in self.calendar.windows() {
            results.push(self.procurer.run(series, window)?);
        }
        ProcurementSchedule::from_results(results)
    }
}
