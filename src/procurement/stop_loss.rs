//! Dynamic stop-loss procurement rule.
//!
//! Procurement triggers when the price exceeds the limit price
//! (lowest observed price + spread). The limit ratchets down with every new
//! low and never rises: dynamic downward, static upward. If no trigger occurs
//! before the window closes, procurement falls back to the window's end date.

use chrono::NaiveDate;

use crate::core::{
    PriceSeries, ProcurementError, ProcurementResult, ProcurementWindow, Result,
};

/// Outcome of observing one more day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopLossStep {
    /// Price stayed within the ceiling; no new low.
    Within,
    /// Price set a new low; the ceiling ratcheted down with it.
    Ratcheted,
    /// Price broke through the ceiling; procure at this observation.
    Triggered,
}

/// Running state of the stop-loss rule over one window.
///
/// `limit_price` is monotonically non-increasing across non-terminal steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopLossState {
    spread: f64,
    current_date: NaiveDate,
    current_price: f64,
    limit_price: f64,
}

impl StopLossState {
    /// Opens the window at its first observation.
    pub fn open(start_date: NaiveDate, start_price: f64, spread: f64) -> Self {
        Self {
            spread,
            current_date: start_date,
            current_price: start_price,
            limit_price: start_price + spread,
        }
    }

    /// Folds in the next day's price.
    ///
    /// A price equal to the limit counts as within the ceiling, and a price
    /// equal to the current low still ratchets; both comparisons are `<=`.
    pub fn observe(&mut self, date: NaiveDate, price: f64) -> StopLossStep {
        if price > self.limit_price {
            return StopLossStep::Triggered;
        }

        let step = if price <= self.current_price {
            self.current_price = price;
            self.limit_price = price + self.spread;
            StopLossStep::Ratcheted
        } else {
            StopLossStep::Within
        };
        self.current_date = date;
        step
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    /// Lowest price observed so far.
    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Procurement ceiling.
    pub fn limit_price(&self) -> f64 {
        self.limit_price
    }
}

/// Runs the stop-loss rule over a procurement window of a price series.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StopLossProcurer {
    spread: f64,
}

impl StopLossProcurer {
    /// `spread` is the fixed currency offset above the running low that forms
    /// the procurement ceiling.
    pub fn new(spread: f64) -> Result<Self> {
        if !spread.is_finite() || spread < 0.0 {
            return Err(ProcurementError::InvalidInput(format!(
                "spread must be finite and >= 0 (got {spread})"
            )));
        }
        Ok(Self { spread })
    }

    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Walks the window one calendar day at a time and returns the
    /// procurement decision.
    ///
    /// Every date in `[window.start, window.end]` must be present in the
    /// series; the first missing date fails the run with
    /// [`ProcurementError::DataGap`].
    pub fn run(
        &self,
        series: &PriceSeries,
        window: &ProcurementWindow,
    ) -> Result<ProcurementResult> {
        let start_price = self.price_on(series, window, window.start)?;
        let mut state = StopLossState::open(window.start, start_price, self.spread);

        while state.current_date() < window.end {
            let next_date = state.current_date().succ_opt().ok_or_else(|| {
                ProcurementError::InvalidInput(format!(
                    "window {} extends beyond the supported date range",
                    window.quarter
                ))
            })?;
            let next_price = self.price_on(series, window, next_date)?;

            if state.observe(next_date, next_price) == StopLossStep::Triggered {
                return Ok(ProcurementResult {
                    quarter: window.quarter,
                    procurement_date: next_date,
                    procurement_price: next_price,
                });
            }
        }

        // No trigger before the window closed: procure at the window end.
        let end_price = self.price_on(series, window, window.end)?;
        Ok(ProcurementResult {
            quarter: window.quarter,
            procurement_date: window.end,
            procurement_price: end_price,
        })
    }

    fn price_on(
        &self,
        series: &PriceSeries,
        window: &ProcurementWindow,
        date: NaiveDate,
    ) -> Result<f64> {
        series.price_on(date).ok_or(ProcurementError::DataGap {
            quarter: window.quarter,
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QuarterId;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn window(start: NaiveDate, end: NaiveDate) -> ProcurementWindow {
        ProcurementWindow::new(QuarterId::Q1, start, end).unwrap()
    }

    #[test]
    fn ratchet_then_trigger_scenario() {
        // Start 100 -> limit 103; 98 ratchets the limit to 101; 105 > 101
        // triggers on day three.
        let start = d(2024, 1, 1);
        let series = PriceSeries::from_daily(start, &[100.0, 98.0, 105.0]).unwrap();
        let procurer = StopLossProcurer::new(3.0).unwrap();

        let result = procurer.run(&series, &window(start, d(2024, 1, 3))).unwrap();
        assert_eq!(result.procurement_date, d(2024, 1, 3));
        assert_eq!(result.procurement_price, 105.0);
    }

    #[test]
    fn flat_series_falls_back_to_window_end() {
        let start = d(2024, 1, 1);
        let prices = vec![75.0; 31];
        let series = PriceSeries::from_daily(start, &prices).unwrap();
        let procurer = StopLossProcurer::new(5.0).unwrap();

        let result = procurer.run(&series, &window(start, d(2024, 1, 31))).unwrap();
        assert_eq!(result.procurement_date, d(2024, 1, 31));
        assert_eq!(result.procurement_price, 75.0);
    }

    #[test]
    fn price_equal_to_limit_does_not_trigger() {
        // 103 == limit stays within the ceiling, so the run falls through to
        // the window end.
        let start = d(2024, 1, 1);
        let series = PriceSeries::from_daily(start, &[100.0, 103.0, 103.0]).unwrap();
        let procurer = StopLossProcurer::new(3.0).unwrap();

        let result = procurer.run(&series, &window(start, d(2024, 1, 3))).unwrap();
        assert_eq!(result.procurement_date, d(2024, 1, 3));
        assert_eq!(result.procurement_price, 103.0);
    }

    #[test]
    fn price_equal_to_current_low_still_ratchets() {
        let mut state = StopLossState::open(d(2024, 1, 1), 100.0, 3.0);
        assert_eq!(state.observe(d(2024, 1, 2), 100.0), StopLossStep::Ratcheted);
        assert_eq!(state.limit_price(), 103.0);
        assert_eq!(state.observe(d(2024, 1, 3), 104.0), StopLossStep::Triggered);
    }

    #[test]
    fn limit_price_never_increases_between_steps() {
        let start = d(2024, 1, 1);
        let prices = [100.0, 97.0, 99.0, 95.0, 96.0, 94.0, 98.0];
        let mut state = StopLossState::open(start, prices[0], 4.0);

        let mut previous_limit = state.limit_price();
        for (i, &price) in prices.iter().enumerate().skip(1) {
            let date = d(2024, 1, 1 + i as u32);
            if state.observe(date, price) == StopLossStep::Triggered {
                break;
            }
            assert!(
                state.limit_price() <= previous_limit,
                "limit rose from {previous_limit} to {}",
                state.limit_price()
            );
            previous_limit = state.limit_price();
        }
    }

    #[test]
    fn missing_date_inside_window_is_a_data_gap() {
        let observations = vec![
            (d(2024, 1, 1), 100.0),
            (d(2024, 1, 2), 99.0),
            // Jan 3 missing.
            (d(2024, 1, 4), 101.0),
            (d(2024, 1, 5), 102.0),
        ];
        let series = PriceSeries::from_observations(observations).unwrap();
        let procurer = StopLossProcurer::new(10.0).unwrap();

        let err = procurer
            .run(&series, &window(d(2024, 1, 1), d(2024, 1, 5)))
            .unwrap_err();
        assert_eq!(
            err,
            ProcurementError::DataGap {
                quarter: QuarterId::Q1,
                date: d(2024, 1, 3),
            }
        );
    }

    #[test]
    fn window_outside_series_coverage_is_a_data_gap() {
        let series = PriceSeries::from_daily(d(2024, 1, 1), &[100.0, 101.0]).unwrap();
        let procurer = StopLossProcurer::new(2.0).unwrap();

        let err = procurer
            .run(&series, &window(d(2024, 2, 1), d(2024, 2, 5)))
            .unwrap_err();
        assert!(matches!(err, ProcurementError::DataGap { .. }));
    }

    #[test]
    fn single_day_window_procures_on_that_day() {
        let start = d(2024, 1, 1);
        let series = PriceSeries::from_daily(start, &[88.5]).unwrap();
        let procurer = StopLossProcurer::new(3.0).unwrap();

        let result = procurer.run(&series, &window(start, start)).unwrap();
        assert_eq!(result.procurement_date, start);
        assert_eq!(result.procurement_price, 88.5);
    }

    #[test]
    fn negative_or_non_finite_spread_is_rejected() {
        assert!(StopLossProcurer::new(-1.0).is_err());
        assert!(StopLossProcurer::new(f64::NAN).is_err());
        assert!(StopLossProcurer::new(0.0).is_ok());
    }
}
