//! Flat average-price cost benchmark.
//!
//! Compares procuring the full annual volume at the series' mean price
//! against procuring it through the quarterly stop-loss schedule, splitting
//! the volume evenly across scheduled quarters.

use crate::core::{PriceSeries, ProcurementError, ProcurementSchedule, Result};

/// Reference annual volume (units/year).
pub const DEFAULT_ANNUAL_VOLUME: f64 = 534_000.0;

/// Cost comparison between the flat-average benchmark and the stop-loss
/// schedule.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SavingsReport {
    /// Mean price over the full series.
    pub average_price: f64,
    /// Volume-weighted mean of the quarterly procurement prices.
    pub average_procurement_price: f64,
    /// Cost of buying the annual volume at the flat average price.
    pub total_average_cost: f64,
    /// Cost of buying the annual volume through the schedule.
    pub total_procurement_cost: f64,
    /// `total_average_cost - total_procurement_cost`; positive when the
    /// stop-loss schedule beats the benchmark.
    pub savings: f64,
}

/// Evaluates procurement schedules against the flat-average benchmark for a
/// fixed annual volume.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SavingsEvaluator {
    annual_volume: f64,
}

impl Default for SavingsEvaluator {
    fn default() -> Self {
        Self {
            annual_volume: DEFAULT_ANNUAL_VOLUME,
        }
    }
}

impl SavingsEvaluator {
    pub fn new(annual_volume: f64) -> Result<Self> {
        if !annual_volume.is_finite() || annual_volume <= 0.0 {
            return Err(ProcurementError::InvalidInput(format!(
                "annual volume must be finite and > 0 (got {annual_volume})"
            )));
        }
        Ok(Self { annual_volume })
    }

    pub fn annual_volume(&self) -> f64 {
        self.annual_volume
    }

    /// Computes the cost comparison for one series and its schedule.
    ///
    /// The annual volume is split evenly across the scheduled quarters
    /// (annual_volume / 4 for a standard calendar year).
    pub fn evaluate(
        &self,
        series: &PriceSeries,
        schedule: &ProcurementSchedule,
    ) -> Result<SavingsReport> {
        if schedule.is_empty() {
            return Err(ProcurementError::InvalidInput(
                "procurement schedule is empty".to_string(),
            ));
        }

        let average_price = series.mean_price();
        let total_average_cost = average_price * self.annual_volume;

        let quarter_volume = self.annual_volume / schedule.len() as f64;
        let total_procurement_cost: f64 = schedule
            .iter()
            .map(|result| quarter_volume * result.procurement_price)
            .sum();
        let average_procurement_price = total_procurement_cost / self.annual_volume;

        Ok(SavingsReport {
            average_price,
            average_procurement_price,
            total_average_cost,
            total_procurement_cost,
            savings: total_average_cost - total_procurement_cost,
        })
    }
}
