//! Cross-sectional statistics over a simulation batch.
//!
//! These are pure reductions over an immutable [`SimulationBatch`]; they do
//! not care how the batch was produced. The per-day confidence band uses the
//! classical normal approximation: half-width
//! `z(confidence) * std / sqrt(n)` with the two-sided standard-normal
//! quantile.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::core::{ProcurementError, Result, SimulationBatch};

/// Default two-sided confidence level.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Per-day confidence band around the cross-sectional mean price.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConfidenceBands {
    pub lower: Vec<f64>,
    pub mean: Vec<f64>,
    pub upper: Vec<f64>,
}

impl ConfidenceBands {
    /// Number of days covered by the band.
    pub fn days(&self) -> usize {
        self.mean.len()
    }
}

/// Two-sided standard-normal quantile for a confidence level in (0, 1),
/// e.g. ~1.96 for 95%.
pub fn two_sided_z(confidence_level: f64) -> Result<f64> {
    if !confidence_level.is_finite() || confidence_level <= 0.0 || confidence_level >= 1.0 {
        return Err(ProcurementError::InvalidInput(format!(
            "confidence level must lie in (0, 1) (got {confidence_level})"
        )));
    }
    let standard_normal = Normal::new(0.0, 1.0).expect("unit normal parameters are valid");
    Ok(standard_normal.inverse_cdf(0.5 + confidence_level / 2.0))
}

/// Per-day cross-sectional mean and confidence band across a batch.
///
/// Each returned vector has one entry per simulated day. The band collapses
/// onto the mean for a single-path batch or zero cross-sectional variance.
pub fn confidence_interval(
    batch: &SimulationBatch,
    confidence_level: f64,
) -> Result<ConfidenceBands> {
    let z = two_sided_z(confidence_level)?;

    let days = batch.days();
    let n = batch.len() as f64;

    // Two passes: means first, then squared deviations from them. The
    // single-pass sum-of-squares form cancels catastrophically when the
    // cross-sectional spread is tiny relative to the price level.
    let mut mean = vec![0.0_f64; days];
    for path in batch.iter() {
        for (day, price) in path.prices().enumerate() {
            mean[day] += price;
        }
    }
    for m in &mut mean {
        *m /= n;
    }

    let mut sq_dev = vec![0.0_f64; days];
    for path in batch.iter() {
        for (day, price) in path.prices().enumerate() {
            let dev = price - mean[day];
            sq_dev[day] += dev * dev;
        }
    }

    let mut lower = Vec::with_capacity(days);
    let mut upper = Vec::with_capacity(days);
    for day in 0..days {
        // Sample variance; a one-path batch has no cross-sectional spread.
        let var = if n > 1.0 { sq_dev[day] / (n - 1.0) } else { 0.0 };
        let half_width = z * var.sqrt() / n.sqrt();

        lower.push(mean[day] - half_width);
        upper.push(mean[day] + half_width);
    }

    Ok(ConfidenceBands { lower, mean, upper })
}
