//! Discrete-time geometric Brownian motion for daily price paths.
//!
//! Daily log-returns are i.i.d. `Normal(trend, volatility)` and the price is
//! the exponentiated cumulative sum of those returns, so every simulated
//! price stays strictly positive. Batch generation draws `count` paths from
//! one seeded stream and is distributionally identical to `count` single-path
//! simulations.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::core::{PriceSeries, ProcurementError, Result, SimulationBatch};

/// Geometric Brownian motion parameters for daily log-returns.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Gbm {
    /// Mean daily log-return (drift).
    pub trend: f64,
    /// Standard deviation of the daily log-return. Zero gives the
    /// deterministic drift path.
    pub volatility: f64,
}

impl Gbm {
    pub fn new(trend: f64, volatility: f64) -> Result<Self> {
        let model = Self { trend, volatility };
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.trend.is_finite() {
            return Err(ProcurementError::InvalidInput(format!(
                "trend must be finite (got {})",
                self.trend
            )));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(ProcurementError::InvalidInput(format!(
                "volatility must be finite and >= 0 (got {})",
                self.volatility
            )));
        }
        Ok(())
    }

    /// Simulates one daily path of length `days` starting at `start_date`,
    /// with `price[0] == initial_price`.
    pub fn simulate_path(
        &self,
        initial_price: f64,
        start_date: NaiveDate,
        days: usize,
        seed: u64,
    ) -> Result<PriceSeries> {
        self.validate()?;
        validate_horizon(initial_price, days)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let returns = self.daily_return_distribution()?;
        let prices = sample_prices(initial_price, days, &returns, &mut rng);
        PriceSeries::from_daily(start_date, &prices)
    }

    /// Simulates `count` independent paths sharing `start_date`, `days`, and
    /// these model parameters.
    pub fn simulate_batch(
        &self,
        initial_price: f64,
        start_date: NaiveDate,
        days: usize,
        count: usize,
        seed: u64,
    ) -> Result<SimulationBatch> {
        self.validate()?;
        validate_horizon(initial_price, days)?;
        if count == 0 {
            return Err(ProcurementError::InvalidInput(
                "simulation count must be >= 1".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let returns = self.daily_return_distribution()?;

        let mut paths = Vec::with_capacity(count);
        for _ in 0..count {
            let prices = sample_prices(initial_price, days, &returns, &mut rng);
            paths.push(PriceSeries::from_daily(start_date, &prices)?);
        }
        SimulationBatch::new(paths)
    }

    fn daily_return_distribution(&self) -> Result<Normal<f64>> {
        Normal::new(self.trend, self.volatility)
            .map_err(|e| ProcurementError::InvalidInput(e.to_string()))
    }
}

fn validate_horizon(initial_price: f64, days: usize) -> Result<()> {
    if !initial_price.is_finite() || initial_price <= 0.0 {
        return Err(ProcurementError::InvalidInput(format!(
            "initial_price must be finite and > 0 (got {initial_price})"
        )));
    }
    if days == 0 {
        return Err(ProcurementError::InvalidInput(
            "days must be >= 1".to_string(),
        ));
    }
    Ok(())
}

fn sample_prices(
    initial_price: f64,
    days: usize,
    returns: &Normal<f64>,
    rng: &mut StdRng,
) -> Vec<f64> {
    let mut prices = Vec::with_capacity(days);
    prices.push(initial_price);

    let mut cumulative_log_return = 0.0_f64;
    for _ in 1..days {
        let r: f64 = returns.sample(rng);
        cumulative_log_return += r;
        prices.push(initial_price * cumulative_log_return.exp());
    }
    prices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn path_has_requested_length_and_positive_prices() {
        let model = Gbm::new(0.001, 0.02).unwrap();
        let path = model.simulate_path(100.0, start(), 365, 42).unwrap();
        assert_eq!(path.len(), 365);
        assert_eq!(path.price_on(start()), Some(100.0));
        assert!(path.prices().all(|p| p > 0.0));
    }

    #[test]
    fn zero_volatility_gives_the_deterministic_drift_path() {
        let trend = 0.003;
        let model = Gbm::new(trend, 0.0).unwrap();
        let path = model.simulate_path(80.0, start(), 100, 7).unwrap();

        for (t, price) in path.prices().enumerate() {
            let expected = 80.0 * (trend * t as f64).exp();
            assert!(
                (price - expected).abs() <= 1.0e-9 * expected,
                "t={t} price={price} expected={expected}"
            );
        }
    }

    #[test]
    fn same_seed_reproduces_the_path() {
        let model = Gbm::new(0.0005, 0.015).unwrap();
        let a = model.simulate_path(60.0, start(), 90, 11).unwrap();
        let b = model.simulate_path(60.0, start(), 90, 11).unwrap();
        assert_eq!(a, b);

        let c = model.simulate_path(60.0, start(), 90, 12).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn batch_shape_matches_parameters() {
        let model = Gbm::new(0.0, 0.01).unwrap();
        let batch = model.simulate_batch(50.0, start(), 30, 25, 3).unwrap();
        assert_eq!(batch.len(), 25);
        assert_eq!(batch.days(), 30);
        assert_eq!(batch.start_date(), start());
        for path in batch.iter() {
            assert_eq!(path.price_on(start()), Some(50.0));
        }
    }

    #[test]
    fn single_path_batch_matches_single_simulation_under_same_seed() {
        let model = Gbm::new(0.0002, 0.01).unwrap();
        let batch = model.simulate_batch(70.0, start(), 60, 1, 99).unwrap();
        let path = model.simulate_path(70.0, start(), 60, 99).unwrap();
        assert_eq!(batch.get(0), Some(&path));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert!(Gbm::new(0.0, -0.1).is_err());
        assert!(Gbm::new(f64::NAN, 0.1).is_err());

        let model = Gbm::new(0.0, 0.1).unwrap();
        assert!(model.simulate_path(100.0, start(), 0, 1).is_err());
        assert!(model.simulate_path(0.0, start(), 10, 1).is_err());
        assert!(model.simulate_path(-5.0, start(), 10, 1).is_err());
        assert!(model.simulate_batch(100.0, start(), 10, 0, 1).is_err());
    }
}
