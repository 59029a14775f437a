//! Domain types shared across simulation, procurement, and evaluation:
//! daily price series, procurement windows/results/schedules, and simulation
//! batches.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::core::error::{ProcurementError, Result};

/// Quarter identifier within one procurement year, in chronological order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum QuarterId {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl QuarterId {
    /// All quarters in chronological order.
    pub const ALL: [Self; 4] = [Self::Q1, Self::Q2, Self::Q3, Self::Q4];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Q1 => "Q1",
            Self::Q2 => "Q2",
            Self::Q3 => "Q3",
            Self::Q4 => "Q4",
        }
    }
}

impl std::fmt::Display for QuarterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered daily price observations with strictly increasing dates and
/// strictly positive prices.
///
/// A series built with [`PriceSeries::from_daily`] is gap-free by
/// construction. One built from raw observations may contain calendar gaps
/// (weekends, missing quotes); those surface later as
/// [`ProcurementError::DataGap`] when a procurement window needs the missing
/// date.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawPriceSeries")]
pub struct PriceSeries {
    observations: Vec<(NaiveDate, f64)>,
}

/// Unvalidated serde payload; [`TryFrom`] funnels deserialization through
/// [`PriceSeries::from_observations`].
#[derive(serde::Deserialize)]
struct RawPriceSeries {
    observations: Vec<(NaiveDate, f64)>,
}

impl TryFrom<RawPriceSeries> for PriceSeries {
    type Error = ProcurementError;

    fn try_from(raw: RawPriceSeries) -> Result<Self> {
        Self::from_observations(raw.observations)
    }
}

impl PriceSeries {
    /// Builds a contiguous daily series starting at `start_date`.
    pub fn from_daily(start_date: NaiveDate, prices: &[f64]) -> Result<Self> {
        if prices.is_empty() {
            return Err(ProcurementError::InvalidInput(
                "price series must contain at least one observation".to_string(),
            ));
        }

        let mut observations = Vec::with_capacity(prices.len());
        for (i, &price) in prices.iter().enumerate() {
            validate_price(price)?;
            let date = start_date.checked_add_days(Days::new(i as u64)).ok_or_else(|| {
                ProcurementError::InvalidInput(format!(
                    "series of {} days starting {start_date} exceeds the supported date range",
                    prices.len()
                ))
            })?;
            observations.push((date, price));
        }

        Ok(Self { observations })
    }

    /// Builds a series from dated observations, validating strictly
    /// increasing dates. Calendar gaps are permitted here.
    pub fn from_observations(observations: Vec<(NaiveDate, f64)>) -> Result<Self> {
        if observations.is_empty() {
            return Err(ProcurementError::InvalidInput(
                "price series must contain at least one observation".to_string(),
            ));
        }

        for window in observations.windows(2) {
            if window[1].0 <= window[0].0 {
                return Err(ProcurementError::InvalidInput(format!(
                    "observation dates must be strictly increasing ({} followed by {})",
                    window[0].0, window[1].0
                )));
            }
        }
        for &(_, price) in &observations {
            validate_price(price)?;
        }

        Ok(Self { observations })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// A series is never empty; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// First observation date.
    pub fn first_date(&self) -> NaiveDate {
        self.observations[0].0
    }

    /// Last observation date.
    pub fn last_date(&self) -> NaiveDate {
        self.observations[self.observations.len() - 1].0
    }

    /// Price on an exact calendar date, if observed.
    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.observations
            .binary_search_by_key(&date, |&(d, _)| d)
            .ok()
            .map(|idx| self.observations[idx].1)
    }

    /// Mean price over the full series.
    pub fn mean_price(&self) -> f64 {
        let sum: f64 = self.observations.iter().map(|&(_, p)| p).sum();
        sum / self.observations.len() as f64
    }

    /// Dated observations in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.observations.iter().copied()
    }

    /// Prices in chronological order.
    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|&(_, p)| p)
    }
}

fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ProcurementError::InvalidInput(format!(
            "prices must be finite and > 0 (got {price})"
        )));
    }
    Ok(())
}

/// Named inclusive date interval over which exactly one procurement decision
/// is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProcurementWindow {
    pub quarter: QuarterId,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ProcurementWindow {
    pub fn new(quarter: QuarterId, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(ProcurementError::InvalidInput(format!(
                "window {quarter} ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { quarter, start, end })
    }

    /// Whether `date` lies inside the window, boundaries included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Immutable outcome of one procurement window: the date the stop-loss rule
/// fired (or the window end on fallback) and the series price on that date.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProcurementResult {
    pub quarter: QuarterId,
    pub procurement_date: NaiveDate,
    pub procurement_price: f64,
}

/// One procurement result per quarter, iterated in chronological order.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct ProcurementSchedule {
    results: BTreeMap<QuarterId, ProcurementResult>,
}

impl ProcurementSchedule {
    /// Builds a schedule from per-window results, rejecting duplicates.
    pub fn from_results(results: impl IntoIterator<Item = ProcurementResult>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for result in results {
            if map.insert(result.quarter, result).is_some() {
                return Err(ProcurementError::InvalidInput(format!(
                    "duplicate procurement result for {}",
                    result.quarter
                )));
            }
        }
        Ok(Self { results: map })
    }

    /// Result for one quarter, if scheduled.
    pub fn get(&self, quarter: QuarterId) -> Option<&ProcurementResult> {
        self.results.get(&quarter)
    }

    /// Number of scheduled quarters.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Results in chronological quarter order.
    pub fn iter(&self) -> impl Iterator<Item = &ProcurementResult> {
        self.results.values()
    }
}

/// Independently simulated price paths sharing start date, length, and model
/// parameters. Index carries no meaning beyond identity.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawSimulationBatch")]
pub struct SimulationBatch {
    paths: Vec<PriceSeries>,
}

/// Unvalidated serde payload; [`TryFrom`] funnels deserialization through
/// [`SimulationBatch::new`].
#[derive(serde::Deserialize)]
struct RawSimulationBatch {
    paths: Vec<PriceSeries>,
}

impl TryFrom<RawSimulationBatch> for SimulationBatch {
    type Error = ProcurementError;

    fn try_from(raw: RawSimulationBatch) -> Result<Self> {
        Self::new(raw.paths)
    }
}

impl SimulationBatch {
    /// Wraps paths after checking they are mutually consistent.
    pub fn new(paths: Vec<PriceSeries>) -> Result<Self> {
        let first = paths.first().ok_or_else(|| {
            ProcurementError::InvalidInput(
                "simulation batch must contain at least one path".to_string(),
            )
        })?;
        let (start, days) = (first.first_date(), first.len());

        for (i, path) in paths.iter().enumerate() {
            if path.first_date() != start || path.len() != days {
                return Err(ProcurementError::InvalidInput(format!(
                    "path {i} does not match the batch shape ({days} days from {start})"
                )));
            }
        }

        Ok(Self { paths })
    }

    /// Number of paths in the batch.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Days per path.
    pub fn days(&self) -> usize {
        self.paths[0].len()
    }

    /// Shared start date of every path.
    pub fn start_date(&self) -> NaiveDate {
        self.paths[0].first_date()
    }

    pub fn get(&self, index: usize) -> Option<&PriceSeries> {
        self.paths.get(index)
    }

    /// Paths in batch order.
    pub fn paths(&self) -> &[PriceSeries] {
        &self.paths
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceSeries> {
        self.paths.iter()
    }
}
