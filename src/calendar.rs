//! Fiscal-year partitioning into procurement windows.
//!
//! The standard calendar year splits into the four civil quarters
//! (Jan 1-Mar 31, Apr 1-Jun 30, Jul 1-Sep 30, Oct 1-Dec 31). Custom fiscal
//! partitions can be assembled from explicit windows; the scheduler treats
//! both the same way.

use chrono::NaiveDate;

use crate::core::{ProcurementError, ProcurementWindow, QuarterId, Result};

/// Month-day boundaries of the civil quarters: (start month, start day,
/// end month, end day).
const CIVIL_QUARTERS: [(u32, u32, u32, u32); 4] =
    [(1, 1, 3, 31), (4, 1, 6, 30), (7, 1, 9, 30), (10, 1, 12, 31)];

/// A year's worth of procurement windows in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FiscalCalendar {
    windows: Vec<ProcurementWindow>,
}

impl FiscalCalendar {
    /// Standard civil-quarter calendar for one year.
    pub fn calendar_year(year: i32) -> Result<Self> {
        let mut windows = Vec::with_capacity(4);
        for (quarter, &(sm, sd, em, ed)) in QuarterId::ALL.iter().zip(CIVIL_QUARTERS.iter()) {
            let start = ymd(year, sm, sd)?;
            let end = ymd(year, em, ed)?;
            windows.push(ProcurementWindow::new(*quarter, start, end)?);
        }
        Ok(Self { windows })
    }

    /// Custom fiscal partition. Windows must carry distinct quarter ids and
    /// must be chronological and non-overlapping.
    pub fn from_windows(windows: Vec<ProcurementWindow>) -> Result<Self> {
        if windows.is_empty() {
            return Err(ProcurementError::InvalidInput(
                "fiscal calendar requires at least one window".to_string(),
            ));
        }

        for pair in windows.windows(2) {
            if pair[1].quarter <= pair[0].quarter {
                return Err(ProcurementError::InvalidInput(format!(
                    "windows must carry distinct, ascending quarter ids ({} then {})",
                    pair[0].quarter, pair[1].quarter
                )));
            }
            if pair[1].start <= pair[0].end {
                return Err(ProcurementError::InvalidInput(format!(
                    "window {} starting {} overlaps window {} ending {}",
                    pair[1].quarter, pair[1].start, pair[0].quarter, pair[0].end
                )));
            }
        }

        Ok(Self { windows })
    }

    /// Windows in chronological order.
    pub fn windows(&self) -> &[ProcurementWindow] {
        &self.windows
    }

    /// Window for one quarter, if present in this calendar.
    pub fn window(&self, quarter: QuarterId) -> Option<&ProcurementWindow> {
        self.windows.iter().find(|w| w.quarter == quarter)
    }

    /// First covered date.
    pub fn start(&self) -> NaiveDate {
        self.windows[0].start
    }

    /// Last covered date.
    pub fn end(&self) -> NaiveDate {
        self.windows[self.windows.len() - 1].end
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ProcurementError::InvalidInput(format!("{year}-{month:02}-{day:02} is not a valid date"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn calendar_year_produces_the_four_civil_quarters() {
        let calendar = FiscalCalendar::calendar_year(2024).unwrap();
        let windows = calendar.windows();
        assert_eq!(windows.len(), 4);

        assert_eq!(windows[0].start, d(2024, 1, 1));
        assert_eq!(windows[0].end, d(2024, 3, 31));
        assert_eq!(windows[1].start, d(2024, 4, 1));
        assert_eq!(windows[1].end, d(2024, 6, 30));
        assert_eq!(windows[2].start, d(2024, 7, 1));
        assert_eq!(windows[2].end, d(2024, 9, 30));
        assert_eq!(windows[3].start, d(2024, 10, 1));
        assert_eq!(windows[3].end, d(2024, 12, 31));

        assert_eq!(calendar.start(), d(2024, 1, 1));
        assert_eq!(calendar.end(), d(2024, 12, 31));
    }

    #[test]
    fn quarters_are_contiguous_over_the_year() {
        let calendar = FiscalCalendar::calendar_year(2023).unwrap();
        for pair in calendar.windows().windows(2) {
            assert_eq!(pair[0].end.succ_opt().unwrap(), pair[1].start);
        }
    }

    #[test]
    fn from_windows_rejects_overlap_and_misordered_ids() {
        let q1 = ProcurementWindow::new(QuarterId::Q1, d(2024, 1, 1), d(2024, 3, 31)).unwrap();
        let q2_overlapping =
            ProcurementWindow::new(QuarterId::Q2, d(2024, 3, 31), d(2024, 6, 30)).unwrap();
        assert!(FiscalCalendar::from_windows(vec![q1, q2_overlapping]).is_err());

        let q2 = ProcurementWindow::new(QuarterId::Q2, d(2024, 4, 1), d(2024, 6, 30)).unwrap();
        assert!(FiscalCalendar::from_windows(vec![q2, q1]).is_err());
        assert!(FiscalCalendar::from_windows(vec![]).is_err());
        assert!(FiscalCalendar::from_windows(vec![q1, q2]).is_ok());
    }

    #[test]
    fn window_lookup_by_quarter() {
        let calendar = FiscalCalendar::calendar_year(2024).unwrap();
        let q3 = calendar.window(QuarterId::Q3).unwrap();
        assert!(q3.contains(d(2024, 8, 15)));
        assert!(!q3.contains(d(2024, 10, 1)));
    }
}
