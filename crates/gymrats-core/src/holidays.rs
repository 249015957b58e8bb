use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::{ReportError, Result};

/// Brazilian national holidays, one row per supported year, as `(month, day)`.
///
/// Source: official 2026 national holiday calendar (MGI). A new year is
/// supported by adding a row here.
const NATIONAL_HOLIDAYS: &[(i32, &[(u32, u32)])] = &[(
    2026,
    &[
        (1, 1),
        (4, 3),
        (4, 21),
        (5, 1),
        (9, 7),
        (10, 12),
        (11, 2),
        (11, 15),
        (11, 20),
        (12, 25),
    ],
)];

/// Dates excluded from scoring in addition to weekends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    days: HashSet<NaiveDate>,
}

impl HolidaySet {
    /// National holidays for `year`.
    ///
    /// Fails with [`ReportError::UnsupportedYear`] when the year has no row in
    /// the holiday table.
    pub fn for_year(year: i32) -> Result<Self> {
        let (_, days) = NATIONAL_HOLIDAYS
            .iter()
            .find(|(y, _)| *y == year)
            .ok_or_else(|| ReportError::UnsupportedYear {
                year,
                supported: Self::supported_years(),
            })?;

        Ok(days
            .iter()
            .filter_map(|&(month, day)| NaiveDate::from_ymd_opt(year, month, day))
            .collect())
    }

    /// Years with a known holiday calendar, ascending.
    pub fn supported_years() -> Vec<i32> {
        let mut years: Vec<i32> = NATIONAL_HOLIDAYS.iter().map(|(y, _)| *y).collect();
        years.sort_unstable();
        years
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.days.contains(&day)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<NaiveDate> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}
