//! Fixed 5-day stride calendar used by the date slider.
//!
//! Every displayable date lies on the grid `start + STRIDE_DAYS * i`. The grid
//! is built once and never changes, so slider positions map to dates by plain
//! indexing.

use crate::error::{OrreryError, Result};
use chrono::{Duration, NaiveDate};

/// Days between two consecutive stride dates.
pub const STRIDE_DAYS: i64 = 5;

/// First day of the bundled ephemeris.
pub const FIRST_DAY: &str = "1800-01-03";
/// Last day (inclusive bound) of the bundled ephemeris.
pub const LAST_DAY: &str = "2099-12-27";

/// Position on the date slider, in `[0, count)`.
pub type DateIndex = usize;

/// Formats a date as the ISO `YYYY-MM-DD` key used by the position dataset.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses an ISO `YYYY-MM-DD` day key.
pub fn parse_day_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").map_err(|_| OrreryError::InvalidDayKey(key.to_owned()))
}

/// Ordered, immutable sequence of stride dates.
#[derive(Debug, Clone)]
pub struct DateIndexTable {
    dates: Vec<NaiveDate>,
}

impl DateIndexTable {
    /// Enumerates `start, start + 5d, ...` up to and including `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(OrreryError::EmptyDateRange { start, end });
        }

        let span = (end - start).num_days();
        let dates: Vec<NaiveDate> = (0..=span / STRIDE_DAYS)
            .map(|i| start + Duration::days(i * STRIDE_DAYS))
            .collect();

        log::debug!(
            "Date grid {} ..= {} ({} stride dates)",
            day_key(start),
            day_key(dates[dates.len() - 1]),
            dates.len()
        );

        Ok(Self { dates })
    }

    /// Builds the grid from two ISO day keys.
    pub fn from_day_keys(first: &str, last: &str) -> Result<Self> {
        Self::new(parse_day_key(first)?, parse_day_key(last)?)
    }

    /// The 1800-01-03 ..= 2099-12-27 grid of the bundled ephemeris.
    pub fn standard() -> Result<Self> {
        Self::from_day_keys(FIRST_DAY, LAST_DAY)
    }

    /// Number of stride dates.
    #[inline]
    pub fn count(&self) -> usize {
        self.dates.len()
    }

    #[inline]
    pub fn last_index(&self) -> DateIndex {
        self.dates.len() - 1
    }

    pub fn first(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last(&self) -> NaiveDate {
        self.dates[self.last_index()]
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Returns the date at slider position `index`.
    ///
    /// Indices outside `[0, count)` are a caller bug; the slider is clamped
    /// before its value reaches the core.
    pub fn index_to_date(&self, index: DateIndex) -> Result<NaiveDate> {
        self.dates
            .get(index)
            .copied()
            .ok_or(OrreryError::IndexOutOfRange {
                index,
                count: self.count(),
            })
    }

    /// Fails with `IndexOutOfRange` unless `index` is a valid slider position.
    pub fn check_index(&self, index: DateIndex) -> Result<DateIndex> {
        self.index_to_date(index).map(|_| index)
    }

    /// Exact grid lookup; `None` for dates off the stride or outside the range.
    pub fn exact_index(&self, date: NaiveDate) -> Option<DateIndex> {
        let offset = (date - self.first()).num_days();
        if offset < 0 || offset % STRIDE_DAYS != 0 {
            return None;
        }
        let index = (offset / STRIDE_DAYS) as usize;
        (index < self.count()).then_some(index)
    }

    /// Maps any date onto the grid.
    ///
    /// Dates before the first grid date clamp to 0, dates after the last clamp
    /// to `count() - 1`, and off-stride dates snap to the nearest grid date
    /// (the earlier one on a tie).
    pub fn date_to_closest_index(&self, date: NaiveDate) -> DateIndex {
        if date <= self.first() {
            return 0;
        }
        if date >= self.last() {
            return self.last_index();
        }

        let offset = (date - self.first()).num_days();
        let lower = offset / STRIDE_DAYS;
        let rem = offset % STRIDE_DAYS;
        let index = if rem * 2 > STRIDE_DAYS { lower + 1 } else { lower };

        (index as usize).min(self.last_index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn standard_grid_bounds() {
        let table = DateIndexTable::standard().unwrap();

        assert_eq!(table.count(), 21_914);
        assert_eq!(table.index_to_date(0).unwrap(), ymd(1800, 1, 3));
        // 2099-12-27 is one day past the last stride point.
        assert_eq!(table.last(), ymd(2099, 12, 26));
    }

    #[test]
    fn out_of_range_index_fails() {
        let table = DateIndexTable::standard().unwrap();
        let err = table.index_to_date(table.count()).unwrap_err();

        assert!(matches!(
            err,
            OrreryError::IndexOutOfRange { index: 21_914, count: 21_914 }
        ));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = DateIndexTable::new(ymd(2000, 1, 2), ymd(2000, 1, 1)).unwrap_err();
        assert!(matches!(err, OrreryError::EmptyDateRange { .. }));
    }

    #[test]
    fn single_day_range_has_one_date() {
        let table = DateIndexTable::new(ymd(2000, 1, 1), ymd(2000, 1, 4)).unwrap();
        assert_eq!(table.count(), 1);
    }

    #[test]
    fn closest_index_clamps_outside_range() {
        let table = DateIndexTable::standard().unwrap();

        assert_eq!(table.date_to_closest_index(ymd(1700, 6, 1)), 0);
        assert_eq!(table.date_to_closest_index(ymd(2099, 12, 27)), table.last_index());
        assert_eq!(table.date_to_closest_index(ymd(2300, 1, 1)), table.last_index());
    }

    #[test]
    fn closest_index_snaps_off_grid_dates() {
        let table = DateIndexTable::standard().unwrap();
        let base = table.index_to_date(100).unwrap();

        assert_eq!(table.date_to_closest_index(base + Duration::days(1)), 100);
        assert_eq!(table.date_to_closest_index(base + Duration::days(2)), 100);
        assert_eq!(table.date_to_closest_index(base + Duration::days(3)), 101);
        assert_eq!(table.date_to_closest_index(base + Duration::days(4)), 101);
    }

    #[test]
    fn today_lands_on_nearest_stride_date() {
        let table = DateIndexTable::standard().unwrap();
        let today = ymd(2026, 10, 19);

        assert_eq!(table.exact_index(today), None);
        let index = table.date_to_closest_index(today);
        assert_eq!(table.index_to_date(index).unwrap(), ymd(2026, 10, 20));
    }

    #[test]
    fn exact_index_only_matches_grid_points() {
        let table = DateIndexTable::standard().unwrap();

        assert_eq!(table.exact_index(ymd(1800, 1, 3)), Some(0));
        assert_eq!(table.exact_index(ymd(1800, 1, 8)), Some(1));
        assert_eq!(table.exact_index(ymd(1800, 1, 4)), None);
        assert_eq!(table.exact_index(ymd(1799, 12, 29)), None);
    }

    #[test]
    fn day_key_is_iso() {
        assert_eq!(day_key(ymd(1969, 7, 20)), "1969-07-20");
        assert_eq!(parse_day_key("1969-07-20").unwrap(), ymd(1969, 7, 20));
        assert!(parse_day_key("20/07/1969").is_err());
    }

    proptest! {
        #[test]
        fn grid_round_trips(i in 0usize..21_914) {
            let table = DateIndexTable::standard().unwrap();
            let date = table.index_to_date(i).unwrap();
            prop_assert_eq!(table.date_to_closest_index(date), i);
            prop_assert_eq!(table.exact_index(date), Some(i));
        }

        #[test]
        fn consecutive_dates_are_one_stride_apart(i in 0usize..21_913) {
            let table = DateIndexTable::standard().unwrap();
            let gap = table.index_to_date(i + 1).unwrap() - table.index_to_date(i).unwrap();
            prop_assert_eq!(gap.num_days(), STRIDE_DAYS);
        }
    }
}
