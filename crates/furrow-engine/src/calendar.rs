//! Month and date arithmetic shared by every calculator.
//!
//! Months are zero-based (`0` = January). A window whose end falls in the
//! following year is stored in *extended* form, with 12 added to the end
//! month, so that `end >= start` always holds and durations stay monotonic.
//! Display code folds values back with [`normalize_month`].

use chrono::{Datelike, Days, NaiveDate};

use furrow_types::Month;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Months in a year.
pub const MONTHS_PER_YEAR: Month = 12;

/// Largest canonical month offset within one year.
const LAST_MONTH: Month = 11;

/// Average weeks per month (30.44 days / 7).
pub const WEEKS_PER_MONTH: f64 = 4.35;

/// Three-letter month keys used by regional calendars.
pub const MONTH_KEYS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

// ---------------------------------------------------------------------------
// Month indices
// ---------------------------------------------------------------------------

/// Fold any month value into `0..=11`. Negative values count back from
/// December of the previous year.
pub const fn normalize_month(month: Month) -> Month {
    month.rem_euclid(MONTHS_PER_YEAR)
}

/// Whether a raw `start..end` pair crosses New Year.
pub const fn wraps(start: Month, end: Month) -> bool {
    end < start
}

/// Extended form of a window end: `end + 12` when the window wraps.
pub const fn extend_end(start: Month, end: Month) -> Month {
    if wraps(start, end) {
        end.saturating_add(MONTHS_PER_YEAR)
    } else {
        end
    }
}

/// Length of a window in months, wrap-aware. November to February is 3.
pub const fn span_months(start: Month, end: Month) -> Month {
    extend_end(start, end).saturating_sub(start)
}

/// Shift a window by whole years so that `start` lies in `0..=11`, then
/// keep `end` within `start..=start + 11`.
pub const fn canonical_span(start: Month, end: Month) -> (Month, Month) {
    let canonical_start = normalize_month(start);
    let shift = canonical_start.saturating_sub(start);
    let mut canonical_end = end.saturating_add(shift);
    if canonical_end < canonical_start {
        canonical_end = extend_end(canonical_start, normalize_month(canonical_end));
    }
    let latest = canonical_start.saturating_add(LAST_MONTH);
    if canonical_end > latest {
        canonical_end = latest;
    }
    (canonical_start, canonical_end)
}

/// Zero-based month of a date.
pub fn month_of(date: NaiveDate) -> Month {
    Month::try_from(date.month0()).unwrap_or_default()
}

/// Month index of a date counted from January of `reference_year`.
///
/// Dates in the following year yield 12 and above, earlier years go
/// negative. Returns `None` on overflow.
pub fn month_index(date: NaiveDate, reference_year: i32) -> Option<Month> {
    date.year()
        .checked_sub(reference_year)?
        .checked_mul(MONTHS_PER_YEAR)?
        .checked_add(month_of(date))
}

/// Parse a three-letter month key (case-insensitive).
pub fn month_from_key(key: &str) -> Option<Month> {
    let key = key.trim().to_ascii_lowercase();
    MONTH_KEYS
        .iter()
        .position(|k| *k == key)
        .and_then(|i| Month::try_from(i).ok())
}

// ---------------------------------------------------------------------------
// Date arithmetic
// ---------------------------------------------------------------------------

/// Shift a date by a signed number of days. Returns `None` on overflow.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    }
}

/// Whole days in a fractional number of weeks, floored toward the earlier
/// date: 2.5 weeks is 17 days, -2.5 weeks is -18 days.
// Offsets are bounded by catalog data well inside i64.
#[allow(clippy::cast_possible_truncation)]
pub fn weeks_to_days(weeks: f64) -> i64 {
    (weeks * 7.0).floor() as i64
}

/// Shift a date by fractional weeks, flooring to whole days.
pub fn add_weeks(date: NaiveDate, weeks: f64) -> Option<NaiveDate> {
    add_days(date, weeks_to_days(weeks))
}

/// Convert month offsets to week offsets.
pub fn months_to_weeks(months: f64) -> f64 {
    months * WEEKS_PER_MONTH
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn normalize_handles_negatives_and_overflow() {
        assert_eq!(normalize_month(0), 0);
        assert_eq!(normalize_month(11), 11);
        assert_eq!(normalize_month(13), 1);
        assert_eq!(normalize_month(-1), 11);
        assert_eq!(normalize_month(-13), 11);
        assert_eq!(normalize_month(24), 0);
    }

    #[test]
    fn november_to_february_spans_three_months() {
        assert!(wraps(10, 1));
        assert_eq!(extend_end(10, 1), 13);
        assert_eq!(span_months(10, 1), 3);
        assert!(!wraps(3, 5));
        assert_eq!(span_months(3, 5), 2);
    }

    #[test]
    fn canonical_span_shifts_whole_years() {
        assert_eq!(canonical_span(-2, 1), (10, 13));
        assert_eq!(canonical_span(14, 16), (2, 4));
        assert_eq!(canonical_span(4, 7), (4, 7));
        assert_eq!(canonical_span(5, 30), (5, 16));
    }

    #[test]
    fn fractional_weeks_floor_toward_earlier() {
        assert_eq!(weeks_to_days(2.5), 17);
        assert_eq!(weeks_to_days(-2.5), -18);
        assert_eq!(weeks_to_days(-6.0), -42);
        assert_eq!(add_weeks(date(2024, 5, 1), 2.0), Some(date(2024, 5, 15)));
        assert_eq!(add_weeks(date(2024, 5, 1), -6.0), Some(date(2024, 3, 20)));
    }

    #[test]
    fn month_index_across_years() {
        assert_eq!(month_index(date(2024, 3, 1), 2024), Some(2));
        assert_eq!(month_index(date(2025, 2, 1), 2024), Some(13));
        assert_eq!(month_index(date(2023, 11, 30), 2024), Some(-2));
    }

    #[test]
    fn month_key_parsing() {
        assert_eq!(month_from_key("Dec"), Some(11));
        assert_eq!(month_from_key("foo"), None);
    }

    #[test]
    fn days_between_is_signed() {
        assert_eq!(days_between(date(2024, 5, 1), date(2024, 5, 15)), 14);
        assert_eq!(days_between(date(2024, 5, 15), date(2024, 5, 1)), -14);
    }
}
