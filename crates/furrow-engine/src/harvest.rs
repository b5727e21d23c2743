//! Harvest windows.
//!
//! Month-level windows approximate a month as 30 days. Date-level harvests
//! (used by succession plans) use exact day arithmetic.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use furrow_types::{HarvestWindow, MaturityRange, Month, PlantingWindow};

use crate::calendar::{add_days, canonical_span, normalize_month};
use crate::error::EngineError;

/// Days per month in the month-level approximation.
pub const DAYS_PER_MONTH: u32 = 30;

fn whole_months_floor(days: u32) -> Month {
    Month::try_from(days / DAYS_PER_MONTH).unwrap_or(Month::MAX)
}

fn whole_months_ceil(days: u32) -> Month {
    Month::try_from(days.div_ceil(DAYS_PER_MONTH)).unwrap_or(Month::MAX)
}

/// Harvest months for a single planting month.
///
/// Both ends are normalized to `0..=11`, so a harvest that runs into the
/// next year may have `end < start`.
pub fn compute_harvest(planting_month: Month, maturity: MaturityRange) -> HarvestWindow {
    HarvestWindow {
        start: normalize_month(planting_month.saturating_add(whole_months_floor(maturity.min))),
        end: normalize_month(planting_month.saturating_add(whole_months_ceil(maturity.max))),
    }
}

/// Harvest months covering an entire outdoor planting window: from the
/// earliest harvest of the first sowing to the latest of the last sowing.
///
/// The result is canonical: `start` in `0..=11`, `end` extended.
pub fn harvest_for_window(window: &PlantingWindow, maturity: MaturityRange) -> HarvestWindow {
    let start = window
        .outdoor_start
        .saturating_add(whole_months_floor(maturity.min));
    let end = window
        .outdoor_end
        .saturating_add(whole_months_ceil(maturity.max));
    let (start, end) = canonical_span(start, end);
    HarvestWindow { start, end }
}

/// Harvest dates for a sowing, with optional extra days on both bounds.
pub fn harvest_dates(
    planting_date: NaiveDate,
    maturity: MaturityRange,
    extra_days: i64,
) -> Result<(NaiveDate, NaiveDate), EngineError> {
    let start_offset = i64::from(maturity.min)
        .checked_add(extra_days)
        .ok_or(EngineError::ArithmeticOverflow)?;
    let end_offset = i64::from(maturity.max)
        .checked_add(extra_days)
        .ok_or(EngineError::ArithmeticOverflow)?;
    let start = add_days(planting_date, start_offset)
        .ok_or_else(|| EngineError::date_out_of_range("harvest start"))?;
    let end = add_days(planting_date, end_offset)
        .ok_or_else(|| EngineError::date_out_of_range("harvest end"))?;
    Ok((start, end))
}

/// Distinct harvest months for a set of planting months, sorted.
pub fn harvest_months(planting_months: &[Month], days_to_maturity: u32) -> Vec<Month> {
    let offset = whole_months_ceil(days_to_maturity);
    planting_months
        .iter()
        .map(|m| normalize_month(m.saturating_add(offset)))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn single_month_harvest() {
        let h = compute_harvest(4, MaturityRange::new(60, 90));
        assert_eq!(h, HarvestWindow { start: 6, end: 7 });
        let h = compute_harvest(4, MaturityRange::new(61, 91));
        assert_eq!(h, HarvestWindow { start: 6, end: 8 });
    }

    #[test]
    fn harvest_wraps_into_next_year() {
        let h = compute_harvest(10, MaturityRange::new(60, 90));
        assert_eq!(h, HarvestWindow { start: 0, end: 1 });
    }

    #[test]
    fn whole_window_harvest_is_extended() {
        let window = PlantingWindow {
            indoor_start: None,
            indoor_end: None,
            outdoor_start: 8,
            outdoor_end: 10,
            confidence: 0.7,
        };
        let h = harvest_for_window(&window, MaturityRange::new(45, 75));
        assert_eq!(h, HarvestWindow { start: 9, end: 13 });
    }

    #[test]
    fn exact_day_harvest() {
        let planted = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let (start, end) = harvest_dates(planted, MaturityRange::new(60, 90), 0).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 7, 14).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 8, 13).unwrap());
        let (start, _) = harvest_dates(planted, MaturityRange::new(60, 90), 5).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 7, 19).unwrap());
    }

    #[test]
    fn harvest_months_are_unique_and_sorted() {
        assert_eq!(harvest_months(&[10, 11, 0], 45), vec![0, 1, 2]);
        assert_eq!(harvest_months(&[2, 3], 60), vec![4, 5]);
        assert!(harvest_months(&[], 60).is_empty());
    }
}
