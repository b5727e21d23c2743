//! Rules built from a plant's own catalog growing calendar.

use furrow_types::{
    DaysToMaturity, FrostReference, GrowingCalendar, MaturityRange, PlantRule, RuleSource,
    WeekRange,
};

use crate::error::EngineError;

use super::{RuleQuery, RuleTier};

/// Indoor sowing ends this many weeks before last frost.
pub const INDOOR_END_WEEKS_BEFORE_LAST_FROST: f64 = 2.0;

/// Outdoor sowing ends this many weeks before first frost.
pub const OUTDOOR_END_WEEKS_BEFORE_FIRST_FROST: f64 = 2.0;

/// Autumn sowing starts this many weeks before first frost when the
/// calendar does not say.
pub const DEFAULT_FALL_WEEKS_BEFORE_FIRST_FROST: f64 = 8.0;

/// Validate catalog days-to-maturity.
pub fn validate_maturity(raw: DaysToMaturity) -> Result<MaturityRange, String> {
    let min = u32::try_from(raw.min)
        .map_err(|err| format!("minimum maturity {} is negative: {err}", raw.min))?;
    let max = u32::try_from(raw.max)
        .map_err(|err| format!("maximum maturity {} is negative: {err}", raw.max))?;
    if min > max {
        return Err(format!("maturity min {min} exceeds max {max}"));
    }
    Ok(MaturityRange::new(min, max))
}

fn week_count(value: f64, field: &str) -> Result<f64, String> {
    if !value.is_finite() {
        return Err(format!("{field} is not a number"));
    }
    if value < 0.0 {
        return Err(format!("{field} is negative ({value})"));
    }
    Ok(value)
}

/// The catalog calendar tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StructuredTier;

impl StructuredTier {
    fn build(
        calendar: &GrowingCalendar,
        query: &RuleQuery<'_>,
    ) -> Result<PlantRule, String> {
        let days_to_maturity = match query.plant.days_to_maturity {
            Some(raw) => validate_maturity(raw)?,
            None => query.maturity,
        };

        let indoor_offset_weeks = match calendar.indoor_seed_start {
            Some(indoor) => {
                let weeks = week_count(indoor.weeks_before_last_frost, "weeksBeforeLastFrost")?;
                let from = -weeks;
                let to = (-INDOOR_END_WEEKS_BEFORE_LAST_FROST).max(from);
                Some(WeekRange::new(from, to))
            }
            None => None,
        };

        let transplant = calendar
            .transplant
            .map(|t| week_count(t.weeks_after_last_frost, "weeksAfterLastFrost"))
            .transpose()?;
        let spring = calendar
            .direct_sow
            .and_then(|d| d.spring)
            .map(|s| s.weeks_from_last_frost);
        if spring.is_some_and(|w| !w.is_finite()) {
            return Err("weeksFromLastFrost is not a number".to_owned());
        }
        let fall = calendar
            .direct_sow
            .and_then(|d| d.fall)
            .map(|f| {
                week_count(
                    f.weeks_before_first_frost
                        .unwrap_or(DEFAULT_FALL_WEEKS_BEFORE_FIRST_FROST),
                    "weeksBeforeFirstFrost",
                )
            })
            .transpose()?;

        let outdoor_end = -OUTDOOR_END_WEEKS_BEFORE_FIRST_FROST;
        let spring_start = match (spring, transplant) {
            (Some(s), Some(t)) => Some(s.min(t)),
            (s, t) => s.or(t),
        };
        let (outdoor_offset_weeks, outdoor_relative_to) = match (spring_start, fall) {
            (Some(start), _) => (
                Some(WeekRange::new(start, outdoor_end)),
                FrostReference::LastFrost,
            ),
            (None, Some(weeks)) => (
                Some(WeekRange::new(-weeks, outdoor_end.max(-weeks))),
                FrostReference::FirstFrost,
            ),
            (None, None) => (None, FrostReference::LastFrost),
        };

        let succession = calendar.succession_planting;
        Ok(PlantRule {
            indoor_offset_weeks,
            outdoor_offset_weeks,
            outdoor_relative_to,
            outdoor_end_relative_to: FrostReference::FirstFrost,
            days_to_maturity,
            succession_interval_days: succession.map(|s| s.interval_days),
            succession_max_plantings: succession.and_then(|s| s.max_plantings),
            min_soil_temperature_f: query.plant.min_soil_temperature_f,
            indoor_month_override: None,
            source: RuleSource::StructuredCalendar,
        })
    }
}

impl RuleTier for StructuredTier {
    fn source(&self) -> RuleSource {
        RuleSource::StructuredCalendar
    }

    fn rule_for(&self, query: &RuleQuery<'_>) -> Result<Option<PlantRule>, EngineError> {
        let Some(calendar) = query.plant.calendar.as_ref().filter(|c| !c.is_empty()) else {
            return Ok(None);
        };
        Self::build(calendar, query)
            .map(Some)
            .map_err(|reason| EngineError::InvalidOffsetConfiguration {
                plant: query.plant.name.clone(),
                reason,
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
