//! Month-level planting windows.
//!
//! Frost-relative week offsets from a [`PlantRule`] are turned into real
//! dates against the [`ClimateProfile`], then into month indices counted
//! from January of the last-frost year. Southern months are taken back by
//! the season offset so that every adjustment works on northern-equivalent
//! months. Windows are kept in extended form throughout so that
//! `end >= start` survives every shift.
//!
//! Adjustments are applied in a fixed order:
//!
//! 1. hardiness-zone delta (northern hemisphere only)
//! 2. weather and soil delta, clamped to one month either way
//! 3. hemisphere shift for southern locations
//!
//! Fixed indoor months from a country-scoped override are local calendar
//! months and bypass all three.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use furrow_types::{
    ClimateProfile, FrostReference, Hemisphere, Month, PlantRule, PlantingWindow, RuleSource,
    WeatherDelta, WeekRange, ZoneClass, ZoneSystem,
};

use crate::calendar::{add_weeks, canonical_span, days_between, extend_end, month_index};
use crate::climate::parse_zone_number;
use crate::config::{EngineConfig, WeatherConfig, WindowConfig, ZoneAdjustmentConfig, ZoneShift};
use crate::error::EngineError;

/// Outdoor weeks used when a rule carries none: from last frost until two
/// weeks before first frost.
pub const FALLBACK_OUTDOOR_WEEKS: WeekRange = WeekRange::new(0.0, -2.0);

/// Computes [`PlantingWindow`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowCalculator {
    /// Confidence scoring.
    pub window: WindowConfig,
    /// Weather thresholds.
    pub weather: WeatherConfig,
    /// Zone delta table.
    pub zones: ZoneAdjustmentConfig,
}

impl WindowCalculator {
    /// Calculator using the relevant sections of an engine config.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            window: config.window.clone(),
            weather: config.weather.clone(),
            zones: config.zone_adjustments.clone(),
        }
    }

    /// Compute the planting window for a rule at a location.
    ///
    /// # Errors
    ///
    /// [`EngineError::DateOutOfRange`] if an offset leaves the calendar.
    pub fn compute(
        &self,
        rule: &PlantRule,
        climate: &ClimateProfile,
        weather: Option<&WeatherDelta>,
    ) -> Result<PlantingWindow, EngineError> {
        let reference_year = climate.last_frost.year();
        let season_shift = climate.season_shift();

        let mut indoor = match rule.indoor_offset_weeks {
            Some(weeks) if rule.indoor_month_override.is_none() => {
                let start = add_weeks(climate.last_frost, weeks.from)
                    .ok_or_else(|| EngineError::date_out_of_range("indoor start"))?;
                let end = add_weeks(climate.last_frost, weeks.to)
                    .ok_or_else(|| EngineError::date_out_of_range("indoor end"))?;
                Some(month_pair(start, end.max(start), reference_year, season_shift)?)
            }
            _ => None,
        };

        let (start_date, end_date) = outdoor_dates(rule, climate)?;
        let mut outdoor = month_pair(start_date, end_date, reference_year, season_shift)?;

        if climate.hemisphere == Hemisphere::Northern {
            let shift = self.zone_shift(climate);
            if let Some(pair) = indoor.as_mut() {
                *pair = shift_start(*pair, shift.indoor_months);
            }
            outdoor = shift_start(outdoor, shift.outdoor_months);
        }

        if let Some(delta) = weather {
            let months = self.weather_shift(rule, delta);
            outdoor = shift_start_fractional(outdoor, months);
            debug!(shift_months = months, "weather shift applied");
        }

        if climate.hemisphere == Hemisphere::Southern {
            outdoor = shift_pair(outdoor, season_shift);
            if let Some(pair) = indoor.as_mut() {
                *pair = shift_pair(*pair, season_shift);
            }
        }

        if let Some(span) = rule.indoor_month_override {
            indoor = Some((span.start, extend_end(span.start, span.end)));
        }

        let (outdoor_start, outdoor_end) = canonical_span(outdoor.0, outdoor.1);
        let indoor = indoor.map(|(s, e)| canonical_span(s, e));

        Ok(PlantingWindow {
            indoor_start: indoor.map(|(s, _)| s),
            indoor_end: indoor.map(|(_, e)| e),
            outdoor_start,
            outdoor_end,
            confidence: self.confidence(rule, climate, start_date),
        })
    }

    /// Zone class of a climate profile, from its zone number.
    ///
    /// Only USDA and Canadian zone numbers are comparable; other systems
    /// are always temperate.
    pub fn zone_class(&self, climate: &ClimateProfile) -> ZoneClass {
        if !matches!(
            climate.zone_system,
            ZoneSystem::Usda | ZoneSystem::Canadian
        ) {
            return ZoneClass::Temperate;
        }
        match parse_zone_number(&climate.zone_name) {
            Some(zone) if zone <= self.zones.cold_max_zone => ZoneClass::Cold,
            Some(zone) if zone >= self.zones.hot_min_zone => ZoneClass::Hot,
            _ => ZoneClass::Temperate,
        }
    }

    fn zone_shift(&self, climate: &ClimateProfile) -> ZoneShift {
        match self.zone_class(climate) {
            ZoneClass::Cold => self.zones.cold,
            ZoneClass::Hot => self.zones.hot,
            ZoneClass::Temperate => ZoneShift::default(),
        }
    }

    /// Fractional month shift for observed weather (positive = later),
    /// clamped to the configured maximum.
    pub fn weather_shift(&self, rule: &PlantRule, delta: &WeatherDelta) -> f64 {
        let w = &self.weather;
        let anomaly = delta.temperature_anomaly_f;
        let mut shift = if anomaly < -w.significant_anomaly_f {
            w.significant_shift_months
        } else if anomaly < -w.moderate_anomaly_f {
            w.moderate_shift_months
        } else if anomaly > w.significant_anomaly_f {
            -w.significant_shift_months
        } else if anomaly > w.moderate_anomaly_f {
            -w.moderate_shift_months
        } else {
            0.0
        };

        if let (Some(soil), Some(minimum)) = (delta.soil_temperature_f, rule.min_soil_temperature_f) {
            let margin = soil - minimum;
            if margin < -w.cold_soil_margin_f {
                shift += w.cold_soil_shift_months;
            } else if (0.0..w.warm_soil_band_f).contains(&margin) {
                shift -= w.warm_soil_shift_months;
            }
        }

        shift.max(-w.max_shift_months).min(w.max_shift_months)
    }

    /// Confidence of a window: climate confidence scaled by the rule tier's
    /// bonus, less a penalty when the season is too short, bounded.
    pub fn confidence(
        &self,
        rule: &PlantRule,
        climate: &ClimateProfile,
        outdoor_start: NaiveDate,
    ) -> f64 {
        let cfg = &self.window;
        let bonus = match rule.source {
            RuleSource::StructuredCalendar => cfg.structured_bonus,
            RuleSource::NamedOffsetTable => cfg.named_bonus,
            RuleSource::TypeHeuristic | RuleSource::Default => 0.0,
        };
        let mut confidence = climate.confidence * (1.0 + bonus);

        let season_days = days_between(outdoor_start, climate.first_frost);
        if season_days < i64::from(rule.days_to_maturity.max) {
            debug!(
                season_days,
                maturity_max = rule.days_to_maturity.max,
                "season shorter than days to maturity"
            );
            confidence -= cfg.short_season_penalty;
        }

        if rule.source == RuleSource::Default {
            confidence = confidence.min(cfg.default_rule_cap);
        }
        confidence.max(cfg.min_confidence).min(cfg.max_confidence)
    }
}

/// Outdoor window start and end dates in the location's own calendar. The
/// end never precedes the start.
pub fn outdoor_dates(
    rule: &PlantRule,
    climate: &ClimateProfile,
) -> Result<(NaiveDate, NaiveDate), EngineError> {
    let anchor = |reference: FrostReference| match reference {
        FrostReference::LastFrost => climate.last_frost,
        FrostReference::FirstFrost => climate.first_frost,
    };
    let (weeks, start_ref, end_ref) = rule.outdoor_offset_weeks.map_or(
        (
            FALLBACK_OUTDOOR_WEEKS,
            FrostReference::LastFrost,
            FrostReference::FirstFrost,
        ),
        |w| (w, rule.outdoor_relative_to, rule.outdoor_end_relative_to),
    );
    let start = add_weeks(anchor(start_ref), weeks.from)
        .ok_or_else(|| EngineError::date_out_of_range("outdoor start"))?;
    let end = add_weeks(anchor(end_ref), weeks.to)
        .ok_or_else(|| EngineError::date_out_of_range("outdoor end"))?;
    Ok((start, end.max(start)))
}

/// Northern-equivalent month indices of two local dates.
fn month_pair(
    start: NaiveDate,
    end: NaiveDate,
    reference_year: i32,
    season_shift: i32,
) -> Result<(Month, Month), EngineError> {
    let index = |date| {
        month_index(date, reference_year)
            .and_then(|m| m.checked_sub(season_shift))
            .ok_or(EngineError::ArithmeticOverflow)
    };
    Ok((index(start)?, index(end)?))
}

fn shift_start((start, end): (Month, Month), months: i32) -> (Month, Month) {
    let start = start.saturating_add(months);
    (start, end.max(start))
}

fn shift_pair((start, end): (Month, Month), months: i32) -> (Month, Month) {
    (start.saturating_add(months), end.saturating_add(months))
}

fn shift_start_fractional((start, end): (Month, Month), months: f64) -> (Month, Month) {
    // Shift is clamped to a month or two; the sum stays near the input.
    #[allow(clippy::cast_possible_truncation)]
    let shifted = (f64::from(start) + months).floor() as Month;
    (shifted, end.max(shifted))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;
    use furrow_types::{MaturityRange, MonthSpan};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn climate(zone: &str) -> ClimateProfile {
        ClimateProfile {
            last_frost: date(2024, 5, 1),
            first_frost: date(2024, 10, 15),
            zone_name: zone.to_owned(),
            zone_system: ZoneSystem::Usda,
            hemisphere: Hemisphere::Northern,
            microclimate: None,
            confidence: 0.7,
            season_offset_months: 6,
        }
    }

    fn tomato_rule() -> PlantRule {
        PlantRule {
            indoor_offset_weeks: Some(WeekRange::new(-6.0, -2.0)),
            outdoor_offset_weeks: Some(WeekRange::new(2.0, -2.0)),
            outdoor_relative_to: FrostReference::LastFrost,
            outdoor_end_relative_to: FrostReference::FirstFrost,
            days_to_maturity: MaturityRange::new(60, 90),
            succession_interval_days: None,
            succession_max_plantings: None,
            min_soil_temperature_f: Some(60.0),
            indoor_month_override: None,
            source: RuleSource::StructuredCalendar,
        }
    }

    #[test]
    fn tomato_window() {
        let calc = WindowCalculator::default();
        let window = calc.compute(&tomato_rule(), &climate("6a"), None).unwrap();
        assert_eq!(window.indoor_start, Some(2));
        assert_eq!(window.indoor_end, Some(3));
        assert_eq!(window.outdoor_start, 4);
        assert_eq!(window.outdoor_end, 9);
        assert_relative_eq!(window.confidence, 0.77, epsilon = 1e-9);
    }

    #[test]
    fn direct_sow_has_no_indoor_months() {
        let calc = WindowCalculator::default();
        let mut rule = tomato_rule();
        rule.indoor_offset_weeks = None;
        let window = calc.compute(&rule, &climate("6a"), None).unwrap();
        assert_eq!(window.indoor_start, None);
        assert_eq!(window.indoor_end, None);
        assert!(!window.has_indoor());
    }

    #[test]
    fn cold_zone_delays_starts() {
        let calc = WindowCalculator::default();
        assert_eq!(calc.zone_class(&climate("3b")), ZoneClass::Cold);
        let window = calc.compute(&tomato_rule(), &climate("3b"), None).unwrap();
        assert_eq!(window.indoor_start, Some(3));
        assert_eq!(window.indoor_end, Some(3));
        assert_eq!(window.outdoor_start, 6);
        assert_eq!(window.outdoor_end, 9);
    }

    #[test]
    fn hot_and_non_numeric_zones_do_not_shift() {
        let calc = WindowCalculator::default();
        assert_eq!(calc.zone_class(&climate("10a")), ZoneClass::Hot);
        let mut rhs = climate("H3");
        rhs.zone_system = ZoneSystem::Rhs;
        assert_eq!(calc.zone_class(&rhs), ZoneClass::Temperate);
        let window = calc.compute(&tomato_rule(), &climate("10a"), None).unwrap();
        assert_eq!(window.outdoor_start, 4);
    }

    #[test]
    fn weather_shift_thresholds() {
        let calc = WindowCalculator::default();
        let rule = tomato_rule();
        let cold = WeatherDelta {
            temperature_anomaly_f: -6.0,
            soil_temperature_f: None,
        };
        assert_relative_eq!(calc.weather_shift(&rule, &cold), 0.5, epsilon = 1e-9);
        let warm = WeatherDelta {
            temperature_anomaly_f: 3.0,
            soil_temperature_f: None,
        };
        assert_relative_eq!(calc.weather_shift(&rule, &warm), -0.25, epsilon = 1e-9);
        let very_cold_soil = WeatherDelta {
            temperature_anomaly_f: -10.0,
            soil_temperature_f: Some(40.0),
        };
        // 0.5 + 0.25 stays under the cap
        assert_relative_eq!(calc.weather_shift(&rule, &very_cold_soil), 0.75, epsilon = 1e-9);
        let just_warm_soil = WeatherDelta {
            temperature_anomaly_f: 0.0,
            soil_temperature_f: Some(62.0),
        };
        assert_relative_eq!(calc.weather_shift(&rule, &just_warm_soil), -0.1, epsilon = 1e-9);
    }

    #[test]
    fn weather_shift_is_capped() {
        let mut calc = WindowCalculator::default();
        calc.weather.cold_soil_shift_months = 0.75;
        let delta = WeatherDelta {
            temperature_anomaly_f: -10.0,
            soil_temperature_f: Some(30.0),
        };
        assert_relative_eq!(calc.weather_shift(&tomato_rule(), &delta), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn warm_weather_moves_outdoor_start_earlier() {
        let calc = WindowCalculator::default();
        let delta = WeatherDelta {
            temperature_anomaly_f: 6.0,
            soil_temperature_f: None,
        };
        let window = calc
            .compute(&tomato_rule(), &climate("6a"), Some(&delta))
            .unwrap();
        // floor(4 - 0.5) = 3
        assert_eq!(window.outdoor_start, 3);
        assert_eq!(window.outdoor_end, 9);
    }

    #[test]
    fn indoor_window_across_new_year_is_extended() {
        let calc = WindowCalculator::default();
        let mut early = climate("10a");
        early.last_frost = date(2024, 1, 15);
        early.first_frost = date(2024, 12, 15);
        let mut rule = tomato_rule();
        rule.indoor_offset_weeks = Some(WeekRange::new(-10.0, 3.0));
        let window = calc.compute(&rule, &early, None).unwrap();
        assert_eq!(window.indoor_start, Some(10));
        assert_eq!(window.indoor_end, Some(13));
    }

    #[test]
    fn fixed_indoor_months_bypass_shifts() {
        let calc = WindowCalculator::default();
        let mut rule = tomato_rule();
        rule.indoor_month_override = Some(MonthSpan { start: 9, end: 1 });
        let mut south = climate("6a");
        south.hemisphere = Hemisphere::Southern;
        let window = calc.compute(&rule, &south, None).unwrap();
        assert_eq!(window.indoor_start, Some(9));
        assert_eq!(window.indoor_end, Some(13));
    }

    #[test]
    fn southern_months_follow_real_dates() {
        let calc = WindowCalculator::default();
        let mut south = climate("3");
        south.zone_system = ZoneSystem::Australian;
        south.hemisphere = Hemisphere::Southern;
        south.last_frost = date(2025, 8, 17);
        south.first_frost = date(2026, 5, 15);
        let window = calc.compute(&tomato_rule(), &south, None).unwrap();
        // 2025-08-17 + 2 weeks is 2025-08-31, still August
        assert_eq!(window.outdoor_start, 7);
        // 2026-05-15 - 2 weeks is 2026-05-01
        assert_eq!(window.outdoor_end, 16);
        // 2025-07-06 and 2025-08-03
        assert_eq!(window.indoor_start, Some(6));
        assert_eq!(window.indoor_end, Some(7));
        assert_relative_eq!(window.confidence, 0.77, epsilon = 1e-9);
    }

    #[test]
    fn short_season_is_penalized() {
        let calc = WindowCalculator::default();
        let mut rule = tomato_rule();
        rule.days_to_maturity = MaturityRange::new(150, 170);
        let window = calc.compute(&rule, &climate("6a"), None).unwrap();
        // 0.7 * 1.1 - 0.1
        assert_relative_eq!(window.confidence, 0.67, epsilon = 1e-9);
    }

    #[test]
    fn default_rule_confidence_is_capped() {
        let calc = WindowCalculator::default();
        let mut rule = tomato_rule();
        rule.source = RuleSource::Default;
        let mut sure = climate("6a");
        sure.confidence = 0.9;
        let window = calc.compute(&rule, &sure, None).unwrap();
        assert_relative_eq!(window.confidence, 0.4, epsilon = 1e-9);
    }

    #[test]
    fn outdoor_end_never_precedes_start() {
        let mut rule = tomato_rule();
        rule.outdoor_offset_weeks = Some(WeekRange::new(20.0, -20.0));
        let (start, end) = outdoor_dates(&rule, &climate("6a")).unwrap();
        assert!(end >= start);
    }
}
