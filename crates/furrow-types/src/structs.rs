//! Input and climate structs: locations, frost records, plant catalog data,
//! and the resolved rule and climate profiles consumed by the calculators.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{FrostReference, Hemisphere, PlantType, RuleSource, ZoneSystem};

/// A zero-based month index.
///
/// `0..=11` are January through December of the reference year. Values of
/// 12 and above denote months of the following year (`value % 12`), which is
/// how windows spanning New Year keep `end >= start`.
pub type Month = i32;

/// Default season offset between hemispheres, in months.
pub const DEFAULT_SEASON_OFFSET_MONTHS: i32 = 6;

// ---------------------------------------------------------------------------
// Location & climate
// ---------------------------------------------------------------------------

/// A calendar day without a year, as published in frost tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MonthDay {
    /// Month, 1-12.
    pub month: u32,
    /// Day of month, 1-31.
    pub day: u32,
}

impl MonthDay {
    /// Create a month/day pair.
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    /// Place this day in a concrete year.
    ///
    /// February 29th falls back to the 28th in non-leap years. Returns `None`
    /// if the pair is not a real day.
    pub fn in_year(self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).or_else(|| {
            if self.month == 2 && self.day == 29 {
                NaiveDate::from_ymd_opt(year, 2, 28)
            } else {
                None
            }
        })
    }
}

/// Terrain inputs for the frost-date microclimate correction.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct MicroclimateFactors {
    /// Elevation above sea level in metres.
    pub elevation_m: Option<f64>,
    /// Slope in degrees.
    pub slope_deg: Option<f64>,
    /// Compass bearing the slope faces, in degrees (0 = north, 180 = south).
    pub aspect_deg: Option<f64>,
    /// Distance to a large water body, in kilometres.
    pub water_distance: Option<f64>,
}

/// Signed day offsets applied to the frost dates of a location.
///
/// Negative values move the date earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct MicroclimateDelta {
    /// Shift applied to the last spring frost.
    pub last_frost_days: i32,
    /// Shift applied to the first autumn frost.
    pub first_frost_days: i32,
}

impl MicroclimateDelta {
    /// True when neither date moves.
    pub const fn is_zero(self) -> bool {
        self.last_frost_days == 0 && self.first_frost_days == 0
    }
}

/// A location to plan for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Location {
    /// ISO 3166 alpha-2 country code.
    pub country: String,
    /// Postal or ZIP code, if known.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Hardiness zone name (e.g. `7b`), if known.
    #[serde(default)]
    pub zone: Option<String>,
    /// Free-form region name (e.g. `prairie`, `midlands`), if known.
    #[serde(default)]
    pub region: Option<String>,
    /// Latitude in decimal degrees, if known.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// The year the season starts in. All dates are derived from it.
    pub year: i32,
    /// Optional terrain inputs.
    #[serde(default)]
    pub microclimate: Option<MicroclimateFactors>,
}

/// Frost dates as reported by a single climate source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FrostRecord {
    /// Average last spring frost, in the location's own calendar.
    pub last_frost: MonthDay,
    /// Average first autumn frost, in the location's own calendar.
    pub first_frost: MonthDay,
    /// Zone name as the source reports it.
    pub zone_name: String,
    /// Zone system, when the source knows it.
    #[serde(default)]
    pub zone_system: Option<ZoneSystem>,
}

/// Resolved frost dates and metadata for one location.
///
/// Frost dates are real dates in the location's own calendar, and first
/// frost always follows last frost: a southern profile's first frost lies in
/// the year after its last frost. `season_offset_months` relates local
/// months to the northern-equivalent season and only enters month windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ClimateProfile {
    /// Average last spring frost.
    pub last_frost: NaiveDate,
    /// Average first autumn frost. Always after `last_frost`.
    pub first_frost: NaiveDate,
    /// Zone name.
    pub zone_name: String,
    /// Zone system.
    pub zone_system: ZoneSystem,
    /// Hemisphere.
    pub hemisphere: Hemisphere,
    /// Terrain correction already folded into the dates.
    pub microclimate: Option<MicroclimateDelta>,
    /// How much the frost dates can be trusted, 0.0-1.0.
    pub confidence: f64,
    /// Months between the hemispheres' seasons.
    pub season_offset_months: i32,
}

impl ClimateProfile {
    /// Months between a local month index and the northern-equivalent one:
    /// zero in the north, the season offset in the south.
    pub const fn season_shift(&self) -> i32 {
        match self.hemisphere {
            Hemisphere::Northern => 0,
            Hemisphere::Southern => self.season_offset_months,
        }
    }
}

/// Shift a date by a signed number of months.
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let magnitude = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

// ---------------------------------------------------------------------------
// Plant catalog
// ---------------------------------------------------------------------------

/// Days-to-maturity as published in a catalog. Signed so that bad data can be
/// detected and rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DaysToMaturity {
    /// Earliest harvest, in days after planting.
    pub min: i32,
    /// Latest first harvest, in days after planting.
    pub max: i32,
}

/// Indoor seed-start section of a catalog growing calendar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct IndoorSeedStart {
    /// How many weeks before last frost sowing may begin.
    pub weeks_before_last_frost: f64,
}

/// Spring direct-sow section of a catalog growing calendar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SpringSowing {
    /// Weeks relative to last frost (negative = before).
    pub weeks_from_last_frost: f64,
}

/// Autumn direct-sow section of a catalog growing calendar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct FallSowing {
    /// Weeks before first frost; 8 when omitted.
    #[serde(default)]
    pub weeks_before_first_frost: Option<f64>,
}

/// Direct-sow section of a catalog growing calendar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DirectSow {
    /// Spring sowing, if the plant is sown in spring.
    #[serde(default)]
    pub spring: Option<SpringSowing>,
    /// Autumn sowing, if the plant is sown in autumn.
    #[serde(default)]
    pub fall: Option<FallSowing>,
}

/// Transplant section of a catalog growing calendar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Transplant {
    /// Weeks after last frost seedlings go out.
    pub weeks_after_last_frost: f64,
}

/// Succession section of a catalog growing calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SuccessionSettings {
    /// Days between sowings.
    pub interval_days: u32,
    /// Upper bound on sowings per season.
    #[serde(default)]
    pub max_plantings: Option<u32>,
}

/// A catalog-provided growing calendar with frost-relative offsets.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct GrowingCalendar {
    /// Indoor seed starting.
    pub indoor_seed_start: Option<IndoorSeedStart>,
    /// Direct sowing outdoors.
    pub direct_sow: Option<DirectSow>,
    /// Transplanting seedlings outdoors.
    pub transplant: Option<Transplant>,
    /// Repeat sowing cadence.
    pub succession_planting: Option<SuccessionSettings>,
}

impl GrowingCalendar {
    /// True when the calendar carries no timing information at all.
    pub const fn is_empty(&self) -> bool {
        self.indoor_seed_start.is_none() && self.direct_sow.is_none() && self.transplant.is_none()
    }
}

/// A plant as it arrives from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlantIdentity {
    /// Common name, possibly with a variety (e.g. `Cherry Tomato 'Sungold'`).
    pub name: String,
    /// Catalog growing calendar, when the catalog has one.
    #[serde(default)]
    pub calendar: Option<GrowingCalendar>,
    /// Catalog days-to-maturity.
    #[serde(default)]
    pub days_to_maturity: Option<DaysToMaturity>,
    /// Minimum soil temperature for germination, in °F.
    #[serde(default)]
    pub min_soil_temperature_f: Option<f64>,
}

impl PlantIdentity {
    /// A plant known only by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            calendar: None,
            days_to_maturity: None,
            min_soil_temperature_f: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved rule
// ---------------------------------------------------------------------------

/// A pair of signed week offsets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WeekRange {
    /// Offset of the window's first day.
    pub from: f64,
    /// Offset of the window's last day.
    pub to: f64,
}

impl WeekRange {
    /// Create a week range.
    pub const fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }
}

/// Validated days-to-maturity range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MaturityRange {
    /// Earliest harvest, in days after planting.
    pub min: u32,
    /// Latest first harvest, in days after planting. Never below `min`.
    pub max: u32,
}

impl MaturityRange {
    /// Create a maturity range.
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

/// An explicit start/end month pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MonthSpan {
    /// First month.
    pub start: Month,
    /// Last month (may exceed 11 when the span crosses New Year).
    pub end: Month,
}

/// Frost-relative timing for one plant, whichever tier produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlantRule {
    /// Indoor sowing weeks relative to last frost. `None` for direct-sow plants.
    pub indoor_offset_weeks: Option<WeekRange>,
    /// Outdoor sowing/transplant weeks.
    pub outdoor_offset_weeks: Option<WeekRange>,
    /// Frost date the outdoor start is measured from.
    pub outdoor_relative_to: FrostReference,
    /// Frost date the outdoor end is measured from.
    pub outdoor_end_relative_to: FrostReference,
    /// Days from planting to harvest.
    pub days_to_maturity: MaturityRange,
    /// Preferred days between successive sowings.
    pub succession_interval_days: Option<u32>,
    /// Upper bound on successive sowings.
    pub succession_max_plantings: Option<u32>,
    /// Minimum soil temperature for germination, in °F.
    pub min_soil_temperature_f: Option<f64>,
    /// Fixed indoor months that replace the frost-relative indoor window.
    pub indoor_month_override: Option<MonthSpan>,
    /// Which tier produced this rule.
    pub source: RuleSource,
}

/// Weather observations that nudge the computed window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WeatherDelta {
    /// Observed minus historical air temperature, °F.
    pub temperature_anomaly_f: f64,
    /// Current soil temperature, °F.
    #[serde(default)]
    pub soil_temperature_f: Option<f64>,
}

/// Plant type paired with identity, as the catalog lists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct CatalogEntry {
    /// The plant.
    #[serde(flatten)]
    pub plant: PlantIdentity,
    /// Its category.
    #[serde(default)]
    pub plant_type: PlantType,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn leap_day_falls_back() {
        let d = MonthDay::new(2, 29);
        assert_eq!(d.in_year(2023), NaiveDate::from_ymd_opt(2023, 2, 28));
        assert_eq!(d.in_year(2024), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(MonthDay::new(4, 31).in_year(2024), None);
    }

    #[test]
    fn season_shift_by_hemisphere() {
        let mut profile = ClimateProfile {
            last_frost: NaiveDate::from_ymd_opt(2025, 8, 15).unwrap(),
            first_frost: NaiveDate::from_ymd_opt(2026, 5, 15).unwrap(),
            zone_name: "3".to_owned(),
            zone_system: ZoneSystem::Australian,
            hemisphere: Hemisphere::Southern,
            microclimate: None,
            confidence: 0.7,
            season_offset_months: DEFAULT_SEASON_OFFSET_MONTHS,
        };
        assert_eq!(profile.season_shift(), 6);
        profile.hemisphere = Hemisphere::Northern;
        assert_eq!(profile.season_shift(), 0);
    }

    #[test]
    fn plant_identity_wire_format() {
        let json = r#"{
            "name": "Bush Bean",
            "calendar": { "directSow": { "spring": { "weeksFromLastFrost": 1 } } },
            "daysToMaturity": { "min": 50, "max": 60 }
        }"#;
        let plant: PlantIdentity = serde_json::from_str(json).unwrap();
        let calendar = plant.calendar.unwrap();
        assert!(calendar.indoor_seed_start.is_none());
        assert!(!calendar.is_empty());
        assert_eq!(
            plant.days_to_maturity,
            Some(DaysToMaturity { min: 50, max: 60 })
        );
    }

    #[test]
    fn shift_months_both_directions() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(shift_months(d, 6), NaiveDate::from_ymd_opt(2024, 9, 30));
        assert_eq!(shift_months(d, -6), NaiveDate::from_ymd_opt(2023, 9, 30));
    }
}
