//! Computed schedule types: planting and harvest windows, succession plans,
//! site adjustments, and regional month calendars.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::enums::{
    AdjustmentEffect, CompassDirection, HeatIslandIntensity, ShelterKind, SlopeSeverity,
    SowingMethod, WaterBodyKind,
};
use crate::structs::Month;

// ---------------------------------------------------------------------------
// Windows
// ---------------------------------------------------------------------------

/// Month-level sowing windows for one plant at one location.
///
/// In canonical form `outdoor_start` is in `0..=11` and `outdoor_end` lies in
/// `outdoor_start..=outdoor_start + 11`; the same holds for the indoor pair.
/// Either both indoor fields are set or neither is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlantingWindow {
    /// First month to start seeds indoors.
    pub indoor_start: Option<Month>,
    /// Last month to start seeds indoors.
    pub indoor_end: Option<Month>,
    /// First month to sow or transplant outdoors.
    pub outdoor_start: Month,
    /// Last month to sow or transplant outdoors.
    pub outdoor_end: Month,
    /// Trust in the window, 0.4-0.95.
    pub confidence: f64,
}

impl PlantingWindow {
    /// Whether the plant is started indoors at all.
    pub const fn has_indoor(&self) -> bool {
        self.indoor_start.is_some()
    }
}

/// Month-level harvest window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HarvestWindow {
    /// First harvest month.
    pub start: Month,
    /// Last harvest month.
    pub end: Month,
}

// ---------------------------------------------------------------------------
// Succession
// ---------------------------------------------------------------------------

/// One sowing in a succession plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SuccessionPlanting {
    /// 1-based position in the plan.
    pub planting_number: u32,
    /// Sowing date.
    pub planting_date: NaiveDate,
    /// Earliest harvest.
    pub harvest_start: NaiveDate,
    /// Latest first harvest.
    pub harvest_end: NaiveDate,
    /// True unless the dates come from the plant's own catalog calendar.
    pub estimated: bool,
}

/// How much consecutive harvests overlap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct HarvestOverlap {
    /// Days where one harvest is still running when the next begins.
    pub overlap_days: u32,
    /// Sum of the individual harvest lengths, in days.
    pub total_harvest_days: u32,
    /// `overlap_days / total_harvest_days`, as a percentage.
    pub overlap_percent: f64,
}

/// A staggered sowing schedule.
///
/// Plantings are strictly increasing by `interval_days` and none is later
/// than `last_possible_planting_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SuccessionPlan {
    /// The sowings, in date order.
    pub plantings: Vec<SuccessionPlanting>,
    /// Days between sowings.
    pub interval_days: u32,
    /// Latest sowing that still matures before first frost.
    pub last_possible_planting_date: NaiveDate,
    /// Number of sowings the caller asked for.
    pub requested_count: u32,
    /// True when the season ran out before `requested_count` was reached.
    pub truncated: bool,
    /// Harvest overlap between consecutive sowings.
    pub overlap: HarvestOverlap,
}

// ---------------------------------------------------------------------------
// Site profile
// ---------------------------------------------------------------------------

/// Slope of the growing area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SlopeFactor {
    /// Direction the slope faces.
    pub direction: CompassDirection,
    /// How steep it is.
    pub severity: SlopeSeverity,
}

/// A water body near the growing area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct WaterBody {
    /// What kind of water.
    pub kind: WaterBodyKind,
    /// Distance from the beds, in metres.
    pub distance_m: f64,
}

/// A windbreak next to the growing area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Shelter {
    /// What provides the shelter.
    pub kind: ShelterKind,
    /// Which side of the site it stands on.
    pub direction: CompassDirection,
}

/// A user-entered adjustment not covered by the other factors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CustomFactor {
    /// Label shown to the user.
    pub name: String,
    /// Which way it moves the season.
    pub effect: AdjustmentEffect,
    /// Magnitude in days.
    pub days: i32,
}

/// A gardener's description of their site.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct SiteProfile {
    /// Slope, if any.
    pub slope: Option<SlopeFactor>,
    /// Urban heat island strength, if any.
    pub urban_heat_island: Option<HeatIslandIntensity>,
    /// Nearest significant water body, if any.
    pub water_body: Option<WaterBody>,
    /// Windbreak, if any.
    pub shelter: Option<Shelter>,
    /// Extra factors.
    pub custom_factors: Vec<CustomFactor>,
}

/// Day shifts derived from a [`SiteProfile`].
///
/// Positive `spring_days` means spring planting can start earlier; positive
/// `fall_days` means autumn planting can continue later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SeasonalAdjustment {
    /// Spring advance, in days.
    pub spring_days: i32,
    /// Autumn extension, in days.
    pub fall_days: i32,
}

/// Concrete activity dates for one plant, before or after site adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "bindings/")]
pub struct PlantingDates {
    /// Start seeds indoors.
    pub indoor_seed_start: Option<NaiveDate>,
    /// Sow outdoors in spring.
    pub direct_sow_spring: Option<NaiveDate>,
    /// Sow outdoors in autumn.
    pub direct_sow_fall: Option<NaiveDate>,
    /// Plant seedlings out.
    pub transplant: Option<NaiveDate>,
    /// First harvest.
    pub harvest_begin: Option<NaiveDate>,
    /// Last harvest.
    pub harvest_end: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Regional calendars
// ---------------------------------------------------------------------------

/// A month-by-month sowing guide for one climate zone.
///
/// Keys of `months` are lowercase three-letter month names (`jan`..`dec`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct RegionalCalendar {
    /// Zone name, e.g. `Australia - temperate`.
    pub zone_name: String,
    /// Activities per month. Accepts either a list of methods or a code
    /// string such as `"ST"` per month.
    #[serde(deserialize_with = "deserialize_month_methods")]
    pub months: BTreeMap<String, Vec<SowingMethod>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MonthMethods {
    Codes(String),
    List(Vec<SowingMethod>),
}

fn deserialize_month_methods<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Vec<SowingMethod>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, MonthMethods>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(month, methods)| {
            let methods = match methods {
                MonthMethods::Codes(codes) => SowingMethod::parse_codes(&codes),
                MonthMethods::List(list) => list,
            };
            (month, methods)
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
