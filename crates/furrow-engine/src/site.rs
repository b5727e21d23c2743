//! Site profile adjustments.
//!
//! Observations about a garden (slope, nearby water, windbreaks, urban
//! heat) become a [`SeasonalAdjustment`]: how many days earlier spring work
//! can start and how many days later autumn work can continue. These are
//! applied to concrete planting dates after the schedule is computed.

use chrono::{Datelike, NaiveDate};

use furrow_types::{
    AdjustmentEffect, CompassDirection, HeatIslandIntensity, PlantingDates, SeasonalAdjustment,
    SiteProfile, SlopeSeverity, WaterBody, WaterBodyKind,
};

use crate::calendar::add_days;
use crate::error::EngineError;
use crate::microclimate::round_half_up;

/// Beyond this distance a water body has half its effect.
pub const WATER_NEAR_LIMIT_M: f64 = 500.0;

/// Beyond this distance a water body has a third of its effect.
pub const WATER_FAR_LIMIT_M: f64 = 1000.0;

/// Spring days gained from a windbreak on the cold side.
pub const SHELTER_SPRING_DAYS: i32 = 2;

/// Zero-based months whose harvest dates follow the spring adjustment
/// (April to September).
const SPRING_HARVEST_MONTHS: std::ops::RangeInclusive<u32> = 3..=8;

const fn slope_days(severity: SlopeSeverity) -> i32 {
    match severity {
        SlopeSeverity::Gentle => 3,
        SlopeSeverity::Moderate => 5,
        SlopeSeverity::Steep => 7,
    }
}

const fn heat_island_days(intensity: HeatIslandIntensity) -> i32 {
    match intensity {
        HeatIslandIntensity::Mild => 3,
        HeatIslandIntensity::Moderate => 5,
        HeatIslandIntensity::Strong => 7,
    }
}

/// Spring delay and autumn extension for a water body at close range.
const fn water_days(kind: WaterBodyKind) -> (i32, i32) {
    match kind {
        WaterBodyKind::SmallPond => (1, 2),
        WaterBodyKind::LargePond | WaterBodyKind::Stream => (2, 3),
        WaterBodyKind::Lake => (4, 5),
        WaterBodyKind::Ocean => (7, 10),
    }
}

fn damp_by_distance(days: i32, distance_m: f64) -> i32 {
    let divisor = if distance_m > WATER_FAR_LIMIT_M {
        3.0
    } else if distance_m > WATER_NEAR_LIMIT_M {
        2.0
    } else {
        return days;
    };
    round_half_up(f64::from(days) / divisor)
}

fn water_adjustment(water: &WaterBody) -> (i32, i32) {
    let (spring_delay, fall_extension) = water_days(water.kind);
    (
        damp_by_distance(spring_delay, water.distance_m).saturating_neg(),
        damp_by_distance(fall_extension, water.distance_m),
    )
}

/// Sum a site profile into seasonal day shifts.
pub fn seasonal_adjustment(site: &SiteProfile) -> SeasonalAdjustment {
    let mut spring: i32 = 0;
    let mut fall: i32 = 0;

    if let Some(slope) = site.slope {
        let days = slope_days(slope.severity);
        if slope.direction.is_southerly() {
            spring = spring.saturating_add(days);
            fall = fall.saturating_add(days);
        } else if slope.direction.is_northerly() {
            spring = spring.saturating_sub(days);
            fall = fall.saturating_sub(days);
        }
    }

    if let Some(intensity) = site.urban_heat_island {
        let days = heat_island_days(intensity);
        spring = spring.saturating_add(days);
        fall = fall.saturating_add(days);
    }

    if let Some(water) = &site.water_body {
        let (spring_days, fall_days) = water_adjustment(water);
        spring = spring.saturating_add(spring_days);
        fall = fall.saturating_add(fall_days);
    }

    if site
        .shelter
        .is_some_and(|s| s.direction.is_northerly() || s.direction == CompassDirection::All)
    {
        spring = spring.saturating_add(SHELTER_SPRING_DAYS);
    }

    for factor in &site.custom_factors {
        let days = factor.days.saturating_abs();
        match factor.effect {
            AdjustmentEffect::Earlier => {
                spring = spring.saturating_add(days);
                fall = fall.saturating_sub(days);
            }
            AdjustmentEffect::Later => {
                spring = spring.saturating_sub(days);
                fall = fall.saturating_add(days);
            }
        }
    }

    SeasonalAdjustment {
        spring_days: spring,
        fall_days: fall,
    }
}

fn shift(
    date: Option<NaiveDate>,
    days: i32,
    field: &'static str,
) -> Result<Option<NaiveDate>, EngineError> {
    date.map(|d| add_days(d, i64::from(days)).ok_or_else(|| EngineError::date_out_of_range(field)))
        .transpose()
}

fn shift_harvest(
    date: Option<NaiveDate>,
    adjustment: SeasonalAdjustment,
    field: &'static str,
) -> Result<Option<NaiveDate>, EngineError> {
    match date {
        Some(d) if SPRING_HARVEST_MONTHS.contains(&d.month0()) => {
            shift(Some(d), adjustment.spring_days.saturating_neg(), field)
        }
        other => shift(other, adjustment.fall_days, field),
    }
}

/// Apply seasonal shifts to concrete planting dates.
///
/// Spring activities (indoor start, spring sowing, transplanting) move
/// earlier by `spring_days`; autumn sowing moves later by `fall_days`.
/// Harvest dates falling April to September follow the spring shift, the
/// rest follow the autumn shift.
pub fn apply_site_adjustments(
    dates: PlantingDates,
    adjustment: SeasonalAdjustment,
) -> Result<PlantingDates, EngineError> {
    let earlier = adjustment.spring_days.saturating_neg();
    Ok(PlantingDates {
        indoor_seed_start: shift(dates.indoor_seed_start, earlier, "indoor seed start")?,
        direct_sow_spring: shift(dates.direct_sow_spring, earlier, "spring sowing")?,
        direct_sow_fall: shift(dates.direct_sow_fall, adjustment.fall_days, "fall sowing")?,
        transplant: shift(dates.transplant, earlier, "transplant")?,
        harvest_begin: shift_harvest(dates.harvest_begin, adjustment, "harvest begin")?,
        harvest_end: shift_harvest(dates.harvest_end, adjustment, "harvest end")?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
