//! Terrain corrections to published frost dates.
//!
//! Each factor contributes an independent day offset; offsets are summed.
//! Higher ground thaws later and freezes earlier, a south-facing slope warms
//! sooner in spring, a north-facing slope cools sooner in autumn, and nearby
//! water moderates both ends of the season.

use furrow_types::{MicroclimateDelta, MicroclimateFactors};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Days of frost-date shift per 100 m of elevation.
pub const DAYS_PER_100M: f64 = 1.5;

/// Slopes at or below this many degrees are treated as flat.
pub const MIN_EFFECTIVE_SLOPE_DEG: f64 = 5.0;

/// Degrees of slope per day of shift.
pub const SLOPE_DEG_PER_DAY: f64 = 5.0;

/// Water bodies closer than this distance moderate frost.
pub const WATER_PROXIMITY_LIMIT: f64 = 3.0;

/// Days earlier the last frost comes next to water.
pub const WATER_LAST_FROST_DAYS: i32 = 3;

/// Days later the first frost comes next to water.
pub const WATER_FIRST_FROST_DAYS: i32 = 7;

// ---------------------------------------------------------------------------
// Delta
// ---------------------------------------------------------------------------

/// Round half away from negative infinity, matching how published
/// adjustment tables round (`2.5 -> 3`, `-2.5 -> -2`).
// Inputs are terrain measurements; the result is a handful of days.
#[allow(clippy::cast_possible_truncation)]
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Whether an aspect (degrees clockwise from north) faces south.
pub fn faces_south(aspect_deg: f64) -> bool {
    (135.0..=225.0).contains(&aspect_deg)
}

/// Whether an aspect (degrees clockwise from north) faces north.
pub fn faces_north(aspect_deg: f64) -> bool {
    aspect_deg >= 315.0 || aspect_deg <= 45.0
}

/// Sum the terrain factors into a frost-date delta.
pub fn terrain_delta(factors: &MicroclimateFactors) -> MicroclimateDelta {
    let mut delta = MicroclimateDelta::default();

    if let Some(elevation) = factors.elevation_m {
        let days = round_half_up(elevation / 100.0 * DAYS_PER_100M);
        delta.last_frost_days = delta.last_frost_days.saturating_add(days);
        delta.first_frost_days = delta.first_frost_days.saturating_sub(days);
    }

    if let (Some(slope), Some(aspect)) = (factors.slope_deg, factors.aspect_deg) {
        if slope > MIN_EFFECTIVE_SLOPE_DEG {
            let days = round_half_up(slope / SLOPE_DEG_PER_DAY);
            if faces_south(aspect) {
                delta.last_frost_days = delta.last_frost_days.saturating_sub(days);
            } else if faces_north(aspect) {
                delta.first_frost_days = delta.first_frost_days.saturating_sub(days);
            }
        }
    }

    if let Some(distance) = factors.water_distance {
        if distance < WATER_PROXIMITY_LIMIT {
            delta.last_frost_days = delta.last_frost_days.saturating_sub(WATER_LAST_FROST_DAYS);
            delta.first_frost_days = delta.first_frost_days.saturating_add(WATER_FIRST_FROST_DAYS);
        }
    }

    delta
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_sea_level_site_has_no_delta() {
        let delta = terrain_delta(&MicroclimateFactors::default());
        assert!(delta.is_zero());
    }

    #[test]
    fn elevation_delays_spring_and_advances_autumn() {
        let factors = MicroclimateFactors {
            elevation_m: Some(500.0),
            ..MicroclimateFactors::default()
        };
        let delta = terrain_delta(&factors);
        // 500 / 100 * 1.5 = 7.5 -> 8
        assert_eq!(delta.last_frost_days, 8);
        assert_eq!(delta.first_frost_days, -8);
    }

    #[test]
    fn south_slope_advances_last_frost() {
        let factors = MicroclimateFactors {
            slope_deg: Some(15.0),
            aspect_deg: Some(180.0),
            ..MicroclimateFactors::default()
        };
        let delta = terrain_delta(&factors);
        assert_eq!(delta.last_frost_days, -3);
        assert_eq!(delta.first_frost_days, 0);
    }

    #[test]
    fn north_slope_advances_first_frost() {
        let factors = MicroclimateFactors {
            slope_deg: Some(12.0),
            aspect_deg: Some(350.0),
            ..MicroclimateFactors::default()
        };
        let delta = terrain_delta(&factors);
        // 12 / 5 = 2.4 -> 2
        assert_eq!(delta.last_frost_days, 0);
        assert_eq!(delta.first_frost_days, -2);
    }

    #[test]
    fn gentle_or_sideways_slope_is_ignored() {
        let gentle = MicroclimateFactors {
            slope_deg: Some(5.0),
            aspect_deg: Some(180.0),
            ..MicroclimateFactors::default()
        };
        assert!(terrain_delta(&gentle).is_zero());

        let east = MicroclimateFactors {
            slope_deg: Some(20.0),
            aspect_deg: Some(90.0),
            ..MicroclimateFactors::default()
        };
        assert!(terrain_delta(&east).is_zero());
    }

    #[test]
    fn factors_are_additive() {
        let factors = MicroclimateFactors {
            elevation_m: Some(200.0),
            slope_deg: Some(10.0),
            aspect_deg: Some(200.0),
            water_distance: Some(1.0),
        };
        let delta = terrain_delta(&factors);
        // elevation +3/-3, slope -2 on last frost, water -3/+7
        assert_eq!(delta.last_frost_days, -2);
        assert_eq!(delta.first_frost_days, 4);
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.4), 2);
        assert_eq!(round_half_up(-2.5), -2);
    }
}
