//! End-to-end properties of the planting schedule engine.
//!
//! Each test drives the public API the way a calendar front end would:
//! resolve a location, resolve a plant rule, then compute windows and
//! succession plans.

// Integration tests use unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::float_cmp,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    clippy::missing_panics_doc
)]

use approx::assert_relative_eq;
use chrono::NaiveDate;
use furrow_engine::calendar::{canonical_span, normalize_month, span_months};
use furrow_engine::climate::FrostTableEntry;
use furrow_engine::{ClimateResolver, EngineConfig, FrostTable, PlanningEngine, RuleBook};
use furrow_types::{
    ClimateProfile, DaysToMaturity, FrostReference, GrowingCalendar, Hemisphere, IndoorSeedStart,
    Location, MaturityRange, MonthDay, PlantIdentity, PlantRule, PlantType, PlantingWindow,
    RuleSource, Transplant, WeatherDelta, WeekRange, ZoneSystem,
};

// =============================================================================
// Fixtures
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn location(
    country: &str,
    postal_code: Option<&str>,
    zone: Option<&str>,
    region: Option<&str>,
) -> Location {
    Location {
        country: country.to_owned(),
        postal_code: postal_code.map(str::to_owned),
        zone: zone.map(str::to_owned),
        region: region.map(str::to_owned),
        latitude: None,
        year: 2024,
        microclimate: None,
    }
}

fn locations() -> Vec<Location> {
    vec![
        location("US", Some("90210"), None, None),
        location("US", Some("10001"), None, None),
        location("US", Some("48104"), None, None),
        location("CA", Some("M5V 3L9"), None, None),
        location("GB", Some("SW1A 1AA"), None, None),
        location("AU", Some("3000"), None, None),
        location("US", None, Some("3b"), None),
        location("US", None, Some("9a"), None),
        location("UK", None, None, Some("Scotland")),
        location("CA", None, None, Some("prairie")),
        location("AU", None, None, Some("northern territory")),
    ]
}

fn plants() -> Vec<(PlantIdentity, PlantType)> {
    let names = [
        ("Tomato", PlantType::Vegetable),
        ("Lettuce", PlantType::Vegetable),
        ("Carrot", PlantType::Vegetable),
        ("Garlic", PlantType::Vegetable),
        ("Okra", PlantType::Vegetable),
        ("Basil", PlantType::Herb),
        ("Cilantro", PlantType::Herb),
        ("Sunflower", PlantType::Flower),
        ("Cosmos", PlantType::Flower),
        ("Strawberry", PlantType::Fruit),
    ];
    let mut plants: Vec<_> = names
        .iter()
        .map(|(name, kind)| (PlantIdentity::named(*name), *kind))
        .collect();
    plants.push((catalog_tomato(), PlantType::Vegetable));
    plants
}

fn catalog_tomato() -> PlantIdentity {
    PlantIdentity {
        name: "Cherokee Purple Tomato".to_owned(),
        calendar: Some(GrowingCalendar {
            indoor_seed_start: Some(IndoorSeedStart {
                weeks_before_last_frost: 6.0,
            }),
            transplant: Some(Transplant {
                weeks_after_last_frost: 2.0,
            }),
            ..GrowingCalendar::default()
        }),
        days_to_maturity: Some(DaysToMaturity { min: 60, max: 90 }),
        min_soil_temperature_f: Some(60.0),
    }
}

fn weather_cases() -> Vec<Option<WeatherDelta>> {
    vec![
        None,
        Some(WeatherDelta {
            temperature_anomaly_f: -8.0,
            soil_temperature_f: Some(40.0),
        }),
        Some(WeatherDelta {
            temperature_anomaly_f: 7.0,
            soil_temperature_f: Some(65.0),
        }),
    ]
}

fn northern_climate() -> ClimateProfile {
    ClimateProfile {
        last_frost: date(2024, 5, 1),
        first_frost: date(2024, 10, 15),
        zone_name: "6a".to_owned(),
        zone_system: ZoneSystem::Usda,
        hemisphere: Hemisphere::Northern,
        microclimate: None,
        confidence: 0.7,
        season_offset_months: 6,
    }
}

/// The northern season six months on, in the southern calendar.
fn southern_climate() -> ClimateProfile {
    ClimateProfile {
        last_frost: date(2024, 11, 1),
        first_frost: date(2025, 4, 15),
        hemisphere: Hemisphere::Southern,
        ..northern_climate()
    }
}

fn resolve_in(engine: &PlanningEngine, country: &str, postal: &str, year: i32) -> ClimateProfile {
    let mut loc = location(country, Some(postal), None, None);
    loc.year = year;
    engine.resolve_climate(&loc).unwrap()
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

/// Every window the engine produces over the fixture grid.
fn all_windows(engine: &PlanningEngine) -> Vec<PlantingWindow> {
    let mut windows = Vec::new();
    for loc in locations() {
        let climate = engine.resolve_climate(&loc).unwrap();
        for (plant, kind) in plants() {
            let rule = engine.resolve_rule_for_country(&plant, kind, &loc.country);
            for weather in weather_cases() {
                windows.push(engine.compute_window(&rule, &climate, weather.as_ref()).unwrap());
            }
        }
    }
    windows
}

// =============================================================================
// Window properties
// =============================================================================

#[test]
fn outdoor_end_never_precedes_start() {
    let engine = PlanningEngine::default();
    for window in all_windows(&engine) {
        assert!(window.outdoor_end >= window.outdoor_start, "{window:?}");
        assert!((0..12).contains(&window.outdoor_start), "{window:?}");
        if let (Some(start), Some(end)) = (window.indoor_start, window.indoor_end) {
            assert!(end >= start, "{window:?}");
        }
    }
}

#[test]
fn confidence_stays_in_bounds() {
    let engine = PlanningEngine::default();
    for window in all_windows(&engine) {
        assert!(
            (0.4..=0.95).contains(&window.confidence),
            "confidence {} out of bounds",
            window.confidence
        );
    }
}

#[test]
fn november_to_february_spans_three_months() {
    let (start, end) = canonical_span(10, 1);
    assert_eq!((start, end), (10, 13));
    assert_eq!(span_months(start, end), 3);
    assert_eq!(normalize_month(end), 1);
}

#[test]
fn southern_window_is_northern_shifted_by_six_months() {
    let engine = PlanningEngine::default();
    let rule = tomato_rule();
    let north = engine
        .compute_window(&rule, &northern_climate(), None)
        .unwrap();
    let south = engine
        .compute_window(&rule, &southern_climate(), None)
        .unwrap();

    let shifted = |m: i32| normalize_month(m + 6);
    assert_eq!(south.outdoor_start, shifted(north.outdoor_start));
    assert_eq!(normalize_month(south.outdoor_end), shifted(north.outdoor_end));
    assert_eq!(
        span_months(south.outdoor_start, south.outdoor_end),
        span_months(north.outdoor_start, north.outdoor_end)
    );
    assert_eq!(
        south.indoor_start.map(normalize_month),
        north.indoor_start.map(shifted)
    );
    assert_eq!(
        south.indoor_end.map(normalize_month),
        north.indoor_end.map(shifted)
    );
    assert_relative_eq!(south.confidence, north.confidence, epsilon = 1e-9);
}

#[test]
fn resolved_southern_location_matches_real_calendar() {
    let engine = PlanningEngine::default();
    let melbourne = resolve_in(&engine, "AU", "3000", 2025);
    assert_eq!(melbourne.hemisphere, Hemisphere::Southern);
    assert_eq!(melbourne.last_frost, date(2025, 8, 15));
    assert_eq!(melbourne.first_frost, date(2026, 5, 15));

    let rule = engine.resolve_rule(&catalog_tomato(), PlantType::Vegetable);
    let window = engine.compute_window(&rule, &melbourne, None).unwrap();
    // 2025-08-15 + 2 weeks = 2025-08-29
    assert_eq!(window.outdoor_start, 7);
    // 2026-05-15 - 2 weeks = 2026-05-01
    assert_eq!(window.outdoor_end, 16);
    // 2025-07-04 .. 2025-08-01
    assert_eq!(window.indoor_start, Some(6));
    assert_eq!(window.indoor_end, Some(7));
}

#[test]
fn southern_window_month_uses_real_month_lengths() {
    let config = EngineConfig::default();
    let canberra = FrostTable::new("canberra").with_entry(FrostTableEntry {
        country: "AU".to_owned(),
        postal_code: Some("2600".to_owned()),
        zone: None,
        last_frost: MonthDay::new(8, 17),
        first_frost: MonthDay::new(5, 1),
        zone_name: "2".to_owned(),
        zone_system: None,
    });
    let engine = PlanningEngine::with_parts(
        ClimateResolver::with_defaults(config.climate.clone()).with_source(canberra),
        RuleBook::with_config(&config.rules),
        &config,
    );
    let climate = resolve_in(&engine, "AU", "2600", 2025);
    assert_eq!(climate.last_frost, date(2025, 8, 17));

    let rule = engine.resolve_rule(&catalog_tomato(), PlantType::Vegetable);
    let window = engine.compute_window(&rule, &climate, None).unwrap();
    // 2025-08-31 is still August
    assert_eq!(window.outdoor_start, 7);

    let plan = engine
        .generate_plan(&rule, &climate, Some(14), Some(1), 0)
        .unwrap();
    assert_eq!(plan.plantings[0].planting_date, date(2025, 8, 31));
}

#[test]
fn direct_sow_only_has_no_indoor_months() {
    let engine = PlanningEngine::default();
    let mut rule = tomato_rule();
    rule.indoor_offset_weeks = None;
    let window = engine
        .compute_window(&rule, &northern_climate(), None)
        .unwrap();
    assert_eq!(window.indoor_start, None);
    assert_eq!(window.indoor_end, None);
}

#[test]
fn computations_are_repeatable() {
    let engine = PlanningEngine::default();
    let first = all_windows(&engine);
    let second = all_windows(&engine);
    assert_eq!(first, second);

    let rule = tomato_rule();
    let climate = northern_climate();
    let a = engine.generate_plan(&rule, &climate, Some(14), Some(6), 3).unwrap();
    let b = engine.generate_plan(&rule, &climate, Some(14), Some(6), 3).unwrap();
    assert_eq!(a, b);
}

// =============================================================================
// Succession properties
// =============================================================================

#[test]
fn tomato_succession_scenario() {
    let engine = PlanningEngine::default();
    let plan = engine
        .generate_plan(&tomato_rule(), &northern_climate(), Some(14), Some(3), 0)
        .unwrap();

    let dates: Vec<_> = plan.plantings.iter().map(|p| p.planting_date).collect();
    assert_eq!(dates, vec![date(2024, 5, 15), date(2024, 5, 29), date(2024, 6, 12)]);
    assert_eq!(plan.last_possible_planting_date, date(2024, 7, 3));
    for planting in &plan.plantings {
        assert_eq!(
            planting.harvest_start,
            planting.planting_date + chrono::Days::new(60)
        );
        assert_eq!(
            planting.harvest_end,
            planting.planting_date + chrono::Days::new(90)
        );
        assert!(planting.planting_date <= plan.last_possible_planting_date);
    }
}

#[test]
fn succession_cutoff_keeps_only_permitted_plantings() {
    let engine = PlanningEngine::default();
    let plan = engine
        .generate_plan(&tomato_rule(), &northern_climate(), Some(14), Some(10), 0)
        .unwrap();
    assert_eq!(plan.plantings.len(), 4);
    assert!(plan.truncated);
    assert!(
        plan.plantings
            .iter()
            .all(|p| p.planting_date <= plan.last_possible_planting_date)
    );
    let numbers: Vec<_> = plan.plantings.iter().map(|p| p.planting_number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[test]
fn southern_succession_counts_real_days() {
    let engine = PlanningEngine::default();
    let melbourne = resolve_in(&engine, "AU", "3000", 2025);
    let rule = engine.resolve_rule(&catalog_tomato(), PlantType::Vegetable);
    let plan = engine
        .generate_plan(&rule, &melbourne, Some(14), Some(3), 0)
        .unwrap();

    let dates: Vec<_> = plan.plantings.iter().map(|p| p.planting_date).collect();
    assert_eq!(
        dates,
        vec![date(2025, 8, 29), date(2025, 9, 12), date(2025, 9, 26)]
    );
    // 2026-05-15 less 90 days to maturity and the 14-day margin
    assert_eq!(plan.last_possible_planting_date, date(2026, 1, 31));
    assert_eq!(plan.plantings[0].harvest_start, date(2025, 10, 28));
    assert_eq!(plan.plantings[0].harvest_end, date(2025, 11, 27));
}

#[test]
fn fallback_rules_mark_plantings_estimated() {
    let engine = PlanningEngine::default();
    let rule = engine.resolve_rule(&PlantIdentity::named("Okra"), PlantType::Vegetable);
    assert_eq!(rule.source, RuleSource::TypeHeuristic);
    let plan = engine
        .generate_plan(&rule, &northern_climate(), Some(7), Some(2), 0)
        .unwrap();
    assert!(plan.plantings.iter().all(|p| p.estimated));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn configured_override_reaches_the_window() {
    let yaml = r"
rules:
  named_overrides:
    - key: cosmos
      country: GB
      indoor_months: { start: 2, end: 3 }
      outdoor_weeks: { from: 0.0, to: -4.0 }
";
    let config = EngineConfig::parse(yaml).unwrap();
    let engine = PlanningEngine::new(&config);
    let london = engine
        .resolve_climate(&location("GB", Some("SW1A 1AA"), None, None))
        .unwrap();
    let rule =
        engine.resolve_rule_for_country(&PlantIdentity::named("Cosmos"), PlantType::Flower, "GB");
    let window = engine.compute_window(&rule, &london, None).unwrap();
    assert_eq!(window.indoor_start, Some(2));
    assert_eq!(window.indoor_end, Some(3));
}
