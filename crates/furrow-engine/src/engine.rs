//! The [`PlanningEngine`] facade.
//!
//! Wires a climate resolver, rule book, window calculator, and succession
//! scheduler from one [`EngineConfig`]. The engine holds no mutable state:
//! every method is a pure function of its arguments and the configuration,
//! so one instance can be shared freely across threads.

use tracing::debug;

use furrow_types::{
    CatalogEntry, ClimateProfile, FrostReference, HarvestWindow, Location, MaturityRange, Month,
    PlantIdentity, PlantRule, PlantType, PlantingDates, PlantingWindow, SuccessionPlan,
    WeatherDelta,
};

use crate::calendar::{add_days, add_weeks};
use crate::climate::ClimateResolver;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::harvest;
use crate::rules::RuleBook;
use crate::succession::SuccessionScheduler;
use crate::window::{WindowCalculator, outdoor_dates};

/// Planting schedule computation engine.
#[derive(Debug)]
pub struct PlanningEngine {
    climate: ClimateResolver,
    rules: RuleBook,
    windows: WindowCalculator,
    succession: SuccessionScheduler,
}

impl Default for PlanningEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl PlanningEngine {
    /// Engine with the built-in climate sources and rule tables.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_parts(
            ClimateResolver::with_defaults(config.climate.clone()),
            RuleBook::with_config(&config.rules),
            config,
        )
    }

    /// Engine with caller-supplied climate sources and rule tiers.
    pub fn with_parts(climate: ClimateResolver, rules: RuleBook, config: &EngineConfig) -> Self {
        Self {
            climate,
            rules,
            windows: WindowCalculator::from_config(config),
            succession: SuccessionScheduler::from_config(config),
        }
    }

    /// Resolve a location to a climate profile.
    ///
    /// # Errors
    ///
    /// [`EngineError::LocationUnresolved`] when no source knows the location.
    pub fn resolve_climate(&self, location: &Location) -> Result<ClimateProfile, EngineError> {
        self.climate.resolve(location)
    }

    /// Resolve the rule for a plant. Never fails.
    pub fn resolve_rule(&self, plant: &PlantIdentity, plant_type: PlantType) -> PlantRule {
        self.rules.resolve(plant, plant_type)
    }

    /// Resolve the rule for a plant, applying country-scoped table entries.
    pub fn resolve_rule_for_country(
        &self,
        plant: &PlantIdentity,
        plant_type: PlantType,
        country: &str,
    ) -> PlantRule {
        self.rules
            .resolve_for_country(plant, plant_type, Some(country))
    }

    /// Resolve the rule for a catalog entry.
    pub fn rule_for_entry(&self, entry: &CatalogEntry, country: Option<&str>) -> PlantRule {
        self.rules
            .resolve_for_country(&entry.plant, entry.plant_type, country)
    }

    /// Compute the month-level planting window.
    ///
    /// # Errors
    ///
    /// [`EngineError::DateOutOfRange`] if an offset leaves the calendar.
    pub fn compute_window(
        &self,
        rule: &PlantRule,
        climate: &ClimateProfile,
        weather: Option<&WeatherDelta>,
    ) -> Result<PlantingWindow, EngineError> {
        self.windows.compute(rule, climate, weather)
    }

    /// Generate a succession plan.
    ///
    /// The interval defaults to the rule's, then the configured default.
    /// The count defaults to the configured default and never exceeds the
    /// rule's maximum number of sowings.
    ///
    /// # Errors
    ///
    /// [`EngineError::DateOutOfRange`] if a date leaves the calendar.
    pub fn generate_plan(
        &self,
        rule: &PlantRule,
        climate: &ClimateProfile,
        interval_days: Option<u32>,
        requested_count: Option<u32>,
        microclimate_extra_days: i32,
    ) -> Result<SuccessionPlan, EngineError> {
        let defaults = &self.succession.config;
        let interval = interval_days
            .or(rule.succession_interval_days)
            .unwrap_or(defaults.default_interval_days);
        let mut count = requested_count.unwrap_or(defaults.default_count);
        if let Some(max) = rule.succession_max_plantings {
            count = count.min(max);
        }
        debug!(interval, count, source = ?rule.source, "generating succession plan");
        self.succession
            .generate_plan(rule, climate, interval, count, microclimate_extra_days)
    }

    /// Harvest months for a single planting month.
    pub fn compute_harvest(planting_month: Month, maturity: MaturityRange) -> HarvestWindow {
        harvest::compute_harvest(planting_month, maturity)
    }

    /// Key dates for a plant at a location.
    ///
    /// Plants with an indoor window get a seed-start and a transplant date;
    /// the rest get a spring sowing date, or an autumn one when the outdoor
    /// window is measured from first frost. Harvest runs from the earliest
    /// maturity of the first sowing to the latest maturity of the last.
    ///
    /// # Errors
    ///
    /// [`EngineError::DateOutOfRange`] if a date leaves the calendar.
    pub fn planting_dates(
        rule: &PlantRule,
        climate: &ClimateProfile,
    ) -> Result<PlantingDates, EngineError> {
        let indoor_seed_start = rule
            .indoor_offset_weeks
            .map(|weeks| {
                add_weeks(climate.last_frost, weeks.from)
                    .ok_or_else(|| EngineError::date_out_of_range("indoor seed start"))
            })
            .transpose()?;

        let (start, end) = outdoor_dates(rule, climate)?;

        let mut dates = PlantingDates {
            indoor_seed_start,
            ..PlantingDates::default()
        };
        if indoor_seed_start.is_some() {
            dates.transplant = Some(start);
        } else if rule.outdoor_offset_weeks.is_some()
            && rule.outdoor_relative_to == FrostReference::FirstFrost
        {
            dates.direct_sow_fall = Some(start);
        } else {
            dates.direct_sow_spring = Some(start);
        }

        dates.harvest_begin = Some(
            add_days(start, i64::from(rule.days_to_maturity.min))
                .ok_or_else(|| EngineError::date_out_of_range("harvest begin"))?,
        );
        dates.harvest_end = Some(
            add_days(end, i64::from(rule.days_to_maturity.max))
                .ok_or_else(|| EngineError::date_out_of_range("harvest end"))?,
        );
        Ok(dates)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
