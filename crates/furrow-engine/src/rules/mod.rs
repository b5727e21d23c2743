//! Plant rule resolution.
//!
//! A [`RuleBook`] is an ordered list of [`RuleTier`]s evaluated by one
//! generic resolver: the first tier that produces a rule wins. The default
//! order is
//!
//! 1. [`StructuredTier`] -- the plant's own catalog calendar
//! 2. [`NamedTable`] -- curated offsets matched by name
//! 3. [`HeuristicTable`] -- plant-type heuristics
//! 4. [`DefaultTier`] -- generic spring sowing, always matches
//!
//! Resolution never fails. A malformed catalog calendar is logged and the
//! next tier is tried.

mod heuristic;
mod named;
mod structured;

use tracing::{debug, warn};

use furrow_types::{
    FrostReference, MaturityRange, PlantIdentity, PlantRule, PlantType, RuleSource, WeekRange,
};

use crate::config::RulesConfig;
use crate::error::EngineError;

pub use heuristic::{HeuristicRule, HeuristicTable};
pub use named::{NamedEntry, NamedTable};
pub use structured::{StructuredTier, validate_maturity};

/// Maturity assumed when neither the catalog nor any table knows better.
pub const DEFAULT_MATURITY: MaturityRange = MaturityRange::new(60, 90);

/// Everything a tier may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleQuery<'a> {
    /// The plant.
    pub plant: &'a PlantIdentity,
    /// Its category.
    pub plant_type: PlantType,
    /// Country of the location, for country-scoped table entries.
    pub country: Option<&'a str>,
    /// Days to maturity: the plant's catalog value when valid, otherwise the
    /// first table estimate.
    pub maturity: MaturityRange,
}

/// One tier of the rule table.
pub trait RuleTier: Send + Sync + std::fmt::Debug {
    /// Provenance stamped on rules from this tier.
    fn source(&self) -> RuleSource;

    /// This tier's maturity estimate for the plant, if it has one.
    fn maturity_for(&self, _query: &RuleQuery<'_>) -> Option<MaturityRange> {
        None
    }

    /// The rule for the plant, `Ok(None)` if this tier does not cover it.
    ///
    /// An error means the tier covers the plant but its data is unusable.
    fn rule_for(&self, query: &RuleQuery<'_>) -> Result<Option<PlantRule>, EngineError>;
}

// ---------------------------------------------------------------------------
// DefaultTier
// ---------------------------------------------------------------------------

/// Indoor weeks relative to last frost for the default rule.
pub const DEFAULT_INDOOR_WEEKS: WeekRange = WeekRange::new(-4.0, -2.0);

/// Outdoor weeks for the default rule: two weeks after last frost until
/// eight weeks before first frost.
pub const DEFAULT_OUTDOOR_WEEKS: WeekRange = WeekRange::new(2.0, -8.0);

/// The catch-all tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultTier;

impl DefaultTier {
    /// The generic rule for a plant.
    pub fn rule(query: &RuleQuery<'_>) -> PlantRule {
        PlantRule {
            indoor_offset_weeks: Some(DEFAULT_INDOOR_WEEKS),
            outdoor_offset_weeks: Some(DEFAULT_OUTDOOR_WEEKS),
            outdoor_relative_to: FrostReference::LastFrost,
            outdoor_end_relative_to: FrostReference::FirstFrost,
            days_to_maturity: query.maturity,
            succession_interval_days: None,
            succession_max_plantings: None,
            min_soil_temperature_f: query.plant.min_soil_temperature_f,
            indoor_month_override: None,
            source: RuleSource::Default,
        }
    }
}

impl RuleTier for DefaultTier {
    fn source(&self) -> RuleSource {
        RuleSource::Default
    }

    fn maturity_for(&self, _query: &RuleQuery<'_>) -> Option<MaturityRange> {
        Some(DEFAULT_MATURITY)
    }

    fn rule_for(&self, query: &RuleQuery<'_>) -> Result<Option<PlantRule>, EngineError> {
        Ok(Some(Self::rule(query)))
    }
}

// ---------------------------------------------------------------------------
// RuleBook
// ---------------------------------------------------------------------------

/// The prioritized rule table.
#[derive(Debug)]
pub struct RuleBook {
    tiers: Vec<Box<dyn RuleTier>>,
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::with_config(&RulesConfig::default())
    }
}

impl RuleBook {
    /// A book with the given tiers, in priority order.
    pub fn new(tiers: Vec<Box<dyn RuleTier>>) -> Self {
        Self { tiers }
    }

    /// The standard four tiers, with configured named entries appended to
    /// the built-in table.
    pub fn with_config(config: &RulesConfig) -> Self {
        let named = NamedTable::builtin().with_entries(config.named_overrides.iter().cloned());
        Self::new(vec![
            Box::new(StructuredTier),
            Box::new(named),
            Box::new(HeuristicTable::builtin()),
            Box::new(DefaultTier),
        ])
    }

    /// Tier provenance in evaluation order.
    pub fn order(&self) -> Vec<RuleSource> {
        self.tiers.iter().map(|t| t.source()).collect()
    }

    /// Resolve a rule without country context.
    pub fn resolve(&self, plant: &PlantIdentity, plant_type: PlantType) -> PlantRule {
        self.resolve_for_country(plant, plant_type, None)
    }

    /// Resolve a rule, letting country-scoped table entries apply.
    pub fn resolve_for_country(
        &self,
        plant: &PlantIdentity,
        plant_type: PlantType,
        country: Option<&str>,
    ) -> PlantRule {
        let mut query = RuleQuery {
            plant,
            plant_type,
            country,
            maturity: DEFAULT_MATURITY,
        };
        query.maturity = plant
            .days_to_maturity
            .and_then(|raw| validate_maturity(raw).ok())
            .or_else(|| self.tiers.iter().find_map(|t| t.maturity_for(&query)))
            .unwrap_or(DEFAULT_MATURITY);

        for tier in &self.tiers {
            match tier.rule_for(&query) {
                Ok(Some(rule)) => {
                    debug!(plant = %plant.name, source = ?rule.source, "plant rule resolved");
                    return rule;
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(plant = %plant.name, tier = ?tier.source(), %err, "rule tier rejected, falling through");
                }
            }
        }

        debug!(plant = %plant.name, "no tier matched, using default rule");
        DefaultTier::rule(&query)
    }
}

/// Country codes are equal, treating `UK` as `GB`.
pub(crate) fn same_country(a: &str, b: &str) -> bool {
    let canonical = |c: &str| {
        let upper = c.trim().to_ascii_uppercase();
        if upper == "UK" { "GB".to_owned() } else { upper }
    };
    canonical(a) == canonical(b)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
