//! Plant-type heuristics for plants the named table does not know.
//!
//! An ordered list of `{type, name keys, timing}` rows. The first row whose
//! type matches and whose keys (if any) appear in the plant name wins; each
//! type ends with a keyless row that catches the rest of that category.
//! Timing is expressed in months against a typical mid-latitude season and
//! converted to frost-relative weeks.

use furrow_types::{FrostReference, MaturityRange, PlantRule, PlantType, RuleSource, WeekRange};

use crate::calendar::months_to_weeks;
use crate::error::EngineError;

use super::{RuleQuery, RuleTier};

/// One heuristic row.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicRule {
    /// Category the row applies to.
    pub plant_type: PlantType,
    /// Name fragments; empty matches any plant of the category.
    pub keys: &'static [&'static str],
    /// Indoor months relative to last frost, if started indoors.
    pub indoor_months: Option<(f64, f64)>,
    /// Outdoor start, in months relative to last frost.
    pub outdoor_start_months: f64,
    /// Outdoor end, in months relative to `outdoor_end_relative_to`.
    pub outdoor_end_months: f64,
    /// Frost the outdoor end is measured from.
    pub outdoor_end_relative_to: FrostReference,
    /// Typical days to maturity.
    pub maturity: MaturityRange,
    /// Typical days between successive sowings.
    pub succession_interval_days: Option<u32>,
}

impl HeuristicRule {
    fn matches(&self, plant_type: PlantType, lowercase_name: &str) -> bool {
        self.plant_type == plant_type
            && (self.keys.is_empty() || self.keys.iter().any(|k| lowercase_name.contains(k)))
    }
}

const fn row(
    plant_type: PlantType,
    keys: &'static [&'static str],
    indoor_months: Option<(f64, f64)>,
    outdoor: (f64, f64, FrostReference),
    maturity: (u32, u32),
    succession_interval_days: Option<u32>,
) -> HeuristicRule {
    HeuristicRule {
        plant_type,
        keys,
        indoor_months,
        outdoor_start_months: outdoor.0,
        outdoor_end_months: outdoor.1,
        outdoor_end_relative_to: outdoor.2,
        maturity: MaturityRange::new(maturity.0, maturity.1),
        succession_interval_days,
    }
}

const LF: FrostReference = FrostReference::LastFrost;
const FF: FrostReference = FrostReference::FirstFrost;

/// The ordered heuristic table.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicTable {
    rows: Vec<HeuristicRule>,
}

impl Default for HeuristicTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl HeuristicTable {
    /// Built-in vegetable, herb, and flower rows.
    #[rustfmt::skip]
    pub fn builtin() -> Self {
        use PlantType::{Flower, Herb, Vegetable};
        Self {
            rows: vec![
                // Vegetables
                row(Vegetable, &["tomato", "pepper", "eggplant", "aubergine"], Some((-3.0, -1.0)), (0.0, -1.0, FF), (60, 90), None),
                row(Vegetable, &["lettuce", "kale", "cabbage", "broccoli", "cauliflower", "spinach"], Some((-4.0, -2.0)), (-2.0, 0.0, LF), (45, 80), Some(14)),
                row(Vegetable, &["cucumber", "zucchini", "courgette", "squash", "melon", "pumpkin"], Some((-1.0, 0.0)), (0.0, -1.0, FF), (50, 90), None),
                row(Vegetable, &["bean", "pea"], None, (-1.0, 1.0, LF), (50, 70), Some(14)),
                row(Vegetable, &["beet", "carrot", "radish", "turnip", "parsnip"], None, (-2.0, -2.0, FF), (30, 70), Some(21)),
                row(Vegetable, &[], Some((-3.0, -1.0)), (0.0, -2.0, FF), (60, 90), None),
                // Herbs
                row(Herb, &["basil", "oregano", "thyme", "parsley"], Some((-3.0, -1.0)), (0.0, -1.0, FF), (50, 80), None),
                row(Herb, &["cilantro", "coriander", "dill"], Some((-2.0, -1.0)), (-1.0, -3.0, FF), (40, 60), Some(21)),
                row(Herb, &[], Some((-2.0, -1.0)), (0.0, -2.0, FF), (60, 90), None),
                // Flowers
                row(Flower, &["sunflower", "zinnia", "marigold"], Some((-2.0, -1.0)), (0.0, -3.0, FF), (60, 90), None),
                row(Flower, &[], Some((-3.0, -1.0)), (0.0, -3.0, FF), (60, 90), None),
            ],
        }
    }

    /// First row matching the plant.
    pub fn find(&self, plant_type: PlantType, name: &str) -> Option<&HeuristicRule> {
        let lowercase = name.to_lowercase();
        self.rows.iter().find(|r| r.matches(plant_type, &lowercase))
    }
}

impl RuleTier for HeuristicTable {
    fn source(&self) -> RuleSource {
        RuleSource::TypeHeuristic
    }

    fn maturity_for(&self, query: &RuleQuery<'_>) -> Option<MaturityRange> {
        self.find(query.plant_type, &query.plant.name)
            .map(|r| r.maturity)
    }

    fn rule_for(&self, query: &RuleQuery<'_>) -> Result<Option<PlantRule>, EngineError> {
        let Some(heuristic) = self.find(query.plant_type, &query.plant.name) else {
            return Ok(None);
        };
        Ok(Some(PlantRule {
            indoor_offset_weeks: heuristic
                .indoor_months
                .map(|(from, to)| WeekRange::new(months_to_weeks(from), months_to_weeks(to))),
            outdoor_offset_weeks: Some(WeekRange::new(
                months_to_weeks(heuristic.outdoor_start_months),
                months_to_weeks(heuristic.outdoor_end_months),
            )),
            outdoor_relative_to: FrostReference::LastFrost,
            outdoor_end_relative_to: heuristic.outdoor_end_relative_to,
            days_to_maturity: query.maturity,
            succession_interval_days: heuristic.succession_interval_days,
            succession_max_plantings: None,
            min_soil_temperature_f: query.plant.min_soil_temperature_f,
            indoor_month_override: None,
            source: RuleSource::TypeHeuristic,
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
