//! Curated per-plant offsets matched by name.
//!
//! Keys are matched as case-insensitive substrings of the plant name; the
//! longest matching key wins, so `peppermint` is not mistaken for a
//! pepper. Entries may be scoped to a country to patch known regional
//! quirks without new code paths.

use serde::Deserialize;

use furrow_types::{FrostReference, MaturityRange, MonthSpan, PlantRule, RuleSource, WeekRange};

use crate::calendar::months_to_weeks;
use crate::error::EngineError;

use super::{RuleQuery, RuleTier, same_country};

/// One row of the named offset table.
///
/// `indoor_weeks` is relative to last frost. `outdoor_weeks.from` is
/// relative to last frost and `outdoor_weeks.to` to first frost.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedEntry {
    /// Lowercase name fragment to match.
    pub key: String,

    /// Restrict the entry to locations in this country.
    #[serde(default)]
    pub country: Option<String>,

    /// Indoor sowing weeks relative to last frost.
    #[serde(default)]
    pub indoor_weeks: Option<WeekRange>,

    /// Fixed indoor sowing months, replacing `indoor_weeks`.
    #[serde(default)]
    pub indoor_months: Option<MonthSpan>,

    /// Outdoor sowing weeks.
    #[serde(default)]
    pub outdoor_weeks: Option<WeekRange>,

    /// Typical days to maturity.
    #[serde(default)]
    pub days_to_maturity: Option<MaturityRange>,

    /// Typical days between successive sowings.
    #[serde(default)]
    pub succession_interval_days: Option<u32>,
}

impl NamedEntry {
    /// Build an entry from month offsets: indoor relative to the last frost
    /// month, outdoor start relative to the last frost month and outdoor end
    /// relative to the first frost month.
    fn from_months(
        key: &str,
        indoor: (f64, f64),
        outdoor: (f64, f64),
        maturity: (u32, u32),
        succession: Option<u32>,
    ) -> Self {
        Self {
            key: key.to_owned(),
            country: None,
            indoor_weeks: Some(WeekRange::new(
                months_to_weeks(indoor.0),
                months_to_weeks(indoor.1),
            )),
            indoor_months: None,
            outdoor_weeks: Some(WeekRange::new(
                months_to_weeks(outdoor.0),
                months_to_weeks(outdoor.1),
            )),
            days_to_maturity: Some(MaturityRange::new(maturity.0, maturity.1)),
            succession_interval_days: succession,
        }
    }

    /// The same offsets under another key.
    fn alias(&self, key: &str) -> Self {
        Self {
            key: key.to_owned(),
            ..self.clone()
        }
    }

    fn matches(&self, lowercase_name: &str, country: Option<&str>) -> bool {
        let scope_ok = match (self.country.as_deref(), country) {
            (None, _) => true,
            (Some(scope), Some(country)) => same_country(scope, country),
            (Some(_), None) => false,
        };
        scope_ok && !self.key.is_empty() && lowercase_name.contains(&self.key.to_lowercase())
    }
}

/// The named offset table.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTable {
    entries: Vec<NamedEntry>,
}

impl NamedTable {
    /// A table with the given entries.
    pub const fn new(entries: Vec<NamedEntry>) -> Self {
        Self { entries }
    }

    /// The built-in table of common garden plants.
    pub fn builtin() -> Self {
        let tomato = NamedEntry::from_months("tomato", (-2.5, -0.5), (0.5, -2.0), (60, 85), None);
        let pepper = NamedEntry::from_months("pepper", (-3.0, -0.5), (0.5, -1.5), (60, 90), None);
        let kale = NamedEntry::from_months("kale", (-1.5, -0.25), (-0.25, 0.0), (50, 65), Some(21));
        let peas = NamedEntry::from_months("peas", (-1.0, -0.25), (-0.75, -3.0), (55, 70), Some(14));
        let cucumber =
            NamedEntry::from_months("cucumber", (-1.0, -0.25), (0.25, -2.0), (50, 70), Some(21));
        let beet = NamedEntry::from_months("beet", (-1.0, -0.25), (-0.5, -2.0), (50, 70), Some(21));
        let basil = NamedEntry::from_months("basil", (-1.5, 0.0), (0.25, -0.5), (50, 75), Some(21));
        let cilantro =
            NamedEntry::from_months("cilantro", (-1.0, 0.0), (-0.5, -3.0), (45, 70), Some(21));
        let mint = NamedEntry::from_months("mint", (-2.0, 0.0), (0.0, 0.0), (60, 90), None);
        let sunflower =
            NamedEntry::from_months("sunflower", (-1.0, -0.25), (0.25, -2.0), (70, 100), None);

        let entries = vec![
            NamedEntry::from_months("cherry tomato", (-2.0, -0.5), (0.5, -1.5), (55, 70), None),
            tomato.alias("roma"),
            tomato.alias("brandywine"),
            NamedEntry::from_months("chili", (-2.75, -0.5), (0.5, -1.25), (70, 100), None),
            NamedEntry::from_months("chilli", (-2.75, -0.5), (0.5, -1.25), (70, 100), None),
            NamedEntry::from_months("lettuce", (-1.0, 0.0), (-0.5, -3.0), (45, 60), Some(14)),
            kale.alias("lacinato"),
            kale.alias("tuscan"),
            peas.alias("sugar snap"),
            peas.alias("snow pea"),
            cucumber.alias("marketmore"),
            beet.alias("detroit"),
            basil.alias("genovese"),
            cilantro.alias("coriander"),
            NamedEntry::from_months("rosemary", (-3.0, -0.25), (0.5, -1.0), (80, 100), None),
            mint.alias("spearmint"),
            mint.alias("peppermint"),
            NamedEntry::from_months("zinnia", (-1.5, -0.25), (0.0, -2.0), (60, 75), None),
            sunflower.alias("mammoth"),
            NamedEntry::from_months("marigold", (-1.5, -0.25), (0.0, -1.5), (50, 70), None),
            tomato,
            pepper,
            kale,
            peas,
            cucumber,
            beet,
            basil,
            cilantro,
            mint,
            sunflower,
        ];
        Self { entries }
    }

    /// Append entries; on equal key length they take precedence over
    /// existing ones.
    #[must_use]
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = NamedEntry>) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The best entry for a plant name: longest key first, then
    /// country-scoped over unscoped, then the later entry.
    pub fn best_match(&self, name: &str, country: Option<&str>) -> Option<&NamedEntry> {
        let lowercase = name.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.matches(&lowercase, country))
            .max_by_key(|e| (e.key.chars().count(), e.country.is_some()))
    }
}

impl RuleTier for NamedTable {
    fn source(&self) -> RuleSource {
        RuleSource::NamedOffsetTable
    }

    fn maturity_for(&self, query: &RuleQuery<'_>) -> Option<MaturityRange> {
        self.best_match(&query.plant.name, query.country)
            .and_then(|e| e.days_to_maturity)
    }

    fn rule_for(&self, query: &RuleQuery<'_>) -> Result<Option<PlantRule>, EngineError> {
        let Some(entry) = self.best_match(&query.plant.name, query.country) else {
            return Ok(None);
        };
        Ok(Some(PlantRule {
            indoor_offset_weeks: entry.indoor_weeks,
            outdoor_offset_weeks: entry.outdoor_weeks,
            outdoor_relative_to: FrostReference::LastFrost,
            outdoor_end_relative_to: FrostReference::FirstFrost,
            days_to_maturity: query.maturity,
            succession_interval_days: entry.succession_interval_days,
            succession_max_plantings: None,
            min_soil_temperature_f: query.plant.min_soil_temperature_f,
            indoor_month_override: entry.indoor_months,
            source: RuleSource::NamedOffsetTable,
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn longest_key_wins() {
        let table = NamedTable::builtin();
        assert_eq!(
            table.best_match("Cherry Tomato 'Sungold'", None).unwrap().key,
            "cherry tomato"
        );
        assert_eq!(table.best_match("Beefsteak Tomato", None).unwrap().key, "tomato");
        assert_eq!(table.best_match("Peppermint", None).unwrap().key, "peppermint");
        assert_eq!(table.best_match("Bell Pepper", None).unwrap().key, "pepper");
    }

    #[test]
    fn variety_aliases_share_offsets() {
        let table = NamedTable::builtin();
        let roma = table.best_match("Roma", None).unwrap();
        let tomato = table.best_match("tomato", None).unwrap();
        assert_eq!(roma.indoor_weeks, tomato.indoor_weeks);
        assert_eq!(roma.outdoor_weeks, tomato.outdoor_weeks);
    }

    #[test]
    fn unknown_names_do_not_match() {
        let table = NamedTable::builtin();
        assert!(table.best_match("Okra", None).is_none());
        assert!(!table.is_empty());
    }

    #[test]
    fn country_scoped_override_only_applies_in_country() {
        let scoped = NamedEntry {
            key: "marigold".to_owned(),
            country: Some("GB".to_owned()),
            indoor_weeks: None,
            indoor_months: Some(MonthSpan { start: 2, end: 3 }),
            outdoor_weeks: None,
            days_to_maturity: None,
            succession_interval_days: None,
        };
        let table = NamedTable::builtin().with_entries([scoped]);
        let uk = table.best_match("French Marigold", Some("UK")).unwrap();
        assert!(uk.indoor_months.is_some());
        let us = table.best_match("French Marigold", Some("US")).unwrap();
        assert!(us.indoor_months.is_none());
        assert!(table.best_match("French Marigold", None).unwrap().country.is_none());
    }

    #[test]
    fn month_offsets_are_stored_as_weeks() {
        let table = NamedTable::builtin();
        let lettuce = table.best_match("lettuce", None).unwrap();
        let indoor = lettuce.indoor_weeks.unwrap();
        assert!((indoor.from - -4.35).abs() < 1e-9);
        assert!(indoor.to.abs() < 1e-9);
    }
}
