//! Location to [`ClimateProfile`] resolution.
//!
//! Frost dates come from pluggable [`ClimateSource`]s. Reference sources are
//! consulted in registration order; the first match is primary and every
//! further source that agrees with it raises confidence. When no reference
//! source knows the location, a fallback estimator may still produce
//! zone-typical dates at low confidence. If nothing matches, resolution
//! fails with [`EngineError::LocationUnresolved`] rather than inventing
//! dates.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use furrow_types::{
    ClimateProfile, FrostRecord, Hemisphere, Location, MicroclimateDelta, MonthDay, SourceKind,
    ZoneSystem, shift_months,
};

use crate::calendar::{add_days, days_between};
use crate::config::ClimateConfig;
use crate::error::EngineError;
use crate::microclimate::terrain_delta;
use crate::rules::same_country;

// ---------------------------------------------------------------------------
// ClimateSource
// ---------------------------------------------------------------------------

/// A provider of frost dates for locations.
pub trait ClimateSource: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Whether this source is independent data or a coarse estimate.
    fn kind(&self) -> SourceKind;

    /// Frost dates for the location, if this source covers it.
    fn lookup(&self, location: &Location) -> Option<FrostRecord>;
}

/// Leading integer of a hardiness zone name (`7b` -> 7, `H3` -> `None`).
pub fn parse_zone_number(zone: &str) -> Option<u32> {
    let digits: String = zone
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

fn normalize_postal(postal: &str) -> String {
    postal
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase()
}

// ---------------------------------------------------------------------------
// FrostTable
// ---------------------------------------------------------------------------

/// One row of a [`FrostTable`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FrostTableEntry {
    /// Country code the row applies to.
    pub country: String,
    /// Postal code or postal prefix (`M5V` matches `M5V 2T6`).
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Zone name the row applies to.
    #[serde(default)]
    pub zone: Option<String>,
    /// Average last spring frost.
    pub last_frost: MonthDay,
    /// Average first autumn frost.
    pub first_frost: MonthDay,
    /// Zone name to report.
    pub zone_name: String,
    /// Zone system to report.
    #[serde(default)]
    pub zone_system: Option<ZoneSystem>,
}

impl FrostTableEntry {
    fn record(&self) -> FrostRecord {
        FrostRecord {
            last_frost: self.last_frost,
            first_frost: self.first_frost,
            zone_name: self.zone_name.clone(),
            zone_system: self.zone_system,
        }
    }
}

/// A reference source backed by a static table keyed by country and
/// postal code or zone.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FrostTable {
    /// Name used in logs.
    pub name: String,
    /// Table rows.
    pub entries: Vec<FrostTableEntry>,
}

impl FrostTable {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Frost dates for a handful of well-known postal areas.
    pub fn builtin() -> Self {
        let row = |country: &str,
                   postal: &str,
                   zone_name: &str,
                   system: ZoneSystem,
                   last: (u32, u32),
                   first: (u32, u32)| FrostTableEntry {
            country: country.to_owned(),
            postal_code: Some(postal.to_owned()),
            zone: None,
            last_frost: MonthDay::new(last.0, last.1),
            first_frost: MonthDay::new(first.0, first.1),
            zone_name: zone_name.to_owned(),
            zone_system: Some(system),
        };
        Self {
            name: "reference-table".to_owned(),
            entries: vec![
                row("US", "90210", "10a", ZoneSystem::Usda, (1, 15), (12, 15)),
                row("US", "10001", "7b", ZoneSystem::Usda, (4, 15), (10, 30)),
                row("US", "48104", "6a", ZoneSystem::Usda, (5, 1), (10, 15)),
                row("CA", "M5V", "6a", ZoneSystem::Canadian, (5, 9), (10, 15)),
                row("GB", "SW1A", "H3", ZoneSystem::Rhs, (4, 15), (10, 30)),
                row("AU", "3000", "3", ZoneSystem::Australian, (8, 15), (5, 15)),
            ],
        }
    }

    /// Append a row.
    #[must_use]
    pub fn with_entry(mut self, entry: FrostTableEntry) -> Self {
        self.entries.push(entry);
        self
    }
}

impl ClimateSource for FrostTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Reference
    }

    fn lookup(&self, location: &Location) -> Option<FrostRecord> {
        let country = location.country.trim();
        let in_country = || {
            self.entries
                .iter()
                .filter(move |e| same_country(&e.country, country))
        };

        if let Some(postal) = location.postal_code.as_deref().map(normalize_postal) {
            let best = in_country()
                .filter_map(|e| {
                    let prefix = normalize_postal(e.postal_code.as_deref()?);
                    postal.starts_with(&prefix).then_some((prefix.len(), e))
                })
                .max_by_key(|(len, _)| *len);
            if let Some((_, entry)) = best {
                return Some(entry.record());
            }
        }

        let zone = location.zone.as_deref()?.trim();
        in_country()
            .find(|e| e.zone.as_deref().is_some_and(|z| z.eq_ignore_ascii_case(zone)))
            .map(FrostTableEntry::record)
    }
}

// ---------------------------------------------------------------------------
// ZoneEstimator
// ---------------------------------------------------------------------------

/// Zone number assumed when a US zone is missing or unparseable.
pub const DEFAULT_US_ZONE: u32 = 6;

/// Fallback source estimating frost dates from the hardiness zone number
/// (US) or broad region (GB, CA, AU).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneEstimator;

impl ZoneEstimator {
    fn us(zone: u32) -> (MonthDay, MonthDay) {
        match zone {
            0..=3 => (MonthDay::new(6, 1), MonthDay::new(9, 1)),
            4 => (MonthDay::new(5, 15), MonthDay::new(9, 15)),
            5 => (MonthDay::new(5, 1), MonthDay::new(10, 1)),
            6 => (MonthDay::new(4, 15), MonthDay::new(10, 15)),
            7 => (MonthDay::new(4, 1), MonthDay::new(11, 1)),
            8 => (MonthDay::new(3, 15), MonthDay::new(11, 15)),
            9 => (MonthDay::new(3, 1), MonthDay::new(12, 1)),
            _ => (MonthDay::new(2, 15), MonthDay::new(12, 15)),
        }
    }

    fn gb(region: &str) -> (&'static str, MonthDay, MonthDay) {
        if region.contains("north") || region.contains("scotland") {
            ("north", MonthDay::new(4, 30), MonthDay::new(10, 15))
        } else if region.contains("midland") || region.contains("wales") {
            ("midlands", MonthDay::new(4, 15), MonthDay::new(10, 30))
        } else {
            ("south", MonthDay::new(3, 30), MonthDay::new(11, 15))
        }
    }

    fn ca(region: &str) -> (&'static str, MonthDay, MonthDay) {
        if region.contains("north") || region.contains("territor") || region.contains("yukon") {
            ("northern", MonthDay::new(6, 15), MonthDay::new(9, 1))
        } else if ["prairie", "alberta", "saskatchewan", "manitoba"]
            .iter()
            .any(|k| region.contains(k))
        {
            ("prairie", MonthDay::new(5, 31), MonthDay::new(9, 15))
        } else if ["atlantic", "nova scotia", "new brunswick", "newfoundland", "prince edward"]
            .iter()
            .any(|k| region.contains(k))
        {
            ("atlantic", MonthDay::new(5, 1), MonthDay::new(10, 15))
        } else if ["central", "ontario", "quebec"]
            .iter()
            .any(|k| region.contains(k))
        {
            ("central", MonthDay::new(5, 15), MonthDay::new(10, 1))
        } else {
            ("west", MonthDay::new(4, 15), MonthDay::new(11, 1))
        }
    }

    fn au(region: &str) -> (&'static str, MonthDay, MonthDay) {
        if region.contains("north") || region.contains("tropic") {
            ("northern", MonthDay::new(8, 1), MonthDay::new(5, 15))
        } else if region.contains("central") || region.contains("arid") {
            ("central", MonthDay::new(8, 15), MonthDay::new(5, 1))
        } else {
            ("southern", MonthDay::new(9, 1), MonthDay::new(4, 15))
        }
    }
}

impl ClimateSource for ZoneEstimator {
    fn name(&self) -> &str {
        "zone-estimate"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Fallback
    }

    fn lookup(&self, location: &Location) -> Option<FrostRecord> {
        let region = location
            .region
            .as_deref()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let zone = location.zone.clone();

        let (zone_name, last_frost, first_frost) =
            match location.country.trim().to_ascii_uppercase().as_str() {
                "US" => {
                    let number = zone
                        .as_deref()
                        .and_then(parse_zone_number)
                        .unwrap_or(DEFAULT_US_ZONE);
                    let (last, first) = Self::us(number);
                    (zone.unwrap_or_else(|| number.to_string()), last, first)
                }
                "GB" | "UK" => {
                    let (name, last, first) = Self::gb(&region);
                    (zone.unwrap_or_else(|| name.to_owned()), last, first)
                }
                "CA" => {
                    let (name, last, first) = Self::ca(&region);
                    (zone.unwrap_or_else(|| name.to_owned()), last, first)
                }
                "AU" => {
                    let (name, last, first) = Self::au(&region);
                    (zone.unwrap_or_else(|| name.to_owned()), last, first)
                }
                _ => return None,
            };

        Some(FrostRecord {
            last_frost,
            first_frost,
            zone_name,
            zone_system: None,
        })
    }
}

// ---------------------------------------------------------------------------
// ClimateResolver
// ---------------------------------------------------------------------------

/// Resolves locations against an ordered list of climate sources.
pub struct ClimateResolver {
    sources: Vec<Box<dyn ClimateSource>>,
    config: ClimateConfig,
}

impl std::fmt::Debug for ClimateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClimateResolver")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}

impl ClimateResolver {
    /// Create a resolver with no sources.
    pub const fn new(config: ClimateConfig) -> Self {
        Self {
            sources: Vec::new(),
            config,
        }
    }

    /// The built-in reference table followed by the zone estimator.
    pub fn with_defaults(config: ClimateConfig) -> Self {
        Self::new(config)
            .with_source(FrostTable::builtin())
            .with_source(ZoneEstimator)
    }

    /// Register a source after the existing ones.
    #[must_use]
    pub fn with_source(mut self, source: impl ClimateSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Resolve a location to a climate profile.
    ///
    /// # Errors
    ///
    /// [`EngineError::LocationUnresolved`] when no source matches, or
    /// [`EngineError::DateOutOfRange`] if the year cannot hold the dates.
    pub fn resolve(&self, location: &Location) -> Result<ClimateProfile, EngineError> {
        let references: Vec<(&str, FrostRecord)> = self
            .sources
            .iter()
            .filter(|s| s.kind() == SourceKind::Reference)
            .filter_map(|s| s.lookup(location).map(|r| (s.name(), r)))
            .collect();

        let (record, confidence) = if let Some((primary_name, primary)) = references.first() {
            let agreeing = self.count_agreeing(primary, &references, location.year)?;
            let confidence = self.corroborated_confidence(agreeing);
            debug!(
                source = primary_name,
                agreeing,
                confidence,
                "climate resolved from reference data"
            );
            (primary.clone(), confidence)
        } else if let Some((name, record)) = self
            .sources
            .iter()
            .filter(|s| s.kind() == SourceKind::Fallback)
            .find_map(|s| s.lookup(location).map(|r| (s.name(), r)))
        {
            let confidence = self
                .config
                .fallback_confidence
                .min(self.config.base_confidence);
            warn!(
                source = name,
                country = %location.country,
                zone = ?location.zone,
                confidence,
                "no reference climate data, using zone estimate"
            );
            (record, confidence)
        } else {
            warn!(
                country = %location.country,
                postal_code = ?location.postal_code,
                zone = ?location.zone,
                "location unresolved"
            );
            return Err(EngineError::LocationUnresolved {
                country: location.country.clone(),
                postal_code: location.postal_code.clone(),
                zone: location.zone.clone(),
            });
        };

        self.build_profile(location, record, confidence)
    }

    fn count_agreeing(
        &self,
        primary: &FrostRecord,
        references: &[(&str, FrostRecord)],
        year: i32,
    ) -> Result<u32, EngineError> {
        let anchor = primary
            .last_frost
            .in_year(year)
            .ok_or_else(|| EngineError::date_out_of_range("primary last frost"))?;
        let mut agreeing: u32 = 0;
        for (_, record) in references {
            let Some(date) = record.last_frost.in_year(year) else {
                continue;
            };
            if days_between(anchor, date).abs() <= self.config.agreement_tolerance_days {
                agreeing = agreeing.saturating_add(1);
            }
        }
        Ok(agreeing)
    }

    fn corroborated_confidence(&self, agreeing: u32) -> f64 {
        if agreeing > 1 {
            let boosted = self
                .config
                .corroboration_step
                .mul_add(f64::from(agreeing), self.config.base_confidence);
            boosted.min(self.config.corroboration_cap)
        } else {
            self.config.base_confidence
        }
    }

    fn build_profile(
        &self,
        location: &Location,
        record: FrostRecord,
        confidence: f64,
    ) -> Result<ClimateProfile, EngineError> {
        let hemisphere = location
            .latitude
            .map_or_else(|| Hemisphere::for_country(&location.country), Hemisphere::from_latitude);
        let zone_system = record
            .zone_system
            .unwrap_or_else(|| ZoneSystem::for_country(&location.country));

        let last = record
            .last_frost
            .in_year(location.year)
            .ok_or_else(|| EngineError::date_out_of_range("last frost"))?;
        let mut first = record
            .first_frost
            .in_year(location.year)
            .ok_or_else(|| EngineError::date_out_of_range("first frost"))?;
        if first <= last {
            // Southern seasons run across New Year.
            first = roll_forward_year(first)?;
        }

        let microclimate = location
            .microclimate
            .as_ref()
            .map(terrain_delta)
            .filter(|delta| !delta.is_zero());
        let (last, mut first) = apply_delta(last, first, microclimate.as_ref())?;
        if first <= last {
            first = roll_forward_year(first)?;
        }

        Ok(ClimateProfile {
            last_frost: last,
            first_frost: first,
            zone_name: record.zone_name,
            zone_system,
            hemisphere,
            microclimate,
            confidence,
            season_offset_months: self.config.season_offset_months,
        })
    }
}

fn roll_forward_year(date: NaiveDate) -> Result<NaiveDate, EngineError> {
    shift_months(date, 12).ok_or_else(|| EngineError::date_out_of_range("first frost year roll"))
}

fn apply_delta(
    last: NaiveDate,
    first: NaiveDate,
    delta: Option<&MicroclimateDelta>,
) -> Result<(NaiveDate, NaiveDate), EngineError> {
    let Some(delta) = delta else {
        return Ok((last, first));
    };
    let last = add_days(last, i64::from(delta.last_frost_days))
        .ok_or_else(|| EngineError::date_out_of_range("microclimate last frost"))?;
    let first = add_days(first, i64::from(delta.first_frost_days))
        .ok_or_else(|| EngineError::date_out_of_range("microclimate first frost"))?;
    Ok((last, first))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
