//! Configuration loading and typed config structures for the engine.
//!
//! Every tunable threshold lives here with a default matching the behaviour
//! gardeners expect out of the box. A deployment can override any subset
//! through a YAML file; missing sections and fields fall back to defaults.

use std::path::Path;

use serde::Deserialize;

use crate::rules::NamedEntry;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Climate resolution.
    #[serde(default)]
    pub climate: ClimateConfig,

    /// Window confidence scoring.
    #[serde(default)]
    pub window: WindowConfig,

    /// Weather-driven window shifts.
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Hardiness-zone corrections for the northern hemisphere.
    #[serde(default)]
    pub zone_adjustments: ZoneAdjustmentConfig,

    /// Succession planning.
    #[serde(default)]
    pub succession: SuccessionConfig,

    /// Extra rule-table entries.
    #[serde(default)]
    pub rules: RulesConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file.
    ///
    /// After parsing, environment variable overrides are applied:
    /// - `FURROW_LOG_LEVEL` overrides `logging.level`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Climate
// ---------------------------------------------------------------------------

/// Climate resolution settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClimateConfig {
    /// Confidence of a single reference source.
    #[serde(default = "default_base_confidence")]
    pub base_confidence: f64,

    /// Confidence added per agreeing source.
    #[serde(default = "default_corroboration_step")]
    pub corroboration_step: f64,

    /// Ceiling for corroborated confidence.
    #[serde(default = "default_corroboration_cap")]
    pub corroboration_cap: f64,

    /// Confidence when only the zone fallback produced dates.
    #[serde(default = "default_fallback_confidence")]
    pub fallback_confidence: f64,

    /// Two sources agree when their last frost dates differ by at most
    /// this many days.
    #[serde(default = "default_agreement_tolerance_days")]
    pub agreement_tolerance_days: i64,

    /// Months between northern and southern seasons.
    #[serde(default = "default_season_offset_months")]
    pub season_offset_months: i32,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            base_confidence: default_base_confidence(),
            corroboration_step: default_corroboration_step(),
            corroboration_cap: default_corroboration_cap(),
            fallback_confidence: default_fallback_confidence(),
            agreement_tolerance_days: default_agreement_tolerance_days(),
            season_offset_months: default_season_offset_months(),
        }
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// Confidence scoring for planting windows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WindowConfig {
    /// Multiplicative bonus for rules from a catalog calendar.
    #[serde(default = "default_tier_bonus")]
    pub structured_bonus: f64,

    /// Multiplicative bonus for rules from the named offset table.
    #[serde(default = "default_tier_bonus")]
    pub named_bonus: f64,

    /// Subtracted when the season is shorter than the plant needs.
    #[serde(default = "default_short_season_penalty")]
    pub short_season_penalty: f64,

    /// Ceiling for windows built from the generic default rule.
    #[serde(default = "default_min_confidence")]
    pub default_rule_cap: f64,

    /// Lowest confidence ever reported.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Highest confidence ever reported.
    #[serde(default = "default_max_confidence")]
    pub max_confidence: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            structured_bonus: default_tier_bonus(),
            named_bonus: default_tier_bonus(),
            short_season_penalty: default_short_season_penalty(),
            default_rule_cap: default_min_confidence(),
            min_confidence: default_min_confidence(),
            max_confidence: default_max_confidence(),
        }
    }
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Thresholds for shifting the outdoor start with observed weather.
///
/// Temperatures are in °F; shifts are in months (positive = later).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherConfig {
    /// Anomaly beyond which the large shift applies.
    #[serde(default = "default_significant_anomaly_f")]
    pub significant_anomaly_f: f64,

    /// Anomaly beyond which the small shift applies.
    #[serde(default = "default_moderate_anomaly_f")]
    pub moderate_anomaly_f: f64,

    /// Large shift.
    #[serde(default = "default_significant_shift_months")]
    pub significant_shift_months: f64,

    /// Small shift.
    #[serde(default = "default_moderate_shift_months")]
    pub moderate_shift_months: f64,

    /// Soil colder than the plant minimum by more than this delays sowing.
    #[serde(default = "default_cold_soil_margin_f")]
    pub cold_soil_margin_f: f64,

    /// Delay for cold soil.
    #[serde(default = "default_cold_soil_shift_months")]
    pub cold_soil_shift_months: f64,

    /// Soil at most this much above the minimum allows a slight advance.
    #[serde(default = "default_warm_soil_band_f")]
    pub warm_soil_band_f: f64,

    /// Advance for soil that has just reached the minimum.
    #[serde(default = "default_warm_soil_shift_months")]
    pub warm_soil_shift_months: f64,

    /// Total shift is clamped to plus or minus this many months.
    #[serde(default = "default_max_shift_months")]
    pub max_shift_months: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            significant_anomaly_f: default_significant_anomaly_f(),
            moderate_anomaly_f: default_moderate_anomaly_f(),
            significant_shift_months: default_significant_shift_months(),
            moderate_shift_months: default_moderate_shift_months(),
            cold_soil_margin_f: default_cold_soil_margin_f(),
            cold_soil_shift_months: default_cold_soil_shift_months(),
            warm_soil_band_f: default_warm_soil_band_f(),
            warm_soil_shift_months: default_warm_soil_shift_months(),
            max_shift_months: default_max_shift_months(),
        }
    }
}

// ---------------------------------------------------------------------------
// Zone adjustments
// ---------------------------------------------------------------------------

/// Month shifts applied to one zone class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ZoneShift {
    /// Months added to the indoor window start.
    #[serde(default)]
    pub indoor_months: i32,

    /// Months added to the outdoor window start.
    #[serde(default)]
    pub outdoor_months: i32,
}

/// Cold/hot hardiness-zone delta table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZoneAdjustmentConfig {
    /// Zones numbered at or below this are cold.
    #[serde(default = "default_cold_max_zone")]
    pub cold_max_zone: u32,

    /// Zones numbered at or above this are hot.
    #[serde(default = "default_hot_min_zone")]
    pub hot_min_zone: u32,

    /// Shift for cold zones.
    #[serde(default = "default_cold_shift")]
    pub cold: ZoneShift,

    /// Shift for hot zones.
    #[serde(default)]
    pub hot: ZoneShift,
}

impl Default for ZoneAdjustmentConfig {
    fn default() -> Self {
        Self {
            cold_max_zone: default_cold_max_zone(),
            hot_min_zone: default_hot_min_zone(),
            cold: default_cold_shift(),
            hot: ZoneShift::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Succession
// ---------------------------------------------------------------------------

/// Succession planning settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SuccessionConfig {
    /// Interval used when neither the caller nor the rule gives one.
    #[serde(default = "default_interval_days")]
    pub default_interval_days: u32,

    /// Number of sowings used when the caller gives none.
    #[serde(default = "default_planting_count")]
    pub default_count: u32,

    /// Days after last frost for the first sowing when the rule has no
    /// outdoor window.
    #[serde(default = "default_first_planting_offset_days")]
    pub first_planting_offset_days: i64,

    /// Days of margin between the final harvest and first frost.
    #[serde(default = "default_safety_buffer_days")]
    pub safety_buffer_days: i64,
}

impl Default for SuccessionConfig {
    fn default() -> Self {
        Self {
            default_interval_days: default_interval_days(),
            default_count: default_planting_count(),
            first_planting_offset_days: default_first_planting_offset_days(),
            safety_buffer_days: default_safety_buffer_days(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rules & logging
// ---------------------------------------------------------------------------

/// Additions to the built-in rule tables.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RulesConfig {
    /// Entries appended to the named offset table. Country-scoped entries
    /// take precedence over unscoped ones for matching locations.
    #[serde(default)]
    pub named_overrides: Vec<NamedEntry>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl LoggingConfig {
    /// Override the level with `FURROW_LOG_LEVEL` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("FURROW_LOG_LEVEL") {
            self.level = val;
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_base_confidence() -> f64 {
    0.7
}

const fn default_corroboration_step() -> f64 {
    0.05
}

const fn default_corroboration_cap() -> f64 {
    0.9
}

const fn default_fallback_confidence() -> f64 {
    0.4
}

const fn default_agreement_tolerance_days() -> i64 {
    14
}

const fn default_season_offset_months() -> i32 {
    furrow_types::DEFAULT_SEASON_OFFSET_MONTHS
}

const fn default_tier_bonus() -> f64 {
    0.1
}

const fn default_short_season_penalty() -> f64 {
    0.1
}

const fn default_min_confidence() -> f64 {
    0.4
}

const fn default_max_confidence() -> f64 {
    0.95
}

const fn default_significant_anomaly_f() -> f64 {
    5.0
}

const fn default_moderate_anomaly_f() -> f64 {
    2.0
}

const fn default_significant_shift_months() -> f64 {
    0.5
}

const fn default_moderate_shift_months() -> f64 {
    0.25
}

const fn default_cold_soil_margin_f() -> f64 {
    5.0
}

const fn default_cold_soil_shift_months() -> f64 {
    0.25
}

const fn default_warm_soil_band_f() -> f64 {
    10.0
}

const fn default_warm_soil_shift_months() -> f64 {
    0.1
}

const fn default_max_shift_months() -> f64 {
    1.0
}

const fn default_cold_max_zone() -> u32 {
    3
}

const fn default_hot_min_zone() -> u32 {
    9
}

const fn default_cold_shift() -> ZoneShift {
    ZoneShift {
        indoor_months: 1,
        outdoor_months: 2,
    }
}

const fn default_interval_days() -> u32 {
    14
}

const fn default_planting_count() -> u32 {
    3
}

const fn default_first_planting_offset_days() -> i64 {
    14
}

const fn default_safety_buffer_days() -> i64 {
    14
}

fn default_log_level() -> String {
    "info".to_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
