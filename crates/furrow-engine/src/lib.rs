//! Planting schedule computation for Furrow.
//!
//! Given a location and a plant, this crate answers: when to start seeds
//! indoors, when to sow or transplant outdoors, when to expect a harvest,
//! and how to stagger repeated sowings. Everything is a deterministic pure
//! computation; the crate performs no I/O beyond optional config loading.
//!
//! # Modules
//!
//! - [`calendar`] -- Month normalization, wrap-aware month spans, and date
//!   arithmetic.
//! - [`climate`] -- [`ClimateSource`] trait, reference frost table, zone
//!   estimator, and the [`ClimateResolver`].
//! - [`config`] -- Configuration loading from YAML into typed structs.
//! - [`engine`] -- The [`PlanningEngine`] facade.
//! - [`error`] -- [`EngineError`].
//! - [`harvest`] -- Month-level and date-level harvest windows.
//! - [`microclimate`] -- Terrain corrections to frost dates.
//! - [`regional`] -- Month-by-month regional sowing calendars.
//! - [`rules`] -- The prioritized [`RuleBook`] and its tiers.
//! - [`site`] -- Site profile adjustments to concrete planting dates.
//! - [`succession`] -- Succession planting plans.
//! - [`window`] -- Month-level planting windows and confidence scoring.
//!
//! [`ClimateSource`]: climate::ClimateSource
//! [`ClimateResolver`]: climate::ClimateResolver
//! [`PlanningEngine`]: engine::PlanningEngine
//! [`EngineError`]: error::EngineError
//! [`RuleBook`]: rules::RuleBook

pub mod calendar;
pub mod climate;
pub mod config;
pub mod engine;
pub mod error;
pub mod harvest;
pub mod microclimate;
pub mod regional;
pub mod rules;
pub mod site;
pub mod succession;
pub mod window;

pub use climate::{ClimateResolver, ClimateSource, FrostTable, ZoneEstimator};
pub use config::{ConfigError, EngineConfig};
pub use engine::PlanningEngine;
pub use error::EngineError;
pub use harvest::compute_harvest;
pub use rules::RuleBook;
pub use site::{apply_site_adjustments, seasonal_adjustment};
pub use succession::SuccessionScheduler;
pub use window::WindowCalculator;
