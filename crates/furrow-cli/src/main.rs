//! `furrow` -- command-line front end for the planting schedule engine.
//!
//! Reads locations, plants, and other scenario inputs from YAML files and
//! prints results as JSON on stdout. Logs go to stderr.
//!
//! # Commands
//!
//! - `climate` -- resolve a location to a climate profile
//! - `rule` -- resolve a plant to a planting rule
//! - `window` -- planting and harvest months for a plant at a location
//! - `plan` -- a succession planting plan
//! - `harvest` -- harvest months for a planting month
//! - `site` -- seasonal adjustment for a site profile, optionally applied
//!   to a plant's key dates
//! - `months` -- planting and harvest months from a regional calendar

mod error;
mod input;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use furrow_engine::harvest::{harvest_for_window, harvest_months};
use furrow_engine::regional::{best_calendar, planting_months};
use furrow_engine::rules::validate_maturity;
use furrow_engine::{PlanningEngine, apply_site_adjustments, seasonal_adjustment};
use furrow_types::{
    CatalogEntry, ClimateProfile, DaysToMaturity, HarvestWindow, Location, MaturityRange, Month,
    PlantRule,
    PlantingDates, PlantingWindow, RegionalCalendar, SeasonalAdjustment, SiteProfile,
    SowingMethod, WeatherDelta,
};

use crate::error::CliError;
use crate::input::{load_config, log_config_source, read_optional, read_yaml};

/// Planting schedule calculator.
#[derive(Debug, Parser)]
#[command(name = "furrow", version, about)]
struct Cli {
    /// Engine configuration file (YAML). Defaults to `furrow.yaml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Command to run.
    #[command(subcommand)]
    command: Command,
}

/// Location and plant inputs shared by several commands.
#[derive(Debug, clap::Args)]
struct PlantAtLocation {
    /// Location file (YAML).
    #[arg(long)]
    location: PathBuf,

    /// Catalog entry file (YAML).
    #[arg(long)]
    plant: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a location to a climate profile.
    Climate {
        /// Location file (YAML).
        #[arg(long)]
        location: PathBuf,
    },

    /// Resolve the planting rule for a plant.
    Rule {
        /// Catalog entry file (YAML).
        #[arg(long)]
        plant: PathBuf,

        /// Country code enabling country-specific table entries.
        #[arg(long)]
        country: Option<String>,
    },

    /// Planting and harvest months for a plant at a location.
    Window {
        #[command(flatten)]
        inputs: PlantAtLocation,

        /// Weather observations file (YAML).
        #[arg(long)]
        weather: Option<PathBuf>,
    },

    /// Succession planting plan for a plant at a location.
    Plan {
        #[command(flatten)]
        inputs: PlantAtLocation,

        /// Days between sowings.
        #[arg(long)]
        interval: Option<u32>,

        /// Number of sowings wanted.
        #[arg(long)]
        count: Option<u32>,

        /// Days added to every harvest date.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        extra_days: i32,
    },

    /// Harvest months for a zero-based planting month.
    Harvest {
        /// Planting month, 0 = January.
        #[arg(long, allow_negative_numbers = true)]
        month: Month,

        /// Fewest days to maturity.
        #[arg(long, allow_negative_numbers = true)]
        min_days: i32,

        /// Most days to maturity.
        #[arg(long, allow_negative_numbers = true)]
        max_days: i32,
    },

    /// Seasonal adjustment for a site, optionally applied to a plant.
    Site {
        /// Site profile file (YAML).
        #[arg(long)]
        site: PathBuf,

        /// Location file (YAML); requires `--plant`.
        #[arg(long, requires = "plant")]
        location: Option<PathBuf>,

        /// Catalog entry file (YAML); requires `--location`.
        #[arg(long, requires = "location")]
        plant: Option<PathBuf>,
    },

    /// Planting and harvest months from regional calendars.
    Months {
        /// Regional calendars file (YAML list).
        #[arg(long)]
        calendars: PathBuf,

        /// Country used to pick the calendar zone.
        #[arg(long)]
        country: String,

        /// Activity code: S (sow undercover), T (transplant), P (plant direct).
        #[arg(long, value_parser = parse_method)]
        method: SowingMethod,

        /// Days to maturity, for harvest months.
        #[arg(long)]
        days_to_maturity: Option<u32>,
    },
}

fn parse_method(code: &str) -> Result<SowingMethod, String> {
    let mut chars = code.trim().chars();
    match (chars.next().and_then(SowingMethod::from_code), chars.next()) {
        (Some(method), None) => Ok(method),
        _ => Err(format!("expected one of S, T, P; got {code:?}")),
    }
}

// ---------------------------------------------------------------------------
// Output shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WindowReport {
    climate: ClimateProfile,
    rule: PlantRule,
    window: PlantingWindow,
    harvest: HarvestWindow,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteReport {
    adjustment: SeasonalAdjustment,
    #[serde(skip_serializing_if = "Option::is_none")]
    dates: Option<PlantingDates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    adjusted_dates: Option<PlantingDates>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MonthsReport {
    zone_name: String,
    planting_months: Vec<Month>,
    #[serde(skip_serializing_if = "Option::is_none")]
    harvest_months: Option<Vec<Month>>,
}

fn emit<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Application entry point.
///
/// # Errors
///
/// Returns an error if an input cannot be loaded or the engine rejects it.
fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    // 1. Load configuration; it supplies the default log level.
    let config = load_config(cli.config.as_deref())?;

    // 2. Initialize structured logging on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
    log_config_source(cli.config.as_deref());

    // 3. Build the engine and run the command.
    let engine = PlanningEngine::new(&config);
    run(&engine, cli.command)
}

fn run(engine: &PlanningEngine, command: Command) -> Result<(), CliError> {
    match command {
        Command::Climate { location } => {
            let location: Location = read_yaml(&location)?;
            emit(&engine.resolve_climate(&location)?)
        }
        Command::Rule { plant, country } => {
            let entry: CatalogEntry = read_yaml(&plant)?;
            emit(&engine.rule_for_entry(&entry, country.as_deref()))
        }
        Command::Window { inputs, weather } => {
            let (climate, rule) = resolve(engine, &inputs.location, &inputs.plant)?;
            let weather: Option<WeatherDelta> = read_optional(weather.as_deref())?;
            let window = engine.compute_window(&rule, &climate, weather.as_ref())?;
            let harvest = harvest_for_window(&window, rule.days_to_maturity);
            info!(
                outdoor_start = window.outdoor_start,
                outdoor_end = window.outdoor_end,
                confidence = window.confidence,
                "Window computed"
            );
            emit(&WindowReport {
                climate,
                rule,
                window,
                harvest,
            })
        }
        Command::Plan {
            inputs,
            interval,
            count,
            extra_days,
        } => {
            let (climate, rule) = resolve(engine, &inputs.location, &inputs.plant)?;
            let plan = engine.generate_plan(&rule, &climate, interval, count, extra_days)?;
            info!(
                plantings = plan.plantings.len(),
                truncated = plan.truncated,
                "Succession plan generated"
            );
            emit(&plan)
        }
        Command::Harvest {
            month,
            min_days,
            max_days,
        } => emit(&PlanningEngine::compute_harvest(
            month,
            maturity_range(min_days, max_days)?,
        )),
        Command::Site {
            site,
            location,
            plant,
        } => {
            let site: SiteProfile = read_yaml(&site)?;
            let adjustment = seasonal_adjustment(&site);
            let (dates, adjusted_dates) = match (location, plant) {
                (Some(location), Some(plant)) => {
                    let (climate, rule) = resolve(engine, &location, &plant)?;
                    let dates = PlanningEngine::planting_dates(&rule, &climate)?;
                    (Some(dates), Some(apply_site_adjustments(dates, adjustment)?))
                }
                _ => (None, None),
            };
            emit(&SiteReport {
                adjustment,
                dates,
                adjusted_dates,
            })
        }
        Command::Months {
            calendars,
            country,
            method,
            days_to_maturity,
        } => {
            let all: Vec<RegionalCalendar> = read_yaml(&calendars)?;
            let calendar =
                best_calendar(&all, &country).ok_or(CliError::NoCalendar { path: calendars })?;
            let months = planting_months(calendar, method);
            emit(&MonthsReport {
                zone_name: calendar.zone_name.clone(),
                harvest_months: days_to_maturity.map(|days| harvest_months(&months, days)),
                planting_months: months,
            })
        }
    }
}

/// Days-to-maturity bounds from the command line, checked the same way as
/// catalog values.
fn maturity_range(min: i32, max: i32) -> Result<MaturityRange, CliError> {
    validate_maturity(DaysToMaturity { min, max })
        .map_err(|reason| CliError::InvalidMaturity { reason })
}

/// Resolve the climate and the country-aware rule for a plant at a location.
fn resolve(
    engine: &PlanningEngine,
    location: &Path,
    plant: &Path,
) -> Result<(ClimateProfile, PlantRule), CliError> {
    let location: Location = read_yaml(location)?;
    let entry: CatalogEntry = read_yaml(plant)?;
    let climate = engine.resolve_climate(&location)?;
    let rule = engine.rule_for_entry(&entry, Some(&location.country));
    Ok((climate, rule))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
