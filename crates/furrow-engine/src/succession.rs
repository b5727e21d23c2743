//! Succession planting plans.
//!
//! Sowing and harvest dates are exact day arithmetic on the profile's own
//! frost dates.

use chrono::NaiveDate;
use tracing::debug;

use furrow_types::{
    ClimateProfile, HarvestOverlap, PlantRule, RuleSource, SuccessionPlan, SuccessionPlanting,
};

use crate::calendar::{add_days, days_between};
use crate::config::{EngineConfig, SuccessionConfig};
use crate::error::EngineError;
use crate::harvest::harvest_dates;
use crate::window::outdoor_dates;

/// Builds [`SuccessionPlan`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuccessionScheduler {
    /// Defaults and margins.
    pub config: SuccessionConfig,
}

impl SuccessionScheduler {
    /// Scheduler with the given settings.
    pub const fn new(config: SuccessionConfig) -> Self {
        Self { config }
    }

    /// Scheduler using the succession section of an engine config.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.succession.clone())
    }

    /// Date of the first sowing: the outdoor window start, or a fixed number
    /// of days after last frost when the rule has no outdoor window.
    pub fn first_planting_date(
        &self,
        rule: &PlantRule,
        climate: &ClimateProfile,
    ) -> Result<NaiveDate, EngineError> {
        if rule.outdoor_offset_weeks.is_some() {
            return Ok(outdoor_dates(rule, climate)?.0);
        }
        add_days(climate.last_frost, self.config.first_planting_offset_days)
            .ok_or_else(|| EngineError::date_out_of_range("first planting"))
    }

    /// Latest sowing whose slowest harvest still lands a safety margin
    /// before first frost.
    pub fn last_possible_planting_date(
        &self,
        rule: &PlantRule,
        climate: &ClimateProfile,
    ) -> Result<NaiveDate, EngineError> {
        let back = i64::from(rule.days_to_maturity.max)
            .checked_add(self.config.safety_buffer_days)
            .and_then(i64::checked_neg)
            .ok_or(EngineError::ArithmeticOverflow)?;
        add_days(climate.first_frost, back)
            .ok_or_else(|| EngineError::date_out_of_range("last possible planting"))
    }

    /// Generate a succession plan.
    ///
    /// Sowings start at [`first_planting_date`](Self::first_planting_date)
    /// and repeat every `interval_days` until `requested_count` is reached
    /// or a sowing would fall after the last possible planting date, which
    /// is a hard stop. An interval of zero yields at most one sowing.
    /// `microclimate_extra_days` moves both harvest bounds, never the
    /// sowing dates.
    pub fn generate_plan(
        &self,
        rule: &PlantRule,
        climate: &ClimateProfile,
        interval_days: u32,
        requested_count: u32,
        microclimate_extra_days: i32,
    ) -> Result<SuccessionPlan, EngineError> {
        let first = self.first_planting_date(rule, climate)?;
        let last_possible = self.last_possible_planting_date(rule, climate)?;
        let estimated = rule.source != RuleSource::StructuredCalendar;
        let count = if interval_days == 0 {
            requested_count.min(1)
        } else {
            requested_count
        };

        let mut plantings = Vec::new();
        for index in 0..count {
            let offset = i64::from(index)
                .checked_mul(i64::from(interval_days))
                .ok_or(EngineError::ArithmeticOverflow)?;
            let planting_date = add_days(first, offset)
                .ok_or_else(|| EngineError::date_out_of_range("succession planting"))?;
            if planting_date > last_possible {
                debug!(
                    %planting_date,
                    %last_possible,
                    planted = plantings.len(),
                    "succession cut off by season length"
                );
                break;
            }
            let (harvest_start, harvest_end) = harvest_dates(
                planting_date,
                rule.days_to_maturity,
                i64::from(microclimate_extra_days),
            )?;
            plantings.push(SuccessionPlanting {
                planting_number: index.saturating_add(1),
                planting_date,
                harvest_start,
                harvest_end,
                estimated,
            });
        }

        let planted = u32::try_from(plantings.len()).unwrap_or(u32::MAX);
        Ok(SuccessionPlan {
            overlap: harvest_overlap(&plantings),
            plantings,
            interval_days,
            last_possible_planting_date: last_possible,
            requested_count,
            truncated: planted < requested_count,
        })
    }
}

/// Overlap between consecutive harvests, relative to the total harvest days.
pub fn harvest_overlap(plantings: &[SuccessionPlanting]) -> HarvestOverlap {
    let total: i64 = plantings
        .iter()
        .map(|p| days_between(p.harvest_start, p.harvest_end).max(0))
        .fold(0, i64::saturating_add);
    let overlap: i64 = plantings
        .windows(2)
        .filter_map(|pair| match pair {
            [current, next] => Some(days_between(next.harvest_start, current.harvest_end).max(0)),
            _ => None,
        })
        .fold(0, i64::saturating_add);

    let overlap_days = u32::try_from(overlap).unwrap_or(u32::MAX);
    let total_harvest_days = u32::try_from(total).unwrap_or(u32::MAX);
    let overlap_percent = if total_harvest_days == 0 {
        0.0
    } else {
        f64::from(overlap_days) / f64::from(total_harvest_days) * 100.0
    };
    HarvestOverlap {
        overlap_days,
        total_harvest_days,
        overlap_percent,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
