//! Shared type definitions for the Furrow planting schedule engine.
//!
//! This crate is the single source of truth for the data exchanged between
//! the engine, the command-line front end, and the calendar UI. Types flow
//! downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`enums`] -- Zone systems, hemispheres, rule provenance, site vocabulary
//! - [`structs`] -- Locations, climate profiles, catalog plants, resolved rules
//! - [`schedule`] -- Planting and harvest windows, succession plans, site adjustments

pub mod enums;
pub mod schedule;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    AdjustmentEffect, CompassDirection, FrostReference, HeatIslandIntensity, Hemisphere,
    PlantType, RuleSource, ShelterKind, SlopeSeverity, SourceKind, SowingMethod, WaterBodyKind,
    ZoneClass, ZoneSystem,
};
pub use schedule::{
    CustomFactor, HarvestOverlap, HarvestWindow, PlantingDates, PlantingWindow, RegionalCalendar,
    SeasonalAdjustment, Shelter, SiteProfile, SlopeFactor, SuccessionPlan, SuccessionPlanting,
    WaterBody,
};
pub use structs::{
    CatalogEntry, ClimateProfile, DEFAULT_SEASON_OFFSET_MONTHS, DaysToMaturity, DirectSow,
    FallSowing, FrostRecord, GrowingCalendar, IndoorSeedStart, Location, MaturityRange,
    MicroclimateDelta, MicroclimateFactors, Month, MonthDay, MonthSpan, PlantIdentity, PlantRule,
    SpringSowing, SuccessionSettings, Transplant, WeatherDelta, WeekRange, shift_months,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for the calendar UI.

    #[test]
    fn export_bindings() {
        // ts-rs writes the definitions to `bindings/` relative to the crate
        // root when `export_all` is called.
        use ts_rs::TS;

        // Enums
        let _ = crate::enums::ZoneSystem::export_all();
        let _ = crate::enums::Hemisphere::export_all();
        let _ = crate::enums::ZoneClass::export_all();
        let _ = crate::enums::FrostReference::export_all();
        let _ = crate::enums::SourceKind::export_all();
        let _ = crate::enums::RuleSource::export_all();
        let _ = crate::enums::PlantType::export_all();
        let _ = crate::enums::SowingMethod::export_all();
        let _ = crate::enums::CompassDirection::export_all();
        let _ = crate::enums::SlopeSeverity::export_all();
        let _ = crate::enums::HeatIslandIntensity::export_all();
        let _ = crate::enums::WaterBodyKind::export_all();
        let _ = crate::enums::ShelterKind::export_all();
        let _ = crate::enums::AdjustmentEffect::export_all();

        // Inputs and climate
        let _ = crate::structs::Location::export_all();
        let _ = crate::structs::ClimateProfile::export_all();
        let _ = crate::structs::FrostRecord::export_all();
        let _ = crate::structs::PlantIdentity::export_all();
        let _ = crate::structs::CatalogEntry::export_all();
        let _ = crate::structs::PlantRule::export_all();
        let _ = crate::structs::WeatherDelta::export_all();

        // Schedules
        let _ = crate::schedule::PlantingWindow::export_all();
        let _ = crate::schedule::HarvestWindow::export_all();
        let _ = crate::schedule::SuccessionPlan::export_all();
        let _ = crate::schedule::SiteProfile::export_all();
        let _ = crate::schedule::SeasonalAdjustment::export_all();
        let _ = crate::schedule::PlantingDates::export_all();
        let _ = crate::schedule::RegionalCalendar::export_all();
    }
}
