//! Enumeration types for the Furrow planting engine.
//!
//! Covers climate classification (zone systems, hemispheres), rule
//! provenance, plant categories, and the site-profile vocabulary used by
//! microclimate adjustments.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Climate
// ---------------------------------------------------------------------------

/// The hardiness zone system a location's zone name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ZoneSystem {
    /// United States Department of Agriculture hardiness zones (1a-13b).
    #[serde(rename = "USDA")]
    Usda,
    /// Royal Horticultural Society hardiness ratings (H1-H7).
    #[serde(rename = "RHS")]
    Rhs,
    /// Natural Resources Canada plant hardiness zones.
    Canadian,
    /// Australian National Botanic Gardens climate zones.
    Australian,
    /// New Zealand climate zones.
    #[serde(rename = "NZ")]
    Nz,
    /// Any other or unknown zone system.
    Other,
}

impl ZoneSystem {
    /// Infer the zone system conventionally used in a country.
    ///
    /// Accepts ISO 3166 alpha-2 codes, case-insensitively. `UK` is treated
    /// as an alias for `GB`.
    pub fn for_country(country: &str) -> Self {
        match country.trim().to_ascii_uppercase().as_str() {
            "US" => Self::Usda,
            "GB" | "UK" => Self::Rhs,
            "CA" => Self::Canadian,
            "AU" => Self::Australian,
            "NZ" => Self::Nz,
            _ => Self::Other,
        }
    }
}

/// Hemisphere of a location. Determines whether seasons are inverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Hemisphere {
    /// Spring begins around March.
    #[default]
    Northern,
    /// Spring begins around September.
    Southern,
}

/// Countries whose growing seasons follow the southern calendar.
const SOUTHERN_COUNTRIES: &[&str] = &[
    "AU", "NZ", "ZA", "AR", "CL", "UY", "PY", "BO", "LS", "SZ", "NA", "BW", "ZW", "MZ", "MG", "FJ",
];

impl Hemisphere {
    /// Derive the hemisphere from a latitude in decimal degrees.
    pub fn from_latitude(latitude: f64) -> Self {
        if latitude < 0.0 {
            Self::Southern
        } else {
            Self::Northern
        }
    }

    /// Derive the hemisphere from an ISO 3166 alpha-2 country code.
    pub fn for_country(country: &str) -> Self {
        let code = country.trim().to_ascii_uppercase();
        if SOUTHERN_COUNTRIES.contains(&code.as_str()) {
            Self::Southern
        } else {
            Self::Northern
        }
    }
}

/// Coarse temperature class derived from a hardiness zone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ZoneClass {
    /// Short season; windows open later.
    Cold,
    /// No zone-based correction.
    Temperate,
    /// Long season.
    Hot,
}

/// Which frost date an offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum FrostReference {
    /// The average last spring frost.
    #[default]
    LastFrost,
    /// The average first autumn frost.
    FirstFrost,
}

/// How a climate source's data was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SourceKind {
    /// An independent data source (station records, frost tables).
    Reference,
    /// A coarse estimate used when no reference source matches.
    Fallback,
}

// ---------------------------------------------------------------------------
// Plants
// ---------------------------------------------------------------------------

/// Which tier of the rule table produced a [`PlantRule`](crate::PlantRule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum RuleSource {
    /// Built from the plant's own catalog growing calendar.
    StructuredCalendar,
    /// Matched by name in the curated offset table.
    NamedOffsetTable,
    /// Derived from the plant type and name keywords.
    TypeHeuristic,
    /// Nothing matched; generic spring sowing.
    Default,
}

/// Broad plant category from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum PlantType {
    /// Vegetables.
    Vegetable,
    /// Culinary and medicinal herbs.
    Herb,
    /// Ornamental flowers.
    Flower,
    /// Fruiting plants.
    Fruit,
    /// Anything else.
    #[default]
    Other,
}

/// A sowing or planting activity in a month-level calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum SowingMethod {
    /// Sow under cover (indoors or in a greenhouse).
    #[serde(rename = "S")]
    IndoorSeed,
    /// Plant out seedlings.
    #[serde(rename = "T")]
    Transplant,
    /// Sow directly in the ground.
    #[serde(rename = "P")]
    DirectSow,
}

impl SowingMethod {
    /// Parse a single-letter calendar code (`S`, `T`, or `P`).
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'S' | 's' => Some(Self::IndoorSeed),
            'T' | 't' => Some(Self::Transplant),
            'P' | 'p' => Some(Self::DirectSow),
            _ => None,
        }
    }

    /// Parse a code string such as `"ST"` into methods, in order of first
    /// appearance. Unknown characters are skipped.
    pub fn parse_codes(codes: &str) -> Vec<Self> {
        let mut methods = Vec::new();
        for method in codes.chars().filter_map(Self::from_code) {
            if !methods.contains(&method) {
                methods.push(method);
            }
        }
        methods
    }
}

// ---------------------------------------------------------------------------
// Site profile
// ---------------------------------------------------------------------------

/// Compass direction a slope or shelter faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum CompassDirection {
    /// North.
    North,
    /// North-east.
    NorthEast,
    /// East.
    East,
    /// South-east.
    SouthEast,
    /// South.
    South,
    /// South-west.
    SouthWest,
    /// West.
    West,
    /// North-west.
    NorthWest,
    /// Surrounds the site on all sides.
    All,
}

impl CompassDirection {
    /// South, south-east, or south-west.
    pub const fn is_southerly(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    /// North, north-east, or north-west.
    pub const fn is_northerly(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }
}

/// How steep a slope is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SlopeSeverity {
    /// Gentle slope.
    Gentle,
    /// Moderate slope.
    Moderate,
    /// Steep slope.
    Steep,
}

/// Strength of an urban heat island effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum HeatIslandIntensity {
    /// Suburban or lightly built up.
    Mild,
    /// Town centre.
    Moderate,
    /// Dense city core.
    Strong,
}

/// Kind of nearby water body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum WaterBodyKind {
    /// Garden-sized pond.
    SmallPond,
    /// Farm pond or small reservoir.
    LargePond,
    /// Running water.
    Stream,
    /// Lake.
    Lake,
    /// Sea coast.
    Ocean,
}

/// Structure that shelters a site from wind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ShelterKind {
    /// Masonry wall.
    Wall,
    /// Fence.
    Fence,
    /// Hedge or shrub line.
    Hedge,
    /// Building.
    Building,
    /// Tree line.
    Trees,
}

/// Direction a custom site factor moves the season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum AdjustmentEffect {
    /// Warms the site in spring: plant earlier.
    Earlier,
    /// Extends the autumn: keep planting later.
    Later,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
