//! Regional month-by-month sowing calendars.
//!
//! Some catalog sources publish a per-zone calendar listing, for each month,
//! which of sow-undercover (`S`), transplant (`T`), and plant-direct (`P`)
//! apply. This module picks the zone that best fits a country and reads
//! month lists out of it.

use std::collections::BTreeSet;

use tracing::debug;

use furrow_types::{Month, RegionalCalendar, SowingMethod};

use crate::calendar::month_from_key;

const UK_ZONES: &[&str] = &[
    "United Kingdom - cool/temperate",
    "United Kingdom - warm/temperate",
    "Australia - temperate",
];

const NZ_ZONES: &[&str] = &[
    "New Zealand - temperate",
    "New Zealand - sub-tropical",
    "New Zealand - cool/mountain",
    "Australia - temperate",
];

const AU_ZONES: &[&str] = &[
    "Australia - temperate",
    "Australia - sub-tropical",
    "Australia - cool/mountain",
    "Australia - tropical",
    "Australia - arid",
];

const DEFAULT_ZONES: &[&str] = &[
    "Australia - temperate",
    "Australia - sub-tropical",
    "Australia - cool/mountain",
];

/// Zone names to look for, most suitable first.
pub fn zone_preference(country: &str) -> &'static [&'static str] {
    let country = country.trim().to_lowercase();
    if country == "gb"
        || country == "uk"
        || country.contains("united kingdom")
        || country.contains("great britain")
    {
        UK_ZONES
    } else if country == "nz" || country.contains("new zealand") {
        NZ_ZONES
    } else if country == "au" || country.contains("australia") {
        AU_ZONES
    } else {
        DEFAULT_ZONES
    }
}

/// The calendar best suited to a country: the first preferred zone
/// present, otherwise the first calendar available.
pub fn best_calendar<'a>(
    calendars: &'a [RegionalCalendar],
    country: &str,
) -> Option<&'a RegionalCalendar> {
    let preferred = zone_preference(country).iter().find_map(|zone| {
        calendars
            .iter()
            .find(|calendar| calendar.zone_name == *zone)
    });
    if let Some(calendar) = preferred {
        debug!(zone = %calendar.zone_name, country, "regional calendar matched");
        return Some(calendar);
    }
    let first = calendars.first();
    if let Some(calendar) = first {
        debug!(zone = %calendar.zone_name, country, "no preferred zone, using first calendar");
    }
    first
}

/// Months (zero-based, sorted) in which `method` appears.
///
/// Unrecognized month keys are ignored.
pub fn planting_months(calendar: &RegionalCalendar, method: SowingMethod) -> Vec<Month> {
    calendar
        .months
        .iter()
        .filter(|(_, methods)| methods.contains(&method))
        .filter_map(|(key, _)| month_from_key(key))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn calendar(zone: &str, months: &[(&str, &str)]) -> RegionalCalendar {
        RegionalCalendar {
            zone_name: zone.to_owned(),
            months: months
                .iter()
                .map(|(key, codes)| ((*key).to_owned(), SowingMethod::parse_codes(codes)))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn preference_by_country() {
        assert_eq!(zone_preference("UK").first(), Some(&"United Kingdom - cool/temperate"));
        assert_eq!(zone_preference("Great Britain"), UK_ZONES);
        assert_eq!(zone_preference("nz"), NZ_ZONES);
        assert_eq!(zone_preference("AU").len(), 5);
        assert_eq!(zone_preference("US"), DEFAULT_ZONES);
    }

    #[test]
    fn best_calendar_prefers_local_zone() {
        let calendars = vec![
            calendar("Australia - temperate", &[("sep", "P")]),
            calendar("United Kingdom - warm/temperate", &[("apr", "P")]),
        ];
        let uk = best_calendar(&calendars, "GB").unwrap();
        assert_eq!(uk.zone_name, "United Kingdom - warm/temperate");
        let nz = best_calendar(&calendars, "NZ").unwrap();
        assert_eq!(nz.zone_name, "Australia - temperate");
    }

    #[test]
    fn best_calendar_falls_back_to_first() {
        let calendars = vec![calendar("Australia - arid", &[("may", "S")])];
        assert_eq!(
            best_calendar(&calendars, "US").unwrap().zone_name,
            "Australia - arid"
        );
        assert!(best_calendar(&[], "US").is_none());
    }

    #[test]
    fn months_for_method_are_sorted() {
        let cal = calendar(
            "United Kingdom - cool/temperate",
            &[("mar", "S"), ("apr", "ST"), ("may", "TP"), ("feb", "S"), ("xyz", "P")],
        );
        assert_eq!(planting_months(&cal, SowingMethod::IndoorSeed), vec![1, 2, 3]);
        assert_eq!(planting_months(&cal, SowingMethod::Transplant), vec![3, 4]);
        assert_eq!(planting_months(&cal, SowingMethod::DirectSow), vec![4]);
    }
}
