//! Error types for the `furrow-engine` crate.
//!
//! Only [`EngineError::LocationUnresolved`] is expected to reach a user:
//! everything downstream of climate resolution degrades through lower
//! confidence scores instead of failing.

/// Errors that can occur while computing a schedule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// No climate source, including the zone fallback, matched the location.
    #[error("no climate data for location (country {country}, postal code {postal_code:?}, zone {zone:?})")]
    LocationUnresolved {
        /// Country code of the location.
        country: String,
        /// Postal code, if one was given.
        postal_code: Option<String>,
        /// Zone, if one was given.
        zone: Option<String>,
    },

    /// A catalog growing calendar cannot be turned into a rule.
    ///
    /// Rule resolution recovers from this by moving to the next tier.
    #[error("invalid growing calendar for {plant}: {reason}")]
    InvalidOffsetConfiguration {
        /// Plant name.
        plant: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A computed date fell outside the representable calendar.
    #[error("date out of range while computing {context}")]
    DateOutOfRange {
        /// Which computation overflowed.
        context: &'static str,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in schedule calculation")]
    ArithmeticOverflow,
}

impl EngineError {
    /// Shorthand for [`EngineError::DateOutOfRange`].
    pub const fn date_out_of_range(context: &'static str) -> Self {
        Self::DateOutOfRange { context }
    }
}
