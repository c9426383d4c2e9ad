//! Coordinate-to-region bucketing used for prompt construction
//!
//! A simple reverse-geocoding stand-in: four disjoint rectangular coordinate
//! ranges map to descriptive labels, everything else falls through to a
//! rural/remote default. All range comparisons are strict, so values exactly
//! on an edge do not match that range.

use crate::models::Location;

/// Descriptive region classification for a coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    IndiaMetro,
    UsaMetro,
    WesternEuropeMetro,
    RuralOrRemote,
}

impl Region {
    /// Classify a coordinate pair into a region.
    ///
    /// Rules are checked in fixed order; the first matching rectangle wins.
    /// Total over all finite inputs (NaN fails every comparison and lands on
    /// the default).
    pub fn classify(latitude: f64, longitude: f64) -> Self {
        if 10.0 < latitude && latitude < 30.0 && 70.0 < longitude && longitude < 90.0 {
            Region::IndiaMetro
        } else if 30.0 < latitude && latitude < 45.0 && -120.0 < longitude && longitude < -70.0 {
            Region::UsaMetro
        } else if 45.0 < latitude && latitude < 60.0 && -10.0 < longitude && longitude < 10.0 {
            Region::WesternEuropeMetro
        } else {
            Region::RuralOrRemote
        }
    }

    /// Classify a [`Location`]
    pub fn classify_location(location: &Location) -> Self {
        Self::classify(location.latitude, location.longitude)
    }

    /// The descriptive label used in prompt text
    pub fn label(&self) -> &'static str {
        match self {
            Region::IndiaMetro => "Major City in India",
            Region::UsaMetro => "Major City in USA",
            Region::WesternEuropeMetro => "Major City in Western Europe",
            Region::RuralOrRemote => "Rural or Remote Area",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
