//! Request and response value objects for measurement generation

use serde::{Deserialize, Serialize};

/// A geographic coordinate pair submitted by the page.
///
/// No range validation is applied; out-of-range coordinates simply fall
/// through the region classifier to the default label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A synthetic internet measurement reading for one location.
///
/// Produced fresh per request from the generation API's structured output
/// and returned to the caller unchanged; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Descriptive name such as "City, Country" or "Rural, Region"
    pub location_name: String,
    /// Round-trip latency in milliseconds
    pub latency_ms: f64,
    /// Latency variation in milliseconds
    pub jitter_ms: f64,
    /// Packet loss fraction in the range 0.0 to 1.0
    pub packet_loss_pct: f64,
}
