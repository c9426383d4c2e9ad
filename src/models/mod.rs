//! Data models and structures for the internet weather backend

pub mod config;
pub mod measurement;

// Re-export main model types
pub use config::Config;
pub use measurement::{Location, Measurement};
