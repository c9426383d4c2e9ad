//! Internet Weather backend
//!
//! A small local backend that serves the internet weather page and exposes
//! one endpoint translating a latitude/longitude pair into a plausible
//! synthetic network measurement (latency, jitter, packet loss) generated
//! by an external language-model API.

pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod logging;
pub mod models;
pub mod region;
pub mod server;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use generation::{GenerationClient, MeasurementGenerator};
pub use models::{Config, Location, Measurement};
pub use region::Region;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";
    pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
    pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
    pub const DEFAULT_RETRY_INITIAL_DELAY: Duration = Duration::from_secs(1);
    pub const DEFAULT_STATIC_DIR: &str = "static";
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
