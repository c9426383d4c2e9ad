//! Configuration data model and validation

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address and port the HTTP server binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// API key for the generation API (required, supplied via environment)
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the generation API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Generation model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Total attempts for the outbound call (first try included)
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Initial backoff delay in seconds, doubled after each failed attempt
    #[serde(default = "default_retry_initial_delay_secs")]
    pub retry_initial_delay_seconds: u64,

    /// Directory containing the static landing page
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            model: default_model(),
            timeout_seconds: default_timeout_secs(),
            retry_attempts: default_retry_attempts(),
            retry_initial_delay_seconds: default_retry_initial_delay_secs(),
            static_dir: default_static_dir(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the outbound request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Get the initial retry backoff as Duration
    pub fn retry_initial_delay(&self) -> Duration {
        Duration::from_secs(self.retry_initial_delay_seconds)
    }

    /// Parse the listen address into a socket address
    pub fn listen_socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr
            .parse()
            .map_err(|e| AppError::config(format!("Invalid listen address '{}': {}", self.listen_addr, e)))
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::config(
                "API key is not set. Provide it via the GEMINI_API_KEY environment variable",
            ));
        }

        self.listen_socket_addr()?;

        if self.api_base_url.is_empty() {
            return Err(AppError::config("API base URL cannot be empty"));
        }
        match url::Url::parse(&self.api_base_url) {
            Ok(parsed) => {
                if parsed.scheme() != "https" && parsed.scheme() != "http" {
                    return Err(AppError::config(format!(
                        "API base URL must use HTTP(S): {}",
                        self.api_base_url
                    )));
                }
            }
            Err(e) => {
                return Err(AppError::config(format!(
                    "Invalid API base URL '{}': {}",
                    self.api_base_url, e
                )));
            }
        }

        if self.model.trim().is_empty() {
            return Err(AppError::config("Model name cannot be empty"));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }
        if self.timeout_seconds > 300 {
            return Err(AppError::config("Timeout cannot exceed 300 seconds"));
        }

        if self.retry_attempts == 0 {
            return Err(AppError::config("Retry attempts must be greater than 0"));
        }
        if self.retry_attempts > 10 {
            return Err(AppError::config("Retry attempts cannot exceed 10"));
        }

        if self.retry_initial_delay_seconds > 60 {
            return Err(AppError::config(
                "Initial retry delay cannot exceed 60 seconds",
            ));
        }

        if self.static_dir.is_empty() {
            return Err(AppError::config("Static directory cannot be empty"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(listen_addr) = std::env::var("LISTEN_ADDR") {
            self.listen_addr = listen_addr.trim().to_string();
        }

        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            self.api_key = api_key.trim().to_string();
        }

        if let Ok(api_base_url) = std::env::var("GEMINI_API_URL") {
            self.api_base_url = api_base_url.trim().to_string();
        }

        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            self.model = model.trim().to_string();
        }

        if let Ok(timeout) = std::env::var("TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout
                .parse()
                .map_err(|e| AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", timeout, e)))?;
        }

        if let Ok(attempts) = std::env::var("RETRY_ATTEMPTS") {
            self.retry_attempts = attempts
                .parse()
                .map_err(|e| AppError::config(format!("Invalid RETRY_ATTEMPTS value '{}': {}", attempts, e)))?;
        }

        if let Ok(delay) = std::env::var("RETRY_INITIAL_DELAY_SECONDS") {
            self.retry_initial_delay_seconds = delay.parse().map_err(|e| {
                AppError::config(format!(
                    "Invalid RETRY_INITIAL_DELAY_SECONDS value '{}': {}",
                    delay, e
                ))
            })?;
        }

        if let Ok(static_dir) = std::env::var("STATIC_DIR") {
            self.static_dir = static_dir.trim().to_string();
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color
                .parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_listen_addr() -> String {
    crate::defaults::DEFAULT_LISTEN_ADDR.to_string()
}

fn default_api_base_url() -> String {
    crate::defaults::DEFAULT_API_BASE_URL.to_string()
}

fn default_model() -> String {
    crate::defaults::DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_retry_attempts() -> u32 {
    crate::defaults::DEFAULT_RETRY_ATTEMPTS
}

fn default_retry_initial_delay_secs() -> u64 {
    crate::defaults::DEFAULT_RETRY_INITIAL_DELAY.as_secs()
}

fn default_static_dir() -> String {
    crate::defaults::DEFAULT_STATIC_DIR.to_string()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> Config {
        Config {
            api_key: "test-key".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_requires_api_key() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_with_api_key_is_valid() {
        let config = config_with_key();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_listen_addr() {
        let mut config = config_with_key();
        config.listen_addr = "not-an-address".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_api_base_url() {
        let mut config = config_with_key();
        config.api_base_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        config.api_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_model_invalid() {
        let mut config = config_with_key();
        config.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = config_with_key();
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());

        config.timeout_seconds = 301;
        assert!(config.validate().is_err());

        config.timeout_seconds = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_retry_bounds() {
        let mut config = config_with_key();
        config.retry_attempts = 0;
        assert!(config.validate().is_err());

        config.retry_attempts = 11;
        assert!(config.validate().is_err());

        config.retry_attempts = 3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_durations() {
        let config = config_with_key();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_initial_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_listen_socket_addr_parses_default() {
        let config = config_with_key();
        let addr = config.listen_socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);
        assert!(addr.ip().is_loopback());
    }
}
