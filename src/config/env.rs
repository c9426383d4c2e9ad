//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        // Try to load .env from current directory
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                println!("Loaded configuration from .env file");
            }
        } else if debug {
            println!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Internet Weather Backend Configuration
#
# This file contains environment variables that can be used to configure
# the internet weather backend. Values specified here will be used as
# defaults, but can be overridden by command-line arguments.

# API key for the generation API (required; never commit a real key)
# GEMINI_API_KEY=your-api-key-here

# Base URL of the generation API (override for self-hosted proxies or tests)
# GEMINI_API_URL=https://generativelanguage.googleapis.com

# Generation model identifier
# GEMINI_MODEL=gemini-2.5-flash-preview-05-20

# Address and port the HTTP server binds to
# LISTEN_ADDR=127.0.0.1:8000

# Outbound request timeout in seconds (1-300)
# TIMEOUT_SECONDS=30

# Total attempts for the outbound call (1-10)
# RETRY_ATTEMPTS=3

# Initial backoff delay in seconds, doubled after each failed attempt
# RETRY_INITIAL_DELAY_SECONDS=1

# Directory containing the static landing page
# STATIC_DIR=static

# Enable colored output (true/false)
# ENABLE_COLOR=true
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        use std::fs;

        let content = Self::create_example_env_content();
        fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "LISTEN_ADDR" => {
                value.parse::<std::net::SocketAddr>().map_err(|e| {
                    AppError::config(format!("Invalid LISTEN_ADDR value '{}': {}", value, e))
                })?;
            }
            "GEMINI_API_KEY" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("GEMINI_API_KEY cannot be empty"));
                }
            }
            "GEMINI_API_URL" => {
                let parsed = url::Url::parse(value).map_err(|e| {
                    AppError::config(format!("Invalid GEMINI_API_URL value '{}': {}", value, e))
                })?;
                if parsed.scheme() != "https" && parsed.scheme() != "http" {
                    return Err(AppError::config(format!(
                        "GEMINI_API_URL must use HTTP(S): {}",
                        value
                    )));
                }
            }
            "GEMINI_MODEL" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("GEMINI_MODEL cannot be empty"));
                }
            }
            "TIMEOUT_SECONDS" => {
                let timeout: u64 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", value, e))
                })?;
                if timeout == 0 || timeout > 300 {
                    return Err(AppError::config(format!(
                        "TIMEOUT_SECONDS must be between 1 and 300, got: {}",
                        timeout
                    )));
                }
            }
            "RETRY_ATTEMPTS" => {
                let attempts: u32 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid RETRY_ATTEMPTS value '{}': {}", value, e))
                })?;
                if attempts == 0 || attempts > 10 {
                    return Err(AppError::config(format!(
                        "RETRY_ATTEMPTS must be between 1 and 10, got: {}",
                        attempts
                    )));
                }
            }
            "RETRY_INITIAL_DELAY_SECONDS" => {
                let delay: u64 = value.parse().map_err(|e| {
                    AppError::config(format!(
                        "Invalid RETRY_INITIAL_DELAY_SECONDS value '{}': {}",
                        value, e
                    ))
                })?;
                if delay > 60 {
                    return Err(AppError::config(format!(
                        "RETRY_INITIAL_DELAY_SECONDS cannot exceed 60, got: {}",
                        delay
                    )));
                }
            }
            "STATIC_DIR" => {
                if value.trim().is_empty() {
                    return Err(AppError::config("STATIC_DIR cannot be empty"));
                }
            }
            "ENABLE_COLOR" => {
                value.parse::<bool>().map_err(|e| {
                    AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e))
                })?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("GEMINI_API_KEY", "API key for the generation API (required)", "your-api-key-here"),
            ("GEMINI_API_URL", "Base URL of the generation API", "https://generativelanguage.googleapis.com"),
            ("GEMINI_MODEL", "Generation model identifier", "gemini-2.5-flash-preview-05-20"),
            ("LISTEN_ADDR", "Address and port to bind", "127.0.0.1:8000"),
            ("TIMEOUT_SECONDS", "Outbound request timeout in seconds (1-300)", "30"),
            ("RETRY_ATTEMPTS", "Total attempts for the outbound call (1-10)", "3"),
            ("RETRY_INITIAL_DELAY_SECONDS", "Initial backoff delay in seconds", "1"),
            ("STATIC_DIR", "Directory containing the landing page", "static"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<28} {}\n", var, description));
            help.push_str(&format!("  {:<28} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        for (var_name, _, _) in Self::get_supported_env_vars() {
            if let Ok(value) = std::env::var(var_name) {
                if let Err(e) = Self::validate_env_var(var_name, &value) {
                    warnings.push(format!("Warning: {}", e));
                }
            }
        }

        Ok(warnings)
    }

    /// Check if .env file exists and validate its contents
    pub fn check_env_file() -> Result<Option<Vec<String>>> {
        if !Path::new(".env").exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(".env")
            .map_err(|e| AppError::config(format!("Failed to read .env file: {}", e)))?;

        let mut warnings = Vec::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                if let Err(e) = Self::validate_env_var(key, value) {
                    warnings.push(format!("Line '{}': {}", line, e));
                }
            }
        }

        Ok(Some(warnings))
    }
}
