//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        // Start with default configuration
        let mut config = Config::default();

        // Load from environment file if it exists
        self.load_env_file()?;

        // Merge environment variables into config
        config.merge_from_env()?;

        // Override with CLI arguments
        self.apply_cli_overrides(&mut config);

        // Validate the final configuration
        config.validate()?;

        Ok(config)
    }

    /// Load .env file if it exists
    fn load_env_file(&self) -> Result<()> {
        EnvManager::load_env_file(self.cli.debug)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(ref listen) = self.cli.listen {
            config.listen_addr = listen.clone();
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = timeout;
        }

        if let Some(ref model) = self.cli.model {
            config.model = model.clone();
        }

        if let Some(ref api_url) = self.cli.api_url {
            config.api_base_url = api_url.clone();
        }

        if let Some(retry_attempts) = self.cli.retry_attempts {
            config.retry_attempts = retry_attempts;
        }

        if let Some(ref static_dir) = self.cli.static_dir {
            config.static_dir = static_dir.clone();
        }

        // Color handling combines the flags with terminal detection
        config.enable_color = self.cli.use_colors();

        // Set verbose and debug flags (these are CLI-only)
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug {
            println!("Applied CLI overrides to configuration");
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Listen Address: {}", config.listen_addr));
    summary.push(format!("API Base URL: {}", config.api_base_url));
    summary.push(format!("Model: {}", config.model));
    summary.push(format!(
        "API Key: {}",
        if config.api_key.is_empty() {
            "(not set)"
        } else {
            "(set)"
        }
    ));
    summary.push(format!("Timeout: {}s", config.timeout_seconds));
    summary.push(format!("Retry Attempts: {}", config.retry_attempts));
    summary.push(format!(
        "Initial Retry Delay: {}s",
        config.retry_initial_delay_seconds
    ));
    summary.push(format!("Static Dir: {}", config.static_dir));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Environment variables are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env_vars() {
        for var in [
            "LISTEN_ADDR",
            "GEMINI_API_KEY",
            "GEMINI_API_URL",
            "GEMINI_MODEL",
            "TIMEOUT_SECONDS",
            "RETRY_ATTEMPTS",
            "RETRY_INITIAL_DELAY_SECONDS",
            "STATIC_DIR",
            "ENABLE_COLOR",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.listen_addr, crate::defaults::DEFAULT_LISTEN_ADDR);
        assert_eq!(config.api_base_url, crate::defaults::DEFAULT_API_BASE_URL);
        assert_eq!(config.model, crate::defaults::DEFAULT_MODEL);
        assert_eq!(
            config.timeout_seconds,
            crate::defaults::DEFAULT_TIMEOUT.as_secs()
        );
        assert_eq!(config.retry_attempts, crate::defaults::DEFAULT_RETRY_ATTEMPTS);
        assert!(!config.verbose);
        assert!(!config.debug);
    }

    #[test]
    fn test_cli_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env_vars();
        env::set_var("GEMINI_API_KEY", "test-key");

        let cli = Cli {
            listen: Some("0.0.0.0:9000".to_string()),
            timeout: Some(5),
            model: Some("custom-model".to_string()),
            retry_attempts: Some(2),
            no_color: true,
            verbose: true,
            ..Default::default()
        };

        let config = load_config(cli).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:9000");
        assert_eq!(config.timeout_seconds, 5);
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.retry_attempts, 2);
        assert_eq!(config.api_key, "test-key");
        assert!(!config.enable_color);
        assert!(config.verbose);

        clear_env_vars();
    }

    #[test]
    fn test_env_merge() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env_vars();
        env::set_var("GEMINI_API_KEY", "env-key");
        env::set_var("GEMINI_API_URL", "http://127.0.0.1:9999");
        env::set_var("TIMEOUT_SECONDS", "12");

        let config = load_config(Cli::default()).unwrap();
        assert_eq!(config.api_key, "env-key");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9999");
        assert_eq!(config.timeout_seconds, 12);

        clear_env_vars();
    }

    #[test]
    fn test_missing_api_key_rejected() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env_vars();

        let result = load_config(Cli::default());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_config_summary_masks_api_key() {
        let config = Config {
            api_key: "secret-value".to_string(),
            ..Default::default()
        };

        let summary = display_config_summary(&config);
        assert!(summary.contains("API Key: (set)"));
        assert!(!summary.contains("secret-value"));
    }
}
