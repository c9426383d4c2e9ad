//! Command-line interface definition

use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

/// Internet Weather backend - serves the weather page and synthesizes measurements
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "internet-weather")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address and port to bind (e.g. 127.0.0.1:8000)
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Outbound request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Generation model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Base URL of the generation API
    #[arg(long)]
    pub api_url: Option<String>,

    /// Total attempts for the outbound call
    #[arg(long)]
    pub retry_attempts: Option<u32>,

    /// Directory containing the static landing page
    #[arg(long)]
    pub static_dir: Option<String>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Print supported environment variables and exit
    #[arg(long)]
    pub env_help: bool,

    /// Write an example .env file to the given path and exit
    #[arg(long, value_name = "PATH")]
    pub init_env: Option<PathBuf>,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting color flags
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true // Force color output when --color is specified
        } else if self.no_color {
            false // Disable color output when --no-color is specified
        } else {
            // Automatic detection: color only when stdout is a terminal
            std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["internet-weather"]);
        assert!(cli.listen.is_none());
        assert!(cli.timeout.is_none());
        assert!(cli.model.is_none());
        assert!(!cli.verbose);
        assert!(!cli.debug);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_cli_flags_parse() {
        let cli = Cli::parse_from([
            "internet-weather",
            "--listen",
            "0.0.0.0:9000",
            "--timeout",
            "15",
            "--model",
            "some-model",
            "--retry-attempts",
            "5",
            "--verbose",
        ]);
        assert_eq!(cli.listen.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(cli.timeout, Some(15));
        assert_eq!(cli.model.as_deref(), Some("some-model"));
        assert_eq!(cli.retry_attempts, Some(5));
        assert!(cli.verbose);
    }

    #[test]
    fn test_conflicting_color_flags() {
        let cli = Cli::parse_from(["internet-weather", "--color", "--no-color"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_forced_color_flags() {
        let cli = Cli::parse_from(["internet-weather", "--color"]);
        assert!(cli.use_colors());

        let cli = Cli::parse_from(["internet-weather", "--no-color"]);
        assert!(!cli.use_colors());
    }
}
