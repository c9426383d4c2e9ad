//! Internet Weather backend - server entry point

use clap::Parser;
use internet_weather::{
    cli::Cli,
    config::{display_config_summary, load_config, EnvManager},
    error::{AppError, Result},
    server, PKG_NAME, VERSION,
};
use std::process;

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    // Parse command line arguments
    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    let use_color = cli.use_colors();

    // Handle the actual application logic
    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(use_color));

        // Print suggestions for common errors
        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    // Informational modes that exit before the server starts
    if cli.env_help {
        println!("{}", EnvManager::display_env_help());
        return Ok(());
    }

    if let Some(ref path) = cli.init_env {
        EnvManager::save_example_env_file(path)?;
        println!("Wrote example environment file to {}", path.display());
        return Ok(());
    }

    // Show debug info if requested
    if cli.debug {
        println!("{} v{}", PKG_NAME, VERSION);
        println!("Debug mode enabled");
        println!();
    }

    // Load and validate configuration
    let config = load_config(cli)?;

    // Surface any suspicious environment values before starting
    let warnings = EnvManager::validate_current_env()?;
    for warning in &warnings {
        eprintln!("{}", warning);
    }

    if config.debug {
        println!("Configuration loaded successfully:");
        println!("{}", display_config_summary(&config));
        println!();
    }

    println!(
        "Starting internet weather backend on http://{}",
        config.listen_addr
    );
    if config.verbose || config.debug {
        println!(
            "Generation model: {} ({} attempts, {}s initial backoff)",
            config.model, config.retry_attempts, config.retry_initial_delay_seconds
        );
        println!();
    }

    server::run(config).await
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Set GEMINI_API_KEY in your environment or .env file");
            eprintln!("  - Run with --env-help to list supported variables");
            eprintln!("  - Run with --init-env .env.example to write a template");
        }
        AppError::Network(_) => {
            eprintln!();
            eprintln!("Network troubleshooting:");
            eprintln!("  - Check that the listen address is free (see --listen)");
            eprintln!("  - Check your internet connection");
            eprintln!("  - Verify firewall settings");
        }
        AppError::RateLimited(_) => {
            eprintln!();
            eprintln!("Rate limiting help:");
            eprintln!("  - The generation API is throttling requests; try again later");
            eprintln!("  - Consider a higher quota for the configured API key");
        }
        _ => {}
    }
}
