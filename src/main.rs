//! tedana harness CLI application
//!
//! Stages reference datasets, runs tedana on them and verifies the output
//! directory against the packaged manifests.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use tedana_harness::cli::{handle_config, handle_fetch, handle_run, handle_verify, Cli, Commands};
use tedana_harness::config::AppConfig;
use tedana_harness::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error ({}, {}): {}", e.failure_kind(), e.category(), e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Ignore a missing .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let config = AppConfig::load(cli.global.config.clone()).await?;

    init_logging(&cli, &config);

    info!("tedana harness v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Run(args) => {
            info!("Executing run command");
            handle_run(args, &config).await
        }
        Commands::Fetch(args) => {
            info!("Executing fetch command");
            handle_fetch(args, &config).await
        }
        Commands::Verify(args) => {
            info!("Executing verify command");
            handle_verify(args, &config).await
        }
        Commands::Config(args) => handle_config(args, &config).await,
    }
}

/// Initialize logging from CLI flags, falling back to the configured level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let level = cli
        .log_level()
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| config.logging.level.to_lowercase());

    let mut filter = EnvFilter::from_default_env();
    match format!("tedana_harness={}", level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log level '{}': {}", level, e),
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    }
}
