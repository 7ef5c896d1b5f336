//! Command-line argument parsing for the tedana harness
//!
//! Defines the CLI structure with clap derive macros: scenario runs,
//! standalone fetch and verify steps, and configuration management.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::app::manifest::ManifestSource;
use crate::app::scenario::presets::SCENARIO_NAMES;

/// tedana harness - run and check tedana against reference datasets
#[derive(Parser, Debug)]
#[command(
    name = "tedana_harness",
    version,
    about = "Run tedana on reference multi-echo datasets and verify its outputs",
    long_about = "Downloads the reference five-echo and three-echo datasets, runs the tedana workflow on them
and checks that the output directory holds exactly the expected files."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch data, run tedana and verify outputs for one or all scenarios
    Run(RunArgs),

    /// Download and extract a .tar.gz archive
    Fetch(FetchArgs),

    /// Check an existing output directory against a manifest
    Verify(VerifyArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),
}

/// Which reference scenarios to run
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioSelection {
    FiveEcho,
    ThreeEcho,
    All,
}

impl ScenarioSelection {
    /// Preset names covered by this selection
    pub fn names(self) -> &'static [&'static str] {
        match self {
            ScenarioSelection::FiveEcho => &SCENARIO_NAMES[..1],
            ScenarioSelection::ThreeEcho => &SCENARIO_NAMES[1..2],
            ScenarioSelection::All => SCENARIO_NAMES,
        }
    }
}

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Scenario to run
    #[arg(value_enum)]
    pub scenario: ScenarioSelection,

    /// Root directory for staged datasets (overrides config)
    #[arg(long, value_name = "DIR")]
    pub staging_root: Option<PathBuf>,

    /// Reuse already staged data instead of downloading
    #[arg(long)]
    pub no_fetch: bool,
}

/// Arguments for the fetch command
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Archive URL
    pub url: String,

    /// Directory to extract into
    #[arg(value_name = "DEST")]
    pub destination: PathBuf,
}

/// Arguments for the verify command
#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Output directory produced by a workflow run
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Packaged manifest name
    #[arg(long, value_name = "NAME", conflicts_with = "manifest", required_unless_present = "manifest")]
    pub resource: Option<String>,

    /// Manifest file on disk
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl VerifyArgs {
    /// Manifest chosen on the command line
    pub fn manifest_source(&self) -> Result<ManifestSource, String> {
        match (&self.resource, &self.manifest) {
            (Some(name), None) => Ok(ManifestSource::Resource(name.clone())),
            (None, Some(path)) => Ok(ManifestSource::File(path.clone())),
            _ => Err("Specify exactly one of --resource or --manifest".to_string()),
        }
    }
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Where to write (defaults to the user config directory)
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level requested by flags, if any
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}
