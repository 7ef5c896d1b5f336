//! Command-line interface components
//!
//! Argument parsing and the handlers behind each subcommand.

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, ConfigAction, ConfigArgs, FetchArgs, GlobalArgs, RunArgs, ScenarioSelection,
    VerifyArgs,
};
pub use commands::{handle_config, handle_fetch, handle_run, handle_verify};
