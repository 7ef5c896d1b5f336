//! Prelude module for the tedana harness library
//!
//! Re-exports the items most integrations need, so a single
//! `use tedana_harness::prelude::*;` is enough.
//!
//! # Usage
//!
//! ```rust,no_run
//! use tedana_harness::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let runner = ScenarioRunner::new(DatasetClient::new()?, CommandWorkflow::default());
//!     for scenario in presets::all(Path::new("/tmp/data")) {
//!         runner.run(&scenario).await?;
//!     }
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, FailureKind, OutputDiff, Result};

pub use crate::app::{
    presets, ArchiveFetcher, ClientConfig, CommandWorkflow, DatasetClient, DynamicNamePattern,
    ExtractionSummary, Manifest, ManifestSource, Occurrence, OutputVerifier, Scenario,
    ScenarioOutcome, ScenarioRunner, VerificationReport, VerifierConfig, Workflow,
    WorkflowInvocation, WorkflowOptions,
};

pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{HTTP_TIMEOUT, LOG_FILE_PATTERN, USER_AGENT};

pub use std::path::{Path, PathBuf};

pub use tokio;
