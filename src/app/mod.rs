//! Core harness components
//!
//! Data flows driver → [`client`] (stage input data) → [`workflow`] (opaque
//! external run) → [`verify`] (compare outputs with a [`manifest`]).
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tedana_harness::app::{presets, CommandWorkflow, DatasetClient, ScenarioRunner};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let runner = ScenarioRunner::new(DatasetClient::new()?, CommandWorkflow::default());
//! let scenario = presets::three_echo(Path::new("/tmp/data"));
//! let outcome = runner.run(&scenario).await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod client;
pub mod manifest;
pub mod scenario;
pub mod verify;
pub mod workflow;

// Re-export main public API
pub use archive::{extract_archive_bytes, extract_archive_file, ExtractionSummary};
pub use client::{ArchiveFetcher, ClientConfig, DatasetClient};
pub use manifest::{Manifest, ManifestSource, ManifestStats};
pub use scenario::{presets, Scenario, ScenarioOutcome, ScenarioRunner};
pub use verify::{
    verify_outputs, DynamicNamePattern, DynamicNameSpec, Occurrence, OutputVerifier,
    VerificationReport, VerifierConfig,
};
pub use workflow::{CommandWorkflow, Workflow, WorkflowInvocation, WorkflowOptions};
