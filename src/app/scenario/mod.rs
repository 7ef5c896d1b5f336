//! Scenario driver: stage data, run the workflow, verify the outputs
//!
//! Each step is awaited in turn and any failure ends the run; nothing is
//! retried. A scenario owns its output directory and removes it before
//! running.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::app::client::DatasetClient;
use crate::app::manifest::ManifestSource;
use crate::app::verify::{OutputVerifier, VerificationReport};
use crate::app::workflow::{Workflow, WorkflowInvocation};
use crate::errors::{FilesystemError, Result};

pub mod presets;

/// A dataset plus the workflow run and manifest that judge it
#[derive(Debug, Clone, Serialize)]
pub struct Scenario {
    /// Dataset name, also the staging subdirectory
    pub name: String,
    /// Archive holding the input data
    pub url: String,
    /// Where the archive is extracted
    pub staging_dir: PathBuf,
    pub invocation: WorkflowInvocation,
    pub manifest: ManifestSource,
}

impl Scenario {
    pub fn output_dir(&self) -> &Path {
        &self.invocation.out_dir
    }
}

/// How a scenario ended when it did not fail
#[derive(Debug, Clone)]
pub enum ScenarioOutcome {
    /// Integration testing disabled
    Skipped { reason: String },
    /// Outputs matched the manifest
    Passed(VerificationReport),
}

impl ScenarioOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, ScenarioOutcome::Skipped { .. })
    }
}

/// Runs scenarios with a given workflow implementation
pub struct ScenarioRunner<W> {
    client: DatasetClient,
    workflow: W,
    verifier: OutputVerifier,
    skip_integration: bool,
    fetch: bool,
}

impl<W: Workflow> ScenarioRunner<W> {
    pub fn new(client: DatasetClient, workflow: W) -> Self {
        Self {
            client,
            workflow,
            verifier: OutputVerifier::default(),
            skip_integration: false,
            fetch: true,
        }
    }

    pub fn with_verifier(mut self, verifier: OutputVerifier) -> Self {
        self.verifier = verifier;
        self
    }

    /// Skip every scenario without touching network or disk
    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip_integration = skip;
        self
    }

    /// When false, reuse data already present in the staging directory
    pub fn with_fetch(mut self, fetch: bool) -> Self {
        self.fetch = fetch;
        self
    }

    /// Run one scenario end to end
    pub async fn run(&self, scenario: &Scenario) -> Result<ScenarioOutcome> {
        if self.skip_integration {
            info!("Skipping {} integration scenario", scenario.name);
            return Ok(ScenarioOutcome::Skipped {
                reason: format!("integration testing disabled for {}", scenario.name),
            });
        }

        info!("Running {} scenario", scenario.name);
        remove_stale_output(scenario.output_dir()).await?;

        if self.fetch {
            let summary = self
                .client
                .fetch_archive(&scenario.url, &scenario.staging_dir)
                .await?;
            info!(
                "Staged {} files for {} in {}",
                summary.files,
                scenario.name,
                scenario.staging_dir.display()
            );
        }

        self.workflow.run(&scenario.invocation).await?;

        let manifest = scenario.manifest.load().await?;
        let report = self
            .verifier
            .verify(scenario.output_dir(), &manifest, &scenario.manifest.to_string())
            .await?;

        Ok(ScenarioOutcome::Passed(report))
    }
}

/// Remove a previous run's output directory if present
pub async fn remove_stale_output(output_dir: &Path) -> std::result::Result<(), FilesystemError> {
    match tokio::fs::remove_dir_all(output_dir).await {
        Ok(()) => {
            info!("Removed stale output {}", output_dir.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(FilesystemError::Remove {
            path: output_dir.to_path_buf(),
            source,
        }),
    }
}
