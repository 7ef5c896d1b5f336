//! External denoising workflow contract
//!
//! The harness treats the workflow as opaque: it is handed input files, echo
//! times and an output directory, and its only observable effect is the set
//! of files it leaves on disk.

use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info};

use crate::constants::workflow::DEFAULT_PROGRAM;
use crate::errors::{WorkflowError, WorkflowResult};

/// Named workflow options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowOptions {
    /// PCA dimensionality-reduction method, e.g. `kundu`
    pub tedpca: Option<String>,
    /// Write intermediate debug outputs
    pub debug: bool,
    /// Write verbose outputs
    pub verbose: bool,
    /// Additional `--key value` options passed through untouched
    pub extra: Vec<(String, String)>,
}

/// One workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowInvocation {
    /// One file per echo, or a single z-concatenated file
    pub data: Vec<PathBuf>,
    /// Echo times in milliseconds
    pub echo_times: Vec<f64>,
    /// Directory the workflow writes into
    pub out_dir: PathBuf,
    pub options: WorkflowOptions,
}

impl WorkflowInvocation {
    /// Reject invocations the workflow could never accept
    pub fn validate(&self) -> WorkflowResult<()> {
        if self.data.is_empty() {
            return Err(WorkflowError::InvalidInvocation {
                reason: "no input files".to_string(),
            });
        }
        if self.echo_times.is_empty() {
            return Err(WorkflowError::InvalidInvocation {
                reason: "no echo times".to_string(),
            });
        }
        if self.data.len() > 1 && self.data.len() != self.echo_times.len() {
            return Err(WorkflowError::InvalidInvocation {
                reason: format!(
                    "{} input files but {} echo times",
                    self.data.len(),
                    self.echo_times.len()
                ),
            });
        }
        if let Some(te) = self.echo_times.iter().find(|te| !te.is_finite() || **te <= 0.0) {
            return Err(WorkflowError::InvalidInvocation {
                reason: format!("echo time {} is not a positive number", te),
            });
        }
        Ok(())
    }

    /// Command-line arguments in the workflow's CLI convention
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["-d".to_string()];
        args.extend(self.data.iter().map(|p| p.display().to_string()));
        args.push("-e".to_string());
        args.extend(self.echo_times.iter().map(|te| te.to_string()));
        args.push("--out-dir".to_string());
        args.push(self.out_dir.display().to_string());

        if let Some(method) = &self.options.tedpca {
            args.push("--tedpca".to_string());
            args.push(method.clone());
        }
        if self.options.debug {
            args.push("--debug".to_string());
        }
        if self.options.verbose {
            args.push("--verbose".to_string());
        }
        for (key, value) in &self.options.extra {
            args.push(format!("--{}", key));
            args.push(value.clone());
        }
        args
    }
}

/// Something that runs the denoising workflow
pub trait Workflow {
    /// Run to completion; outputs are judged separately
    fn run(&self, invocation: &WorkflowInvocation) -> impl Future<Output = WorkflowResult<()>> + Send;
}

/// Runs the workflow as an external program
#[derive(Debug, Clone)]
pub struct CommandWorkflow {
    program: String,
    extra_args: Vec<String>,
}

impl Default for CommandWorkflow {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl CommandWorkflow {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    /// Arguments appended after the invocation's own
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument list for an invocation
    pub fn args_for(&self, invocation: &WorkflowInvocation) -> Vec<String> {
        let mut args = invocation.to_args();
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

impl Workflow for CommandWorkflow {
    async fn run(&self, invocation: &WorkflowInvocation) -> WorkflowResult<()> {
        invocation.validate()?;
        let args = self.args_for(invocation);
        info!("Running {} with {} inputs", self.program, invocation.data.len());
        debug!("{} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| WorkflowError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(WorkflowError::Failed {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_echo() -> WorkflowInvocation {
        WorkflowInvocation {
            data: vec![PathBuf::from("/tmp/data/three-echo/three_echo_Cornell_zcat.nii.gz")],
            echo_times: vec![14.5, 38.5, 62.5],
            out_dir: PathBuf::from("/tmp/data/three-echo/TED.three-echo"),
            options: WorkflowOptions {
                tedpca: Some("kundu".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_single_zcat_input_accepts_many_echoes() {
        assert!(three_echo().validate().is_ok());
    }

    #[test]
    fn test_echo_count_must_match_inputs() {
        let mut invocation = three_echo();
        invocation.data = vec![PathBuf::from("e1.nii.gz"), PathBuf::from("e2.nii.gz")];
        assert!(matches!(
            invocation.validate(),
            Err(WorkflowError::InvalidInvocation { .. })
        ));

        invocation.echo_times = vec![15.4, -1.0];
        assert!(invocation.validate().is_err());
    }

    #[test]
    fn test_args_layout() {
        let args = three_echo().to_args();
        assert_eq!(
            args,
            vec![
                "-d",
                "/tmp/data/three-echo/three_echo_Cornell_zcat.nii.gz",
                "-e",
                "14.5",
                "38.5",
                "62.5",
                "--out-dir",
                "/tmp/data/three-echo/TED.three-echo",
                "--tedpca",
                "kundu",
            ]
        );

        let workflow = CommandWorkflow::new("tedana").with_extra_args(vec!["--no-png".to_string()]);
        assert_eq!(workflow.args_for(&three_echo()).last().unwrap(), "--no-png");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let workflow = CommandWorkflow::new("tedana-harness-definitely-not-installed");
        let result = workflow.run(&three_echo()).await;
        assert!(matches!(result, Err(WorkflowError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let workflow = CommandWorkflow::new("false");
        let result = workflow.run(&three_echo()).await;
        assert!(matches!(result, Err(WorkflowError::Failed { .. })));
    }
}
