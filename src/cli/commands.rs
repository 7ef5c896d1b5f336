//! Command handlers for the tedana harness CLI
//!
//! Each handler turns parsed arguments plus the loaded [`AppConfig`] into
//! calls on the core components and prints a short result line.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::app::manifest::{resources, ManifestSource};
use crate::app::{presets, DatasetClient, OutputVerifier, ScenarioOutcome, ScenarioRunner};
use crate::cli::{ConfigAction, ConfigArgs, FetchArgs, RunArgs, VerifyArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Handle the run command
///
/// Scenarios run one after another; the first failure ends the command.
pub async fn handle_run(args: RunArgs, config: &AppConfig) -> Result<()> {
    let staging_root = args
        .staging_root
        .clone()
        .unwrap_or_else(|| config.staging.root.clone());
    info!(
        "Running {:?} with staging root {}",
        args.scenario,
        staging_root.display()
    );

    let client = DatasetClient::with_config(config.client.to_runtime_config())?;
    let verifier = OutputVerifier::new(config.verify.to_runtime_config()?);
    let runner = ScenarioRunner::new(client, config.workflow.to_runtime_config())
        .with_verifier(verifier)
        .with_skip(config.staging.skip_integration)
        .with_fetch(!args.no_fetch);

    for name in args.scenario.names() {
        let scenario = presets::by_name(name, &staging_root)
            .ok_or_else(|| AppError::generic(format!("Unknown scenario: {}", name)))?;

        let start = Instant::now();
        match runner.run(&scenario).await? {
            ScenarioOutcome::Skipped { reason } => println!("SKIP {}: {}", scenario.name, reason),
            ScenarioOutcome::Passed(report) => {
                debug!("{} finished in {:?}", scenario.name, start.elapsed());
                println!("PASS {}: {}", scenario.name, report.summary());
            }
        }
    }

    Ok(())
}

/// Handle the fetch command
pub async fn handle_fetch(args: FetchArgs, config: &AppConfig) -> Result<()> {
    let client = DatasetClient::with_config(config.client.to_runtime_config())?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .map_err(|e| AppError::generic(format!("Invalid progress template: {}", e)))?
            .tick_strings(&["◐", "◓", "◑", "◒"]),
    );
    spinner.set_message(format!("Fetching {}...", args.url));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = client.fetch_archive(&args.url, &args.destination).await;
    spinner.finish_and_clear();
    let summary = result?;

    println!(
        "Extracted {} files, {} directories, {} links ({} bytes) into {}",
        summary.files,
        summary.directories,
        summary.links,
        summary.bytes,
        args.destination.display()
    );
    Ok(())
}

/// Handle the verify command
pub async fn handle_verify(args: VerifyArgs, config: &AppConfig) -> Result<()> {
    let source = args.manifest_source().map_err(AppError::generic)?;
    if let ManifestSource::Resource(name) = &source {
        if resources::lookup(name).is_err() {
            let known: Vec<&str> = resources::names().collect();
            return Err(AppError::generic(format!(
                "Unknown manifest resource '{}'; packaged: {}",
                name,
                known.join(", ")
            )));
        }
    }
    let manifest = source.load().await?;
    let stats = manifest.stats();
    info!(
        "Loaded {} manifest entries from {} ({} blank, {} duplicate lines)",
        manifest.len(),
        source,
        stats.empty_lines,
        stats.duplicates
    );

    let verifier = OutputVerifier::new(config.verify.to_runtime_config()?);
    let report = verifier
        .verify(&args.output_dir, &manifest, &source.to_string())
        .await?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::generic(format!("Failed to render report: {}", e)))?;
        println!("{}", rendered);
    } else {
        println!("PASS {}: {}", args.output_dir.display(), report.summary());
    }
    Ok(())
}

/// Handle configuration management
pub async fn handle_config(args: ConfigArgs, config: &AppConfig) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        ConfigAction::Init { path, force } => {
            let written: PathBuf = AppConfig::write_default(path, force).await?;
            println!("Wrote configuration to {}", written.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ScenarioSelection;
    use crate::errors::ValidationError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_run_skipped_by_config() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.staging.skip_integration = true;

        let args = RunArgs {
            scenario: ScenarioSelection::All,
            staging_root: Some(temp_dir.path().to_path_buf()),
            no_fetch: false,
        };

        assert!(handle_run(args, &config).await.is_ok());
        assert!(std::fs::read_dir(temp_dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_verify_with_file_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("a.nii.gz"), b"").unwrap();
        std::fs::write(out.join("tedana_2024-01-02T03:04:05.tsv"), b"").unwrap();
        let manifest = temp_dir.path().join("expected.txt");
        std::fs::write(&manifest, "a.nii.gz\n").unwrap();

        let args = VerifyArgs {
            output_dir: out.clone(),
            resource: None,
            manifest: Some(manifest.clone()),
            json: true,
        };
        assert!(handle_verify(args, &AppConfig::default()).await.is_ok());

        std::fs::write(out.join("extra.txt"), b"").unwrap();
        let args = VerifyArgs {
            output_dir: out,
            resource: None,
            manifest: Some(manifest),
            json: false,
        };
        assert!(matches!(
            handle_verify(args, &AppConfig::default()).await,
            Err(AppError::Validation(ValidationError::OutputMismatch(_)))
        ));
    }

    #[tokio::test]
    async fn test_config_init_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("harness.toml");
        let args = ConfigArgs {
            action: ConfigAction::Init {
                path: Some(path.clone()),
                force: false,
            },
        };

        handle_config(args, &AppConfig::default()).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_verify_unknown_resource_lists_packaged() {
        let temp_dir = TempDir::new().unwrap();
        let args = VerifyArgs {
            output_dir: temp_dir.path().to_path_buf(),
            resource: Some("nope.txt".to_string()),
            manifest: None,
            json: false,
        };

        let error = handle_verify(args, &AppConfig::default()).await.unwrap_err();
        assert!(error.to_string().contains("tedana_outputs.txt"));
    }
}
