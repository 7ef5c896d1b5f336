//! Output verification against an expected manifest
//!
//! A run passes when its output directory holds exactly the manifest's files
//! plus the run-specific files declared by dynamic-name patterns. Every
//! `ExactlyOne` pattern is checked first, so a wrong log-file count is
//! reported even when the rest of the output matches.
//!
//! - [`enumerate`] - recursive listing of produced files
//! - [`patterns`] - run-specific file name patterns
//! - [`report`] - comparison and success reports
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tedana_harness::app::manifest::ManifestSource;
//! use tedana_harness::app::verify::OutputVerifier;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = ManifestSource::resource("tedana_outputs.txt");
//! let manifest = source.load().await?;
//! let report = OutputVerifier::default()
//!     .verify(Path::new("/tmp/data/three-echo/TED.three-echo"), &manifest, &source.to_string())
//!     .await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::app::manifest::Manifest;
use crate::errors::{Result, ValidationError, ValidationResult};

pub mod enumerate;
pub mod patterns;
pub mod report;

pub use enumerate::enumerate_outputs;
pub use patterns::{DynamicNamePattern, DynamicNameSpec, Occurrence};
pub use report::{compare, DynamicMatch, VerificationReport};

/// Verification settings
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Run-specific name patterns excluded before comparison
    pub patterns: Vec<DynamicNamePattern>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            patterns: vec![DynamicNamePattern::tedana_log()],
        }
    }
}

impl VerifierConfig {
    /// Compile configured pattern specs
    pub fn from_specs(specs: &[DynamicNameSpec]) -> ValidationResult<Self> {
        let patterns = specs
            .iter()
            .map(DynamicNameSpec::compile)
            .collect::<ValidationResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }
}

/// Result of checking an enumerated file list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedOutputs {
    /// Files matched against the manifest
    pub matched: usize,
    /// Files excluded per pattern
    pub dynamic: Vec<DynamicMatch>,
}

/// Validates produced outputs against a manifest
#[derive(Debug, Clone, Default)]
pub struct OutputVerifier {
    config: VerifierConfig,
}

impl OutputVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Check an already-enumerated list of relative paths
    ///
    /// Order of `outputs` is irrelevant.
    ///
    /// # Errors
    ///
    /// `ValidationError::LogFileCount` when an `ExactlyOne` pattern does not
    /// match exactly one path; `ValidationError::OutputMismatch` with the
    /// missing and unexpected files otherwise.
    pub fn check(&self, outputs: &[String], manifest: &Manifest) -> ValidationResult<CheckedOutputs> {
        let mut dynamic = Vec::with_capacity(self.config.patterns.len());

        for pattern in &self.config.patterns {
            let mut paths: Vec<String> = outputs
                .iter()
                .filter(|path| pattern.is_match(path))
                .cloned()
                .collect();
            paths.sort();

            if pattern.expected() == Occurrence::ExactlyOne && paths.len() != 1 {
                warn!(
                    "Pattern {} matched {} files, expected exactly one",
                    pattern.name(),
                    paths.len()
                );
                return Err(ValidationError::LogFileCount {
                    pattern: pattern.as_str().to_string(),
                    found: paths,
                });
            }

            debug!("Pattern {} excluded {:?}", pattern.name(), paths);
            dynamic.push(DynamicMatch {
                pattern: pattern.name().to_string(),
                paths,
            });
        }

        let remaining: BTreeSet<String> = outputs
            .iter()
            .filter(|path| !self.config.patterns.iter().any(|p| p.is_match(path)))
            .cloned()
            .collect();

        let diff = compare(manifest.as_set(), &remaining);
        if !diff.is_empty() {
            warn!(
                "Output mismatch: {} missing, {} unexpected",
                diff.missing.len(),
                diff.unexpected.len()
            );
            return Err(ValidationError::OutputMismatch(Box::new(diff)));
        }

        Ok(CheckedOutputs {
            matched: remaining.len(),
            dynamic,
        })
    }

    /// Enumerate `output_dir` and check it against `manifest`
    ///
    /// `manifest_label` is recorded in the report to say which manifest was used.
    pub async fn verify(
        &self,
        output_dir: &Path,
        manifest: &Manifest,
        manifest_label: &str,
    ) -> Result<VerificationReport> {
        let start = Instant::now();
        info!(
            "Verifying {} against {} ({} expected files)",
            output_dir.display(),
            manifest_label,
            manifest.len()
        );

        let outputs = enumerate::enumerate_outputs_async(output_dir.to_path_buf()).await?;
        let checked = self.check(&outputs, manifest)?;

        let report = VerificationReport {
            output_dir: output_dir.to_path_buf(),
            manifest: manifest_label.to_string(),
            matched: checked.matched,
            dynamic: checked.dynamic,
            verified_at: Utc::now(),
            elapsed: start.elapsed(),
        };
        info!("Verification passed: {}", report.summary());
        Ok(report)
    }
}

/// Verify with the default tedana log-file rule
pub async fn verify_outputs(output_dir: &Path, manifest: &Manifest) -> Result<VerificationReport> {
    OutputVerifier::default()
        .verify(output_dir, manifest, "manifest")
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "tedana_2020-01-01T00:00:00.tsv";

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_check_passes_with_single_log() {
        let manifest = Manifest::from_paths(["a.txt", "b/c.txt"]);
        let checked = OutputVerifier::default()
            .check(&paths(&["b/c.txt", LOG, "a.txt"]), &manifest)
            .unwrap();

        assert_eq!(checked.matched, 2);
        assert_eq!(checked.dynamic[0].paths, vec![LOG]);
    }

    #[test]
    fn test_check_is_order_independent() {
        let manifest = Manifest::from_paths(["z.1D", "a.txt", "m/n.nii.gz"]);
        let verifier = OutputVerifier::default();
        let forward = paths(&["a.txt", "m/n.nii.gz", "z.1D", LOG]);
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(
            verifier.check(&forward, &manifest).unwrap(),
            verifier.check(&reversed, &manifest).unwrap()
        );
    }

    #[test]
    fn test_log_count_checked_before_comparison() {
        let manifest = Manifest::from_paths(["a.txt"]);
        let verifier = OutputVerifier::default();

        let none = verifier.check(&paths(&["a.txt"]), &manifest);
        assert!(matches!(
            none,
            Err(ValidationError::LogFileCount { ref found, .. }) if found.is_empty()
        ));

        // Two logs plus a wrong file set: the count error wins.
        let two = verifier.check(
            &paths(&["unexpected.txt", LOG, "tedana_2021-02-03T04:05:06.tsv"]),
            &manifest,
        );
        assert!(matches!(
            two,
            Err(ValidationError::LogFileCount { ref found, .. }) if found.len() == 2
        ));
    }

    #[test]
    fn test_mismatch_reports_diff() {
        let manifest = Manifest::from_paths(["a.txt", "b/c.txt"]);
        let result = OutputVerifier::default().check(&paths(&["a.txt", "extra.txt", LOG]), &manifest);

        match result {
            Err(ValidationError::OutputMismatch(diff)) => {
                assert_eq!(diff.missing, vec!["b/c.txt"]);
                assert_eq!(diff.unexpected, vec!["extra.txt"]);
            }
            other => panic!("Expected OutputMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_any_pattern_excludes_without_counting() {
        let config = VerifierConfig::from_specs(&[
            DynamicNameSpec::tedana_log(),
            DynamicNameSpec {
                name: "pid".to_string(),
                regex: r"^run_[0-9]+\.pid$".to_string(),
                expected: Occurrence::Any,
            },
        ])
        .unwrap();
        let verifier = OutputVerifier::new(config);
        let manifest = Manifest::from_paths(["a.txt"]);

        let checked = verifier
            .check(&paths(&["a.txt", LOG, "run_1.pid", "run_22.pid"]), &manifest)
            .unwrap();
        assert_eq!(checked.dynamic[1].paths.len(), 2);

        assert!(verifier.check(&paths(&["a.txt", LOG]), &manifest).is_ok());
    }

    #[test]
    fn test_empty_pattern_set_compares_everything() {
        let verifier = OutputVerifier::new(VerifierConfig { patterns: vec![] });
        let manifest = Manifest::from_paths([LOG]);
        assert!(verifier.check(&paths(&[LOG]), &manifest).is_ok());
    }
}
