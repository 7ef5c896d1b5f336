//! Verification results and set comparison

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::OutputDiff;

/// Files matched by one dynamic-name pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicMatch {
    /// Pattern name
    pub pattern: String,
    /// Matching relative paths, sorted
    pub paths: Vec<String>,
}

/// Outcome of a successful verification
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    /// Directory that was verified
    pub output_dir: PathBuf,
    /// Where the manifest came from
    pub manifest: String,
    /// Files that matched manifest entries
    pub matched: usize,
    /// Run-specific files excluded from comparison
    pub dynamic: Vec<DynamicMatch>,
    /// When verification finished
    pub verified_at: DateTime<Utc>,
    /// Total verification time
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl VerificationReport {
    /// The single file matched by the named pattern, if there was exactly one
    pub fn dynamic_file(&self, pattern: &str) -> Option<&str> {
        self.dynamic
            .iter()
            .find(|m| m.pattern == pattern)
            .filter(|m| m.paths.len() == 1)
            .map(|m| m.paths[0].as_str())
    }

    /// One-line summary for logs and the CLI
    pub fn summary(&self) -> String {
        let excluded: usize = self.dynamic.iter().map(|m| m.paths.len()).sum();
        format!(
            "{} files match {} ({} run-specific excluded) in {:?}",
            self.matched, self.manifest, excluded, self.elapsed
        )
    }
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

/// Symmetric difference between expected and produced paths
pub fn compare(expected: &BTreeSet<String>, actual: &BTreeSet<String>) -> OutputDiff {
    OutputDiff {
        missing: expected.difference(actual).cloned().collect(),
        unexpected: actual.difference(expected).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(paths: &[&str]) -> BTreeSet<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_compare_equal_sets() {
        let diff = compare(&set(&["a.txt", "b/c.txt"]), &set(&["b/c.txt", "a.txt"]));
        assert!(diff.is_empty());
    }

    #[test]
    fn test_compare_reports_both_directions() {
        let diff = compare(
            &set(&["a.txt", "b/c.txt", "old_name.nii.gz"]),
            &set(&["a.txt", "new_name.nii.gz", "zz.1D"]),
        );

        assert_eq!(diff.missing, vec!["b/c.txt", "old_name.nii.gz"]);
        assert_eq!(diff.unexpected, vec!["new_name.nii.gz", "zz.1D"]);
    }

    #[test]
    fn test_report_json_and_lookup() {
        let report = VerificationReport {
            output_dir: PathBuf::from("/tmp/data/three-echo/TED.three-echo"),
            manifest: "resource:tedana_outputs.txt".to_string(),
            matched: 2,
            dynamic: vec![DynamicMatch {
                pattern: "run-log".to_string(),
                paths: vec!["tedana_2020-01-01T00:00:00.tsv".to_string()],
            }],
            verified_at: Utc::now(),
            elapsed: Duration::from_millis(12),
        };

        assert_eq!(
            report.dynamic_file("run-log"),
            Some("tedana_2020-01-01T00:00:00.tsv")
        );
        assert_eq!(report.dynamic_file("other"), None);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["elapsed"], 12);
        assert_eq!(json["matched"], 2);
    }
}
