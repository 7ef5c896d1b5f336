//! Core manifest types
//!
//! A manifest is the fixed list of relative output paths a correct workflow
//! run produces, one per line.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::resources;
use crate::errors::{ManifestError, ManifestResult};

/// Statistics about manifest parsing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestStats {
    /// Total lines read
    pub lines_processed: usize,
    /// Distinct entries kept
    pub entries: usize,
    /// Blank lines skipped
    pub empty_lines: usize,
    /// Repeated entries collapsed
    pub duplicates: usize,
}

/// Expected output file set for a scenario
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<String>,
    set: BTreeSet<String>,
    stats: ManifestStats,
}

impl Manifest {
    /// Parse newline-separated relative paths
    ///
    /// Carriage returns and blank lines are dropped. Repeated paths are
    /// collapsed to their first occurrence.
    pub fn parse(text: &str) -> Self {
        let mut manifest = Self::default();

        for line in text.lines() {
            manifest.stats.lines_processed += 1;
            let path = line.trim_end_matches('\r');
            if path.trim().is_empty() {
                manifest.stats.empty_lines += 1;
                continue;
            }
            if !manifest.set.insert(path.to_string()) {
                warn!("Duplicate manifest entry collapsed: {}", path);
                manifest.stats.duplicates += 1;
                continue;
            }
            manifest.entries.push(path.to_string());
        }

        manifest.stats.entries = manifest.entries.len();
        manifest
    }

    /// Build a manifest from an iterator of paths
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let text = paths
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Self::parse(&text)
    }

    /// Entries in file order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries as an ordered set, for comparison
    pub fn as_set(&self) -> &BTreeSet<String> {
        &self.set
    }

    /// Whether `path` is listed
    pub fn contains(&self, path: &str) -> bool {
        self.set.contains(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &ManifestStats {
        &self.stats
    }
}

/// Where a manifest is read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ManifestSource {
    /// Packaged resource, resolved independently of the working directory
    Resource(String),
    /// Plain file on disk
    File(PathBuf),
}

impl ManifestSource {
    pub fn resource(name: impl Into<String>) -> Self {
        Self::Resource(name.into())
    }

    /// Read and parse the manifest
    pub async fn load(&self) -> ManifestResult<Manifest> {
        match self {
            ManifestSource::Resource(name) => Ok(Manifest::parse(resources::lookup(name)?)),
            ManifestSource::File(path) => {
                let text = tokio::fs::read_to_string(path).await.map_err(|source| {
                    ManifestError::Read {
                        path: path.clone(),
                        source,
                    }
                })?;
                Ok(Manifest::parse(&text))
            }
        }
    }
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSource::Resource(name) => write!(f, "resource:{}", name),
            ManifestSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}
