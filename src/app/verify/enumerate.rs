//! Recursive enumeration of produced output files

use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::errors::FilesystemError;

/// List every non-directory entry under `root`, relative to it
///
/// Paths use `/` separators regardless of platform and come back sorted.
/// Symlinks are not followed; a symlink counts as a file unless it points
/// at a directory.
pub fn enumerate_outputs(root: &Path) -> Result<Vec<String>, FilesystemError> {
    if !root.is_dir() {
        return Err(FilesystemError::Walk {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "output directory does not exist"),
        });
    }

    let mut outputs = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|err| FilesystemError::Walk {
            path: err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source: io::Error::from(err),
        })?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if file_type.is_symlink() && entry.path().is_dir() {
            debug!("Skipping symlinked directory {}", entry.path().display());
            continue;
        }

        if let Ok(relative) = entry.path().strip_prefix(root) {
            let path = to_manifest_path(relative).ok_or_else(|| FilesystemError::Walk {
                path: entry.path().to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidData, "file name is not valid UTF-8"),
            })?;
            outputs.push(path);
        }
    }

    outputs.sort();
    if let Some(duplicate) = first_duplicate(&outputs) {
        return Err(FilesystemError::Walk {
            path: root.join(duplicate),
            source: io::Error::new(io::ErrorKind::InvalidData, "duplicate relative path"),
        });
    }
    debug!("Enumerated {} output files under {}", outputs.len(), root.display());
    Ok(outputs)
}

/// First path listed twice in a sorted list
fn first_duplicate(sorted: &[String]) -> Option<&str> {
    sorted
        .windows(2)
        .find(|pair| pair[0] == pair[1])
        .map(|pair| pair[0].as_str())
}

/// Render a relative path the way manifests spell it
///
/// Returns `None` when any component is not valid UTF-8, since such a name
/// cannot be matched against a manifest line without ambiguity.
pub fn to_manifest_path(relative: &Path) -> Option<String> {
    let parts = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Enumerate on the blocking pool
pub async fn enumerate_outputs_async(root: PathBuf) -> crate::errors::Result<Vec<String>> {
    tokio::task::spawn_blocking(move || enumerate_outputs(&root))
        .await
        .map_err(|e| crate::errors::AppError::generic(format!("Enumeration task failed: {}", e)))?
        .map_err(Into::into)
}
