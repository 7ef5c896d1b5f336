//! Gzip-compressed tar extraction
//!
//! Extraction runs in two passes over an in-memory payload. The first pass
//! decodes every header and body to the end of the gzip stream and checks
//! that every entry stays inside the destination; nothing is written unless
//! it succeeds. The second pass creates the destination and unpacks.
//!
//! A disk failure during the second pass leaves whatever was already
//! unpacked in place. There is no rollback.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde::Serialize;
use tar::Archive;
use tracing::{debug, info};

use crate::constants::archive::GZIP_MAGIC;
use crate::errors::{
    AppError, ArchiveFormatError, ExtractError, ExtractResult, FilesystemError, Result,
};

pub mod paths;

use paths::{contained_entry_path, LinkGuard};

/// What an archive contained
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    /// Entries extracted, excluding pax/GNU metadata records
    pub entries: usize,
    /// Regular files
    pub files: usize,
    /// Directories
    pub directories: usize,
    /// Symbolic and hard links
    pub links: usize,
    /// Uncompressed bytes of file content
    pub bytes: u64,
}

fn corrupt(error: io::Error) -> ArchiveFormatError {
    ArchiveFormatError::Corrupt {
        reason: error.to_string(),
    }
}

fn tar_stream(payload: &[u8]) -> Archive<GzDecoder<&[u8]>> {
    Archive::new(GzDecoder::new(payload))
}

/// Decode the whole payload and check every entry without touching disk
pub fn inspect_archive(payload: &[u8]) -> std::result::Result<ExtractionSummary, ArchiveFormatError> {
    if payload.len() < GZIP_MAGIC.len() || payload[..GZIP_MAGIC.len()] != GZIP_MAGIC {
        return Err(ArchiveFormatError::NotGzip);
    }

    let mut archive = tar_stream(payload);
    let mut summary = ExtractionSummary::default();
    let mut guard = LinkGuard::new();

    for entry in archive.entries().map_err(corrupt)? {
        let mut entry = entry.map_err(corrupt)?;
        let raw_path = entry.path().map_err(corrupt)?.into_owned();
        let entry_name = raw_path.display().to_string();
        let relative = contained_entry_path(&raw_path)
            .filter(|relative| !guard.passes_through_symlink(relative))
            .ok_or_else(|| ArchiveFormatError::UnsafeEntry {
                path: entry_name.clone(),
            })?;

        let kind = entry.header().entry_type();
        if kind.is_pax_global_extensions()
            || kind.is_pax_local_extensions()
            || kind.is_gnu_longname()
            || kind.is_gnu_longlink()
        {
            continue;
        }

        if relative.as_os_str().is_empty() && !kind.is_dir() {
            return Err(ArchiveFormatError::UnsafeEntry { path: entry_name });
        }

        if kind.is_dir() {
            summary.directories += 1;
        } else if kind.is_file() || kind.is_contiguous() || kind.is_gnu_sparse() {
            summary.files += 1;
        } else if kind.is_symlink() || kind.is_hard_link() {
            let target = entry
                .link_name()
                .map_err(corrupt)?
                .ok_or_else(|| ArchiveFormatError::Corrupt {
                    reason: format!("link entry {} has no target", entry_name),
                })?
                .into_owned();
            if !guard.target_is_contained(&relative, &target, kind.is_hard_link()) {
                return Err(ArchiveFormatError::UnsafeEntry {
                    path: format!("{} -> {}", entry_name, target.display()),
                });
            }
            if kind.is_symlink() {
                guard.record_symlink(&relative);
            }
            summary.links += 1;
        } else {
            return Err(ArchiveFormatError::UnsupportedEntry {
                path: entry_name,
                kind: format!("{:?}", kind),
            });
        }

        summary.bytes += io::copy(&mut entry, &mut io::sink()).map_err(corrupt)?;
        summary.entries += 1;
        debug!("Validated archive entry {}", entry_name);
    }

    // Reading to the end forces the gzip trailer (CRC, length) to be checked.
    let mut decoder = archive.into_inner();
    let mut rest = Vec::new();
    decoder.read_to_end(&mut rest).map_err(corrupt)?;

    Ok(summary)
}

/// Validate and unpack a gzip-compressed tar payload into `destination`
///
/// The destination and any missing parents are created only after the
/// payload has been fully validated. Existing files are overwritten; nothing
/// is removed beforehand.
///
/// # Errors
///
/// `ArchiveFormatError` for a malformed or unsafe payload (no side effects),
/// `FilesystemError` when the destination cannot be created or written.
pub fn extract_archive_bytes(payload: &[u8], destination: &Path) -> ExtractResult<ExtractionSummary> {
    let summary = inspect_archive(payload)?;

    std::fs::create_dir_all(destination).map_err(|source| FilesystemError::CreateDir {
        path: destination.to_path_buf(),
        source,
    })?;

    let mut archive = tar_stream(payload);
    archive.set_overwrite(true);
    let entries = archive
        .entries()
        .map_err(|e| ExtractError::Format(corrupt(e)))?;
    for entry in entries {
        let mut entry = entry.map_err(|e| ExtractError::Format(corrupt(e)))?;
        let relative = entry
            .path()
            .map_err(|e| ExtractError::Format(corrupt(e)))?
            .into_owned();
        let unpacked = entry
            .unpack_in(destination)
            .map_err(|source| FilesystemError::Write {
                path: destination.join(&relative),
                source,
            })?;
        if !unpacked {
            return Err(ArchiveFormatError::UnsafeEntry {
                path: relative.display().to_string(),
            }
            .into());
        }
    }

    info!(
        "Extracted {} entries ({} files, {} bytes) into {}",
        summary.entries,
        summary.files,
        summary.bytes,
        destination.display()
    );
    Ok(summary)
}

/// Unpack a `.tar.gz` file from disk on the blocking pool
pub async fn extract_archive_file(archive: &Path, destination: &Path) -> Result<ExtractionSummary> {
    let payload = tokio::fs::read(archive)
        .await
        .map_err(|source| FilesystemError::Read {
            path: archive.to_path_buf(),
            source,
        })?;
    extract_payload(payload, destination.to_path_buf()).await
}

/// Unpack an owned payload on the blocking pool
pub async fn extract_payload(payload: Vec<u8>, destination: PathBuf) -> Result<ExtractionSummary> {
    tokio::task::spawn_blocking(move || extract_archive_bytes(&payload, &destination))
        .await
        .map_err(|e| AppError::generic(format!("Extraction task failed: {}", e)))?
        .map_err(AppError::from)
}
