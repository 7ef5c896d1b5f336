//! Archive fetch: download a compressed tar stream and unpack it
//!
//! The payload is buffered in memory and validated in full before the
//! destination is created, so a failed transfer or a malformed payload
//! leaves the filesystem untouched.

use std::path::Path;
use std::time::Instant;

use url::Url;

use crate::app::archive::{extract_payload, ExtractionSummary};
use crate::app::client::http::HttpHandler;
use crate::errors::{Result, TransferError};

/// Archive fetch operations handler
pub struct ArchiveFetcher<'a> {
    http_handler: &'a HttpHandler,
}

impl<'a> ArchiveFetcher<'a> {
    /// Creates a new ArchiveFetcher with the given HTTP handler
    pub fn new(http_handler: &'a HttpHandler) -> Self {
        Self { http_handler }
    }

    /// Fetch `url` and extract it into `destination`
    ///
    /// Re-running against the same destination merges into it; removing
    /// stale content is the caller's job.
    ///
    /// # Errors
    ///
    /// - `TransferError` when the URL is invalid, unreachable or answers non-2xx
    /// - `ArchiveFormatError` when the payload is not a gzip-compressed tar
    /// - `FilesystemError` when the destination cannot be created or written
    pub async fn fetch(&self, url: &str, destination: &Path) -> Result<ExtractionSummary> {
        let parsed = Url::parse(url).map_err(|e| TransferError::InvalidUrl {
            url: url.to_string(),
            error: e.to_string(),
        })?;

        let start = Instant::now();
        tracing::info!("Downloading {}", parsed);
        let payload = self.http_handler.get_bytes(&parsed).await?;
        tracing::info!(
            "Downloaded {} bytes in {:?}",
            payload.len(),
            start.elapsed()
        );

        extract_payload(payload, destination.to_path_buf()).await
    }
}
