//! HTTP client for retrieving reference datasets
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: single-shot GET with status and timeout classification
//! - `fetch`: download + validated extraction of `.tar.gz` payloads

use std::path::Path;

use crate::app::archive::ExtractionSummary;
use crate::errors::{Result, TransferResult};

pub mod config;
pub mod fetch;
pub mod http;

pub use config::ClientConfig;
pub use fetch::ArchiveFetcher;

use http::HttpHandler;

/// Client that downloads dataset archives into staging directories
#[derive(Debug, Clone)]
pub struct DatasetClient {
    http_handler: HttpHandler,
}

impl DatasetClient {
    /// Creates a client with default timeouts
    ///
    /// # Errors
    ///
    /// Returns `TransferError` if HTTP client creation fails
    pub fn new() -> TransferResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration
    pub fn with_config(config: ClientConfig) -> TransferResult<Self> {
        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, config.request_timeout.as_secs());
        Ok(Self { http_handler })
    }

    /// Download a gzip-compressed tar archive and extract it into `destination`
    ///
    /// See [`ArchiveFetcher::fetch`] for the error contract.
    pub async fn fetch_archive(&self, url: &str, destination: &Path) -> Result<ExtractionSummary> {
        ArchiveFetcher::new(&self.http_handler)
            .fetch(url, destination)
            .await
    }
}
