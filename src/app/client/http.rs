//! Core HTTP operations
//!
//! A single GET per archive; failures are returned as-is, never retried.

use reqwest::Client;
use url::Url;

use crate::errors::{TransferError, TransferResult};

/// HTTP operations handler
#[derive(Debug, Clone)]
pub struct HttpHandler {
    client: Client,
    timeout_secs: u64,
}

impl HttpHandler {
    /// Creates a new HttpHandler around a configured client
    ///
    /// `timeout_secs` is only used to report timeouts; the client enforces it.
    pub fn new(client: Client, timeout_secs: u64) -> Self {
        Self {
            client,
            timeout_secs,
        }
    }

    /// Fetches the full response body, failing on any non-success status
    ///
    /// # Errors
    ///
    /// Returns `TransferError::Status` for non-2xx responses,
    /// `TransferError::Timeout` when the configured timeout elapses, and
    /// `TransferError::Http` for any other transport failure.
    pub async fn get_bytes(&self, url: &Url) -> TransferResult<Vec<u8>> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("GET {} returned HTTP {}", url, status.as_u16());
            return Err(TransferError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        tracing::debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    fn classify(&self, error: reqwest::Error) -> TransferError {
        if error.is_timeout() {
            TransferError::Timeout {
                seconds: self.timeout_secs,
            }
        } else {
            TransferError::Http(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::client::config::ClientConfig;

    #[tokio::test]
    async fn test_unreachable_host_is_transfer_error() {
        let config = ClientConfig {
            request_timeout: std::time::Duration::from_secs(2),
            connect_timeout: std::time::Duration::from_secs(1),
            ..Default::default()
        };
        let handler = HttpHandler::new(config.build_http_client().unwrap(), 2);

        // Port 9 on loopback is discard; nothing listens there in CI.
        let url = Url::parse("http://127.0.0.1:9/archive.tar.gz").unwrap();
        let result = handler.get_bytes(&url).await;

        assert!(matches!(
            result,
            Err(TransferError::Http(_)) | Err(TransferError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and hold connections without ever answering.
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = ClientConfig {
            request_timeout: std::time::Duration::from_secs(1),
            connect_timeout: std::time::Duration::from_secs(1),
            ..Default::default()
        };
        let handler = HttpHandler::new(config.build_http_client().unwrap(), 1);
        let url = Url::parse(&format!("http://{}/archive.tar.gz", addr)).unwrap();

        let result = handler.get_bytes(&url).await;

        assert!(matches!(result, Err(TransferError::Timeout { seconds: 1 })));
    }
}
