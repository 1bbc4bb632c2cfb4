//! Read-only resource fetching
//!
//! Metadata and sprites are both plain `GET`s. [`Fetch`] is the seam the
//! resolvers are written against so tests can substitute canned responses;
//! [`HttpFetcher`] is the real implementation, which also reads local
//! static-asset paths straight from disk.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::sprite::is_remote;

/// `Accept` header for metadata requests
pub const ACCEPT_JSON: &str = "application/json";
/// `Accept` header for sprite requests
pub const ACCEPT_PNG: &str = "image/png";

/// A failed fetch
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    /// The server answered with a non-success status
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    /// A local asset could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The HTTP client could not be constructed
    #[error("HTTP client unavailable: {0}")]
    Client(String),
}

/// Something that can fetch the bytes behind a URL.
///
/// Implementations must not retry; callers own the fallback policy.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch(&self, url: &str, accept: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP(S) fetcher with a local-file fallback for relative asset paths
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("santa-viewer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    async fn fetch_remote(&self, url: &str, accept: &str) -> Result<Vec<u8>, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        debug!(url, bytes = bytes.len(), "fetched remote resource");
        Ok(bytes.to_vec())
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str, accept: &str) -> Result<Vec<u8>, FetchError> {
        if is_remote(url) {
            return self.fetch_remote(url, accept).await;
        }

        let path = local_path(url);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::Io { path: path.clone(), source })?;
        debug!(path = %path.display(), bytes = bytes.len(), "read local resource");
        Ok(bytes)
    }
}

/// Filesystem path for a non-HTTP location (`file://` prefix optional).
pub fn local_path(url: &str) -> PathBuf {
    PathBuf::from(url.strip_prefix("file://").unwrap_or(url))
}
