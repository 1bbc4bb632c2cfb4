//! Collection metadata loading
//!
//! The metadata table is fetched once per session from an ordered list of
//! sources. The first source is the primary; the rest are fallbacks tried
//! strictly in order, never concurrently, and never retried.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogEntry, CatalogId};
use crate::fetch::{Fetch, FetchError, ACCEPT_JSON};

/// Metadata sources in priority order
pub const DEFAULT_METADATA_SOURCES: &[&str] = &[
    "https://pub-ce8a03b190984a3d99332e13b7d5e3cb.r2.dev/metadata.json",
    "https://metadata.138148178.xyz/metadata.json",
];

/// Why a single source was skipped
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid metadata JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result of one metadata load sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataLoad {
    pub entries: Vec<CatalogEntry>,
    pub succeeded: bool,
    /// The source that produced `entries`
    pub source: Option<String>,
}

impl MetadataLoad {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: CatalogId) -> Option<&CatalogEntry> {
        find_entry(&self.entries, id)
    }
}

/// Parse a metadata payload.
///
/// Any JSON array is accepted. Rows that cannot be read as a catalog entry
/// are skipped instead of failing the whole table.
pub fn parse_metadata(bytes: &[u8]) -> Result<Vec<CatalogEntry>, serde_json::Error> {
    let rows: Vec<Value> = serde_json::from_slice(bytes)?;
    let entries: Vec<CatalogEntry> = rows.iter().filter_map(CatalogEntry::from_value).collect();
    if entries.len() < rows.len() {
        debug!(skipped = rows.len() - entries.len(), "skipped metadata rows without an integer id");
    }
    Ok(entries)
}

/// First entry carrying `id`. Duplicate ids resolve to the earliest row.
pub fn find_entry(entries: &[CatalogEntry], id: CatalogId) -> Option<&CatalogEntry> {
    entries.iter().find(|entry| entry.id == id.get())
}

async fn load_source<F: Fetch>(fetcher: &F, url: &str) -> Result<Vec<CatalogEntry>, SourceError> {
    let bytes = fetcher.fetch(url, ACCEPT_JSON).await?;
    Ok(parse_metadata(&bytes)?)
}

/// Load metadata from the first source that answers with valid JSON.
///
/// Failing sources are logged and skipped. When every source fails the
/// result is empty with `succeeded == false`.
pub async fn resolve_metadata<F, S>(fetcher: &F, candidates: &[S]) -> MetadataLoad
where
    F: Fetch,
    S: AsRef<str>,
{
    for candidate in candidates {
        let url = candidate.as_ref();
        match load_source(fetcher, url).await {
            Ok(entries) => {
                info!(source = url, entries = entries.len(), "metadata loaded");
                return MetadataLoad {
                    entries,
                    succeeded: true,
                    source: Some(url.to_string()),
                };
            }
            Err(e) => warn!(source = url, error = %e, "metadata source failed"),
        }
    }

    warn!(candidates = candidates.len(), "no metadata source succeeded");
    MetadataLoad::default()
}
