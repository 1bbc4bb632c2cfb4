//! Compose-then-export pipeline
//!
//! One export walks `Idle → Fetching → Decoding → Compositing → Encoding →
//! Delivered`, and any stage may end in `Failed`. When a sprite cannot be
//! obtained or decoded the pipeline degrades instead of giving up:
//!
//! 1. [`Tier::FullComposite`]: primary sprite URL, strict PNG decode
//! 2. [`Tier::BestEffort`]: the bytes already fetched, then each mirror,
//!    decoded by sniffing any supported format
//! 3. [`Tier::Passthrough`]: the first raw bytes obtained, saved unmodified
//!
//! Every attempt is recorded as its own [`ExportRun`] starting from `Idle`.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogId, Resolution};
use crate::color::Color;
use crate::compositor::{composite, decode_sprite, DecodeMode};
use crate::error::ViewerError;
use crate::export::{deliver, encode_png, FileNaming};
use crate::fetch::{Fetch, ACCEPT_PNG};

/// Why an export run ended in `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    SpriteUnavailable,
    RenderUnsupported,
    EncodeFailed,
    SaveFailed,
}

impl From<&ViewerError> for FailureReason {
    fn from(err: &ViewerError) -> Self {
        match err {
            ViewerError::RenderUnsupported(_) => Self::RenderUnsupported,
            ViewerError::EncodeFailed(_) => Self::EncodeFailed,
            ViewerError::Io(_) => Self::SaveFailed,
            _ => Self::SpriteUnavailable,
        }
    }
}

/// Export state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    Decoding,
    Compositing,
    Encoding,
    Delivered,
    Failed(FailureReason),
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Delivered | Stage::Failed(_))
    }
}

/// Degradation level an export run belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    FullComposite,
    BestEffort,
    Passthrough,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::FullComposite => "full composite",
            Tier::BestEffort => "best-effort composite",
            Tier::Passthrough => "raw passthrough",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal export transition {from:?} -> {to:?} ({tier})")]
pub struct IllegalTransition {
    pub tier: Tier,
    pub from: Stage,
    pub to: Stage,
}

/// State machine of a single export attempt
#[derive(Debug, Clone)]
pub struct ExportRun {
    tier: Tier,
    history: Vec<Stage>,
}

impl ExportRun {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            history: vec![Stage::Idle],
        }
    }

    pub fn stage(&self) -> Stage {
        self.history.last().copied().unwrap_or(Stage::Idle)
    }

    pub fn history(&self) -> &[Stage] {
        &self.history
    }

    /// Move to `next`, rejecting transitions the machine does not allow.
    ///
    /// Passthrough runs skip decoding, compositing and encoding entirely.
    pub fn advance(&mut self, next: Stage) -> Result<(), IllegalTransition> {
        let from = self.stage();
        let composites = self.tier != Tier::Passthrough;
        let legal = !from.is_terminal()
            && match (from, next) {
                (_, Stage::Failed(_)) => true,
                (Stage::Idle, Stage::Fetching) => true,
                (Stage::Fetching, Stage::Decoding)
                | (Stage::Decoding, Stage::Compositing)
                | (Stage::Compositing, Stage::Encoding)
                | (Stage::Encoding, Stage::Delivered) => composites,
                (Stage::Fetching, Stage::Delivered) => !composites,
                _ => false,
            };

        if !legal {
            return Err(IllegalTransition {
                tier: self.tier,
                from,
                to: next,
            });
        }

        debug!(tier = %self.tier, ?from, to = ?next, "export stage");
        self.history.push(next);
        Ok(())
    }

    fn enter(&mut self, next: Stage) {
        if let Err(e) = self.advance(next) {
            warn!(error = %e, "export state machine rejected transition");
        }
    }

    fn fail(&mut self, err: &ViewerError) {
        self.enter(Stage::Failed(FailureReason::from(err)));
    }
}

/// Everything needed to export one composite
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub id: CatalogId,
    pub resolution: Resolution,
    pub background: Color,
    pub sprite_url: String,
    pub mirror_urls: Vec<String>,
    pub naming: FileNaming,
    pub out_dir: PathBuf,
}

impl ExportRequest {
    /// File name of a composite for this request
    pub fn file_name(&self) -> String {
        self.naming.file_name(self.id, Some(self.resolution))
    }
}

/// A finished export
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub tier: Tier,
    pub runs: Vec<ExportRun>,
}

impl ExportOutcome {
    /// Whether a lower tier than the full composite had to be used
    pub fn degraded(&self) -> bool {
        self.tier != Tier::FullComposite
    }
}

enum SpriteSource<'a> {
    Url(&'a str),
    Fetched(Vec<u8>),
}

/// Fetch (or reuse), decode, composite, encode and save.
async fn attempt<F: Fetch>(
    fetcher: &F,
    request: &ExportRequest,
    run: &mut ExportRun,
    source: SpriteSource<'_>,
    mode: DecodeMode,
    raw: &mut Option<Vec<u8>>,
) -> Result<PathBuf, ViewerError> {
    run.enter(Stage::Fetching);
    let bytes = match source {
        SpriteSource::Url(url) => {
            let bytes = fetcher
                .fetch(url, ACCEPT_PNG)
                .await
                .map_err(|e| ViewerError::sprite_unavailable(e.to_string()))?;
            if raw.is_none() {
                *raw = Some(bytes.clone());
            }
            bytes
        }
        SpriteSource::Fetched(bytes) => bytes,
    };

    run.enter(Stage::Decoding);
    let sprite = decode_sprite(&bytes, mode)?;

    run.enter(Stage::Compositing);
    let raster = composite(&sprite, request.background, request.resolution.get())?;

    run.enter(Stage::Encoding);
    let png = encode_png(&raster)?;
    let path = deliver(&png, &request.out_dir, &request.file_name())?;

    run.enter(Stage::Delivered);
    Ok(path)
}

fn settle(
    mut run: ExportRun,
    result: Result<PathBuf, ViewerError>,
    runs: &mut Vec<ExportRun>,
) -> Result<PathBuf, ViewerError> {
    if let Err(e) = &result {
        run.fail(e);
    }
    runs.push(run);
    result
}

/// Export a composite of `request`, degrading tier by tier as needed.
///
/// Only `SpriteUnavailable` moves on to the next tier; rendering, encoding
/// and save failures end the export immediately. If no sprite bytes were
/// ever obtained the first tier's failure is returned.
pub async fn export_sprite<F: Fetch>(
    fetcher: &F,
    request: &ExportRequest,
) -> Result<ExportOutcome, ViewerError> {
    let mut runs = Vec::new();
    let mut raw: Option<Vec<u8>> = None;

    let mut run = ExportRun::new(Tier::FullComposite);
    let source = SpriteSource::Url(&request.sprite_url);
    let result = attempt(fetcher, request, &mut run, source, DecodeMode::StrictPng, &mut raw).await;
    let first_err = match settle(run, result, &mut runs) {
        Ok(path) => return Ok(ExportOutcome { path, tier: Tier::FullComposite, runs }),
        Err(e) if !e.allows_degradation() => return Err(e),
        Err(e) => e,
    };
    warn!(id = %request.id, error = %first_err, "full composite failed, trying best effort");

    let mut sources: Vec<SpriteSource<'_>> = Vec::new();
    if let Some(bytes) = &raw {
        sources.push(SpriteSource::Fetched(bytes.clone()));
    }
    sources.extend(request.mirror_urls.iter().map(|url| SpriteSource::Url(url)));

    for source in sources {
        let mut run = ExportRun::new(Tier::BestEffort);
        let result = attempt(fetcher, request, &mut run, source, DecodeMode::Sniff, &mut raw).await;
        match settle(run, result, &mut runs) {
            Ok(path) => {
                info!(id = %request.id, tier = %Tier::BestEffort, "export degraded");
                return Ok(ExportOutcome { path, tier: Tier::BestEffort, runs });
            }
            Err(e) if !e.allows_degradation() => return Err(e),
            Err(e) => warn!(id = %request.id, error = %e, "best-effort source failed"),
        }
    }

    let Some(bytes) = raw else {
        return Err(first_err);
    };

    let mut run = ExportRun::new(Tier::Passthrough);
    run.enter(Stage::Fetching);
    let file_name = request.naming.file_name(request.id, None);
    let path = settle(run, deliver(&bytes, &request.out_dir, &file_name), &mut runs)?;
    if let Some(run) = runs.last_mut() {
        run.enter(Stage::Delivered);
    }
    warn!(id = %request.id, path = %path.display(), "saved original sprite without compositing");
    Ok(ExportOutcome { path, tier: Tier::Passthrough, runs })
}
