//! Viewer session state and its handlers
//!
//! A [`Session`] owns one [`ViewState`] and the collaborators needed to act
//! on it. Every user action is a method that validates its input, updates
//! the state and records the outcome in the status line. Failures never
//! end the session.

use std::path::Path;
use tracing::{debug, info};

use crate::background::{manual_background, resolve_auto_background, BackgroundMode};
use crate::catalog::{self, CatalogId, Resolution};
use crate::color::Color;
use crate::error::ViewerError;
use crate::export::FileNaming;
use crate::fetch::Fetch;
use crate::metadata::{resolve_metadata, MetadataLoad, DEFAULT_METADATA_SOURCES};
use crate::pipeline::{export_sprite, ExportOutcome, ExportRequest};
use crate::sprite::SpriteLocator;

/// Transient user-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// Generation token identifying the request that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Mutable state of one viewing session
#[derive(Debug, Clone)]
pub struct ViewState {
    pub selected_id: CatalogId,
    pub sprite_url: String,
    pub resolution: Resolution,
    pub background: Color,
    pub background_mode: BackgroundMode,
    pub picker_open: bool,
    pub metadata: MetadataLoad,
    pub status: Option<Status>,
    metadata_attempted: bool,
    generation: u64,
}

impl ViewState {
    pub fn metadata_load_succeeded(&self) -> bool {
        self.metadata.succeeded
    }

    pub fn generation(&self) -> Ticket {
        Ticket(self.generation)
    }
}

/// Everything a session needs besides the fetcher
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub sprites: SpriteLocator,
    pub mirrors: Vec<SpriteLocator>,
    pub metadata_sources: Vec<String>,
    pub naming: FileNaming,
    pub initial_id: CatalogId,
    pub resolution: Resolution,
    pub background: Color,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            sprites: SpriteLocator::default(),
            mirrors: Vec::new(),
            metadata_sources: DEFAULT_METADATA_SOURCES.iter().map(|s| s.to_string()).collect(),
            naming: FileNaming::default(),
            initial_id: CatalogId::default(),
            resolution: Resolution::default(),
            background: Color::WHITE,
        }
    }
}

pub struct Session<F: Fetch> {
    fetcher: F,
    sprites: SpriteLocator,
    mirrors: Vec<SpriteLocator>,
    metadata_sources: Vec<String>,
    naming: FileNaming,
    state: ViewState,
}

impl<F: Fetch> Session<F> {
    pub fn new(fetcher: F, options: SessionOptions) -> Self {
        let state = ViewState {
            selected_id: options.initial_id,
            sprite_url: options.sprites.locate(options.initial_id),
            resolution: options.resolution,
            background: options.background,
            background_mode: BackgroundMode::Manual,
            picker_open: false,
            metadata: MetadataLoad::default(),
            status: None,
            metadata_attempted: false,
            generation: 0,
        };

        Self {
            fetcher,
            sprites: options.sprites,
            mirrors: options.mirrors,
            metadata_sources: options.metadata_sources,
            naming: options.naming,
            state,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Sprite URLs of the current id on every configured mirror
    pub fn mirror_urls(&self) -> Vec<String> {
        self.mirrors.iter().map(|m| m.locate(self.state.selected_id)).collect()
    }

    fn report(&mut self, status: Status) {
        debug!(message = %status.message, is_error = status.is_error, "status");
        self.state.status = Some(status);
    }

    fn report_error(&mut self, err: &ViewerError) {
        self.report(Status::error(err.to_string()));
    }

    /// Take a new generation ticket, superseding every earlier one.
    pub fn begin_request(&mut self) -> Ticket {
        self.state.generation += 1;
        Ticket(self.state.generation)
    }

    /// Whether results for `ticket` may still be applied
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.state.generation
    }

    /// Select a catalog id from free-text input.
    ///
    /// Invalid input leaves the selection and sprite URL untouched.
    pub fn select(&mut self, input: &str) -> Result<CatalogId, ViewerError> {
        let id = match catalog::validate(input) {
            Ok(id) => id,
            Err(e) => {
                let err = ViewerError::from(e);
                self.report_error(&err);
                return Err(err);
            }
        };

        self.begin_request();
        self.state.selected_id = id;
        self.state.sprite_url = self.sprites.locate(id);
        debug!(%id, url = %self.state.sprite_url, "sprite selected");
        Ok(id)
    }

    /// Set the output resolution from free-text input.
    pub fn set_resolution(&mut self, input: &str) -> Result<Resolution, ViewerError> {
        match catalog::validate_resolution(input) {
            Ok(resolution) => {
                self.state.resolution = resolution;
                Ok(resolution)
            }
            Err(e) => {
                let err = ViewerError::from(e);
                self.report_error(&err);
                Err(err)
            }
        }
    }

    /// Load metadata from the configured sources.
    ///
    /// Runs at most once per session; later calls return the first result.
    pub async fn load_metadata(&mut self) -> &MetadataLoad {
        if self.state.metadata_attempted {
            return &self.state.metadata;
        }
        self.state.metadata_attempted = true;

        self.report(Status::info("Loading metadata..."));
        let load = resolve_metadata(&self.fetcher, &self.metadata_sources).await;
        if load.succeeded {
            self.report(Status::info(format!("Metadata loaded ({} items)", load.len())));
        } else {
            self.report(Status::error(
                "Could not load metadata (manual viewing still works)",
            ));
        }
        self.state.metadata = load;
        &self.state.metadata
    }

    /// Derive the background from the selected id's `Body` attribute.
    pub fn apply_auto_background(&mut self) -> Result<Color, ViewerError> {
        match resolve_auto_background(self.state.selected_id, &self.state.metadata) {
            Ok(color) => {
                self.state.background = color;
                self.state.background_mode = BackgroundMode::Auto;
                self.report(Status::info(format!("Applied auto background: {}", color)));
                Ok(color)
            }
            Err(e) => {
                self.report_error(&e);
                Err(e)
            }
        }
    }

    pub fn set_manual_background(&mut self, color: Color) {
        self.state.background = manual_background(color);
        self.state.background_mode = BackgroundMode::Manual;
    }

    /// Open or close the manual color picker; returns the new state.
    pub fn toggle_picker(&mut self) -> bool {
        self.state.picker_open = !self.state.picker_open;
        self.state.picker_open
    }

    /// Snapshot the state into an export request and take its ticket.
    pub fn prepare_export(&mut self, out_dir: &Path) -> (Ticket, ExportRequest) {
        let ticket = self.begin_request();
        let request = ExportRequest {
            id: self.state.selected_id,
            resolution: self.state.resolution,
            background: self.state.background,
            sprite_url: self.state.sprite_url.clone(),
            mirror_urls: self.mirror_urls(),
            naming: self.naming.clone(),
            out_dir: out_dir.to_path_buf(),
        };
        self.report(Status::info("Generating image..."));
        (ticket, request)
    }

    /// Record an export result. Results of superseded tickets are dropped
    /// without touching the status line; returns whether it was applied.
    pub fn complete_export(
        &mut self,
        ticket: Ticket,
        result: &Result<ExportOutcome, ViewerError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(?ticket, current = self.state.generation, "discarding stale export result");
            return false;
        }

        match result {
            Ok(outcome) if outcome.degraded() => self.report(Status::info(format!(
                "Image saved to {} ({})",
                outcome.path.display(),
                outcome.tier
            ))),
            Ok(outcome) => self.report(Status::info(format!(
                "Image saved to {}",
                outcome.path.display()
            ))),
            Err(e) => self.report_error(e),
        }
        true
    }

    /// Composite the current selection and save it into `out_dir`.
    pub async fn export(&mut self, out_dir: &Path) -> Result<ExportOutcome, ViewerError> {
        let (ticket, request) = self.prepare_export(out_dir);
        let result = export_sprite(&self.fetcher, &request).await;
        if let Ok(outcome) = &result {
            info!(id = %request.id, tier = %outcome.tier, path = %outcome.path.display(), "export finished");
        }
        self.complete_export(ticket, &result);
        result
    }
}
