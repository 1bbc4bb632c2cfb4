//! Santa Nodemonke viewer - library for compositing collection sprites
//!
//! This library provides functionality to:
//! - Validate catalog ids and output resolutions
//! - Resolve sprite URLs and load collection metadata with ordered fallback
//! - Pick a background manually or from an item's `Body` attribute
//! - Composite sprites with nearest-neighbor scaling and export PNGs,
//!   degrading to best-effort and raw output when a sprite is unusable

pub mod background;
pub mod catalog;
pub mod cli;
pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod metadata;
pub mod palettes;
pub mod pipeline;
pub mod session;
pub mod sprite;
pub mod suggest;

pub use error::ViewerError;
