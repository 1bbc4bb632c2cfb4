//! Configuration loading and discovery for `santa.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::SantaConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::catalog::Resolution;
use crate::color::parse_color;
use crate::export::FileNaming;
use crate::session::SessionOptions;
use crate::sprite::{is_remote, SpriteLocator};

/// File name looked for during discovery
pub const CONFIG_FILE_NAME: &str = "santa.toml";

/// Directory under the XDG config home
pub const XDG_APP_DIR: &str = "santa-viewer";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse santa.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override output directory
    pub out: Option<PathBuf>,
    /// Override primary sprite base
    pub sprite_base: Option<String>,
    /// Replace the metadata source list
    pub metadata_sources: Option<Vec<String>>,
}

/// Find santa.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for santa.toml
/// 2. Check XDG_CONFIG_HOME/santa-viewer/santa.toml (or ~/.config/santa-viewer/santa.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find santa.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join(XDG_APP_DIR).join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find santa.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a santa.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the
/// default configuration.
///
/// Relative local paths in a loaded file are anchored at the file's
/// directory.
pub fn load_config(path: Option<&Path>) -> Result<SantaConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

fn load_config_file(path: &Path) -> Result<SantaConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: SantaConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    if let Some(root) = project_root(path) {
        anchor_paths(&mut config, root);
    }
    debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Configuration used when no santa.toml is found.
pub fn default_config() -> SantaConfig {
    SantaConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut SantaConfig, overrides: &CliOverrides) {
    if let Some(ref out) = overrides.out {
        config.viewer.out = out.clone();
    }

    if let Some(ref base) = overrides.sprite_base {
        config.sprites.base = base.clone();
    }

    if let Some(ref sources) = overrides.metadata_sources {
        config.metadata.sources = sources.clone();
    }
}

/// Get the project root directory from a config file path.
///
/// Returns the parent directory of the santa.toml file.
pub fn project_root(config_path: &Path) -> Option<&Path> {
    config_path.parent()
}

/// Resolve a path relative to the project root.
///
/// If the path is absolute, returns it unchanged.
/// If relative, joins it with the project root.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

fn resolve_location(project_root: &Path, location: &str) -> String {
    if is_remote(location) || location.starts_with("file://") {
        location.to_string()
    } else {
        resolve_path(project_root, Path::new(location)).to_string_lossy().into_owned()
    }
}

/// Anchor every relative local path of `config` at `project_root`.
pub fn anchor_paths(config: &mut SantaConfig, project_root: &Path) {
    config.viewer.out = resolve_path(project_root, &config.viewer.out);
    config.sprites.base = resolve_location(project_root, &config.sprites.base);
    for mirror in &mut config.sprites.mirrors {
        *mirror = resolve_location(project_root, mirror);
    }
    for source in &mut config.metadata.sources {
        *source = resolve_location(project_root, source);
    }
}

/// Turn a validated configuration into session settings.
pub fn session_options(config: &SantaConfig) -> Result<SessionOptions, ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    let invalid = |field: &str, message: String| {
        ConfigError::Validation(vec![format!("santa.toml: '{}' {}", field, message)])
    };
    let resolution = Resolution::new(config.viewer.resolution)
        .map_err(|e| invalid("viewer.resolution", e.to_string()))?;
    let background = parse_color(&config.viewer.background)
        .map_err(|e| invalid("viewer.background", e.to_string()))?;

    Ok(SessionOptions {
        sprites: SpriteLocator::new(config.sprites.base.clone()),
        mirrors: config.sprites.mirrors.iter().map(|m| SpriteLocator::new(m.clone())).collect(),
        metadata_sources: config.metadata.sources.clone(),
        naming: FileNaming {
            product: config.viewer.product.clone(),
            hd_threshold: config.viewer.hd_threshold,
        },
        resolution,
        background,
        ..SessionOptions::default()
    })
}
