//! Configuration schema types for `santa.toml`
//!
//! Every section and field is optional; a missing file and an empty file
//! both yield the built-in defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::background::BackgroundMode;
use crate::catalog::{Resolution, DEFAULT_RESOLUTION};
use crate::color::parse_color;
use crate::export::{DEFAULT_HD_THRESHOLD, DEFAULT_PRODUCT};
use crate::metadata::DEFAULT_METADATA_SOURCES;
use crate::sprite::DEFAULT_SPRITE_BASE;

/// Output and presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// File name prefix of exported images
    #[serde(default = "default_product")]
    pub product: String,
    /// Default output resolution in pixels
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    /// Resolutions at or above this are tagged `-HD`
    #[serde(default = "default_hd_threshold")]
    pub hd_threshold: u32,
    /// Directory exported files are written to
    #[serde(default = "default_out")]
    pub out: PathBuf,
    /// Default manual background, any CSS color
    #[serde(default = "default_background")]
    pub background: String,
    /// Whether `render` derives the background from metadata by default
    #[serde(default)]
    pub background_mode: BackgroundMode,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            product: default_product(),
            resolution: default_resolution(),
            hd_threshold: default_hd_threshold(),
            out: default_out(),
            background: default_background(),
            background_mode: BackgroundMode::default(),
        }
    }
}

fn default_product() -> String {
    DEFAULT_PRODUCT.to_string()
}

fn default_resolution() -> u32 {
    DEFAULT_RESOLUTION
}

fn default_hd_threshold() -> u32 {
    DEFAULT_HD_THRESHOLD
}

fn default_out() -> PathBuf {
    PathBuf::from(".")
}

fn default_background() -> String {
    "#FFFFFF".to_string()
}

/// Where sprites are fetched from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpritesConfig {
    /// Primary sprite base: a local directory or an http(s) URL
    #[serde(default = "default_sprite_base")]
    pub base: String,
    /// Alternate bases for the best-effort tier, tried in order
    #[serde(default)]
    pub mirrors: Vec<String>,
}

impl Default for SpritesConfig {
    fn default() -> Self {
        Self {
            base: default_sprite_base(),
            mirrors: Vec::new(),
        }
    }
}

fn default_sprite_base() -> String {
    DEFAULT_SPRITE_BASE.to_string()
}

/// Metadata source list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Candidates in priority order
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
        }
    }
}

fn default_sources() -> Vec<String> {
    DEFAULT_METADATA_SOURCES.iter().map(|s| s.to_string()).collect()
}

/// Root of `santa.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SantaConfig {
    #[serde(default)]
    pub viewer: ViewerConfig,
    #[serde(default)]
    pub sprites: SpritesConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
}

/// A single invalid config field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Dotted path of the field, e.g. `viewer.resolution`
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "santa.toml: '{}' {}", self.field, self.message)
    }
}

impl SantaConfig {
    /// Check every field, returning all problems at once.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut invalid = |field: String, message: String| {
            errors.push(ConfigValidationError { field, message });
        };

        let product = &self.viewer.product;
        if product.trim().is_empty() {
            invalid("viewer.product".into(), "must be a non-empty string".into());
        } else if product.contains(['/', '\\']) {
            invalid("viewer.product".into(), "must not contain path separators".into());
        }

        if let Err(e) = Resolution::new(self.viewer.resolution) {
            invalid("viewer.resolution".into(), e.to_string());
        }

        if self.viewer.hd_threshold == 0 {
            invalid("viewer.hd_threshold".into(), "must be a positive integer".into());
        }

        if let Err(e) = parse_color(&self.viewer.background) {
            invalid("viewer.background".into(), format!("is not a color: {}", e));
        }

        if self.sprites.base.trim().is_empty() {
            invalid("sprites.base".into(), "must be a non-empty path or URL".into());
        }

        for (i, mirror) in self.sprites.mirrors.iter().enumerate() {
            if mirror.trim().is_empty() {
                invalid(format!("sprites.mirrors[{}]", i), "must be a non-empty path or URL".into());
            }
        }

        for (i, source) in self.metadata.sources.iter().enumerate() {
            if source.trim().is_empty() {
                invalid(format!("metadata.sources[{}]", i), "must be a non-empty path or URL".into());
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: SantaConfig = toml::from_str("").unwrap();
        assert_eq!(config, SantaConfig::default());
        assert_eq!(config.viewer.product, "santa-nodemonke");
        assert_eq!(config.viewer.resolution, 560);
        assert_eq!(config.sprites.base, "assets/merged");
        assert_eq!(config.metadata.sources.len(), 2);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_parse_full_config() {
        let config: SantaConfig = toml::from_str(
            r##"
[viewer]
product = "monke"
resolution = 280
hd_threshold = 1000
out = "exports"
background = "rebeccapurple"
background_mode = "auto"

[sprites]
base = "https://cdn.example.com/merged"
mirrors = ["https://mirror.example.com/merged", "backup/merged"]

[metadata]
sources = ["meta/local.json"]
"##,
        )
        .unwrap();

        assert_eq!(config.viewer.product, "monke");
        assert_eq!(config.viewer.out, PathBuf::from("exports"));
        assert_eq!(config.viewer.background_mode, BackgroundMode::Auto);
        assert_eq!(config.sprites.mirrors.len(), 2);
        assert_eq!(config.metadata.sources, vec!["meta/local.json"]);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_field() {
        let mut config = SantaConfig::default();
        config.viewer.product = "a/b".to_string();
        config.viewer.resolution = 1200;
        config.viewer.hd_threshold = 0;
        config.viewer.background = "not-a-color".to_string();
        config.sprites.base = " ".to_string();
        config.sprites.mirrors = vec!["ok".to_string(), String::new()];
        config.metadata.sources = vec![String::new()];

        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "viewer.product",
                "viewer.resolution",
                "viewer.hd_threshold",
                "viewer.background",
                "sprites.base",
                "sprites.mirrors[1]",
                "metadata.sources[0]",
            ]
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigValidationError {
            field: "viewer.resolution".to_string(),
            message: "must be a multiple of 28".to_string(),
        };
        assert_eq!(err.to_string(), "santa.toml: 'viewer.resolution' must be a multiple of 28");
    }
}
