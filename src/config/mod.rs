//! Configuration for the viewer
//!
//! Provides types and parsing for `santa.toml`.

pub mod loader;
pub mod schema;

pub use loader::{
    default_config, find_config, find_config_from, load_config, merge_cli_overrides,
    session_options, CliOverrides, ConfigError,
};
pub use schema::*;
