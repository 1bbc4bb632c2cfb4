//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod info;
mod metadata;
mod render;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, session_options, CliOverrides, SantaConfig};
use crate::error::ViewerError;
use crate::fetch::HttpFetcher;
use crate::logging;
use crate::session::Session;

/// Exit codes of the `santa` binary
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Santa Nodemonke viewer - composite collection sprites over a background
#[derive(Parser)]
#[command(name = "santa")]
#[command(about = "Santa Nodemonke viewer - composite sprites over a background and export PNGs")]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace); RUST_LOG wins
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of discovering santa.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub sources: SourceArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where sprites and metadata come from
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Sprite base directory or URL
    #[arg(long, global = true, value_name = "BASE")]
    pub sprites: Option<String>,

    /// Metadata source, repeatable; replaces the configured list
    #[arg(long = "metadata-source", global = true, value_name = "URL")]
    pub metadata_sources: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Composite a sprite over its background and save it as PNG
    Render {
        /// Catalog id (1-10000)
        id: String,

        /// Output resolution in pixels: 28 to 1176, in steps of 28
        #[arg(short, long, value_name = "PX")]
        resolution: Option<String>,

        /// Manual background: hex (#RRGGBB) or any CSS color
        #[arg(long, value_name = "COLOR", conflicts_with = "auto_bg")]
        bg: Option<String>,

        /// Derive the background from the item's Body attribute
        #[arg(long)]
        auto_bg: bool,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Print the sprite URL of an id, followed by its mirror URLs
    Locate {
        /// Catalog id (1-10000)
        id: String,
    },

    /// Print the auto background color of an id
    Background {
        /// Catalog id (1-10000)
        id: String,
    },

    /// Load collection metadata and report where it came from
    Metadata,

    /// List body categories and their background colors
    Bodies {
        /// Show a single category
        name: Option<String>,
    },
}

/// Exit code for a failed viewer operation
pub(crate) fn exit_code(err: &ViewerError) -> ExitCode {
    match err {
        ViewerError::Validation(_) => ExitCode::from(EXIT_INVALID_ARGS),
        _ => ExitCode::from(EXIT_ERROR),
    }
}

/// Load config, apply CLI overrides, and open a session on it.
pub(crate) fn open_session(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<(SantaConfig, Session<HttpFetcher>), ExitCode> {
    let mut config = load_config(config_path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    merge_cli_overrides(&mut config, overrides);

    let options = session_options(&config).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    let fetcher = HttpFetcher::new().map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;

    Ok((config, Session::new(fetcher, options)))
}

fn overrides(sources: SourceArgs, out: Option<PathBuf>) -> CliOverrides {
    CliOverrides {
        out,
        sprite_base: sources.sprites,
        metadata_sources: (!sources.metadata_sources.is_empty()).then_some(sources.metadata_sources),
    }
}

/// Run the CLI application.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    runtime.block_on(dispatch(cli))
}

async fn dispatch(cli: Cli) -> ExitCode {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Render { id, resolution, bg, auto_bg, out } => {
            let request = render::RenderArgs { id, resolution, bg, auto_bg };
            render::run_render(config, &overrides(cli.sources, out), request).await
        }
        Commands::Locate { id } => info::run_locate(config, &overrides(cli.sources, None), &id),
        Commands::Background { id } => {
            metadata::run_background(config, &overrides(cli.sources, None), &id).await
        }
        Commands::Metadata => metadata::run_metadata(config, &overrides(cli.sources, None)).await,
        Commands::Bodies { name } => info::run_bodies(name.as_deref()),
    }
}
