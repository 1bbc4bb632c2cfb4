//! Render command implementation

use std::path::Path;
use std::process::ExitCode;

use crate::background::BackgroundMode;
use crate::color::parse_color;
use crate::config::CliOverrides;

use super::{exit_code, open_session, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Raw `render` arguments, validated by the session handlers
pub struct RenderArgs {
    pub id: String,
    pub resolution: Option<String>,
    pub bg: Option<String>,
    pub auto_bg: bool,
}

/// Execute the render command
pub async fn run_render(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    args: RenderArgs,
) -> ExitCode {
    let background = match args.bg.as_deref().map(parse_color).transpose() {
        Ok(color) => color,
        Err(e) => {
            eprintln!("Error: invalid background color: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let (config, mut session) = match open_session(config_path, overrides) {
        Ok(opened) => opened,
        Err(code) => return code,
    };

    if let Err(e) = session.select(&args.id) {
        eprintln!("Error: {}", e);
        return exit_code(&e);
    }
    if let Some(resolution) = args.resolution.as_deref() {
        if let Err(e) = session.set_resolution(resolution) {
            eprintln!("Error: {}", e);
            return exit_code(&e);
        }
    }

    let auto = args.auto_bg
        || (background.is_none() && config.viewer.background_mode == BackgroundMode::Auto);
    if let Some(color) = background {
        session.set_manual_background(color);
    } else if auto {
        session.load_metadata().await;
        if let Err(e) = session.apply_auto_background() {
            eprintln!("Error: {}", e);
            return exit_code(&e);
        }
    }

    match session.export(&config.viewer.out).await {
        Ok(outcome) => {
            if outcome.degraded() {
                eprintln!(
                    "Warning: sprite could not be composited normally, saved via {}",
                    outcome.tier
                );
            }
            println!("{}", outcome.path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_code(&e)
        }
    }
}
