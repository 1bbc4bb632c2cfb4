//! Metadata-backed command implementations (metadata, background)

use std::path::Path;
use std::process::ExitCode;

use crate::background::BODY_ATTRIBUTE;
use crate::config::CliOverrides;

use super::{exit_code, open_session, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the metadata command
pub async fn run_metadata(config_path: Option<&Path>, overrides: &CliOverrides) -> ExitCode {
    let (_, mut session) = match open_session(config_path, overrides) {
        Ok(opened) => opened,
        Err(code) => return code,
    };

    let load = session.load_metadata().await.clone();
    match load.source {
        Some(ref source) if load.succeeded => {
            println!("source: {}", source);
            println!("entries: {}", load.len());
            ExitCode::from(EXIT_SUCCESS)
        }
        _ => {
            if let Some(status) = &session.state().status {
                eprintln!("Error: {}", status.message);
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the background command
pub async fn run_background(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    id: &str,
) -> ExitCode {
    let (_, mut session) = match open_session(config_path, overrides) {
        Ok(opened) => opened,
        Err(code) => return code,
    };

    let id = match session.select(id) {
        Ok(id) => id,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_code(&e);
        }
    };

    session.load_metadata().await;
    match session.apply_auto_background() {
        Ok(color) => {
            let body = session
                .state()
                .metadata
                .find(id)
                .and_then(|entry| entry.attribute(BODY_ATTRIBUTE))
                .unwrap_or_default();
            println!("{} {}", color, body);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_code(&e)
        }
    }
}
