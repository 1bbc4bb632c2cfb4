//! Offline command implementations (locate, bodies)

use std::path::Path;
use std::process::ExitCode;

use crate::config::CliOverrides;
use crate::palettes;
use crate::suggest::{format_suggestion, suggest_categories};

use super::{exit_code, open_session, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the locate command
pub fn run_locate(config_path: Option<&Path>, overrides: &CliOverrides, id: &str) -> ExitCode {
    let (_, mut session) = match open_session(config_path, overrides) {
        Ok(opened) => opened,
        Err(code) => return code,
    };

    if let Err(e) = session.select(id) {
        eprintln!("Error: {}", e);
        return exit_code(&e);
    }

    println!("{}", session.state().sprite_url);
    for mirror in session.mirror_urls() {
        println!("{}", mirror);
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the bodies command
pub fn run_bodies(name: Option<&str>) -> ExitCode {
    let Some(name) = name else {
        println!("Body colors:");
        for (category, color) in palettes::body_colors() {
            println!("  {:<10} {}", category, color);
        }
        return ExitCode::from(EXIT_SUCCESS);
    };

    match palettes::body_color(name.trim()) {
        Some(color) => {
            println!("{}", color);
            ExitCode::from(EXIT_SUCCESS)
        }
        None => {
            eprintln!("Error: Unknown body category '{}'", name);
            if let Some(hint) = format_suggestion(&suggest_categories(name)) {
                eprintln!("{}", hint);
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}
