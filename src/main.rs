//! santa - command-line viewer for the Santa Nodemonke collection

use std::process::ExitCode;

use santa_viewer::cli;

fn main() -> ExitCode {
    cli::run()
}
