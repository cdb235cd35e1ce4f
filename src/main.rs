//! pfx - Command-line preview for the particle field backdrop

use std::process::ExitCode;

use particle_field::cli;

fn main() -> ExitCode {
    cli::run()
}
