//! Stats command: per-frame counters as JSON lines

use std::io::{self, Write};
use std::process::ExitCode;

use crate::surface::RecordingSurface;

use super::{prepare, FieldArgs, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the stats command
pub fn run_stats(args: &FieldArgs, summary: bool) -> ExitCode {
    let mut sim = match prepare(args) {
        Ok(sim) => sim,
        Err(code) => return code,
    };

    // Only the counters matter; skip recording draw commands
    let mut surface = RecordingSurface::discarding(args.dimensions());
    let records = sim.run(&mut surface, args.frames, |_, _| {});

    let selected = if summary { &records[records.len().saturating_sub(1)..] } else { &records[..] };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for record in selected {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        };
        if writeln!(out, "{}", line).is_err() {
            return ExitCode::from(EXIT_ERROR);
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}
