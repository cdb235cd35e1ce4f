//! Render command implementation

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use crate::color::parse_color;
use crate::gif::GifWriter;
use crate::output::{create_output_file, default_output_path, save_png, OutputError, OutputFormat};
use crate::raster::RasterSurface;
use crate::simulate::Simulation;

use super::{prepare, FieldArgs, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Per-frame delay written to GIFs. Most viewers clamp anything shorter.
const GIF_FRAME_MS: u32 = 20;

/// Execute the render command
pub fn run_render(
    args: &FieldArgs,
    output: Option<&Path>,
    gif: bool,
    background: &str,
) -> ExitCode {
    let background = match parse_color(background) {
        Ok(color) => color,
        Err(e) => {
            eprintln!("Error: Invalid background '{}': {}", background, e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let (format, path) = match output {
        Some(path) => {
            let format = OutputFormat::from_path(path);
            if gif && format != OutputFormat::Gif {
                eprintln!("Error: --gif requires a .gif output path, got {}", path.display());
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
            (format, path.to_path_buf())
        }
        None => {
            let format = if gif { OutputFormat::Gif } else { OutputFormat::Png };
            (format, default_output_path(format))
        }
    };

    let mut sim = match prepare(args) {
        Ok(sim) => sim,
        Err(code) => return code,
    };
    let mut surface =
        RasterSurface::new(args.dimensions(), background);

    let result = match format {
        OutputFormat::Png => {
            let records = sim.run(&mut surface, args.frames, |_, _| {});
            log::debug!("Simulated {} frames", records.len());
            save_png(surface.image(), &path)
        }
        OutputFormat::Gif => render_gif(&mut sim, &mut surface, args.frames, &path),
    };

    match result {
        Ok(()) => {
            println!("Saved: {}", path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: Failed to write {}: {}", path.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run the simulation, streaming every frame into a GIF.
fn render_gif(
    sim: &mut Simulation,
    surface: &mut RasterSurface,
    frames: u64,
    path: &Path,
) -> Result<(), OutputError> {
    let mut out = create_output_file(path)?;
    let mut writer = GifWriter::new(&mut out, GIF_FRAME_MS)?;
    let mut failed: Option<OutputError> = None;

    sim.run(surface, frames, |_, surface: &RasterSurface| {
        if failed.is_none() {
            if let Err(e) = writer.push(surface.image()) {
                failed = Some(e);
            }
        }
    });

    if let Some(e) = failed {
        return Err(e);
    }
    let written = writer.finish();
    // The trailer sits in the buffer until here
    out.flush()?;
    log::debug!("Wrote {} GIF frames", written);
    Ok(())
}
