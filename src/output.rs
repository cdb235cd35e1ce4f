//! PNG output and output path handling

use image::RgbaImage;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Image container chosen from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single still of the final frame
    Png,
    /// Every frame as an animation
    Gif,
}

impl OutputFormat {
    /// Pick a format from a path's extension; anything but `.gif` is PNG.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gif") => OutputFormat::Gif,
            _ => OutputFormat::Png,
        }
    }
}

/// Default output file when `-o` is not given.
pub fn default_output_path(format: OutputFormat) -> PathBuf {
    match format {
        OutputFormat::Png => PathBuf::from("particles.png"),
        OutputFormat::Gif => PathBuf::from("particles.gif"),
    }
}

/// Create the parent directory of `path` if needed.
fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Create `path` for buffered writing, creating parent directories.
pub fn create_output_file(path: &Path) -> Result<BufWriter<File>, OutputError> {
    ensure_parent(path)?;
    Ok(BufWriter::new(File::create(path)?))
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
