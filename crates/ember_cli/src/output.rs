//! Image output.
//!
//! Pixels leave the renderer as linear floats; [`color_to_rgb8`] applies
//! gamma and clamping. The file extension picks the format: `.png` is
//! encoded with the `image` crate, `.ppm` (or no extension) is written as
//! plain-text PPM.

use ember_renderer::{color_to_rgb8, ImageBuffer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("unsupported output format: .{0}")]
    UnsupportedFormat(String),
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Write `image` as plain PPM (`P3`).
pub fn write_ppm(image: &ImageBuffer, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "P3")?;
    writeln!(out, "{} {}", image.width, image.height)?;
    writeln!(out, "255")?;
    for color in &image.pixels {
        let [r, g, b] = color_to_rgb8(*color);
        writeln!(out, "{r} {g} {b}")?;
    }
    Ok(())
}

/// Save `image` to `path`, choosing the encoding from the extension.
pub fn save(image: &ImageBuffer, path: impl AsRef<Path>) -> OutputResult<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        None | Some("ppm") => {
            let mut out = BufWriter::new(File::create(path)?);
            write_ppm(image, &mut out)?;
            out.flush()?;
        }
        Some("png") => {
            let rgb = image::RgbImage::from_raw(image.width, image.height, image.to_rgb8())
                .ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "pixel count does not match image size",
                    )
                })?;
            rgb.save(path)?;
        }
        Some(other) => return Err(OutputError::UnsupportedFormat(other.to_string())),
    }

    log::info!("Wrote {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}
