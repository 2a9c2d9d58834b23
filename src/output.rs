//! Writing tone-mapped pixels and raw histograms to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use plotters::prelude::*;

use crate::error::{FlameError, FlameResult};
use crate::histogram::Histogram;
use crate::tonemap::{Channels, PixelBuffer};

/// Encodes `pixels` as an image whose format follows the file extension
/// (normally `.png`).
pub fn write_image(path: &Path, pixels: &PixelBuffer) -> FlameResult<()> {
    let size = (pixels.width as u32, pixels.height as u32);
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&BLACK).map_err(output_err)?;

    for row in 0..pixels.height {
        for col in 0..pixels.width {
            let (r, g, b) = match (pixels.channels, pixels.pixel(row, col)) {
                (Channels::Gray, &[v]) => (v, v, v),
                (Channels::Rgb, &[r, g, b]) => (r, g, b),
                _ => continue,
            };
            if (r, g, b) == (0, 0, 0) {
                continue;
            }
            root.draw_pixel((col as i32, row as i32), &RGBColor(r, g, b))
                .map_err(output_err)?;
        }
    }

    root.present().map_err(output_err)?;
    tracing::info!(path = %path.display(), "wrote image");
    Ok(())
}

/// Dumps raw visit counts: little-endian `u32`, row-major, row 0 at the top.
pub fn write_histogram(path: &Path, histogram: &Histogram) -> FlameResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for count in histogram.counts() {
        out.write_all(&count.to_le_bytes())?;
    }
    out.flush()?;
    tracing::info!(path = %path.display(), cells = histogram.len(), "wrote histogram");
    Ok(())
}

fn output_err<E: std::error::Error>(err: E) -> FlameError {
    FlameError::output(err.to_string())
}
