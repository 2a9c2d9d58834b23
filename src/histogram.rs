//! The accumulation grid and the plane-to-raster mapping that feeds it.

use crate::flame::{Window, MAX_COORD};
use crate::xform::Rgb;

/// Maps points of the coordinate window onto raster cells. Row 0 is the
/// top of the image, so rows run against the y axis.
#[derive(Clone, Copy, Debug)]
pub struct PixelMapper {
    window: Window,
    width: usize,
    height: usize,
    xstep: f64,
    ystep: f64,
}

impl PixelMapper {
    pub fn new(window: Window, width: usize, height: usize) -> Self {
        PixelMapper {
            window,
            width,
            height,
            xstep: window.width() / width as f64,
            ystep: window.height() / height as f64,
        }
    }

    /// `(row, col)` of the cell holding `(x, y)`, or `None` when the point
    /// falls outside the raster. NaN and infinite coordinates always miss.
    #[inline]
    pub fn cell(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let col = ((x - self.window.xmin) / self.xstep).floor();
        let from_bottom = ((y - self.window.ymin) / self.ystep).floor();
        let row = (self.height as f64 - 1.0) - from_bottom;
        let in_cols = col >= 0.0 && col < self.width as f64;
        let in_rows = row >= 0.0 && row < self.height as f64;
        if in_cols && in_rows {
            Some((row as usize, col as usize))
        } else {
            None
        }
    }

    /// Row-major offset of the cell holding `(x, y)`.
    #[inline]
    pub fn offset(&self, x: f64, y: f64) -> Option<usize> {
        self.cell(x, y).map(|(row, col)| row * self.width + col)
    }
}

/// Smallest rectangle containing every written iteration. Diagnostic only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Bounds {
    pub fn empty() -> Self {
        Bounds {
            xmin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymin: f64::INFINITY,
            ymax: f64::NEG_INFINITY,
        }
    }

    /// NaN coordinates are ignored by `min`/`max`.
    #[inline]
    pub fn include(&mut self, x: f64, y: f64) {
        self.xmin = self.xmin.min(x);
        self.xmax = self.xmax.max(x);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
    }

    pub fn is_empty(&self) -> bool {
        !(self.xmin <= self.xmax && self.ymin <= self.ymax)
    }

    /// A window around these bounds, padded by `margin` times each side's
    /// extent. `None` when the bounds are empty, unbounded, degenerate, or
    /// reach past the allowed coordinate range.
    pub fn to_window(&self, margin: f64) -> Option<Window> {
        if self.is_empty() {
            return None;
        }
        let dx = (self.xmax - self.xmin) * margin;
        let dy = (self.ymax - self.ymin) * margin;
        let window = Window::new(
            self.xmin - dx,
            self.xmax + dx,
            self.ymin - dy,
            self.ymax + dy,
        );
        let sane = [window.xmin, window.xmax, window.ymin, window.ymax]
            .iter()
            .all(|v| v.is_finite() && v.abs() < MAX_COORD);
        if sane && window.validate().is_ok() {
            Some(window)
        } else {
            None
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds::empty()
    }
}

/// One cell per output pixel, row-major with row 0 at the top.
///
/// Every cell holds a visit count. In color mode each cell also holds the
/// sum of the colors plotted into it.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    width: usize,
    height: usize,
    counts: Vec<u32>,
    colors: Option<Vec<Rgb>>,
}

impl Histogram {
    pub fn basic(width: usize, height: usize) -> Self {
        Histogram {
            width,
            height,
            counts: vec![0; width * height],
            colors: None,
        }
    }

    pub fn color(width: usize, height: usize) -> Self {
        Histogram {
            colors: Some(vec![[0.0; 3]; width * height]),
            ..Histogram::basic(width, height)
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn has_color(&self) -> bool {
        self.colors.is_some()
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn colors(&self) -> Option<&[Rgb]> {
        self.colors.as_deref()
    }

    pub fn count_at(&self, row: usize, col: usize) -> u32 {
        self.counts[row * self.width + col]
    }

    /// Counts saturate rather than wrap.
    #[inline]
    pub fn increment(&mut self, offset: usize) {
        let cell = &mut self.counts[offset];
        *cell = cell.saturating_add(1);
    }

    /// Adds `rgb` to the cell's color sum (color mode only) and counts the
    /// visit.
    #[inline]
    pub fn add_color(&mut self, offset: usize, rgb: Rgb) {
        if let Some(colors) = self.colors.as_mut() {
            let sum = &mut colors[offset];
            sum[0] += rgb[0];
            sum[1] += rgb[1];
            sum[2] += rgb[2];
        }
        self.increment(offset);
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn nonzero_cells(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}
