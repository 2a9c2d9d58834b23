//! Density estimation: from visit counts to displayable pixels.
//!
//! Each cell's count goes through a [`DensityScale`], the result is divided
//! by the largest scaled value on the grid and spread over 0..=255. An
//! all-empty grid maps to all-zero pixels.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::histogram::Histogram;

/// Curve applied to raw visit counts before normalization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DensityScale {
    Linear,
    /// `ln(n + 1)`
    #[default]
    Log,
    /// `ln(ln(n + 1) + 1)`
    LogLog,
    /// `ln(n + 1)^p`
    LogPow { p: f64 },
    /// `n^p`
    Pow { p: f64 },
    /// `atan(n / d)`
    Arctan { d: f64 },
}

impl DensityScale {
    /// An empty cell is 0 on every curve, whatever the parameter.
    #[inline]
    pub fn apply(&self, count: u32) -> f64 {
        if count == 0 {
            return 0.0;
        }
        let n = count as f64;
        match *self {
            DensityScale::Linear => n,
            DensityScale::Log => n.ln_1p(),
            DensityScale::LogLog => n.ln_1p().ln_1p(),
            DensityScale::LogPow { p } => n.ln_1p().powf(p),
            DensityScale::Pow { p } => n.powf(p),
            DensityScale::Arctan { d } => (n / d).atan(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channels {
    Gray,
    Rgb,
}

impl Channels {
    pub fn per_pixel(&self) -> usize {
        match self {
            Channels::Gray => 1,
            Channels::Rgb => 3,
        }
    }
}

/// Row-major 8-bit pixels, row 0 at the top of the image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pub width: usize,
    pub height: usize,
    pub channels: Channels,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn pixel(&self, row: usize, col: usize) -> &[u8] {
        let n = self.channels.per_pixel();
        let start = (row * self.width + col) * n;
        &self.data[start..start + n]
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ToneMapper {
    scale: DensityScale,
}

impl ToneMapper {
    pub fn new(scale: DensityScale) -> Self {
        ToneMapper { scale }
    }

    /// Largest scaled value over the grid; 0 for an empty grid.
    pub fn scale_max(&self, histogram: &Histogram) -> f64 {
        histogram
            .counts()
            .iter()
            .map(|&c| self.scale.apply(c))
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max)
    }

    fn normalization(&self, histogram: &Histogram) -> f64 {
        let max = self.scale_max(histogram);
        info!(max, scale = ?self.scale, "density normalization");
        max
    }

    /// Each cell's scaled count divided by `max`, clamped to [0, 1].
    fn brightness(&self, histogram: &Histogram, max: f64) -> Vec<f64> {
        if max <= 0.0 {
            return vec![0.0; histogram.len()];
        }
        histogram
            .counts()
            .iter()
            .map(|&c| (self.scale.apply(c) / max).clamp(0.0, 1.0))
            .collect()
    }

    /// One intensity byte per pixel: `clamp(floor(255.5 * v / max), 0, 255)`.
    pub fn grayscale(&self, histogram: &Histogram) -> PixelBuffer {
        let max = self.normalization(histogram);
        let data = if max > 0.0 {
            histogram
                .counts()
                .iter()
                .map(|&c| to_byte(255.5 * self.scale.apply(c) / max))
                .collect()
        } else {
            vec![0; histogram.len()]
        };
        PixelBuffer {
            width: histogram.width(),
            height: histogram.height(),
            channels: Channels::Gray,
            data,
        }
    }

    /// One RGB triple per pixel: the cell's mean color scaled by its
    /// brightness. Histograms without color sums render as gray.
    pub fn color(&self, histogram: &Histogram) -> PixelBuffer {
        let brightness = self.brightness(histogram, self.normalization(histogram));
        let mut data = Vec::with_capacity(histogram.len() * 3);
        match histogram.colors() {
            Some(colors) => {
                for ((&count, sum), b) in histogram.counts().iter().zip(colors).zip(brightness) {
                    if count == 0 {
                        data.extend_from_slice(&[0, 0, 0]);
                        continue;
                    }
                    let n = count as f64;
                    for channel in sum {
                        data.push(to_byte(255.5 * (channel / n).clamp(0.0, 1.0) * b));
                    }
                }
            }
            None => {
                for b in brightness {
                    let v = to_byte(255.5 * b);
                    data.extend_from_slice(&[v, v, v]);
                }
            }
        }
        PixelBuffer {
            width: histogram.width(),
            height: histogram.height(),
            channels: Channels::Rgb,
            data,
        }
    }

    /// [`ToneMapper::color`] for color histograms, otherwise
    /// [`ToneMapper::grayscale`].
    pub fn map(&self, histogram: &Histogram) -> PixelBuffer {
        if histogram.has_color() {
            self.color(histogram)
        } else {
            self.grayscale(histogram)
        }
    }
}

/// Log-density grayscale with the default scale.
pub fn tone_map(histogram: &Histogram) -> PixelBuffer {
    ToneMapper::default().grayscale(histogram)
}

#[inline]
fn to_byte(v: f64) -> u8 {
    // `as` saturates and sends NaN to 0
    v.floor().clamp(0.0, 255.0) as u8
}
