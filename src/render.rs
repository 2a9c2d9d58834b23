//! The chaos game: settle, then accumulate into a histogram.

use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::affine::Point;
use crate::error::FlameResult;
use crate::flame::Flame;
use crate::histogram::{Bounds, Histogram, PixelMapper};
use crate::selector::WeightedSelector;
use crate::xform::{ColorState, Rgb, XForm};

/// Iterations discarded before plotting starts.
pub const SETTLE_ITERATIONS: u32 = 20;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Visit counts only.
    #[default]
    Basic,
    /// Visit counts plus per-cell color sums.
    Color,
}

/// Where the color plotted in color mode comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSource {
    /// The running RGB blend of xform colors.
    #[default]
    Blend,
    /// The running color index, resolved through the flame's palette.
    Palette,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    pub mode: RenderMode,
    pub color_source: ColorSource,
    pub settle_iterations: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            mode: RenderMode::Basic,
            color_source: ColorSource::Blend,
            settle_iterations: SETTLE_ITERATIONS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStats {
    /// Accumulation iterations run.
    pub samples: u64,
    /// Iterations that landed inside the raster.
    pub plotted: u64,
    pub max_count: u32,
    /// Extent of every accumulated point, in or out of the window.
    pub bounds: Bounds,
    pub elapsed: Duration,
}

impl RenderStats {
    pub fn plotted_fraction(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.plotted as f64 / self.samples as f64
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderOutput {
    pub histogram: Histogram,
    pub stats: RenderStats,
}

#[derive(Clone, Debug, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Renderer { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Runs `settle_iterations + flame.samples` steps of the chaos game
    /// from a random point in `[-1, 1)²`.
    ///
    /// Only setup can fail. Points that leave the window, including NaN
    /// and infinite ones, are dropped and iteration carries on from them.
    #[tracing::instrument(skip_all, fields(flame = %flame.name, samples = flame.samples))]
    pub fn render<R: Rng + ?Sized>(&self, flame: &Flame, rng: &mut R) -> FlameResult<RenderOutput> {
        flame.validate()?;
        let selector = WeightedSelector::new(flame.xforms.iter().map(|xf| xf.weight))?;
        debug!(cumulative = ?selector.cumulative(), "normalized xform weights");

        let (width, height) = (flame.width as usize, flame.height as usize);
        let mapper = PixelMapper::new(flame.window, width, height);
        let mut histogram = match self.options.mode {
            RenderMode::Basic => Histogram::basic(width, height),
            RenderMode::Color => Histogram::color(width, height),
        };

        let start = Instant::now();
        let mut point = biunit(rng);
        let mut color = ColorState::default();
        debug!(x = point.0, y = point.1, "initial point");

        for _ in 0..self.options.settle_iterations {
            step(&flame.xforms, &selector, &mut point, &mut color, rng);
        }

        let mut bounds = Bounds::empty();
        let mut plotted = 0u64;
        for _ in 0..flame.samples {
            let xf = step(&flame.xforms, &selector, &mut point, &mut color, rng);
            let (plot, plot_color, opacity) = match &flame.final_xform {
                Some(fin) => (
                    fin.apply(point.0, point.1, rng),
                    color.blended(fin),
                    xf.opacity * fin.opacity,
                ),
                None => (point, color, xf.opacity),
            };
            bounds.include(plot.0, plot.1);

            let Some(offset) = mapper.offset(plot.0, plot.1) else {
                continue;
            };
            match self.options.mode {
                RenderMode::Basic => histogram.increment(offset),
                RenderMode::Color => {
                    if opacity <= 0.0 {
                        continue;
                    }
                    let rgb = match self.options.color_source {
                        ColorSource::Blend => plot_color.rgb,
                        ColorSource::Palette => flame.palette.to_unit_color(plot_color.index),
                    };
                    histogram.add_color(offset, scale(rgb, opacity));
                }
            }
            plotted += 1;
        }

        let stats = RenderStats {
            samples: flame.samples,
            plotted,
            max_count: histogram.max_count(),
            bounds,
            elapsed: start.elapsed(),
        };
        log_stats(&stats);
        Ok(RenderOutput { histogram, stats })
    }
}

/// Basic-mode render with the default options.
pub fn render<R: Rng + ?Sized>(flame: &Flame, rng: &mut R) -> FlameResult<Histogram> {
    Renderer::default()
        .render(flame, rng)
        .map(|out| out.histogram)
}

fn biunit<R: Rng + ?Sized>(rng: &mut R) -> Point {
    (rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
}

/// One chaos-game iteration: draw, select, transform, blend color.
#[inline]
fn step<'a, R: Rng + ?Sized>(
    xforms: &'a [XForm],
    selector: &WeightedSelector,
    point: &mut Point,
    color: &mut ColorState,
    rng: &mut R,
) -> &'a XForm {
    let u: f64 = rng.gen();
    let xf = &xforms[selector.select(u)];
    *point = xf.apply(point.0, point.1, rng);
    color.update(xf);
    xf
}

#[inline]
fn scale(rgb: Rgb, k: f64) -> Rgb {
    [rgb[0] * k, rgb[1] * k, rgb[2] * k]
}

fn log_stats(stats: &RenderStats) {
    let secs = stats.elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        stats.samples as f64 / secs
    } else {
        0.0
    };
    info!(
        elapsed = ?stats.elapsed,
        samples_per_sec = rate,
        "render done"
    );
    info!(
        plotted = stats.plotted,
        percent = stats.plotted_fraction() * 100.0,
        max_count = stats.max_count,
        "samples in rectangle"
    );
    if !stats.bounds.is_empty() {
        info!(
            xmin = stats.bounds.xmin,
            xmax = stats.bounds.xmax,
            ymin = stats.bounds.ymin,
            ymax = stats.bounds.ymax,
            "observed bounds"
        );
    }
}
