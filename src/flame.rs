//! The scene: raster size, coordinate window, xforms and palette.

use serde::{Deserialize, Serialize};

use crate::error::{FlameError, FlameResult};
use crate::palette::Palette;
use crate::xform::XForm;

/// Raster sides must lie strictly inside (0, MAX_SIDE).
pub const MAX_SIDE: u32 = 10_000;
/// Window coordinates must lie strictly inside (-MAX_COORD, MAX_COORD).
pub const MAX_COORD: f64 = 1024.0;
/// Samples per pixel when a scene leaves `samples` out.
pub const DEFAULT_DENSITY: u64 = 100;

/// The rectangle of the plane that is mapped onto the raster.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Window {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Window {
    pub const fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Window {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }

    /// `[-1, 1]` on both axes.
    pub const fn biunit() -> Self {
        Window::new(-1.0, 1.0, -1.0, 1.0)
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn validate(&self) -> FlameResult<()> {
        let inside = |v: f64| v > -MAX_COORD && v < MAX_COORD;
        if !(inside(self.xmin) && inside(self.xmax) && self.xmin < self.xmax) {
            return Err(FlameError::invalid(format!(
                "x range [{}, {}] must be increasing inside (-{MAX_COORD}, {MAX_COORD})",
                self.xmin, self.xmax
            )));
        }
        if !(inside(self.ymin) && inside(self.ymax) && self.ymin < self.ymax) {
            return Err(FlameError::invalid(format!(
                "y range [{}, {}] must be increasing inside (-{MAX_COORD}, {MAX_COORD})",
                self.ymin, self.ymax
            )));
        }
        Ok(())
    }
}

impl Default for Window {
    fn default() -> Self {
        Window::biunit()
    }
}

/// A complete scene. Nothing in it changes while it renders.
#[derive(Clone, Debug, PartialEq)]
pub struct Flame {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub window: Window,
    pub xforms: Vec<XForm>,
    /// Applied after every selected xform to the plotted copy of the point.
    pub final_xform: Option<XForm>,
    pub samples: u64,
    pub palette: Palette,
}

impl Flame {
    /// A flame with the default sample density and a grayscale palette.
    pub fn new(width: u32, height: u32, window: Window, xforms: Vec<XForm>) -> Self {
        Flame {
            name: String::from("flame"),
            width,
            height,
            window,
            xforms,
            final_xform: None,
            samples: width as u64 * height as u64 * DEFAULT_DENSITY,
            palette: Palette::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_samples(mut self, samples: u64) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_final_xform(mut self, xform: XForm) -> Self {
        self.final_xform = Some(xform);
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The runtime invariants re-checked before every render.
    pub fn validate(&self) -> FlameResult<()> {
        let side = |name: &str, v: u32| {
            if v > 0 && v < MAX_SIDE {
                Ok(())
            } else {
                Err(FlameError::invalid(format!(
                    "{} {} outside (0, {})",
                    name, v, MAX_SIDE
                )))
            }
        };
        side("width", self.width)?;
        side("height", self.height)?;
        self.window.validate()?;
        if self.xforms.is_empty() {
            return Err(FlameError::invalid("flame has no xforms"));
        }
        for (i, xform) in self.xforms.iter().enumerate() {
            xform
                .validate()
                .map_err(|e| FlameError::invalid(format!("xform {}: {}", i, strip(e))))?;
        }
        if let Some(fin) = &self.final_xform {
            fin.validate_shape()
                .map_err(|e| FlameError::invalid(format!("final xform: {}", strip(e))))?;
        }
        self.palette.validate()
    }
}

fn strip(err: FlameError) -> String {
    match err {
        FlameError::InvalidConfiguration(msg) => msg,
        other => other.to_string(),
    }
}
