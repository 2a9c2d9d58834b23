//! JSON scene files.
//!
//! A scene is an array of flame objects, or a single flame object. Keys
//! that are left out take the defaults below.
//!
//! ```json
//! [{
//!   "name": "sierpinski",
//!   "size_x": 512, "size_y": 512,
//!   "xmin": 0.0, "xmax": 1.0, "ymin": 0.0, "ymax": 1.0,
//!   "samples": 1000000,
//!   "xforms": [
//!     {"weight": 1.0, "variations": [{"name": "linear"}], "pre_affine": [0.5,0,0,0,0.5,0]},
//!     {"variations": [{"name": "linear"}], "pre_affine": [0.5,0,0.5,0,0.5,0]},
//!     {"variations": [{"name": "linear"}], "pre_affine": [0.5,0,0,0,0.5,0.5]}
//!   ]
//! }]
//! ```

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{FlameError, FlameResult};
use crate::flame::{Flame, Window, DEFAULT_DENSITY};
use crate::palette::Palette;
use crate::xform::XForm;

const DEFAULT_SIDE: u32 = 512;

fn default_side() -> u32 {
    DEFAULT_SIDE
}

fn neg_one() -> f64 {
    -1.0
}

fn one() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneFlame {
    #[serde(default)]
    name: Option<String>,
    #[serde(default = "default_side", alias = "width")]
    size_x: u32,
    #[serde(default = "default_side", alias = "height")]
    size_y: u32,
    #[serde(default)]
    samples: Option<u64>,
    #[serde(default = "neg_one")]
    xmin: f64,
    #[serde(default = "one")]
    xmax: f64,
    #[serde(default = "neg_one")]
    ymin: f64,
    #[serde(default = "one")]
    ymax: f64,
    xforms: Vec<XForm>,
    #[serde(default)]
    final_xform: Option<XForm>,
    #[serde(default)]
    palette: Option<Palette>,
}

impl SceneFlame {
    fn into_flame(self, index: usize) -> Flame {
        let name = self.name.unwrap_or_else(|| format!("flame{}", index));
        let samples = self
            .samples
            .unwrap_or(self.size_x as u64 * self.size_y as u64 * DEFAULT_DENSITY);
        Flame {
            name,
            width: self.size_x,
            height: self.size_y,
            window: Window::new(self.xmin, self.xmax, self.ymin, self.ymax),
            xforms: self.xforms,
            final_xform: self.final_xform,
            samples,
            palette: self.palette.unwrap_or_default(),
        }
    }
}

/// Parses and validates every flame in a scene document.
pub fn parse_scene(text: &str) -> FlameResult<Vec<Flame>> {
    let doc: Value = serde_json::from_str(text)?;
    let items = match doc {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        _ => return Err(FlameError::scene("expected a flame object or an array of flames")),
    };
    if items.is_empty() {
        return Err(FlameError::scene("scene has no flames"));
    }

    let mut flames = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        let raw: SceneFlame = serde_json::from_value(item)
            .map_err(|e| FlameError::scene(format!("flame {}: {}", i, e)))?;
        let flame = raw.into_flame(i);
        flame
            .validate()
            .map_err(|e| FlameError::scene(format!("flame \"{}\": {}", flame.name, e)))?;
        debug!(
            name = %flame.name,
            xforms = flame.xforms.len(),
            width = flame.width,
            height = flame.height,
            samples = flame.samples,
            "parsed flame"
        );
        flames.push(flame);
    }
    info!(count = flames.len(), "parsed scene");
    Ok(flames)
}

pub fn load_scene(path: &Path) -> FlameResult<Vec<Flame>> {
    let text = std::fs::read_to_string(path)?;
    parse_scene(&text)
}
