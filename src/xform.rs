//! Xforms: a pre-affine map, a weighted blend of variations and a
//! post-affine map, plus the color parameters that steer the running
//! color state.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::affine::{AffineParams, Point};
use crate::error::{FlameError, FlameResult};
use crate::variation::Variation;

/// RGB with channels in [0, 1].
pub type Rgb = [f64; 3];

fn one() -> f64 {
    1.0
}

fn half() -> f64 {
    0.5
}

fn white() -> Rgb {
    [1.0, 1.0, 1.0]
}

/// One `(coefficient, variation)` pair of an xform's blend. Coefficients
/// may be negative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariationTerm {
    #[serde(alias = "weight", default = "one")]
    pub coefficient: f64,
    #[serde(flatten)]
    pub variation: Variation,
}

impl VariationTerm {
    pub fn new(coefficient: f64, variation: Variation) -> Self {
        VariationTerm {
            coefficient,
            variation,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct XForm {
    /// Selection weight, normalized against sibling xforms. Ignored on a
    /// final xform.
    #[serde(default = "one")]
    pub weight: f64,
    #[serde(default = "white")]
    pub color: Rgb,
    #[serde(default = "half")]
    pub color_index: f64,
    #[serde(default = "half")]
    pub color_speed: f64,
    #[serde(default = "one")]
    pub opacity: f64,
    pub variations: Vec<VariationTerm>,
    #[serde(default)]
    pub pre_affine: AffineParams,
    #[serde(default)]
    pub post_affine: AffineParams,
}

impl XForm {
    /// An xform with no variations and identity affine maps. Add terms
    /// with [`XForm::with_variation`].
    pub fn new(weight: f64) -> Self {
        XForm {
            weight,
            color: white(),
            color_index: 0.5,
            color_speed: 0.5,
            opacity: 1.0,
            variations: Vec::new(),
            pre_affine: AffineParams::IDENTITY,
            post_affine: AffineParams::IDENTITY,
        }
    }

    /// A purely affine xform: `pre_affine` followed by `linear`.
    pub fn linear(weight: f64, pre_affine: AffineParams) -> Self {
        XForm::new(weight)
            .with_pre_affine(pre_affine)
            .with_variation(1.0, Variation::Linear)
    }

    pub fn with_variation(mut self, coefficient: f64, variation: Variation) -> Self {
        self.variations.push(VariationTerm::new(coefficient, variation));
        self
    }

    pub fn with_pre_affine(mut self, affine: AffineParams) -> Self {
        self.pre_affine = affine;
        self
    }

    pub fn with_post_affine(mut self, affine: AffineParams) -> Self {
        self.post_affine = affine;
        self
    }

    pub fn with_color(mut self, color: Rgb, color_index: f64, color_speed: f64) -> Self {
        self.color = color;
        self.color_index = color_index;
        self.color_speed = color_speed;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Checks everything but the weight; a final xform is never
    /// selected, so only sibling xforms need [`XForm::validate`].
    pub fn validate_shape(&self) -> FlameResult<()> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(FlameError::invalid(format!("{} {} outside [0, 1]", name, v)))
            }
        };
        unit("color_index", self.color_index)?;
        unit("color_speed", self.color_speed)?;
        unit("opacity", self.opacity)?;
        for channel in self.color {
            unit("color channel", channel)?;
        }
        if self.variations.is_empty() {
            return Err(FlameError::invalid("xform has no variations"));
        }
        for term in &self.variations {
            if !term.coefficient.is_finite() {
                return Err(FlameError::invalid(format!(
                    "{} coefficient is not finite",
                    term.variation.name()
                )));
            }
            term.variation.validate()?;
        }
        if !(self.pre_affine.is_finite() && self.post_affine.is_finite()) {
            return Err(FlameError::invalid("affine coefficients must be finite"));
        }
        Ok(())
    }

    pub fn validate(&self) -> FlameResult<()> {
        if !(self.weight.is_finite() && self.weight > 0.0) {
            return Err(FlameError::invalid(format!(
                "xform weight {} must be positive",
                self.weight
            )));
        }
        self.validate_shape()
    }

    /// pre-affine, then the coefficient-weighted sum of every variation,
    /// then post-affine.
    #[inline]
    pub fn apply<R: Rng + ?Sized>(&self, x: f64, y: f64, rng: &mut R) -> Point {
        let (tx, ty) = self.pre_affine.apply(x, y);
        let (mut vx, mut vy) = (0.0, 0.0);
        for term in &self.variations {
            let (rx, ry) = term.variation.evaluate(tx, ty, &self.pre_affine, rng);
            vx += term.coefficient * rx;
            vy += term.coefficient * ry;
        }
        self.post_affine.apply(vx, vy)
    }

    /// `color_speed * color_index + (1 - color_speed) * old`. A convex
    /// combination, so the result stays in [0, 1] when both inputs do.
    #[inline]
    pub fn blend_index(&self, old: f64) -> f64 {
        self.color_speed * self.color_index + (1.0 - self.color_speed) * old
    }

    #[inline]
    pub fn blend_color(&self, old: Rgb) -> Rgb {
        let s = self.color_speed;
        [
            s * self.color[0] + (1.0 - s) * old[0],
            s * self.color[1] + (1.0 - s) * old[1],
            s * self.color[2] + (1.0 - s) * old[2],
        ]
    }
}

/// The running color carried by the chaos game alongside the point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorState {
    pub index: f64,
    pub rgb: Rgb,
}

impl ColorState {
    /// Blends toward `xform`'s color. Runs once per selection.
    #[inline]
    pub fn update(&mut self, xform: &XForm) {
        self.index = xform.blend_index(self.index);
        self.rgb = xform.blend_color(self.rgb);
    }

    #[inline]
    pub fn blended(mut self, xform: &XForm) -> Self {
        self.update(xform);
        self
    }
}

impl Default for ColorState {
    /// Mid gray.
    fn default() -> Self {
        ColorState {
            index: 0.5,
            rgb: [0.5, 0.5, 0.5],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn pipeline_runs_pre_blend_post_in_order() {
        let xf = XForm::new(1.0)
            .with_pre_affine(AffineParams::scale_translate(2.0, 1.0, 0.0))
            .with_variation(1.0, Variation::Linear)
            .with_variation(0.5, Variation::Linear)
            .with_post_affine(AffineParams::scale_translate(1.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(0);
        // pre: (1, 1) -> (3, 2); blend: 1.5 * (3, 2); post: y - 1
        assert_eq!(xf.apply(1.0, 1.0, &mut rng), (4.5, 2.0));
    }

    #[test]
    fn negative_coefficients_cancel() {
        let xf = XForm::new(1.0)
            .with_variation(1.0, Variation::Sinusoidal)
            .with_variation(-1.0, Variation::Sinusoidal);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(xf.apply(0.7, -0.2, &mut rng), (0.0, 0.0));
    }

    #[test]
    fn blend_index_is_convex() {
        let xf = XForm::new(1.0).with_color([1.0; 3], 1.0, 0.25);
        assert_eq!(xf.blend_index(0.0), 0.25);
        let xf = XForm::new(1.0).with_color([1.0; 3], 0.2, 0.0);
        assert_eq!(xf.blend_index(0.9), 0.9);
        let xf = XForm::new(1.0).with_color([1.0; 3], 0.2, 1.0);
        assert_eq!(xf.blend_index(0.9), 0.2);
    }

    #[test]
    fn color_state_moves_toward_xform_color() {
        let xf = XForm::new(1.0).with_color([1.0, 0.0, 0.0], 1.0, 0.5);
        let state = ColorState::default().blended(&xf);
        assert_eq!(state.index, 0.75);
        assert_eq!(state.rgb, [0.75, 0.25, 0.25]);
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        let ok = XForm::linear(1.0, AffineParams::IDENTITY);
        assert!(ok.validate().is_ok());
        assert!(XForm::linear(0.0, AffineParams::IDENTITY).validate().is_err());
        assert!(XForm::linear(1.0, AffineParams::IDENTITY)
            .with_opacity(1.5)
            .validate()
            .is_err());
        assert!(XForm::linear(1.0, AffineParams::IDENTITY)
            .with_color([0.5; 3], -0.1, 0.5)
            .validate()
            .is_err());
        assert!(XForm::new(1.0).validate().is_err());
        // weight is irrelevant for a final xform
        assert!(XForm::linear(0.0, AffineParams::IDENTITY)
            .validate_shape()
            .is_ok());
    }

    #[test]
    fn deserializes_with_defaults() {
        let xf: XForm = serde_json::from_str(
            r#"{"variations":[{"name":"linear"},{"name":"spherical","weight":-0.5}],
                "pre_affine":[0.5,0,0,0,0.5,0]}"#,
        )
        .unwrap();
        assert_eq!(xf.weight, 1.0);
        assert_eq!(xf.post_affine, AffineParams::IDENTITY);
        assert_eq!(xf.variations[1].coefficient, -0.5);
        assert_eq!(xf.variations[1].variation, Variation::Spherical);
        assert_eq!(xf.color_speed, 0.5);
    }
}
