//! Built-in flames, addressable by name.

use crate::affine::AffineParams;
use crate::flame::{Flame, Window};
use crate::palette::Palette;
use crate::variation::Variation;
use crate::xform::XForm;

pub const NAMES: &[&str] = &["sierpinski", "fern", "blend", "density", "qosmic"];

pub fn by_name(name: &str) -> Option<Flame> {
    let flame = match name {
        "sierpinski" => sierpinski(),
        "fern" => barnsley_fern(),
        "blend" => spherical_blend(),
        "density" => density(),
        "qosmic" => qosmic(),
        _ => return None,
    };
    Some(flame.with_name(name))
}

fn rgb(r: u8, g: u8, b: u8) -> [f64; 3] {
    [r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0]
}

/// Three half-scale copies with corners at (0, 0), (1, 0) and (0, 1).
pub fn sierpinski() -> Flame {
    let corners = [(0.0, 0.0), (0.5, 0.0), (0.0, 0.5)];
    let colors = [rgb(255, 0, 0), rgb(0, 255, 0), rgb(0, 0, 255)];
    let xforms = corners
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(i, (&(tx, ty), color))| {
            XForm::linear(1.0, AffineParams::scale_translate(0.5, tx, ty))
                .with_color(color, i as f64 / 2.0, 0.5)
        })
        .collect();
    Flame::new(512, 512, Window::new(0.0, 1.0, 0.0, 1.0), xforms)
}

pub fn barnsley_fern() -> Flame {
    let maps = [
        (0.01, AffineParams::new(0.0, 0.0, 0.0, 0.0, 0.16, 0.0), rgb(255, 0, 0)),
        (0.85, AffineParams::new(0.85, 0.04, 0.0, -0.04, 0.85, 1.60), rgb(0, 255, 0)),
        (0.07, AffineParams::new(0.20, -0.26, 0.0, 0.23, 0.22, 1.60), rgb(0, 0, 255)),
        (0.07, AffineParams::new(-0.15, 0.28, 0.0, 0.26, 0.24, 0.44), rgb(255, 255, 0)),
    ];
    let xforms = maps
        .iter()
        .enumerate()
        .map(|(i, &(weight, affine, color))| {
            XForm::linear(weight, affine).with_color(color, i as f64 / 3.0, 0.5)
        })
        .collect();
    Flame::new(400, 750, Window::new(-2.75, 2.75, -0.25, 10.25), xforms)
}

/// Linear blended with negative spherical, plus two half-scale copies.
pub fn spherical_blend() -> Flame {
    let xforms = vec![
        XForm::new(1.0)
            .with_pre_affine(AffineParams::scale_translate(0.5, 0.0, 0.0))
            .with_variation(1.0, Variation::Linear)
            .with_variation(-0.5, Variation::Spherical),
        XForm::new(1.0)
            .with_pre_affine(AffineParams::scale_translate(0.5, 0.5, 0.0))
            .with_variation(1.0, Variation::Linear)
            .with_variation(0.0, Variation::Sinusoidal),
        XForm::new(1.0)
            .with_pre_affine(AffineParams::scale_translate(0.5, 0.0, 0.5))
            .with_variation(1.0, Variation::Linear)
            .with_variation(0.0, Variation::Hyperbolic),
    ];
    Flame::new(512, 512, Window::biunit(), xforms)
}

/// Four linear maps with skewed weights; not contractive everywhere, so
/// plenty of points leave the window.
pub fn density() -> Flame {
    let maps = [
        (0.370, AffineParams::new(-0.870, -0.100, -0.930, -0.350, 0.500, -0.500)),
        (0.570, AffineParams::new(0.590, -0.620, -0.800, -0.110, 0.100, -0.900)),
        (0.022, AffineParams::new(-0.056, 0.310, 0.920, 0.170, 0.000, -0.100)),
        (0.058, AffineParams::new(0.910, -0.190, 0.330, 0.240, -0.600, 0.900)),
    ];
    let xforms = maps
        .iter()
        .map(|&(weight, affine)| XForm::linear(weight, affine))
        .collect();
    Flame::new(800, 600, Window::new(-4.0, 4.0, -3.0, 3.0), xforms)
}

/// Two shaping xforms and five-fold dihedral symmetry. Coefficients are in
/// flam3 column order. The palette runs blue to red across the color index.
pub fn qosmic() -> Flame {
    let mut xforms = vec![
        XForm::new(0.5)
            .with_pre_affine(AffineParams::from_flam3([
                -0.223797, 0.807016, 0.405636, 0.0169888, 0.609383, 0.242596,
            ]))
            .with_variation(0.223734, Variation::Exponential)
            .with_variation(0.776266, Variation::Cosine)
            .with_color(rgb(179, 201, 158), 0.0, 0.5),
        XForm::new(0.5)
            .with_pre_affine(AffineParams::from_flam3([
                -0.41212, 0.506177, 0.64082, 0.197125, 0.458698, -0.850915,
            ]))
            .with_variation(1.0, Variation::Linear)
            .with_color(rgb(91, 149, 116), 1.0, 0.5),
    ];
    // symmetry xforms leave the color alone
    let symmetry = [
        ([-1.0, 0.0, 0.0, 1.0, 0.0, 0.0], rgb(155, 200, 143)),
        ([-0.809017, 0.587785, -0.587785, -0.809017, 0.0, 0.0], rgb(137, 189, 128)),
        ([-0.809017, -0.587785, 0.587785, -0.809017, 0.0, 0.0], rgb(254, 191, 42)),
        ([0.309017, 0.951057, -0.951057, 0.309017, 0.0, 0.0], rgb(210, 110, 0)),
        ([0.309017, -0.951057, 0.951057, 0.309017, 0.0, 0.0], rgb(252, 202, 64)),
    ];
    xforms.extend(
        symmetry
            .iter()
            .map(|&(coefs, color)| {
                XForm::linear(1.0, AffineParams::from_flam3(coefs)).with_color(color, 0.5, 0.0)
            }),
    );
    Flame::new(1600, 1200, Window::new(-2.0, 2.0, -1.5, 1.5), xforms)
        .with_palette(Palette::gradient([0, 0, 255], [255, 0, 0]))
        .with_samples(1 << 27)
}
