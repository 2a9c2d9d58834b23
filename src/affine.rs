//! Six-coefficient 2D affine maps, applied before and after the
//! variation blend of every xform.

use serde::{Deserialize, Serialize};

/// A point on the real plane. Produced and consumed once per iteration.
pub type Point = (f64, f64);

/// `(x, y) -> (a*x + b*y + c, d*x + e*y + f)`
///
/// Serialized as the array `[a, b, c, d, e, f]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 6]", into = "[f64; 6]")]
pub struct AffineParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineParams {
    pub const IDENTITY: AffineParams = AffineParams {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 1.0,
        f: 0.0,
    };

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        AffineParams { a, b, c, d, e, f }
    }

    /// flam3 genomes list coefficients column by column: `a d b e c f`.
    pub const fn from_flam3(coefs: [f64; 6]) -> Self {
        let [a, d, b, e, c, f] = coefs;
        AffineParams { a, b, c, d, e, f }
    }

    /// Uniform scale about the origin followed by a translation.
    pub const fn scale_translate(s: f64, tx: f64, ty: f64) -> Self {
        AffineParams::new(s, 0.0, tx, 0.0, s, ty)
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> Point {
        (
            self.a * x + self.b * y + self.c,
            self.d * x + self.e * y + self.f,
        )
    }

    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d, self.e, self.f]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl Default for AffineParams {
    fn default() -> Self {
        AffineParams::IDENTITY
    }
}

impl From<[f64; 6]> for AffineParams {
    fn from([a, b, c, d, e, f]: [f64; 6]) -> Self {
        AffineParams { a, b, c, d, e, f }
    }
}

impl From<AffineParams> for [f64; 6] {
    fn from(p: AffineParams) -> Self {
        [p.a, p.b, p.c, p.d, p.e, p.f]
    }
}
