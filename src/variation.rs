//! The variation library: nonlinear point-to-point functions blended by
//! every xform.
//!
//! Each variant carries only what it needs. Parameterless variations are
//! unit variants, the affine readers (`waves`, `popcorn`, `rings`, `fan`)
//! borrow coefficients from the owning xform's pre-affine map, and the
//! parametric ones carry their own reals. Stochastic variations draw from
//! the random source handed in by the caller.

use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::affine::{AffineParams, Point};
use crate::error::{FlameError, FlameResult};

/// Added to denominators built from a radius or a squared coefficient.
pub const EPS: f64 = 1e-10;

/// squared 2-norm
#[inline]
pub fn r2(x: f64, y: f64) -> f64 {
    x * x + y * y
}

/// 2-norm
#[inline]
pub fn r(x: f64, y: f64) -> f64 {
    r2(x, y).sqrt()
}

/// `atan2(x, y)`. The swapped argument order is what flame genomes are
/// tuned against.
#[inline]
pub fn theta(x: f64, y: f64) -> f64 {
    x.atan2(y)
}

/// `atan2(y, x)`
#[inline]
pub fn phi(x: f64, y: f64) -> f64 {
    y.atan2(x)
}

/// Uniform in [0, 1).
#[inline]
pub fn psi<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// 0 or pi, fair.
#[inline]
pub fn omega<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    if rng.gen::<bool>() {
        PI
    } else {
        0.0
    }
}

/// 1 or -1, fair.
#[inline]
pub fn lambda<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    if rng.gen::<bool>() {
        -1.0
    } else {
        1.0
    }
}

fn one() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Variation {
    Linear,
    Sinusoidal,
    Spherical,
    Swirl,
    Horseshoe,
    Polar,
    Handkerchief,
    Heart,
    Disc,
    Spiral,
    Hyperbolic,
    Diamond,
    Ex,
    Julia,
    Bent,
    /// Reads `b`, `c`, `e`, `f` of the pre-affine map.
    Waves,
    Fisheye,
    /// Reads `c` and `f` of the pre-affine map.
    Popcorn,
    Exponential,
    Power,
    Cosine,
    /// Reads `c` of the pre-affine map.
    Rings,
    /// Reads `c` and `f` of the pre-affine map.
    Fan,
    Blob {
        #[serde(default = "one")]
        high: f64,
        #[serde(default)]
        low: f64,
        #[serde(default = "one")]
        waves: f64,
    },
    Pdj {
        #[serde(default)]
        a: f64,
        #[serde(default)]
        b: f64,
        #[serde(default)]
        c: f64,
        #[serde(default)]
        d: f64,
    },
    Fan2 {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
    Rings2 {
        #[serde(default)]
        val: f64,
    },
    Curl {
        #[serde(default)]
        c1: f64,
        #[serde(default)]
        c2: f64,
    },
    Rectangles {
        #[serde(default = "one")]
        x: f64,
        #[serde(default = "one")]
        y: f64,
    },
    Julian {
        #[serde(default = "one")]
        power: f64,
        #[serde(default = "one")]
        dist: f64,
    },
    Blur,
    Noise,
    Square,
}

impl Variation {
    /// Every name accepted by [`Variation::by_name`], in registry order.
    pub const NAMES: &'static [&'static str] = &[
        "linear",
        "sinusoidal",
        "spherical",
        "swirl",
        "horseshoe",
        "polar",
        "handkerchief",
        "heart",
        "disc",
        "spiral",
        "hyperbolic",
        "diamond",
        "ex",
        "julia",
        "bent",
        "waves",
        "fisheye",
        "popcorn",
        "exponential",
        "power",
        "cosine",
        "rings",
        "fan",
        "blob",
        "pdj",
        "fan2",
        "rings2",
        "curl",
        "rectangles",
        "julian",
        "blur",
        "noise",
        "square",
    ];

    /// Looks a variation up by name. Parametric variations get their
    /// default parameters.
    pub fn by_name(name: &str) -> Option<Variation> {
        let var = match name {
            "linear" => Variation::Linear,
            "sinusoidal" => Variation::Sinusoidal,
            "spherical" => Variation::Spherical,
            "swirl" => Variation::Swirl,
            "horseshoe" => Variation::Horseshoe,
            "polar" => Variation::Polar,
            "handkerchief" => Variation::Handkerchief,
            "heart" => Variation::Heart,
            "disc" => Variation::Disc,
            "spiral" => Variation::Spiral,
            "hyperbolic" => Variation::Hyperbolic,
            "diamond" => Variation::Diamond,
            "ex" => Variation::Ex,
            "julia" => Variation::Julia,
            "bent" => Variation::Bent,
            "waves" => Variation::Waves,
            "fisheye" => Variation::Fisheye,
            "popcorn" => Variation::Popcorn,
            "exponential" => Variation::Exponential,
            "power" => Variation::Power,
            "cosine" => Variation::Cosine,
            "rings" => Variation::Rings,
            "fan" => Variation::Fan,
            "blob" => Variation::Blob {
                high: 1.0,
                low: 0.0,
                waves: 1.0,
            },
            "pdj" => Variation::Pdj {
                a: 0.0,
                b: 0.0,
                c: 0.0,
                d: 0.0,
            },
            "fan2" => Variation::Fan2 { x: 0.0, y: 0.0 },
            "rings2" => Variation::Rings2 { val: 0.0 },
            "curl" => Variation::Curl { c1: 0.0, c2: 0.0 },
            "rectangles" => Variation::Rectangles { x: 1.0, y: 1.0 },
            "julian" => Variation::Julian {
                power: 1.0,
                dist: 1.0,
            },
            "blur" => Variation::Blur,
            "noise" => Variation::Noise,
            "square" => Variation::Square,
            _ => return None,
        };
        Some(var)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variation::Linear => "linear",
            Variation::Sinusoidal => "sinusoidal",
            Variation::Spherical => "spherical",
            Variation::Swirl => "swirl",
            Variation::Horseshoe => "horseshoe",
            Variation::Polar => "polar",
            Variation::Handkerchief => "handkerchief",
            Variation::Heart => "heart",
            Variation::Disc => "disc",
            Variation::Spiral => "spiral",
            Variation::Hyperbolic => "hyperbolic",
            Variation::Diamond => "diamond",
            Variation::Ex => "ex",
            Variation::Julia => "julia",
            Variation::Bent => "bent",
            Variation::Waves => "waves",
            Variation::Fisheye => "fisheye",
            Variation::Popcorn => "popcorn",
            Variation::Exponential => "exponential",
            Variation::Power => "power",
            Variation::Cosine => "cosine",
            Variation::Rings => "rings",
            Variation::Fan => "fan",
            Variation::Blob { .. } => "blob",
            Variation::Pdj { .. } => "pdj",
            Variation::Fan2 { .. } => "fan2",
            Variation::Rings2 { .. } => "rings2",
            Variation::Curl { .. } => "curl",
            Variation::Rectangles { .. } => "rectangles",
            Variation::Julian { .. } => "julian",
            Variation::Blur => "blur",
            Variation::Noise => "noise",
            Variation::Square => "square",
        }
    }

    /// Dedicated parameters must be finite; `julian` also needs a
    /// nonzero power.
    pub fn validate(&self) -> FlameResult<()> {
        let params = match *self {
            Variation::Blob { high, low, waves } => vec![high, low, waves],
            Variation::Pdj { a, b, c, d } => vec![a, b, c, d],
            Variation::Fan2 { x, y } | Variation::Rectangles { x, y } => vec![x, y],
            Variation::Rings2 { val } => vec![val],
            Variation::Curl { c1, c2 } => vec![c1, c2],
            Variation::Julian { power, dist } => {
                if power == 0.0 {
                    return Err(FlameError::invalid("julian power must be nonzero"));
                }
                vec![power, dist]
            }
            _ => Vec::new(),
        };
        if params.iter().all(|p| p.is_finite()) {
            Ok(())
        } else {
            Err(FlameError::invalid(format!(
                "{} has a non-finite parameter",
                self.name()
            )))
        }
    }

    /// Evaluates the variation at `(x, y)`, the point after the owning
    /// xform's pre-affine map. `affine` is that pre-affine map.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        x: f64,
        y: f64,
        affine: &AffineParams,
        rng: &mut R,
    ) -> Point {
        match *self {
            Variation::Linear => (x, y),
            Variation::Sinusoidal => (x.sin(), y.sin()),
            Variation::Spherical => {
                let r2 = r2(x, y) + EPS;
                (x / r2, y / r2)
            }
            Variation::Swirl => {
                let (s, c) = r2(x, y).sin_cos();
                (x * s - y * c, x * c + y * s)
            }
            Variation::Horseshoe => {
                let r = r(x, y) + EPS;
                ((x - y) * (x + y) / r, 2.0 * x * y / r)
            }
            Variation::Polar => (theta(x, y) / PI, r(x, y) - 1.0),
            Variation::Handkerchief => {
                let (r, t) = (r(x, y), theta(x, y));
                (r * (t + r).sin(), r * (t - r).cos())
            }
            Variation::Heart => {
                let (r, t) = (r(x, y), theta(x, y));
                (r * (t * r).sin(), -r * (t * r).cos())
            }
            Variation::Disc => {
                let (r, t) = (r(x, y), theta(x, y));
                let k = t / PI;
                (k * (PI * r).sin(), k * (PI * r).cos())
            }
            Variation::Spiral => {
                let (r, t) = (r(x, y) + EPS, theta(x, y));
                ((t.cos() + r.sin()) / r, (t.sin() - r.cos()) / r)
            }
            Variation::Hyperbolic => {
                let (r, t) = (r(x, y) + EPS, theta(x, y));
                (t.sin() / r, r * t.cos())
            }
            Variation::Diamond => {
                let (r, t) = (r(x, y), theta(x, y));
                (t.sin() * r.cos(), t.cos() * r.sin())
            }
            Variation::Ex => {
                let (r, t) = (r(x, y), theta(x, y));
                let p0 = (t + r).sin().powi(3);
                let p1 = (t - r).sin().powi(3);
                (r * (p0 + p1), r * (p0 - p1))
            }
            Variation::Julia => {
                let t = theta(x, y) / 2.0 + omega(rng);
                let sr = r(x, y).sqrt();
                (sr * t.cos(), sr * t.sin())
            }
            Variation::Bent => {
                let bx = if x >= 0.0 { x } else { 2.0 * x };
                let by = if y >= 0.0 { y } else { y / 2.0 };
                (bx, by)
            }
            Variation::Waves => (
                x + affine.b * (y / (affine.c * affine.c + EPS)).sin(),
                y + affine.e * (x / (affine.f * affine.f + EPS)).sin(),
            ),
            Variation::Fisheye => {
                let k = 2.0 / (r(x, y) + 1.0);
                (k * y, k * x)
            }
            Variation::Popcorn => (
                x + affine.c * (3.0 * y).tan().sin(),
                y + affine.f * (3.0 * x).tan().sin(),
            ),
            Variation::Exponential => {
                let k = (x - 1.0).exp();
                let (s, c) = (PI * y).sin_cos();
                (k * c, k * s)
            }
            Variation::Power => {
                let t = theta(x, y);
                let k = r(x, y).powf(t.sin());
                (k * t.cos(), k * t.sin())
            }
            Variation::Cosine => {
                let a = PI * x;
                (a.cos() * y.cosh(), -a.sin() * y.sinh())
            }
            Variation::Rings => {
                let dx = affine.c * affine.c + EPS;
                let r = r(x, y);
                let z = (r + dx) % (2.0 * dx) - dx + r * (1.0 - dx);
                let t = theta(x, y);
                (z * t.cos(), z * t.sin())
            }
            Variation::Fan => {
                let dx = PI * (affine.c * affine.c + EPS);
                let dx2 = dx / 2.0;
                let mut a = theta(x, y);
                if (a + affine.f) % dx > dx2 {
                    a -= dx2;
                } else {
                    a += dx2;
                }
                let r = r(x, y);
                (r * a.cos(), r * a.sin())
            }
            Variation::Blob { high, low, waves } => {
                let t = theta(x, y);
                let k = r(x, y) * (low + (high - low) * (0.5 + 0.5 * (waves * t).sin()));
                (k * t.sin(), k * t.cos())
            }
            Variation::Pdj { a, b, c, d } => {
                ((a * y).sin() - (b * x).cos(), (c * x).sin() - (d * y).cos())
            }
            Variation::Fan2 { x: fx, y: fy } => {
                let dx = PI * (fx * fx + EPS);
                let dx2 = dx / 2.0;
                let mut a = theta(x, y);
                let t = a + fy - dx * ((a + fy) / dx).trunc();
                if t > dx2 {
                    a -= dx2;
                } else {
                    a += dx2;
                }
                let r = r(x, y);
                (r * a.sin(), r * a.cos())
            }
            Variation::Rings2 { val } => {
                let dx = val * val + EPS;
                let mut k = r(x, y);
                k += -2.0 * dx * ((k + dx) / (2.0 * dx)).trunc() + k * (1.0 - dx);
                let t = theta(x, y);
                (k * t.sin(), k * t.cos())
            }
            Variation::Curl { c1, c2 } => {
                let re = 1.0 + c1 * x + c2 * (x * x - y * y);
                let im = c1 * y + 2.0 * c2 * x * y;
                let k = 1.0 / (re * re + im * im + EPS);
                ((x * re + y * im) * k, (y * re - x * im) * k)
            }
            Variation::Rectangles { x: rx, y: ry } => {
                let fold = |v: f64, w: f64| {
                    if w == 0.0 {
                        v
                    } else {
                        (2.0 * (v / w).floor() + 1.0) * w - v
                    }
                };
                (fold(x, rx), fold(y, ry))
            }
            Variation::Julian { power, dist } => {
                let rn = power.abs();
                let cn = dist / power / 2.0;
                let t = (phi(x, y) + 2.0 * PI * (rn * psi(rng)).trunc()) / power;
                let k = r2(x, y).powf(cn);
                (k * t.cos(), k * t.sin())
            }
            Variation::Blur => {
                let a = psi(rng) * 2.0 * PI;
                let k = psi(rng);
                (k * a.cos(), k * a.sin())
            }
            Variation::Noise => {
                let a = psi(rng) * 2.0 * PI;
                let k = psi(rng);
                (x * k * a.cos(), y * k * a.sin())
            }
            Variation::Square => (psi(rng) - 0.5, psi(rng) - 0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const ID: AffineParams = AffineParams::IDENTITY;

    fn eval(var: &Variation, x: f64, y: f64) -> Point {
        let mut rng = StdRng::seed_from_u64(7);
        var.evaluate(x, y, &ID, &mut rng)
    }

    fn close(a: Point, b: Point) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn registry_names_round_trip() {
        for name in Variation::NAMES {
            let var = Variation::by_name(name).expect(name);
            assert_eq!(var.name(), *name);
            assert!(var.validate().is_ok());
        }
        assert!(Variation::by_name("rays").is_none());
    }

    #[test]
    fn theta_swaps_atan2_arguments() {
        assert!((theta(1.0, 0.0) - PI / 2.0).abs() < 1e-12);
        assert!(theta(0.0, 1.0).abs() < 1e-12);
        assert!((phi(0.0, 1.0) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn polar_follows_theta_ordering() {
        assert!(close(eval(&Variation::Polar, 1.0, 0.0), (0.5, 0.0)));
        assert!(close(eval(&Variation::Polar, 0.0, 2.0), (0.0, 1.0)));
    }

    #[test]
    fn guarded_variations_stay_finite_at_origin() {
        for var in [
            Variation::Spherical,
            Variation::Horseshoe,
            Variation::Spiral,
            Variation::Hyperbolic,
            Variation::Polar,
            Variation::Waves,
            Variation::Rings,
            Variation::Fan,
            Variation::Curl { c1: 0.0, c2: 0.0 },
        ] {
            let (x, y) = eval(&var, 0.0, 0.0);
            assert!(x.is_finite() && y.is_finite(), "{} at origin", var.name());
        }
    }

    #[test]
    fn spherical_inverts_the_unit_circle_in_place() {
        assert!(close(eval(&Variation::Spherical, 1.0, 0.0), (1.0, 0.0)));
        assert!(close(eval(&Variation::Spherical, 0.0, 2.0), (0.0, 0.5)));
    }

    #[test]
    fn swirl_rotates_by_squared_radius() {
        let (x, y) = eval(&Variation::Swirl, 1.0, 0.0);
        assert!(close((x, y), (1.0f64.sin(), 1.0f64.cos())));
    }

    #[test]
    fn horseshoe_matches_closed_form() {
        let (x, y) = eval(&Variation::Horseshoe, 3.0, 4.0);
        assert!(close((x, y), (-7.0 / 5.0, 24.0 / 5.0)));
    }

    #[test]
    fn radial_variations_match_closed_forms() {
        // theta(0, y) = 0 for y > 0
        let s1 = 1.0f64.sin();
        assert!(close(eval(&Variation::Handkerchief, 0.0, 1.0), (s1, 1.0f64.cos())));
        assert!(close(eval(&Variation::Heart, 0.0, 2.0), (0.0, -2.0)));
        assert!(close(eval(&Variation::Ex, 0.0, 1.0), (0.0, 2.0 * s1.powi(3))));
        assert!(close(eval(&Variation::Power, 0.0, 2.0), (1.0, 0.0)));
        // theta(1, 0) = pi / 2
        assert!(close(eval(&Variation::Disc, 1.0, 0.0), (0.0, -0.5)));
        assert!(close(eval(&Variation::Fisheye, 3.0, 4.0), (4.0 / 3.0, 1.0)));
    }

    #[test]
    fn exponential_and_cosine_match_closed_forms() {
        assert!(close(eval(&Variation::Exponential, 1.0, 0.5), (0.0, 1.0)));
        assert!(close(eval(&Variation::Cosine, 0.0, 0.0), (1.0, 0.0)));
        assert!(close(
            eval(&Variation::Cosine, 1.0, 1.0),
            (-1.0f64.cosh(), -(PI.sin()) * 1.0f64.sinh())
        ));
    }

    #[test]
    fn parametric_variations_match_closed_forms() {
        let blob = Variation::Blob {
            high: 2.0,
            low: 0.0,
            waves: 1.0,
        };
        assert!(close(eval(&blob, 1.0, 0.0), (2.0, 0.0)));

        let pdj = Variation::Pdj {
            a: 1.0,
            b: 2.0,
            c: 3.0,
            d: 4.0,
        };
        let expected = (0.25f64.sin() - 1.0f64.cos(), 1.5f64.sin() - 1.0f64.cos());
        assert!(close(eval(&pdj, 0.5, 0.25), expected));

        let curl = Variation::Curl { c1: 1.0, c2: 0.0 };
        assert!(close(eval(&curl, 1.0, 0.0), (0.5, 0.0)));

        let rect = Variation::Rectangles { x: 1.0, y: 1.0 };
        assert!(close(eval(&rect, 0.25, 2.5), (0.75, 2.5)));
        let rect = Variation::Rectangles { x: 0.0, y: 1.0 };
        assert!(close(eval(&rect, 0.25, 0.5), (0.25, 0.5)));
    }

    #[test]
    fn julian_roots_match_closed_forms() {
        let unit = Variation::Julian {
            power: 1.0,
            dist: 1.0,
        };
        assert!(close(eval(&unit, 0.3, -0.4), (0.3, -0.4)));

        // power 2 takes a square root: phi(0, 4) = pi / 2, so the result
        // lies on the diagonal at radius 2
        let square = Variation::Julian {
            power: 2.0,
            dist: 1.0,
        };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let (x, y) = square.evaluate(0.0, 4.0, &ID, &mut rng);
            assert!((x.abs() - 2f64.sqrt()).abs() < 1e-9);
            assert!((y.abs() - 2f64.sqrt()).abs() < 1e-9);
            assert!(x * y > 0.0);
        }
    }

    #[test]
    fn popcorn_reads_translation_coefficients() {
        let af = AffineParams::new(1.0, 0.0, 0.5, 0.0, 1.0, -0.25);
        let mut rng = StdRng::seed_from_u64(1);
        let (x, y) = Variation::Popcorn.evaluate(0.1, 0.2, &af, &mut rng);
        assert!((x - (0.1 + 0.5 * (0.6f64).tan().sin())).abs() < 1e-12);
        assert!((y - (0.2 - 0.25 * (0.3f64).tan().sin())).abs() < 1e-12);
    }

    #[test]
    fn waves_with_zero_coefficients_is_identity() {
        let af = AffineParams::new(1.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Variation::Waves.evaluate(0.3, -0.4, &af, &mut rng), (0.3, -0.4));
    }

    #[test]
    fn bent_folds_negative_quadrants() {
        assert_eq!(eval(&Variation::Bent, -1.0, -1.0), (-2.0, -0.5));
        assert_eq!(eval(&Variation::Bent, 1.0, 1.0), (1.0, 1.0));
    }

    #[test]
    fn julia_lands_on_one_of_two_square_roots() {
        let (x, y) = eval(&Variation::Julia, 0.0, 4.0);
        // theta(0, 4) = 0, so the root is (+-2, 0)
        assert!(close((x.abs(), y), (2.0, 0.0)));
    }

    #[test]
    fn stochastic_helpers_stay_in_their_sets() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let p = psi(&mut rng);
            assert!((0.0..1.0).contains(&p));
            let o = omega(&mut rng);
            assert!(o == 0.0 || o == PI);
            let l = lambda(&mut rng);
            assert!(l == 1.0 || l == -1.0);
        }
    }

    #[test]
    fn square_fills_the_unit_square() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let (x, y) = Variation::Square.evaluate(5.0, 5.0, &ID, &mut rng);
            assert!((-0.5..0.5).contains(&x) && (-0.5..0.5).contains(&y));
        }
    }

    #[test]
    fn julian_rejects_zero_power() {
        let var = Variation::Julian {
            power: 0.0,
            dist: 1.0,
        };
        assert!(matches!(
            var.validate(),
            Err(FlameError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn deserializes_tagged_by_name_with_defaults() {
        let var: Variation = serde_json::from_str(r#"{"name":"blob","waves":3}"#).unwrap();
        assert_eq!(
            var,
            Variation::Blob {
                high: 1.0,
                low: 0.0,
                waves: 3.0
            }
        );
        let var: Variation = serde_json::from_str(r#"{"name":"spherical"}"#).unwrap();
        assert_eq!(var, Variation::Spherical);
    }
}
