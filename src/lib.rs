//! Fractal flame renderer.
//!
//! A fractal flame is the attractor of an iterated function system whose
//! maps ("xforms") are an affine map, a weighted blend of nonlinear
//! "variations", and a second affine map. The chaos game picks an xform
//! at random by weight, applies it to a running point, and counts where
//! the point lands on a raster. After a short settle phase the counts
//! outline the attractor, and a logarithmic tone curve turns them into
//! an image.
//!
//! ```no_run
//! use flames::{presets, render, tone_map};
//! use rand::SeedableRng;
//!
//! let flame = presets::sierpinski().with_samples(1_000_000);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let histogram = render(&flame, &mut rng)?;
//! let pixels = tone_map(&histogram);
//! flames::output::write_image("sierpinski.png".as_ref(), &pixels)?;
//! # Ok::<(), flames::FlameError>(())
//! ```

pub mod affine;
pub mod error;
pub mod flame;
pub mod histogram;
pub mod output;
pub mod palette;
pub mod presets;
pub mod render;
pub mod scene;
pub mod selector;
pub mod tonemap;
pub mod variation;
pub mod xform;

pub use affine::{AffineParams, Point};
pub use error::{FlameError, FlameResult};
pub use flame::{Flame, Window};
pub use histogram::{Bounds, Histogram, PixelMapper};
pub use palette::Palette;
pub use render::{
    render, ColorSource, RenderMode, RenderOptions, RenderOutput, RenderStats, Renderer,
    SETTLE_ITERATIONS,
};
pub use selector::WeightedSelector;
pub use tonemap::{tone_map, Channels, DensityScale, PixelBuffer, ToneMapper};
pub use variation::Variation;
pub use xform::{ColorState, Rgb, VariationTerm, XForm};
