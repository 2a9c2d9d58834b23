//! Discrete color tables indexed by a continuous value in [0, 1].

use serde::{Deserialize, Serialize};

use crate::error::{FlameError, FlameResult};

pub type Rgb8 = [u8; 3];

/// Conventional palette length.
pub const PALETTE_SIZE: usize = 256;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rgb8>", into = "Vec<Rgb8>")]
pub struct Palette {
    colors: Vec<Rgb8>,
}

impl Palette {
    pub fn new(colors: Vec<Rgb8>) -> FlameResult<Self> {
        if colors.is_empty() {
            return Err(FlameError::invalid("palette has no colors"));
        }
        Ok(Palette { colors })
    }

    /// Black to white in [`PALETTE_SIZE`] steps.
    pub fn grayscale() -> Self {
        let colors = (0..PALETTE_SIZE)
            .map(|i| {
                let v = (i * 255 / (PALETTE_SIZE - 1)) as u8;
                [v, v, v]
            })
            .collect();
        Palette { colors }
    }

    /// [`PALETTE_SIZE`] entries ramping linearly from `start` to `end`.
    pub fn gradient(start: Rgb8, end: Rgb8) -> Self {
        let steps = (PALETTE_SIZE - 1) as f64;
        let colors = (0..PALETTE_SIZE)
            .map(|i| {
                let t = i as f64 / steps;
                let mix = |a: u8, b: u8| (a as f64 + t * (b as f64 - a as f64)).round() as u8;
                [
                    mix(start[0], end[0]),
                    mix(start[1], end[1]),
                    mix(start[2], end[2]),
                ]
            })
            .collect();
        Palette { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Rgb8] {
        &self.colors
    }

    /// Entry at `floor(c * len)`, clamped to the table.
    pub fn to_color(&self, c: f64) -> Rgb8 {
        let last = self.colors.len() - 1;
        let idx = (c * self.colors.len() as f64).floor();
        let idx = if idx.is_nan() || idx < 0.0 {
            0
        } else {
            (idx as usize).min(last)
        };
        self.colors[idx]
    }

    /// [`Palette::to_color`] with channels scaled into [0, 1].
    pub fn to_unit_color(&self, c: f64) -> [f64; 3] {
        let [r, g, b] = self.to_color(c);
        [r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0]
    }

    pub fn validate(&self) -> FlameResult<()> {
        if self.colors.is_empty() {
            return Err(FlameError::invalid("palette has no colors"));
        }
        Ok(())
    }
}

impl TryFrom<Vec<Rgb8>> for Palette {
    type Error = FlameError;

    fn try_from(colors: Vec<Rgb8>) -> FlameResult<Self> {
        Palette::new(colors)
    }
}

impl From<Palette> for Vec<Rgb8> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::grayscale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_spans_black_to_white() {
        let pal = Palette::grayscale();
        assert_eq!(pal.len(), PALETTE_SIZE);
        assert_eq!(pal.to_color(0.0), [0, 0, 0]);
        assert_eq!(pal.to_color(1.0), [255, 255, 255]);
    }

    #[test]
    fn index_is_floor_of_scaled_value() {
        let pal = Palette::new(vec![[1, 0, 0], [2, 0, 0], [3, 0, 0], [4, 0, 0]]).unwrap();
        assert_eq!(pal.to_color(0.24), [1, 0, 0]);
        assert_eq!(pal.to_color(0.25), [2, 0, 0]);
        assert_eq!(pal.to_color(0.99), [4, 0, 0]);
    }

    #[test]
    fn out_of_range_values_clamp() {
        let pal = Palette::new(vec![[10, 10, 10], [20, 20, 20]]).unwrap();
        assert_eq!(pal.to_color(-0.5), [10, 10, 10]);
        assert_eq!(pal.to_color(7.0), [20, 20, 20]);
        assert_eq!(pal.to_color(f64::NAN), [10, 10, 10]);
    }

    #[test]
    fn empty_palette_is_invalid() {
        assert!(Palette::new(Vec::new()).is_err());
    }

    #[test]
    fn empty_json_palette_is_rejected() {
        let err = serde_json::from_str::<Palette>("[]").unwrap_err();
        assert!(err.to_string().contains("palette has no colors"), "{}", err);
    }

    #[test]
    fn serializes_as_plain_triples() {
        let pal = Palette::new(vec![[1, 2, 3]]).unwrap();
        assert_eq!(serde_json::to_string(&pal).unwrap(), "[[1,2,3]]");
    }

    #[test]
    fn gradient_hits_both_stops() {
        let pal = Palette::gradient([0, 0, 255], [255, 0, 0]);
        assert_eq!(pal.len(), PALETTE_SIZE);
        assert_eq!(pal.colors()[0], [0, 0, 255]);
        assert_eq!(pal.colors()[PALETTE_SIZE - 1], [255, 0, 0]);
        assert_eq!(pal.to_color(0.5), [128, 0, 127]);
    }

    #[test]
    fn deserializes_from_rgb_triples() {
        let pal: Palette = serde_json::from_str("[[0,0,0],[255,128,0]]").unwrap();
        assert_eq!(pal.to_unit_color(0.9), [1.0, 128.0 / 255.0, 0.0]);
    }
}
