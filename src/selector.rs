//! Weighted xform selection from a normalized cumulative distribution.

use crate::error::{FlameError, FlameResult};

/// Cumulative distribution over xform weights.
///
/// The last entry is forced to exactly 1.0 so that any draw in [0, 1)
/// selects something, whatever rounding the normalization introduced.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedSelector {
    cumulative: Vec<f64>,
}

impl WeightedSelector {
    pub fn new<I>(weights: I) -> FlameResult<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let weights: Vec<f64> = weights.into_iter().collect();
        if weights.is_empty() {
            return Err(FlameError::invalid("no weights to select from"));
        }
        if let Some((i, w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !(w.is_finite() && **w > 0.0))
        {
            return Err(FlameError::invalid(format!(
                "weight {} is {}, weights must be finite and positive",
                i, w
            )));
        }
        let sum: f64 = weights.iter().sum();
        if !(sum.is_finite() && sum > 0.0) {
            return Err(FlameError::invalid(format!("weight sum {} is unusable", sum)));
        }

        let mut acc = 0.0;
        let mut cumulative: Vec<f64> = weights
            .iter()
            .map(|w| {
                acc += w / sum;
                acc
            })
            .collect();
        if let Some(last) = cumulative.last_mut() {
            *last = 1.0;
        }
        Ok(WeightedSelector { cumulative })
    }

    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Index of the entry chosen by a uniform draw `u` in [0, 1).
    ///
    /// The index is the number of cumulative entries strictly less than
    /// `u`, i.e. the first entry that is >= `u`. A draw sitting exactly on
    /// a boundary selects the entry that boundary closes.
    #[inline]
    pub fn select(&self, u: f64) -> usize {
        let idx = self.cumulative.partition_point(|&c| c < u);
        idx.min(self.cumulative.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_non_positive_weights() {
        assert!(WeightedSelector::new(Vec::<f64>::new()).is_err());
        assert!(matches!(
            WeightedSelector::new(vec![0.0, 1.0]),
            Err(FlameError::InvalidConfiguration(_))
        ));
        assert!(WeightedSelector::new(vec![1.0, -2.0]).is_err());
        assert!(WeightedSelector::new(vec![f64::NAN]).is_err());
        assert!(WeightedSelector::new(vec![f64::INFINITY, 1.0]).is_err());
    }

    #[test]
    fn normalizes_into_cumulative_sums() {
        let sel = WeightedSelector::new(vec![1.0, 1.0, 2.0]).unwrap();
        assert_eq!(sel.cumulative(), &[0.25, 0.5, 1.0]);
        assert_eq!(sel.len(), 3);
    }

    #[test]
    fn last_entry_is_exactly_one() {
        let sel = WeightedSelector::new(vec![0.1; 10]).unwrap();
        assert_eq!(*sel.cumulative().last().unwrap(), 1.0);
    }

    #[test]
    fn boundary_draws_select_the_closing_entry() {
        let sel = WeightedSelector::new(vec![1.0, 1.0, 2.0]).unwrap();
        assert_eq!(sel.select(0.0), 0);
        assert_eq!(sel.select(0.25), 0);
        assert_eq!(sel.select(0.2500001), 1);
        assert_eq!(sel.select(0.5), 1);
        assert_eq!(sel.select(0.75), 2);
        assert_eq!(sel.select(0.999_999_999), 2);
    }

    #[test]
    fn single_weight_always_selects_zero() {
        let sel = WeightedSelector::new(vec![3.5]).unwrap();
        for u in [0.0, 0.3, 0.99] {
            assert_eq!(sel.select(u), 0);
        }
    }

    #[test]
    fn draws_at_or_above_one_clamp_to_last() {
        let sel = WeightedSelector::new(vec![1.0, 1.0]).unwrap();
        assert_eq!(sel.select(1.0), 1);
        assert_eq!(sel.select(1.5), 1);
    }
}
