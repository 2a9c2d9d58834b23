use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use flames::{
    render, tone_map, AffineParams, ColorState, Flame, Histogram, WeightedSelector, Window, XForm,
};

fn unit() -> impl Strategy<Value = f64> {
    0.0f64..=1.0
}

proptest! {
    #[test]
    fn color_blend_stays_in_unit_interval(
        old in unit(),
        index in unit(),
        speed in unit(),
        rgb in prop::array::uniform3(unit()),
    ) {
        let xf = XForm::new(1.0).with_color(rgb, index, speed);
        let blended = xf.blend_index(old);
        prop_assert!((0.0..=1.0).contains(&blended), "{}", blended);

        let mut state = ColorState { index: old, rgb: [old; 3] };
        state.update(&xf);
        prop_assert!(state.rgb.iter().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn cumulative_weights_end_at_one(weights in prop::collection::vec(1e-3f64..1e3, 1..20)) {
        let selector = WeightedSelector::new(weights.iter().copied()).unwrap();
        let cumulative = selector.cumulative();
        prop_assert_eq!(cumulative.len(), weights.len());
        prop_assert_eq!(*cumulative.last().unwrap(), 1.0);
        prop_assert!(cumulative.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn selection_is_always_in_range(
        weights in prop::collection::vec(1e-3f64..10.0, 1..10),
        u in unit(),
    ) {
        let selector = WeightedSelector::new(weights.iter().copied()).unwrap();
        prop_assert!(selector.select(u) < weights.len());
    }

    #[test]
    fn plotted_points_never_exceed_samples(
        seed in any::<u64>(),
        weights in prop::array::uniform3(0.01f64..5.0),
        samples in 0u64..2_000,
    ) {
        let offsets = [(0.0, 0.0), (0.5, 0.0), (0.0, 0.5)];
        let xforms = weights
            .iter()
            .zip(offsets)
            .map(|(&w, (tx, ty))| XForm::linear(w, AffineParams::scale_translate(0.5, tx, ty)))
            .collect();
        // The window only covers part of the attractor, so some points escape.
        let flame = Flame::new(8, 8, Window::new(0.0, 0.5, 0.0, 0.5), xforms).with_samples(samples);

        let hist = render(&flame, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert!(hist.total() <= samples);
    }

    #[test]
    fn tone_map_peaks_at_the_busiest_cell(
        visits in prop::collection::vec(0usize..64, 1..500),
    ) {
        let mut hist = Histogram::basic(8, 8);
        for &offset in &visits {
            hist.increment(offset);
        }
        let pixels = tone_map(&hist);
        prop_assert_eq!(pixels.data.len(), 64);

        let busiest = (0..64).max_by_key(|&i| hist.counts()[i]).unwrap();
        prop_assert_eq!(pixels.data[busiest], 255);
        for i in 0..64 {
            prop_assert_eq!(pixels.data[i] == 0, hist.counts()[i] == 0);
        }
    }
}
