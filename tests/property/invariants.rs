//! Property-based tests for color, grid and selection invariants

use frame_engine::frame::{FrameId, GridDensity, Selection, MAX_COLUMN_WIDTH, MIN_COLUMN_WIDTH};
use frame_engine::pattern::Hsl;
use proptest::prelude::*;

proptest! {
    /// HSL conversion never panics and tolerates out-of-range inputs
    #[test]
    fn test_hsl_to_rgb_total(hue in -1000.0f64..1000.0, s in -1.0f64..2.0, l in -1.0f64..2.0) {
        let rgb = Hsl::new(hue, s, l).to_rgb();
        let gray = Hsl::new(hue, 0.0, l.clamp(0.0, 1.0)).to_rgb();
        prop_assert!(gray[0] == gray[1] && gray[1] == gray[2]);
        prop_assert_eq!(rgb.len(), 3);
    }

    /// Hue is periodic with period 360
    #[test]
    fn test_hue_periodicity(hue in 0.0f64..360.0, s in 0.0f64..=1.0, l in 0.0f64..=1.0) {
        let a = Hsl::new(hue, s, l).to_rgb();
        let b = Hsl::new(hue + 360.0, s, l).to_rgb();
        for channel in 0..3 {
            prop_assert!((a[channel] as i16 - b[channel] as i16).abs() <= 1);
        }
    }

    /// Any assigned width lands inside the allowed range
    #[test]
    fn test_grid_width_is_clamped(width in any::<u32>(), steps in proptest::collection::vec(any::<bool>(), 0..20)) {
        let mut grid = GridDensity::default();
        let stored = grid.set_column_width(width);
        prop_assert!((MIN_COLUMN_WIDTH..=MAX_COLUMN_WIDTH).contains(&stored));
        prop_assert_eq!(stored, width.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH));

        for up in steps {
            if up { grid.step_up(); } else { grid.step_down(); }
            prop_assert!((MIN_COLUMN_WIDTH..=MAX_COLUMN_WIDTH).contains(&grid.column_width()));
        }
    }

    /// Toggling the same id twice restores the selection
    #[test]
    fn test_toggle_twice_is_identity(
        initial in proptest::collection::hash_set("[a-z]{1,4}", 0..8),
        target in "[a-z]{1,4}",
    ) {
        let ids: Vec<FrameId> = initial.into_iter().map(FrameId::from).collect();
        let mut selection = Selection::default();
        selection.select_many(&ids);
        let before = selection.clone();

        let id = FrameId::from(target);
        selection.toggle(&id);
        selection.toggle(&id);
        prop_assert_eq!(selection, before);
    }
}
