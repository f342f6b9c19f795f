use data_explorer::binning::{BIN_COUNT, equal_width_bins, label_bins};
use data_explorer::format::format_compact;
use proptest::prelude::*;

proptest! {
    #[test]
    fn label_ends_never_collide(min in -1.0e6f64..1.0e6, scale in 1.0e-4f64..1.0e3) {
        let max = min + (min.abs() + 1.0) * scale;
        let bins = equal_width_bins(min, max, BIN_COUNT);
        let labels = label_bins(&bins, false);

        prop_assert_eq!(labels.len(), BIN_COUNT);
        for label in &labels {
            let (lo, hi) = label.split_once(" - ").expect("range label");
            prop_assert_ne!(lo, hi, "label {}", label);
        }
        for pair in labels.windows(2) {
            prop_assert_ne!(&pair[0], &pair[1]);
        }
    }

    #[test]
    fn integer_labels_stay_distinct_at_any_magnitude(
        min in -1_000_000_000i64..1_000_000_000,
        span in 10i64..2_000,
    ) {
        let bins = equal_width_bins(min as f64, (min + span) as f64, BIN_COUNT);
        let labels = label_bins(&bins, true);

        prop_assert_eq!(labels.len(), BIN_COUNT);
        for label in &labels {
            if let Some((lo, hi)) = label.split_once(" - ") {
                prop_assert_ne!(lo, hi, "label {}", label);
            }
        }
        for pair in labels.windows(2) {
            prop_assert_ne!(&pair[0], &pair[1]);
        }
    }

    #[test]
    fn compact_format_never_grows_a_digit(n in 1.0f64..1.0e15) {
        // Rounding must not carry into the next magnitude ("1000K").
        let s = format_compact(n, 3);
        let digits = s.trim_end_matches(['K', 'M', 'B', 'T']);
        let int_part = digits.split('.').next().unwrap_or(digits);
        prop_assert!(int_part.len() <= 3, "{} -> {}", n, s);
    }
}
