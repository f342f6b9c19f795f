//! Number formatting for axis labels, stat badges, and tooltips.
//!
//! [`format_compact`] produces short labels (`1.23M`, `-2.63K`); [`format_full`] produces the
//! exact-ish tooltip value (`12,345`).

use numfmt::{Formatter, Precision, Scales};

/// Default significant digits for compact labels.
pub const DEFAULT_PRECISION: usize = 3;

/// Largest useful precision: 17 significant digits round-trip any `f64`.
pub const MAX_PRECISION: usize = 17;

const SCALES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Format `n` compactly with `precision` significant digits and a magnitude suffix.
///
/// Values that would round up into the next order of magnitude (`999_999` -> `1000K`) are
/// truncated instead, so `999_999` renders as `999K`.
///
/// ```
/// use data_explorer::format::format_compact;
///
/// assert_eq!(format_compact(8_234e6, 3), "8.23B");
/// assert_eq!(format_compact(-2634.0, 3), "-2.63K");
/// assert_eq!(format_compact(999_999.0, 3), "999K");
/// ```
pub fn format_compact(n: f64, precision: usize) -> String {
    if let Some(s) = non_finite(n) {
        return s;
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let abs = n.abs();
    let (scaled, suffix) = SCALES
        .iter()
        .find(|(threshold, _)| abs >= *threshold)
        .map(|(threshold, suffix)| (n / threshold, *suffix))
        .unwrap_or((n, ""));

    let precision = precision.clamp(1, MAX_PRECISION);
    let mut rounded = round_significant(scaled, precision);
    if exponent(rounded) > exponent(scaled) {
        rounded = truncate_significant(scaled, precision);
    }

    format!("{}{}", plain(rounded), suffix)
}

/// Format `n` for tooltips: four significant digits up to `1e4`, a comma-grouped integer
/// above it.
pub fn format_full(n: f64) -> String {
    if let Some(s) = non_finite(n) {
        return s;
    }
    if n.abs() <= 1e4 {
        return plain(round_significant(n, 4));
    }

    match Formatter::new().scales(Scales::none()).separator(',') {
        Ok(grouping) => grouping
            .precision(Precision::Decimals(0))
            .fmt2(n.round())
            .to_string(),
        Err(_) => plain(n.round()),
    }
}

/// Render a number without scaling or rounding (`2024`, `0.5`), as used for year labels.
pub fn plain(n: f64) -> String {
    if let Some(s) = non_finite(n) {
        return s;
    }
    if n == 0.0 {
        // Avoid "-0".
        return "0".to_string();
    }
    n.to_string()
}

/// Round to `precision` significant digits, like `toPrecision`.
pub fn round_significant(n: f64, precision: usize) -> f64 {
    if !n.is_finite() || n == 0.0 {
        return n;
    }
    let digits = precision.clamp(1, MAX_PRECISION) - 1;
    format!("{n:.digits$e}").parse().unwrap_or(n)
}

/// Keep the first `precision` significant digits of `n` without rounding.
pub fn truncate_significant(n: f64, precision: usize) -> f64 {
    if !n.is_finite() || n == 0.0 {
        return n;
    }
    // Shortest round-trip form, e.g. "-9.99999e2".
    let repr = format!("{n:e}");
    let Some((mantissa, exp)) = repr.split_once('e') else {
        return n;
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(precision.max(1))
        .collect();
    let (lead, rest) = digits.split_at(1);
    let truncated = if rest.is_empty() {
        format!("{sign}{lead}e{exp}")
    } else {
        format!("{sign}{lead}.{rest}e{exp}")
    };
    truncated.parse().unwrap_or(n)
}

/// Decimal exponent of `n` (`999.9` -> 2, `1000` -> 3).
fn exponent(n: f64) -> i32 {
    if n == 0.0 || !n.is_finite() {
        return 0;
    }
    format!("{n:e}")
        .split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or(0)
}

fn non_finite(n: f64) -> Option<String> {
    if n.is_nan() {
        Some("NaN".to_string())
    } else if n == f64::INFINITY {
        Some("Infinity".to_string())
    } else if n == f64::NEG_INFINITY {
        Some("-Infinity".to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nice(n: f64) -> String {
        format_compact(n, DEFAULT_PRECISION)
    }

    #[test]
    fn formats_zero() {
        assert_eq!(nice(0.0), "0");
        assert_eq!(nice(-0.0), "0");
    }

    #[test]
    fn formats_suffixes() {
        assert_eq!(nice(1e12), "1T");
        assert_eq!(nice(8e9), "8B");
        assert_eq!(nice(8234e6), "8.23B");
        assert_eq!(nice(8236e6), "8.24B");
        assert_eq!(nice(1e6), "1M");
        assert_eq!(nice(1000.0), "1K");
    }

    #[test]
    fn does_not_round_into_next_magnitude() {
        assert_eq!(nice(999_999.0), "999K");
        assert_eq!(nice(999_999_999.0), "999M");
        assert_eq!(nice(999.9), "999");
    }

    #[test]
    fn formats_floats() {
        assert_eq!(nice(1.27487), "1.27");
        assert_eq!(nice(1.27687), "1.28");
        assert_eq!(nice(0.00002), "0.00002");
    }

    #[test]
    fn formats_negatives() {
        assert_eq!(nice(-2634.0), "-2.63K");
        assert_eq!(nice(-0.121212), "-0.121");
    }

    #[test]
    fn higher_precision_keeps_more_digits() {
        assert_eq!(format_compact(14137.0, 3), "14.1K");
        assert_eq!(format_compact(14137.0, 5), "14.137K");
    }

    #[test]
    fn non_finite_passes_through() {
        assert_eq!(nice(f64::NAN), "NaN");
        assert_eq!(nice(f64::INFINITY), "Infinity");
        assert_eq!(format_full(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn full_format_groups_large_values() {
        assert_eq!(format_full(1234.5678), "1235");
        assert_eq!(format_full(0.123456), "0.1235");
        assert_eq!(format_full(10_000.0), "10000");
        assert_eq!(format_full(12_345.6), "12,346");
        assert_eq!(format_full(1_234_567.0), "1,234,567");
        assert_eq!(format_full(-98_765.0), "-98,765");
    }

    #[test]
    fn truncation_keeps_leading_digits() {
        assert_eq!(truncate_significant(999.999, 3), 999.0);
        assert_eq!(truncate_significant(-9.9999, 3), -9.99);
        assert_eq!(truncate_significant(5.0, 3), 5.0);
    }
}
