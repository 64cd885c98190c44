//! Display formatting for intermediate count-up frames.

use crate::config::CountupConfig;
use crate::value::FormatKind;
use serde::{Deserialize, Serialize};

/// Digit grouping convention for integer output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    /// en-IN: last three digits, then groups of two (`20,00,000`)
    #[default]
    Indian,
    /// Groups of three (`2,000,000`)
    Western,
    /// No separators
    None,
}

impl Grouping {
    /// Insert separators into a run of ASCII digits.
    #[must_use]
    pub fn apply(self, digits: &str) -> String {
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 2);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && self.separator_before(len - i) {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }

    /// Whether a separator goes in front of the digit with `remaining` digits
    /// left (itself included).
    fn separator_before(self, remaining: usize) -> bool {
        match self {
            Self::Indian => remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0),
            Self::Western => remaining % 3 == 0,
            Self::None => false,
        }
    }
}

/// Floor `value` and render it with the given grouping.
#[must_use]
pub fn format_integer(value: f64, grouping: Grouping) -> String {
    let floored = value.floor();
    let digits = format!("{:.0}", floored.abs());
    let grouped = grouping.apply(&digits);
    if floored < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Render `value` with a fixed number of decimals.
#[must_use]
pub fn format_fixed(value: f64, decimals: usize) -> String {
    // Adding zero turns -0.0 into 0.0
    format!("{:.decimals$}", value + 0.0)
}

/// Render one intermediate frame for the given format kind.
#[must_use]
pub fn format_frame(kind: FormatKind, value: f64, config: &CountupConfig) -> String {
    match kind {
        FormatKind::Currency => format!(
            "{}{}",
            config.currency_symbol,
            format_integer(value, config.grouping)
        ),
        FormatKind::Percent => format!("{}%", format_fixed(value, config.percent_decimals)),
        FormatKind::Plain => format_integer(value, config.grouping),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indian_grouping() {
        assert_eq!(Grouping::Indian.apply("7"), "7");
        assert_eq!(Grouping::Indian.apply("999"), "999");
        assert_eq!(Grouping::Indian.apply("1000"), "1,000");
        assert_eq!(Grouping::Indian.apply("12345"), "12,345");
        assert_eq!(Grouping::Indian.apply("123456"), "1,23,456");
        assert_eq!(Grouping::Indian.apply("2000000"), "20,00,000");
        assert_eq!(Grouping::Indian.apply("1234567890"), "1,23,45,67,890");
    }

    #[test]
    fn test_western_grouping() {
        assert_eq!(Grouping::Western.apply("999"), "999");
        assert_eq!(Grouping::Western.apply("2000000"), "2,000,000");
        assert_eq!(Grouping::Western.apply("12345"), "12,345");
    }

    #[test]
    fn test_no_grouping() {
        assert_eq!(Grouping::None.apply("2000000"), "2000000");
    }

    #[test]
    fn test_format_integer_floors() {
        assert_eq!(format_integer(1999.99, Grouping::Indian), "1,999");
        assert_eq!(format_integer(0.4, Grouping::Indian), "0");
        assert_eq!(format_integer(-0.0, Grouping::Indian), "0");
    }

    #[test]
    fn test_format_integer_negative() {
        // floor moves away from zero for negatives
        assert_eq!(format_integer(-1234.2, Grouping::Indian), "-1,235");
        assert_eq!(format_integer(-150000.0, Grouping::Indian), "-1,50,000");
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(42.34, 1), "42.3");
        assert_eq!(format_fixed(87.5, 1), "87.5");
        assert_eq!(format_fixed(-0.0, 1), "0.0");
        assert_eq!(format_fixed(3.0, 2), "3.00");
    }

    #[test]
    fn test_format_frame_per_kind() {
        let config = CountupConfig::default();
        assert_eq!(
            format_frame(FormatKind::Currency, 1_234_567.8, &config),
            "₹12,34,567"
        );
        assert_eq!(format_frame(FormatKind::Percent, 42.26, &config), "42.3%");
        assert_eq!(format_frame(FormatKind::Plain, 1200.9, &config), "1,200");
    }

    #[test]
    fn test_format_frame_respects_config() {
        let config = CountupConfig::default()
            .with_currency_symbol('$')
            .with_grouping(Grouping::Western)
            .with_percent_decimals(2);
        assert_eq!(
            format_frame(FormatKind::Currency, 2_000_000.0, &config),
            "$2,000,000"
        );
        assert_eq!(format_frame(FormatKind::Percent, 9.5, &config), "9.50%");
    }
}
