//! Typed display values and the markup adapter that produces them.
//!
//! Markup encodes both the magnitude and the format kind in a single
//! pre-formatted string such as `₹20,00,000` or `87.5%`. [`DisplayValue::parse`]
//! is the only place that string is sniffed; everything downstream works on
//! the typed value.

use crate::config::CountupConfig;
use crate::format::format_frame;
use crate::result::{CountupError, CountupResult};
use serde::{Deserialize, Serialize};

/// How a magnitude is rendered while counting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    /// Currency glyph prefix, floored and grouped
    Currency,
    /// Fixed decimals with a `%` suffix
    Percent,
    /// Floored and grouped, no symbol
    Plain,
}

impl FormatKind {
    /// Classify a source string; currency wins over percent.
    #[must_use]
    pub fn classify(source: &str, currency_symbol: char) -> Self {
        if source.contains(currency_symbol) {
            Self::Currency
        } else if source.contains('%') {
            Self::Percent
        } else {
            Self::Plain
        }
    }
}

impl std::fmt::Display for FormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Currency => write!(f, "currency"),
            Self::Percent => write!(f, "percent"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

/// Target of a count-up: magnitude, format kind and settle text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DisplayValue {
    /// Numeric target
    pub magnitude: f64,
    /// Format applied to intermediate frames
    pub kind: FormatKind,
    /// Literal text written on completion, if it came from markup
    source: Option<String>,
}

impl DisplayValue {
    /// Build a typed value directly; its settle text is the formatted magnitude.
    #[must_use]
    pub fn new(magnitude: f64, kind: FormatKind) -> Self {
        Self {
            magnitude,
            kind,
            source: None,
        }
    }

    /// Parse the literal display string carried in markup.
    ///
    /// Grouping commas are dropped, then everything except digits, `.` and
    /// `-` is stripped, and the longest numeric prefix of what remains is
    /// read, so `"1.2.3"` reads as `1.2`.
    ///
    /// # Errors
    ///
    /// [`CountupError::MissingSource`] for an empty string and
    /// [`CountupError::NotNumeric`] when no finite number can be read.
    pub fn parse(source: &str, config: &CountupConfig) -> CountupResult<Self> {
        if source.is_empty() {
            return Err(CountupError::MissingSource {
                attribute: config.source_attribute.clone(),
            });
        }
        let kind = FormatKind::classify(source, config.currency_symbol);
        let cleaned = normalize(source);
        let magnitude = parse_float_prefix(&cleaned)
            .filter(|m| m.is_finite())
            .ok_or_else(|| CountupError::NotNumeric {
                source_text: source.to_string(),
            })?;
        Ok(Self {
            magnitude,
            kind,
            source: Some(source.to_string()),
        })
    }

    /// Markup string this value was parsed from, if any
    #[must_use]
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Text shown once the run completes.
    ///
    /// Parsed values settle on their source verbatim so rounding in the
    /// frame formatter can never leave a visible drift.
    #[must_use]
    pub fn final_text(&self, config: &CountupConfig) -> String {
        match &self.source {
            Some(source) => source.clone(),
            None => format_frame(self.kind, self.magnitude, config),
        }
    }
}

/// Keep only digits, `.` and `-`.
#[must_use]
pub fn normalize(source: &str) -> String {
    source
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

/// Read the longest leading `-?digits[.digits]` number, like JS `parseFloat`
/// restricted to the characters [`normalize`] keeps.
#[must_use]
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let bytes = input.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    input[..end].parse::<f64>().ok()
}
