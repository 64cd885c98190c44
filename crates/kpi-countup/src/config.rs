//! Count-up configuration.
//!
//! Defaults reproduce the dashboard markup contract: elements carry the
//! `kpi-value-animate` class and their final text in `data-value`.

use crate::easing::Easing;
use crate::format::Grouping;
use crate::result::{CountupError, CountupResult};
use serde::{Deserialize, Serialize};

/// Default run length in milliseconds
pub const DEFAULT_DURATION_MS: f64 = 2000.0;

/// Configuration shared by the animator and the watcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountupConfig {
    /// Class that marks an element as eligible
    pub marker_class: String,
    /// Attribute holding the literal final display string
    pub source_attribute: String,
    /// Attribute set to `"true"` once processing starts
    pub processing_attribute: String,
    /// Class added once the run completes
    pub complete_class: String,
    /// Run length in milliseconds
    pub duration_ms: f64,
    /// Glyph that identifies (and prefixes) currency values
    pub currency_symbol: char,
    /// Digit grouping for currency and plain values
    pub grouping: Grouping,
    /// Decimals shown for percent values
    pub percent_decimals: usize,
    /// Easing curve
    pub easing: Easing,
}

impl Default for CountupConfig {
    fn default() -> Self {
        Self {
            marker_class: "kpi-value-animate".to_string(),
            source_attribute: "data-value".to_string(),
            processing_attribute: "data-animating".to_string(),
            complete_class: "animation-complete".to_string(),
            duration_ms: DEFAULT_DURATION_MS,
            currency_symbol: '₹',
            grouping: Grouping::Indian,
            percent_decimals: 1,
            easing: Easing::CubicOut,
        }
    }
}

impl CountupConfig {
    /// Create a config with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object; missing keys keep their defaults
    ///
    /// # Errors
    ///
    /// Returns error if the JSON is malformed or the result fails validation
    pub fn from_json(json: &str) -> CountupResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the marker class
    #[must_use]
    pub fn with_marker_class(mut self, class: &str) -> Self {
        self.marker_class = class.to_string();
        self
    }

    /// Set the source attribute
    #[must_use]
    pub fn with_source_attribute(mut self, attribute: &str) -> Self {
        self.source_attribute = attribute.to_string();
        self
    }

    /// Set the run duration
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the currency glyph
    #[must_use]
    pub fn with_currency_symbol(mut self, symbol: char) -> Self {
        self.currency_symbol = symbol;
        self
    }

    /// Set the digit grouping
    #[must_use]
    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Set percent decimals
    #[must_use]
    pub fn with_percent_decimals(mut self, decimals: usize) -> Self {
        self.percent_decimals = decimals;
        self
    }

    /// Set the easing curve
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Check that the config can drive a run
    ///
    /// # Errors
    ///
    /// Returns [`CountupError::InvalidConfig`] on a non-positive or
    /// non-finite duration, or an empty class/attribute name
    pub fn validate(&self) -> CountupResult<()> {
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(CountupError::invalid_config(format!(
                "duration_ms must be positive and finite, got {}",
                self.duration_ms
            )));
        }
        let names = [
            ("marker_class", &self.marker_class),
            ("source_attribute", &self.source_attribute),
            ("processing_attribute", &self.processing_attribute),
            ("complete_class", &self.complete_class),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(CountupError::invalid_config(format!(
                    "{field} must not be empty"
                )));
            }
        }
        if self.marker_class.contains(char::is_whitespace) {
            return Err(CountupError::invalid_config(
                "marker_class must be a single class name",
            ));
        }
        Ok(())
    }

    /// CSS selector matching eligible elements
    #[must_use]
    pub fn marker_selector(&self) -> String {
        format!(".{}", self.marker_class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_markup_contract() {
        let config = CountupConfig::default();
        assert_eq!(config.marker_class, "kpi-value-animate");
        assert_eq!(config.source_attribute, "data-value");
        assert_eq!(config.processing_attribute, "data-animating");
        assert_eq!(config.complete_class, "animation-complete");
        assert!((config.duration_ms - 2000.0).abs() < f64::EPSILON);
        assert_eq!(config.currency_symbol, '₹');
        assert_eq!(config.grouping, Grouping::Indian);
        assert_eq!(config.percent_decimals, 1);
        assert_eq!(config.easing, Easing::CubicOut);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = CountupConfig::new()
            .with_marker_class("counter")
            .with_source_attribute("data-target")
            .with_duration_ms(500.0)
            .with_easing(Easing::Linear);
        assert_eq!(config.marker_selector(), ".counter");
        assert_eq!(config.source_attribute, "data-target");
        assert!((config.duration_ms - 500.0).abs() < f64::EPSILON);
        assert_eq!(config.easing, Easing::Linear);
    }

    #[test]
    fn test_validate_rejects_bad_duration() {
        for duration in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let config = CountupConfig::default().with_duration_ms(duration);
            assert!(
                matches!(config.validate(), Err(CountupError::InvalidConfig { .. })),
                "duration {duration} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        let config = CountupConfig::default().with_source_attribute("  ");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("source_attribute"));
    }

    #[test]
    fn test_validate_rejects_compound_class() {
        let config = CountupConfig::default().with_marker_class("a b");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            CountupConfig::from_json(r#"{"duration_ms": 750, "grouping": "western"}"#).unwrap();
        assert!((config.duration_ms - 750.0).abs() < f64::EPSILON);
        assert_eq!(config.grouping, Grouping::Western);
        assert_eq!(config.marker_class, "kpi-value-animate");
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            CountupConfig::from_json("not json"),
            Err(CountupError::Json(_))
        ));
        assert!(matches!(
            CountupConfig::from_json(r#"{"duration_ms": 0}"#),
            Err(CountupError::InvalidConfig { .. })
        ));
    }
}
