//! Analysis settings shared by the pipeline stages.

use crate::calendar::Locale;
use crate::core::MatchPolicy;
use crate::seasonality::STL;

/// Marker used in the municipal tables for "no value".
pub const DEFAULT_PLACEHOLDER: &str = "-";

/// Decimal separator used by numeric cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecimalSeparator {
    /// `1234.5`
    #[default]
    Point,
    /// `1.234,5` (`.` only groups thousands; `12.5` is refused)
    Comma,
}

/// Settings for one decomposition run.
///
/// # Example
/// ```
/// use munistl::config::{AnalysisConfig, DecimalSeparator};
/// use munistl::core::MatchPolicy;
///
/// let config = AnalysisConfig::new()
///     .with_match_policy(MatchPolicy::Unique)
///     .with_decimal_separator(DecimalSeparator::Comma);
/// assert_eq!(config.placeholder(), "-");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    locale: Locale,
    placeholder: String,
    decimal_separator: DecimalSeparator,
    match_policy: MatchPolicy,
    stl: STL,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Language of the month abbreviations in period labels.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Cell text that stands for a zero value.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into().trim().to_string();
        self
    }

    pub fn with_decimal_separator(mut self, separator: DecimalSeparator) -> Self {
        self.decimal_separator = separator;
        self
    }

    /// How to handle a key that matches several rows.
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    /// Decomposition settings.
    pub fn with_stl(mut self, stl: STL) -> Self {
        self.stl = stl;
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn decimal_separator(&self) -> DecimalSeparator {
        self.decimal_separator
    }

    pub fn match_policy(&self) -> MatchPolicy {
        self.match_policy
    }

    pub fn stl(&self) -> &STL {
        &self.stl
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            decimal_separator: DecimalSeparator::default(),
            match_policy: MatchPolicy::default(),
            stl: STL::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_municipal_tables() {
        let config = AnalysisConfig::default();
        assert_eq!(config.locale(), Locale::Portuguese);
        assert_eq!(config.placeholder(), "-");
        assert_eq!(config.decimal_separator(), DecimalSeparator::Point);
        assert_eq!(config.match_policy(), MatchPolicy::First);
        assert!(!config.stl().is_robust());
    }

    #[test]
    fn builder_overrides() {
        let config = AnalysisConfig::new()
            .with_locale(Locale::English)
            .with_placeholder(" NA ")
            .with_stl(STL::new().robust());
        assert_eq!(config.locale(), Locale::English);
        assert_eq!(config.placeholder(), "NA");
        assert!(config.stl().is_robust());
    }
}
