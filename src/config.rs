//! Configuration and builder for tree induction.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    logger::Verbosity
};

/// Significance limit used when none is given.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// # Overview
///
/// Parameters for fitting a decision tree.
///
/// `significance` is compared against the raw chi-squared statistic of a
/// candidate split. `0.0` accepts every split with positive gain; larger
/// values stop induction earlier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[must_use]
pub struct Config {
    pub class_column: String,
    pub significance: f64,
    pub verbosity:    Verbosity
}

impl Config {
    /// # Overview
    ///
    /// Creates a new ConfigBuilder.
    #[inline]
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// # Overview
    ///
    /// Validates configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if self.class_column.is_empty() {
            return Err(Error::MissingClassColumn);
        }
        if !self.significance.is_finite() || self.significance < 0.0 {
            return Err(Error::InvalidSignificance);
        }
        Ok(())
    }
}

/// # Overview
///
/// Builder for Config with validation.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    class_column: Option<String>,
    significance: Option<f64>,
    verbosity:    Option<Verbosity>
}

impl ConfigBuilder {
    /// # Overview
    ///
    /// Sets the name of the categorical column to predict.
    pub fn class_column(mut self, name: impl Into<String>) -> Self {
        self.class_column = Some(name.into());
        self
    }

    /// # Overview
    ///
    /// Sets the chi-squared significance limit (default: 0.05).
    pub fn significance(mut self, limit: f64) -> Self {
        self.significance = Some(limit);
        self
    }

    /// Sets diagnostic verbosity (default: `Warning`).
    pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = Some(verbosity);
        self
    }

    /// # Overview
    ///
    /// Builds and validates the Config.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            class_column: self.class_column.ok_or(Error::MissingClassColumn)?,
            significance: self.significance.unwrap_or(DEFAULT_SIGNIFICANCE),
            verbosity:    self.verbosity.unwrap_or_default()
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_with_defaults() {
        let config = Config::builder().class_column("label").build().unwrap();

        assert_eq!(config.class_column, "label");
        assert!((config.significance - 0.05).abs() < 1e-12);
        assert_eq!(config.verbosity, Verbosity::Warning);
    }

    #[test]
    fn builder_requires_class_column() {
        let result = Config::builder().significance(0.1).build();

        assert_eq!(result, Err(Error::MissingClassColumn));
    }

    #[test]
    fn builder_rejects_empty_class_column() {
        let result = Config::builder().class_column("").build();

        assert_eq!(result, Err(Error::MissingClassColumn));
    }

    #[test]
    fn builder_rejects_negative_significance() {
        let result = Config::builder()
            .class_column("label")
            .significance(-1.0)
            .build();

        assert_eq!(result, Err(Error::InvalidSignificance));
    }

    #[test]
    fn builder_rejects_nan_significance() {
        let result = Config::builder()
            .class_column("label")
            .significance(f64::NAN)
            .build();

        assert_eq!(result, Err(Error::InvalidSignificance));
    }

    #[test]
    fn zero_significance_is_valid() {
        let config = Config::builder()
            .class_column("label")
            .significance(0.0)
            .verbosity(Verbosity::Silent)
            .build()
            .unwrap();

        assert_eq!(config.significance, 0.0);
        assert_eq!(config.verbosity, Verbosity::Silent);
    }
}
