//! Configuration for feature derivation.
//!
//! # Example
//!
//! ```
//! use feature_derivation::DerivationConfig;
//!
//! let config = DerivationConfig::new()
//!     .with_max_sample_rows(200)
//!     .with_max_vocabulary_size(50);
//! assert!(config.validate().is_ok());
//!
//! let config = DerivationConfig::from_json_str(r#"{"max_sample_rows": 10}"#).unwrap();
//! assert_eq!(config.max_sample_rows, 10);
//! assert_eq!(config.delimiter, ",");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{DerivationError, Result};

/// Default number of rows sampled per derivation.
pub const DEFAULT_MAX_SAMPLE_ROWS: usize = 1000;

/// Default vocabulary size above which string fields are hashed.
pub const DEFAULT_MAX_VOCABULARY_SIZE: usize = 10_000;

/// Default delimiter of multi-value cells.
pub const DEFAULT_DELIMITER: &str = ",";

/// Settings for [`crate::infer_field_descs`] and [`crate::derive_feature_columns`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationConfig {
    /// Maximum number of rows inspected per table.
    pub max_sample_rows: usize,

    /// Largest vocabulary kept for a string field. Larger fields fall back to
    /// a hashed category column with this many buckets.
    pub max_vocabulary_size: usize,

    /// Separator of CSV and KV cells.
    pub delimiter: String,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            max_sample_rows: DEFAULT_MAX_SAMPLE_ROWS,
            max_vocabulary_size: DEFAULT_MAX_VOCABULARY_SIZE,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl DerivationConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of sampled rows.
    pub fn with_max_sample_rows(mut self, rows: usize) -> Self {
        self.max_sample_rows = rows;
        self
    }

    /// Sets the maximum vocabulary size.
    pub fn with_max_vocabulary_size(mut self, size: usize) -> Self {
        self.max_vocabulary_size = size;
        self
    }

    /// Sets the multi-value delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Parses a configuration from JSON; missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_sample_rows == 0 {
            return Err(DerivationError::InvalidConfig {
                message: "max_sample_rows must be greater than 0".to_string(),
            });
        }

        if self.max_vocabulary_size == 0 {
            return Err(DerivationError::InvalidConfig {
                message: "max_vocabulary_size must be greater than 0".to_string(),
            });
        }

        if self.delimiter.is_empty() || self.delimiter.contains(':') {
            return Err(DerivationError::InvalidConfig {
                message: format!("delimiter {:?} must be non-empty and not ':'", self.delimiter),
            });
        }

        Ok(())
    }
}
