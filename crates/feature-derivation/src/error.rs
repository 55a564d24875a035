//! Error types for feature derivation.

use thiserror::Error;

use feature_column::FeatureColumnError;

/// The main error type for feature derivation.
#[derive(Debug, Error)]
pub enum DerivationError {
    /// Building a descriptor or column failed.
    #[error(transparent)]
    Column(#[from] FeatureColumnError),

    /// Sampled cells of one field disagree on their format.
    #[error("Field {field:?} mixes {previous} and {found} values")]
    ConflictingFormat {
        /// The field being inferred.
        field: String,
        /// The format seen first.
        previous: &'static str,
        /// The conflicting format.
        found: &'static str,
    },

    /// A field's descriptor cannot be inferred from the sample.
    #[error("Cannot infer field {field:?}: {message}")]
    UninferableField {
        /// The field being inferred.
        field: String,
        /// Why inference failed.
        message: String,
    },

    /// A sample row does not have one cell per column.
    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Number of declared columns.
        expected: usize,
        /// Number of cells in the row.
        actual: usize,
    },

    /// A sample table declares the same column twice.
    #[error("Duplicate column {column:?} in sample table")]
    DuplicateColumn {
        /// The repeated column name.
        column: String,
    },

    /// A declared feature column refers to a field absent from the sample.
    #[error("Feature column {column} references unknown field {field:?}")]
    UnknownField {
        /// Kind of the declared column.
        column: &'static str,
        /// The missing field name.
        field: String,
    },

    /// The requested label is not a field of the sample.
    #[error("Label {label:?} is not a sampled field")]
    UnknownLabel {
        /// The requested label name.
        label: String,
    },

    /// The derivation configuration is invalid.
    #[error("Invalid derivation config: {message}")]
    InvalidConfig {
        /// A description of the configuration error.
        message: String,
    },

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized Result type for feature derivation.
pub type Result<T> = std::result::Result<T, DerivationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DerivationError::ConflictingFormat {
            field: "c1".to_string(),
            previous: "csv",
            found: "string",
        };
        assert_eq!(err.to_string(), "Field \"c1\" mixes csv and string values");

        let err = DerivationError::RaggedRow {
            row: 3,
            expected: 4,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Row 3 has 2 cells, expected 4");

        let err = DerivationError::UnknownField {
            column: "numeric",
            field: "age".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Feature column numeric references unknown field \"age\""
        );

        let err = DerivationError::UnknownLabel {
            label: "y".to_string(),
        };
        assert_eq!(err.to_string(), "Label \"y\" is not a sampled field");
    }

    #[test]
    fn test_column_error_is_transparent() {
        let err: DerivationError = FeatureColumnError::EmptyName.into();
        assert_eq!(err.to_string(), "Field name must not be empty");
    }
}
