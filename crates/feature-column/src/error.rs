//! Error types for the feature-column library.
//!
//! Every constructor in this crate validates its input and fails with one of
//! the variants below. No partially built descriptor is ever returned.

use thiserror::Error;

/// The main error type for feature-column operations.
#[derive(Debug, Error)]
pub enum FeatureColumnError {
    /// A field descriptor was declared without a name.
    #[error("Field name must not be empty")]
    EmptyName,

    /// The same vocabulary entry appeared more than once.
    #[error("Duplicate vocabulary entry {entry:?} in field {field:?}")]
    DuplicateVocabulary {
        /// The field being constructed.
        field: String,
        /// The repeated entry.
        entry: String,
    },

    /// Bucket boundaries are empty, non-finite or not strictly ascending.
    #[error("Invalid bucket boundaries: {message}")]
    InvalidBoundaries {
        /// A description of the offending boundary.
        message: String,
    },

    /// A categorical column was given a zero bucket size.
    #[error("Bucket size of {column} must be greater than 0")]
    InvalidBucketSize {
        /// The column kind that rejected the size.
        column: &'static str,
    },

    /// An embedding column was given a zero dimension.
    #[error("Embedding dimension of {column:?} must be greater than 0")]
    InvalidDimension {
        /// The name of the embedding column.
        column: String,
    },

    /// A cross column was declared without keys.
    #[error("Cross column requires at least one key")]
    EmptyCrossKeys,

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized Result type for feature-column operations.
pub type Result<T> = std::result::Result<T, FeatureColumnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FeatureColumnError::EmptyName.to_string(),
            "Field name must not be empty"
        );

        let err = FeatureColumnError::DuplicateVocabulary {
            field: "city".to_string(),
            entry: "paris".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate vocabulary entry \"paris\" in field \"city\""
        );

        let err = FeatureColumnError::InvalidBucketSize {
            column: "CategoryIdColumn",
        };
        assert_eq!(
            err.to_string(),
            "Bucket size of CategoryIdColumn must be greater than 0"
        );

        assert_eq!(
            FeatureColumnError::EmptyCrossKeys.to_string(),
            "Cross column requires at least one key"
        );
    }

    #[test]
    fn test_serde_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: FeatureColumnError = parse.unwrap_err().into();
        assert!(matches!(err, FeatureColumnError::Serialization(_)));
    }
}
