//! Feature derivation from sampled query results.
//!
//! This crate turns the first rows of a SQL query result into a complete list
//! of feature columns:
//!
//! 1. [`infer_field_descs`] inspects sampled cells and infers one
//!    [`FieldDesc`](feature_column::FieldDesc) per result column.
//! 2. [`derive_feature_columns`] rebinds the user's declared columns to those
//!    descriptors and adds default columns for every unused field.
//!
//! # Example
//!
//! ```
//! use feature_column::{EmbeddingColumn, FeatureColumn, FeatureColumnKind};
//! use feature_derivation::{derive_from_sample, DerivationConfig, SampleTable};
//!
//! let table = SampleTable::from_json(r#"{
//!     "columns": ["age", "tags", "city", "clicked"],
//!     "rows": [
//!         [31, "1,7", "beijing", 0],
//!         [25, "3", "shanghai", 1]
//!     ]
//! }"#).unwrap();
//!
//! let declared: Vec<FeatureColumnKind> =
//!     vec![EmbeddingColumn::new(None, "city").with_dimension(8).unwrap().into()];
//! let derived =
//!     derive_from_sample(&table, &declared, Some("clicked"), &DerivationConfig::default())
//!         .unwrap();
//!
//! assert_eq!(derived.features[0].num_class(), Some(2));
//! assert_eq!(derived.features.len(), 3);
//! assert_eq!(derived.label.unwrap().name(), "clicked");
//! ```
//!
//! # Modules
//!
//! - [`sample`] - Sampled rows and their cells
//! - [`infer`] - Field descriptor inference
//! - [`derive`] - Rebinding and default columns
//! - [`config`] - Derivation settings
//! - [`error`] - Error types

#![warn(missing_docs)]

pub mod config;
pub mod derive;
pub mod error;
pub mod infer;
pub mod sample;

pub use config::{
    DerivationConfig, DEFAULT_DELIMITER, DEFAULT_MAX_SAMPLE_ROWS, DEFAULT_MAX_VOCABULARY_SIZE,
};
pub use derive::{derive_feature_columns, DerivedColumns};
pub use error::{DerivationError, Result};
pub use infer::infer_field_descs;
pub use sample::{Cell, SampleTable};

use feature_column::FeatureColumnKind;

/// Infers field descriptors from `table` and derives the feature columns.
pub fn derive_from_sample(
    table: &SampleTable,
    declared: &[FeatureColumnKind],
    label: Option<&str>,
    config: &DerivationConfig,
) -> Result<DerivedColumns> {
    let descs = infer_field_descs(table, config)?;
    derive_feature_columns(declared, &descs, label, config)
}
