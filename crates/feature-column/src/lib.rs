//! Field descriptors and feature-column transforms.
//!
//! This crate describes how columns of a SQL query result become model
//! inputs. It includes:
//!
//! - **Field descriptors**: [`FieldDesc`] records a raw field's type, cell
//!   format, shape and vocabulary, and round-trips through JSON.
//! - **Feature columns**: numeric, bucketized, categorical, crossed, embedding
//!   and indicator columns layered over field descriptors.
//! - **Error types**: Structured construction and decoding errors.
//!
//! # Example
//!
//! ```
//! use feature_column::{
//!     BucketColumn, CategoryHashColumn, DataType, EmbeddingColumn, FeatureColumn, FieldDesc,
//!     NumericColumn,
//! };
//!
//! let price = FieldDesc::builder("price")
//!     .dtype(DataType::Float32)
//!     .shape(vec![1])
//!     .build()
//!     .unwrap();
//! let buckets = BucketColumn::new(NumericColumn::new(price.clone()), vec![10.0, 100.0]).unwrap();
//! assert_eq!(buckets.num_class(), Some(3));
//!
//! // Rebinding keeps the boundaries and swaps the field.
//! let inferred = price.to_builder().shape(vec![4]).build().unwrap();
//! let rebound = buckets.new_feature_column_from(&inferred);
//! assert_eq!(rebound.boundaries(), &[10.0, 100.0]);
//! assert_eq!(rebound.get_field_desc()[0].shape(), &[4]);
//!
//! // Embedding columns may wrap an unresolved category column.
//! let city = CategoryHashColumn::new(FieldDesc::named("city"), 4096).unwrap();
//! let emb = EmbeddingColumn::new(Some(city.into()), "city_emb");
//! assert_eq!(emb.get_field_desc().len(), 1);
//! ```
//!
//! # Modules
//!
//! - [`field_desc`]: Raw field descriptors and their JSON record.
//! - [`column`]: The [`FeatureColumn`] capability and the column enums.
//! - [`hash`]: Stable string hashing used by hashed columns.
//! - [`error`]: Error types for the library.

#![warn(missing_docs)]

pub mod bucket;
pub mod category;
pub mod column;
pub mod cross;
pub mod embedding;
pub mod error;
pub mod field_desc;
pub mod hash;
pub mod numeric;

// Re-export commonly used types at the crate root for convenience
pub use bucket::BucketColumn;
pub use category::{CategoryHashColumn, CategoryIdColumn, SeqCategoryIdColumn};
pub use column::{CategoryColumn, CategoryColumnKind, FeatureColumn, FeatureColumnKind};
pub use cross::{CrossColumn, CrossKey};
pub use embedding::{Combiner, EmbeddingColumn, IndicatorColumn};
pub use error::{FeatureColumnError, Result};
pub use field_desc::{DataFormat, DataType, FieldDesc, FieldDescBuilder, NO_MAX_ID};
pub use numeric::NumericColumn;

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_crate_reexports() {
        let desc = FieldDesc::named("x");
        let _numeric = NumericColumn::new(desc.clone());
        let _id = CategoryIdColumn::new(desc.clone(), 2).unwrap();
        let _cross = CrossColumn::new(vec![CrossKey::from("x")], 2).unwrap();
        let _indicator = IndicatorColumn::new(None, "x");

        let _err: Result<()> = Ok(());
    }

    #[test]
    fn test_values_are_thread_safe() {
        assert_send_sync::<FieldDesc>();
        assert_send_sync::<FeatureColumnKind>();
        assert_send_sync::<CategoryColumnKind>();
    }

    #[test]
    fn test_integration_workflow() {
        // 1. Describe the raw field
        let desc = FieldDesc::builder("user_tags")
            .dtype(DataType::Int64)
            .format(DataFormat::Csv)
            .delimiter(",")
            .shape(vec![100])
            .sparse(true)
            .max_id(99)
            .build()
            .unwrap();

        // 2. Layer transforms over it
        let ids = CategoryIdColumn::new(desc.clone(), 100).unwrap();
        let emb: FeatureColumnKind = EmbeddingColumn::new(Some(ids.into()), "tags_emb")
            .with_dimension(8)
            .unwrap()
            .into();

        assert_eq!(emb.num_class(), Some(100));
        assert_eq!(emb.get_field_desc(), vec![desc.clone()]);

        // 3. Serialize and restore
        let restored = FeatureColumnKind::from_json(&emb.to_json().unwrap()).unwrap();
        assert_eq!(restored, emb);
    }
}
