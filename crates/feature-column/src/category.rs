//! Categorical columns over a single field.
//!
//! All three columns map a raw field into the integer range
//! `[0, bucket_size)` and differ only in how the id is obtained:
//!
//! - [`CategoryIdColumn`]: the input already is the id.
//! - [`CategoryHashColumn`]: the id is `stable_hash(value) % bucket_size`.
//! - [`SeqCategoryIdColumn`]: like `CategoryIdColumn`, but each input is a
//!   variable-length sequence of ids.

use serde::{Deserialize, Serialize};

use crate::column::{CategoryColumn, FeatureColumn};
use crate::error::{FeatureColumnError, Result};
use crate::field_desc::FieldDesc;
use crate::hash::{bucket_of, stable_hash};

/// Wire form shared by the single-field category columns.
#[derive(Debug, Serialize, Deserialize)]
struct CategoryColumnRecord {
    field_desc: FieldDesc,
    bucket_size: usize,
}

macro_rules! single_field_category_column {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(try_from = "CategoryColumnRecord", into = "CategoryColumnRecord")]
        pub struct $name {
            field_desc: FieldDesc,
            bucket_size: usize,
        }

        impl $name {
            /// Creates the column. `bucket_size` must be greater than 0.
            pub fn new(field_desc: FieldDesc, bucket_size: usize) -> Result<Self> {
                if bucket_size == 0 {
                    return Err(FeatureColumnError::InvalidBucketSize {
                        column: stringify!($name),
                    });
                }
                Ok(Self {
                    field_desc,
                    bucket_size,
                })
            }

            /// Returns the wrapped field descriptor.
            #[inline]
            pub fn field_desc(&self) -> &FieldDesc {
                &self.field_desc
            }

            /// Returns the size of the category space.
            #[inline]
            pub fn bucket_size(&self) -> usize {
                self.bucket_size
            }
        }

        impl FeatureColumn for $name {
            fn num_class(&self) -> Option<usize> {
                Some(self.bucket_size)
            }

            fn get_field_desc(&self) -> Vec<FieldDesc> {
                vec![self.field_desc.clone()]
            }

            fn new_feature_column_from(&self, desc: &FieldDesc) -> Self {
                Self {
                    field_desc: desc.clone(),
                    bucket_size: self.bucket_size,
                }
            }
        }

        impl CategoryColumn for $name {}

        impl From<$name> for CategoryColumnRecord {
            fn from(column: $name) -> Self {
                Self {
                    field_desc: column.field_desc,
                    bucket_size: column.bucket_size,
                }
            }
        }

        impl TryFrom<CategoryColumnRecord> for $name {
            type Error = FeatureColumnError;

            fn try_from(record: CategoryColumnRecord) -> Result<Self> {
                $name::new(record.field_desc, record.bucket_size)
            }
        }
    };
}

single_field_category_column!(
    /// A field whose values are integer category ids.
    CategoryIdColumn
);

single_field_category_column!(
    /// A field whose values are hashed into `bucket_size` categories.
    CategoryHashColumn
);

single_field_category_column!(
    /// A field whose values are variable-length sequences of category ids.
    SeqCategoryIdColumn
);

impl CategoryIdColumn {
    /// Returns the category id of `value`. Out-of-range ids are not clamped.
    #[inline]
    pub fn category_id(&self, value: i64) -> i64 {
        value
    }
}

impl CategoryHashColumn {
    /// Returns the category id of `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use feature_column::{CategoryHashColumn, FieldDesc};
    ///
    /// let column = CategoryHashColumn::new(FieldDesc::named("city"), 4096).unwrap();
    /// assert!(column.category_id("beijing") < 4096);
    /// assert_eq!(column.category_id("beijing"), column.category_id("beijing"));
    /// ```
    pub fn category_id(&self, value: &str) -> usize {
        bucket_of(stable_hash(value), self.bucket_size)
    }
}

impl SeqCategoryIdColumn {
    /// Returns the category ids of one sequence, unchanged.
    pub fn category_ids(&self, values: &[i64]) -> Vec<i64> {
        values.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_desc::{DataFormat, DataType};

    fn new_field_desc() -> FieldDesc {
        FieldDesc::builder("my_feature")
            .dtype(DataType::Float32)
            .delimiter(",")
            .format(DataFormat::Csv)
            .shape(vec![10])
            .sparse(true)
            .vocabulary(["a", "b", "c"])
            .build()
            .unwrap()
    }

    fn check_category_column<C: FeatureColumn>(cc: &C, desc: &FieldDesc, bucket_size: usize) {
        assert_eq!(cc.num_class(), Some(bucket_size));
        let descs = cc.get_field_desc();
        assert_eq!(descs.len(), 1);
        assert_eq!(descs[0].to_json().unwrap(), desc.to_json().unwrap());
    }

    #[test]
    fn test_category_columns() {
        let desc = new_field_desc();
        let bucket_size = 13;

        let cc = CategoryIdColumn::new(desc.clone(), bucket_size).unwrap();
        check_category_column(&cc, &desc, bucket_size);
        let cc: CategoryIdColumn = cc.new_feature_column_from(&desc);
        check_category_column(&cc, &desc, bucket_size);

        let cc = CategoryHashColumn::new(desc.clone(), bucket_size).unwrap();
        check_category_column(&cc, &desc, bucket_size);
        let cc: CategoryHashColumn = cc.new_feature_column_from(&desc);
        check_category_column(&cc, &desc, bucket_size);

        let cc = SeqCategoryIdColumn::new(desc.clone(), bucket_size).unwrap();
        check_category_column(&cc, &desc, bucket_size);
        let cc: SeqCategoryIdColumn = cc.new_feature_column_from(&desc);
        check_category_column(&cc, &desc, bucket_size);
    }

    #[test]
    fn test_rejects_zero_bucket_size() {
        let result = CategoryHashColumn::new(new_field_desc(), 0);
        match result {
            Err(FeatureColumnError::InvalidBucketSize { column }) => {
                assert_eq!(column, "CategoryHashColumn");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(CategoryIdColumn::new(new_field_desc(), 0).is_err());
        assert!(SeqCategoryIdColumn::new(new_field_desc(), 0).is_err());
    }

    #[test]
    fn test_category_ids() {
        let desc = new_field_desc();

        let id = CategoryIdColumn::new(desc.clone(), 13).unwrap();
        assert_eq!(id.category_id(7), 7);
        assert_eq!(id.category_id(42), 42);

        let hash = CategoryHashColumn::new(desc.clone(), 13).unwrap();
        assert_eq!(hash.category_id("a"), (177_670u64 % 13) as usize);

        let seq = SeqCategoryIdColumn::new(desc, 13).unwrap();
        assert_eq!(seq.category_ids(&[3, 1, 4]), vec![3, 1, 4]);
    }

    #[test]
    fn test_rebinding_keeps_bucket_size() {
        let cc = CategoryHashColumn::new(FieldDesc::named("a"), 4096).unwrap();
        let rebound = cc.new_feature_column_from(&FieldDesc::named("b"));
        assert_eq!(rebound.bucket_size(), 4096);
        assert_eq!(rebound.field_desc().name(), "b");
        assert_eq!(cc.field_desc().name(), "a");
    }
}
