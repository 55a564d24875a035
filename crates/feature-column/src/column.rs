//! The feature-column capability and the closed set of column variants.
//!
//! # Overview
//!
//! - [`FeatureColumn`]: the capability every column provides.
//! - [`CategoryColumn`]: marker for columns that produce category ids.
//! - [`FeatureColumnKind`]: any feature column, as a tagged variant.
//! - [`CategoryColumnKind`]: any categorical column, as a tagged variant.
//!
//! Both enums serialize to JSON objects with an internal `"type"` tag, e.g.
//! `{"type": "category_hash", "field_desc": {...}, "bucket_size": 4096}`.

use serde::{Deserialize, Serialize};

use crate::bucket::BucketColumn;
use crate::category::{CategoryHashColumn, CategoryIdColumn, SeqCategoryIdColumn};
use crate::cross::CrossColumn;
use crate::embedding::{EmbeddingColumn, IndicatorColumn};
use crate::error::Result;
use crate::field_desc::FieldDesc;
use crate::numeric::NumericColumn;

/// A trait for feature columns.
///
/// A feature column describes how one or more raw fields become a model
/// input. Columns are immutable; rebinding to another field produces a new
/// column.
pub trait FeatureColumn {
    /// Returns the size of the output categorical space.
    ///
    /// Numeric columns report `Some(1)`. `None` means the size is not known
    /// yet, which happens for embedding and indicator columns whose category
    /// column has not been resolved.
    fn num_class(&self) -> Option<usize>;

    /// Returns the leaf field descriptors this column depends on, in order.
    fn get_field_desc(&self) -> Vec<FieldDesc>;

    /// Returns a column of the same kind and parameters bound to `desc`.
    fn new_feature_column_from(&self, desc: &FieldDesc) -> Self
    where
        Self: Sized;
}

/// Marker for columns that map their input into a fixed category space.
pub trait CategoryColumn: FeatureColumn {}

/// Any categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CategoryColumnKind {
    /// Integer-coded categories.
    CategoryId(CategoryIdColumn),
    /// Hashed categories.
    CategoryHash(CategoryHashColumn),
    /// Variable-length sequences of integer-coded categories.
    SeqCategoryId(SeqCategoryIdColumn),
    /// Hashed cross of several keys.
    Cross(CrossColumn),
}

impl CategoryColumnKind {
    /// Returns the variant name, for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CategoryColumnKind::CategoryId(_) => "category_id",
            CategoryColumnKind::CategoryHash(_) => "category_hash",
            CategoryColumnKind::SeqCategoryId(_) => "seq_category_id",
            CategoryColumnKind::Cross(_) => "cross",
        }
    }
}

impl FeatureColumn for CategoryColumnKind {
    fn num_class(&self) -> Option<usize> {
        match self {
            CategoryColumnKind::CategoryId(c) => c.num_class(),
            CategoryColumnKind::CategoryHash(c) => c.num_class(),
            CategoryColumnKind::SeqCategoryId(c) => c.num_class(),
            CategoryColumnKind::Cross(c) => c.num_class(),
        }
    }

    fn get_field_desc(&self) -> Vec<FieldDesc> {
        match self {
            CategoryColumnKind::CategoryId(c) => c.get_field_desc(),
            CategoryColumnKind::CategoryHash(c) => c.get_field_desc(),
            CategoryColumnKind::SeqCategoryId(c) => c.get_field_desc(),
            CategoryColumnKind::Cross(c) => c.get_field_desc(),
        }
    }

    fn new_feature_column_from(&self, desc: &FieldDesc) -> Self {
        match self {
            CategoryColumnKind::CategoryId(c) => {
                CategoryColumnKind::CategoryId(c.new_feature_column_from(desc))
            }
            CategoryColumnKind::CategoryHash(c) => {
                CategoryColumnKind::CategoryHash(c.new_feature_column_from(desc))
            }
            CategoryColumnKind::SeqCategoryId(c) => {
                CategoryColumnKind::SeqCategoryId(c.new_feature_column_from(desc))
            }
            CategoryColumnKind::Cross(c) => {
                CategoryColumnKind::Cross(c.new_feature_column_from(desc))
            }
        }
    }
}

impl CategoryColumn for CategoryColumnKind {}

impl From<CategoryIdColumn> for CategoryColumnKind {
    fn from(column: CategoryIdColumn) -> Self {
        CategoryColumnKind::CategoryId(column)
    }
}

impl From<CategoryHashColumn> for CategoryColumnKind {
    fn from(column: CategoryHashColumn) -> Self {
        CategoryColumnKind::CategoryHash(column)
    }
}

impl From<SeqCategoryIdColumn> for CategoryColumnKind {
    fn from(column: SeqCategoryIdColumn) -> Self {
        CategoryColumnKind::SeqCategoryId(column)
    }
}

impl From<CrossColumn> for CategoryColumnKind {
    fn from(column: CrossColumn) -> Self {
        CategoryColumnKind::Cross(column)
    }
}

/// Any feature column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeatureColumnKind {
    /// A field used as-is.
    Numeric(NumericColumn),
    /// A numeric field split at boundaries.
    Bucket(BucketColumn),
    /// Integer-coded categories.
    CategoryId(CategoryIdColumn),
    /// Hashed categories.
    CategoryHash(CategoryHashColumn),
    /// Variable-length sequences of integer-coded categories.
    SeqCategoryId(SeqCategoryIdColumn),
    /// Hashed cross of several keys.
    Cross(CrossColumn),
    /// Dense embedding of a category column.
    Embedding(EmbeddingColumn),
    /// One-hot or multi-hot indicator of a category column.
    Indicator(IndicatorColumn),
}

impl FeatureColumnKind {
    /// Returns the variant name, for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FeatureColumnKind::Numeric(_) => "numeric",
            FeatureColumnKind::Bucket(_) => "bucket",
            FeatureColumnKind::CategoryId(_) => "category_id",
            FeatureColumnKind::CategoryHash(_) => "category_hash",
            FeatureColumnKind::SeqCategoryId(_) => "seq_category_id",
            FeatureColumnKind::Cross(_) => "cross",
            FeatureColumnKind::Embedding(_) => "embedding",
            FeatureColumnKind::Indicator(_) => "indicator",
        }
    }

    /// Returns whether this column also provides the category capability.
    pub fn is_category(&self) -> bool {
        self.as_category().is_some()
    }

    /// Returns this column as a categorical column, if it is one.
    pub fn as_category(&self) -> Option<CategoryColumnKind> {
        match self {
            FeatureColumnKind::CategoryId(c) => Some(c.clone().into()),
            FeatureColumnKind::CategoryHash(c) => Some(c.clone().into()),
            FeatureColumnKind::SeqCategoryId(c) => Some(c.clone().into()),
            FeatureColumnKind::Cross(c) => Some(c.clone().into()),
            _ => None,
        }
    }

    /// Encodes this column as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a column from JSON, re-applying construction checks.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FeatureColumn for FeatureColumnKind {
    fn num_class(&self) -> Option<usize> {
        match self {
            FeatureColumnKind::Numeric(c) => c.num_class(),
            FeatureColumnKind::Bucket(c) => c.num_class(),
            FeatureColumnKind::CategoryId(c) => c.num_class(),
            FeatureColumnKind::CategoryHash(c) => c.num_class(),
            FeatureColumnKind::SeqCategoryId(c) => c.num_class(),
            FeatureColumnKind::Cross(c) => c.num_class(),
            FeatureColumnKind::Embedding(c) => c.num_class(),
            FeatureColumnKind::Indicator(c) => c.num_class(),
        }
    }

    fn get_field_desc(&self) -> Vec<FieldDesc> {
        match self {
            FeatureColumnKind::Numeric(c) => c.get_field_desc(),
            FeatureColumnKind::Bucket(c) => c.get_field_desc(),
            FeatureColumnKind::CategoryId(c) => c.get_field_desc(),
            FeatureColumnKind::CategoryHash(c) => c.get_field_desc(),
            FeatureColumnKind::SeqCategoryId(c) => c.get_field_desc(),
            FeatureColumnKind::Cross(c) => c.get_field_desc(),
            FeatureColumnKind::Embedding(c) => c.get_field_desc(),
            FeatureColumnKind::Indicator(c) => c.get_field_desc(),
        }
    }

    fn new_feature_column_from(&self, desc: &FieldDesc) -> Self {
        match self {
            FeatureColumnKind::Numeric(c) => {
                FeatureColumnKind::Numeric(c.new_feature_column_from(desc))
            }
            FeatureColumnKind::Bucket(c) => {
                FeatureColumnKind::Bucket(c.new_feature_column_from(desc))
            }
            FeatureColumnKind::CategoryId(c) => {
                FeatureColumnKind::CategoryId(c.new_feature_column_from(desc))
            }
            FeatureColumnKind::CategoryHash(c) => {
                FeatureColumnKind::CategoryHash(c.new_feature_column_from(desc))
            }
            FeatureColumnKind::SeqCategoryId(c) => {
                FeatureColumnKind::SeqCategoryId(c.new_feature_column_from(desc))
            }
            FeatureColumnKind::Cross(c) => {
                FeatureColumnKind::Cross(c.new_feature_column_from(desc))
            }
            FeatureColumnKind::Embedding(c) => {
                FeatureColumnKind::Embedding(c.new_feature_column_from(desc))
            }
            FeatureColumnKind::Indicator(c) => {
                FeatureColumnKind::Indicator(c.new_feature_column_from(desc))
            }
        }
    }
}

impl From<CategoryColumnKind> for FeatureColumnKind {
    fn from(column: CategoryColumnKind) -> Self {
        match column {
            CategoryColumnKind::CategoryId(c) => FeatureColumnKind::CategoryId(c),
            CategoryColumnKind::CategoryHash(c) => FeatureColumnKind::CategoryHash(c),
            CategoryColumnKind::SeqCategoryId(c) => FeatureColumnKind::SeqCategoryId(c),
            CategoryColumnKind::Cross(c) => FeatureColumnKind::Cross(c),
        }
    }
}

impl From<NumericColumn> for FeatureColumnKind {
    fn from(column: NumericColumn) -> Self {
        FeatureColumnKind::Numeric(column)
    }
}

impl From<BucketColumn> for FeatureColumnKind {
    fn from(column: BucketColumn) -> Self {
        FeatureColumnKind::Bucket(column)
    }
}

impl From<CategoryIdColumn> for FeatureColumnKind {
    fn from(column: CategoryIdColumn) -> Self {
        FeatureColumnKind::CategoryId(column)
    }
}

impl From<CategoryHashColumn> for FeatureColumnKind {
    fn from(column: CategoryHashColumn) -> Self {
        FeatureColumnKind::CategoryHash(column)
    }
}

impl From<SeqCategoryIdColumn> for FeatureColumnKind {
    fn from(column: SeqCategoryIdColumn) -> Self {
        FeatureColumnKind::SeqCategoryId(column)
    }
}

impl From<CrossColumn> for FeatureColumnKind {
    fn from(column: CrossColumn) -> Self {
        FeatureColumnKind::Cross(column)
    }
}

impl From<EmbeddingColumn> for FeatureColumnKind {
    fn from(column: EmbeddingColumn) -> Self {
        FeatureColumnKind::Embedding(column)
    }
}

impl From<IndicatorColumn> for FeatureColumnKind {
    fn from(column: IndicatorColumn) -> Self {
        FeatureColumnKind::Indicator(column)
    }
}
