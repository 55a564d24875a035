//! Raw field descriptors.
//!
//! A [`FieldDesc`] describes one column of a query result before any feature
//! transform is applied: its logical type, how multi-value cells are encoded,
//! its shape and, for categorical fields, the known vocabulary.
//!
//! # JSON record
//!
//! The serialized form is a flat object with exactly the keys `name`, `dtype`,
//! `delimiter`, `format`, `shape`, `is_sparse`, `vocabulary` and `max_id`.
//! Decoding goes through the same validation as [`FieldDescBuilder::build`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{FeatureColumnError, Result};

/// Logical data type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit signed integers.
    #[default]
    #[serde(rename = "INT64")]
    Int64,

    /// 32-bit floats.
    #[serde(rename = "FLOAT32")]
    Float32,

    /// UTF-8 strings.
    #[serde(rename = "STRING")]
    String,
}

impl DataType {
    /// Returns whether values of this type are numbers.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float32)
    }
}

/// Encoding of a single cell of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataFormat {
    /// One scalar value per cell.
    #[default]
    #[serde(rename = "")]
    Plain,

    /// Delimiter-separated list of values, e.g. `"1,2,3"`.
    #[serde(rename = "csv")]
    Csv,

    /// Delimiter-separated list of `id:value` pairs, e.g. `"3:0.5,7:1.0"`.
    #[serde(rename = "kv")]
    Kv,
}

/// Sentinel stored in `max_id` when the field carries no category ids.
pub const NO_MAX_ID: i64 = 0;

/// Describes one raw input field.
///
/// Field descriptors are immutable once built. Use [`FieldDesc::builder`] for
/// validated construction or [`FieldDesc::named`] for the name-only
/// placeholder that stands in for a field not yet inferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FieldDescRecord", into = "FieldDescRecord")]
pub struct FieldDesc {
    name: String,
    dtype: DataType,
    delimiter: String,
    format: DataFormat,
    shape: Vec<usize>,
    is_sparse: bool,
    vocabulary: BTreeSet<String>,
    max_id: i64,
}

impl FieldDesc {
    /// Creates a builder for a field with the given name.
    ///
    /// # Examples
    ///
    /// ```
    /// use feature_column::{DataFormat, DataType, FieldDesc};
    ///
    /// let desc = FieldDesc::builder("tags")
    ///     .dtype(DataType::Int64)
    ///     .format(DataFormat::Csv)
    ///     .delimiter(",")
    ///     .shape(vec![4])
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(desc.shape(), &[4]);
    /// ```
    pub fn builder(name: impl Into<String>) -> FieldDescBuilder {
        FieldDescBuilder::new(name)
    }

    /// Creates a descriptor carrying only a name.
    ///
    /// Every other attribute is left at its default. The name is not
    /// validated here; callers that accept user input should go through
    /// [`FieldDesc::builder`].
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dtype: DataType::default(),
            delimiter: String::new(),
            format: DataFormat::default(),
            shape: Vec::new(),
            is_sparse: false,
            vocabulary: BTreeSet::new(),
            max_id: NO_MAX_ID,
        }
    }

    /// Returns the field name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the logical data type.
    #[inline]
    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// Returns the delimiter used by multi-value formats.
    #[inline]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Returns the cell format.
    #[inline]
    pub fn format(&self) -> DataFormat {
        self.format
    }

    /// Returns the dense shape of one value.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns whether the field holds sparse ids.
    #[inline]
    pub fn is_sparse(&self) -> bool {
        self.is_sparse
    }

    /// Returns the known categorical values.
    #[inline]
    pub fn vocabulary(&self) -> &BTreeSet<String> {
        &self.vocabulary
    }

    /// Returns the largest category id, or [`NO_MAX_ID`].
    #[inline]
    pub fn max_id(&self) -> i64 {
        self.max_id
    }

    /// Returns a builder pre-populated with this descriptor's attributes.
    pub fn to_builder(&self) -> FieldDescBuilder {
        FieldDescBuilder {
            name: self.name.clone(),
            dtype: self.dtype,
            delimiter: self.delimiter.clone(),
            format: self.format,
            shape: self.shape.clone(),
            is_sparse: self.is_sparse,
            vocabulary: self.vocabulary.iter().cloned().collect(),
            max_id: self.max_id,
        }
    }

    /// Encodes this descriptor as a JSON record.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a descriptor from a JSON record.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builder for [`FieldDesc`].
#[derive(Debug, Clone)]
pub struct FieldDescBuilder {
    name: String,
    dtype: DataType,
    delimiter: String,
    format: DataFormat,
    shape: Vec<usize>,
    is_sparse: bool,
    vocabulary: Vec<String>,
    max_id: i64,
}

impl FieldDescBuilder {
    /// Creates a new builder with default attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dtype: DataType::default(),
            delimiter: String::new(),
            format: DataFormat::default(),
            shape: Vec::new(),
            is_sparse: false,
            vocabulary: Vec::new(),
            max_id: NO_MAX_ID,
        }
    }

    /// Sets the data type.
    pub fn dtype(mut self, dtype: DataType) -> Self {
        self.dtype = dtype;
        self
    }

    /// Sets the multi-value delimiter.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Sets the cell format.
    pub fn format(mut self, format: DataFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the shape.
    pub fn shape(mut self, shape: Vec<usize>) -> Self {
        self.shape = shape;
        self
    }

    /// Marks the field as sparse.
    pub fn sparse(mut self, is_sparse: bool) -> Self {
        self.is_sparse = is_sparse;
        self
    }

    /// Sets the vocabulary. Entries must be unique.
    pub fn vocabulary<I, S>(mut self, vocabulary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vocabulary = vocabulary.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the largest category id.
    pub fn max_id(mut self, max_id: i64) -> Self {
        self.max_id = max_id;
        self
    }

    /// Builds the descriptor, validating it first.
    pub fn build(self) -> Result<FieldDesc> {
        if self.name.is_empty() {
            return Err(FeatureColumnError::EmptyName);
        }

        let mut vocabulary = BTreeSet::new();
        for entry in self.vocabulary {
            if vocabulary.contains(&entry) {
                return Err(FeatureColumnError::DuplicateVocabulary {
                    field: self.name,
                    entry,
                });
            }
            vocabulary.insert(entry);
        }

        Ok(FieldDesc {
            name: self.name,
            dtype: self.dtype,
            delimiter: self.delimiter,
            format: self.format,
            shape: self.shape,
            is_sparse: self.is_sparse,
            vocabulary,
            max_id: self.max_id,
        })
    }
}

/// Wire form of [`FieldDesc`].
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDescRecord {
    name: String,
    dtype: DataType,
    delimiter: String,
    format: DataFormat,
    shape: Vec<usize>,
    is_sparse: bool,
    vocabulary: Vec<String>,
    max_id: i64,
}

impl From<FieldDesc> for FieldDescRecord {
    fn from(desc: FieldDesc) -> Self {
        Self {
            name: desc.name,
            dtype: desc.dtype,
            delimiter: desc.delimiter,
            format: desc.format,
            shape: desc.shape,
            is_sparse: desc.is_sparse,
            vocabulary: desc.vocabulary.into_iter().collect(),
            max_id: desc.max_id,
        }
    }
}

impl TryFrom<FieldDescRecord> for FieldDesc {
    type Error = FeatureColumnError;

    fn try_from(record: FieldDescRecord) -> Result<Self> {
        FieldDescBuilder::new(record.name)
            .dtype(record.dtype)
            .delimiter(record.delimiter)
            .format(record.format)
            .shape(record.shape)
            .sparse(record.is_sparse)
            .vocabulary(record.vocabulary)
            .max_id(record.max_id)
            .build()
    }
}
