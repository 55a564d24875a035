//! Crossed categorical columns.
//!
//! A [`CrossColumn`] hashes the combination of several keys into
//! `hash_bucket_size` buckets. A key is either a resolved feature column or a
//! bare field name that has not been resolved yet.

use serde::{Deserialize, Serialize};

use crate::column::{CategoryColumn, FeatureColumn, FeatureColumnKind};
use crate::error::{FeatureColumnError, Result};
use crate::field_desc::FieldDesc;
use crate::hash::{bucket_of, stable_hash_all};

/// One key of a cross.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CrossKey {
    /// A field referenced only by name.
    Name(String),
    /// A resolved feature column.
    Column(FeatureColumnKind),
}

impl CrossKey {
    /// Returns the leaf field descriptors of this key.
    ///
    /// A name key yields a single [`FieldDesc::named`] placeholder.
    pub fn get_field_desc(&self) -> Vec<FieldDesc> {
        match self {
            CrossKey::Name(name) => vec![FieldDesc::named(name.clone())],
            CrossKey::Column(column) => column.get_field_desc(),
        }
    }
}

impl From<&str> for CrossKey {
    fn from(name: &str) -> Self {
        CrossKey::Name(name.to_string())
    }
}

impl From<String> for CrossKey {
    fn from(name: String) -> Self {
        CrossKey::Name(name)
    }
}

impl From<FeatureColumnKind> for CrossKey {
    fn from(column: FeatureColumnKind) -> Self {
        CrossKey::Column(column)
    }
}

/// A hashed cross of several categorical keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CrossColumnRecord", into = "CrossColumnRecord")]
pub struct CrossColumn {
    keys: Vec<CrossKey>,
    hash_bucket_size: usize,
}

impl CrossColumn {
    /// Creates a cross column.
    ///
    /// At least one key is required, name keys must be non-empty and
    /// `hash_bucket_size` must be greater than 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use feature_column::{CrossColumn, CrossKey, FeatureColumn, FieldDesc, NumericColumn};
    ///
    /// let column = CrossColumn::new(
    ///     vec![
    ///         CrossKey::Column(NumericColumn::new(FieldDesc::named("age")).into()),
    ///         CrossKey::from("city"),
    ///     ],
    ///     1024,
    /// )
    /// .unwrap();
    /// assert_eq!(column.num_class(), Some(1024));
    /// assert_eq!(column.get_field_desc()[1].name(), "city");
    /// ```
    pub fn new(keys: Vec<CrossKey>, hash_bucket_size: usize) -> Result<Self> {
        if keys.is_empty() {
            return Err(FeatureColumnError::EmptyCrossKeys);
        }
        if keys.iter().any(|k| matches!(k, CrossKey::Name(n) if n.is_empty())) {
            return Err(FeatureColumnError::EmptyName);
        }
        if hash_bucket_size == 0 {
            return Err(FeatureColumnError::InvalidBucketSize {
                column: "CrossColumn",
            });
        }
        Ok(Self {
            keys,
            hash_bucket_size,
        })
    }

    /// Returns the keys in cross order.
    #[inline]
    pub fn keys(&self) -> &[CrossKey] {
        &self.keys
    }

    /// Returns the number of hash buckets.
    #[inline]
    pub fn hash_bucket_size(&self) -> usize {
        self.hash_bucket_size
    }

    /// Returns the crossed category id of one value per key.
    ///
    /// Returns `None` when `values` does not have one entry per key.
    pub fn cross_id<S: AsRef<str>>(&self, values: &[S]) -> Option<usize> {
        if values.len() != self.keys.len() {
            return None;
        }
        Some(bucket_of(stable_hash_all(values), self.hash_bucket_size))
    }
}

impl FeatureColumn for CrossColumn {
    fn num_class(&self) -> Option<usize> {
        Some(self.hash_bucket_size)
    }

    fn get_field_desc(&self) -> Vec<FieldDesc> {
        self.keys.iter().flat_map(CrossKey::get_field_desc).collect()
    }

    /// Rebinds every resolved key that depends on a field named like `desc`.
    ///
    /// Name keys and keys over other fields are kept as they are.
    fn new_feature_column_from(&self, desc: &FieldDesc) -> Self {
        let keys = self
            .keys
            .iter()
            .map(|key| match key {
                CrossKey::Column(column)
                    if column
                        .get_field_desc()
                        .iter()
                        .any(|d| d.name() == desc.name()) =>
                {
                    CrossKey::Column(column.new_feature_column_from(desc))
                }
                other => other.clone(),
            })
            .collect();

        Self {
            keys,
            hash_bucket_size: self.hash_bucket_size,
        }
    }
}

impl CategoryColumn for CrossColumn {}

#[derive(Debug, Serialize, Deserialize)]
struct CrossColumnRecord {
    keys: Vec<CrossKey>,
    hash_bucket_size: usize,
}

impl From<CrossColumn> for CrossColumnRecord {
    fn from(column: CrossColumn) -> Self {
        Self {
            keys: column.keys,
            hash_bucket_size: column.hash_bucket_size,
        }
    }
}

impl TryFrom<CrossColumnRecord> for CrossColumn {
    type Error = FeatureColumnError;

    fn try_from(record: CrossColumnRecord) -> Result<Self> {
        CrossColumn::new(record.keys, record.hash_bucket_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::CategoryIdColumn;
    use crate::field_desc::{DataFormat, DataType};
    use crate::numeric::NumericColumn;

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

    #[test]
    fn test_cross_column() {
        let desc = new_field_desc();
        let nc = NumericColumn::new(desc.clone());
        let hash_bucket_size = 1024;

        let cc = CrossColumn::new(
            vec![CrossKey::Column(nc.into()), CrossKey::from("cross_feature_2")],
            hash_bucket_size,
        )
        .unwrap();
        assert_eq!(cc.num_class(), Some(hash_bucket_size));

        let descs = cc.get_field_desc();
        assert_eq!(descs.len(), 2);
        assert_eq!(descs[0].to_json().unwrap(), desc.to_json().unwrap());
        assert_eq!(descs[1].name(), "cross_feature_2");
    }

    #[test]
    fn test_rejects_invalid_construction() {
        assert!(matches!(
            CrossColumn::new(vec![], 10),
            Err(FeatureColumnError::EmptyCrossKeys)
        ));
        assert!(matches!(
            CrossColumn::new(vec![CrossKey::from("a")], 0),
            Err(FeatureColumnError::InvalidBucketSize { .. })
        ));
        assert!(matches!(
            CrossColumn::new(vec![CrossKey::from("")], 10),
            Err(FeatureColumnError::EmptyName)
        ));
    }

    #[test]
    fn test_rebinding_matches_by_field_name() {
        let a = CategoryIdColumn::new(FieldDesc::named("a"), 10).unwrap();
        let b = CategoryIdColumn::new(FieldDesc::named("b"), 20).unwrap();
        let cc = CrossColumn::new(
            vec![
                CrossKey::Column(a.into()),
                CrossKey::Column(b.into()),
                CrossKey::from("c"),
            ],
            64,
        )
        .unwrap();

        let inferred = FieldDesc::builder("b").max_id(19).build().unwrap();
        let rebound = cc.new_feature_column_from(&inferred);

        assert_eq!(rebound.hash_bucket_size(), 64);
        let descs = rebound.get_field_desc();
        assert_eq!(descs[0], FieldDesc::named("a"));
        assert_eq!(descs[1].max_id(), 19);
        assert_eq!(descs[2], FieldDesc::named("c"));
        assert_eq!(rebound.keys()[1].get_field_desc()[0], inferred);
    }

    #[test]
    fn test_cross_id() {
        let cc = CrossColumn::new(vec![CrossKey::from("a"), CrossKey::from("b")], 100).unwrap();
        let id = cc.cross_id(&["x", "y"]).unwrap();
        assert!(id < 100);
        assert_eq!(cc.cross_id(&["x", "y"]), Some(id));
        assert_eq!(cc.cross_id(&["x"]), None);
    }

    #[test]
    fn test_json_keys_untagged() {
        let cc = CrossColumn::new(
            vec![
                CrossKey::Column(NumericColumn::new(FieldDesc::named("a")).into()),
                CrossKey::from("b"),
            ],
            8,
        )
        .unwrap();
        let value = serde_json::to_value(&cc).unwrap();
        assert_eq!(value["keys"][0]["type"], "numeric");
        assert_eq!(value["keys"][1], "b");

        let decoded: CrossColumn = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, cc);
    }
}
