//! Embedding and indicator columns.
//!
//! Both are thin decorators over an optional [`CategoryColumnKind`]. The
//! category column may be absent when the categorical source is only known by
//! name and will be resolved later; that state is valid and every operation
//! still succeeds.

use serde::{Deserialize, Serialize};

use crate::column::{CategoryColumnKind, FeatureColumn};
use crate::error::{FeatureColumnError, Result};
use crate::field_desc::FieldDesc;

/// How an embedding column reduces multiple ids of one example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combiner {
    /// Sum of the looked-up vectors.
    #[default]
    Sum,
    /// Mean of the looked-up vectors.
    Mean,
    /// Sum scaled by the inverse square root of the id count.
    Sqrtn,
}

/// A dense embedding of a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EmbeddingColumnRecord", into = "EmbeddingColumnRecord")]
pub struct EmbeddingColumn {
    category_column: Option<CategoryColumnKind>,
    name: String,
    dimension: Option<usize>,
    combiner: Combiner,
}

impl EmbeddingColumn {
    /// Creates an embedding column.
    ///
    /// # Examples
    ///
    /// ```
    /// use feature_column::{CategoryHashColumn, EmbeddingColumn, FeatureColumn, FieldDesc};
    ///
    /// let hash = CategoryHashColumn::new(FieldDesc::named("city"), 4096).unwrap();
    /// let column = EmbeddingColumn::new(Some(hash.into()), "city_emb")
    ///     .with_dimension(8)
    ///     .unwrap();
    /// assert_eq!(column.num_class(), Some(4096));
    /// assert_eq!(column.dimension(), Some(8));
    /// ```
    pub fn new(category_column: Option<CategoryColumnKind>, name: impl Into<String>) -> Self {
        Self {
            category_column,
            name: name.into(),
            dimension: None,
            combiner: Combiner::default(),
        }
    }

    /// Sets the embedding dimension, which must be greater than 0.
    pub fn with_dimension(mut self, dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(FeatureColumnError::InvalidDimension { column: self.name });
        }
        self.dimension = Some(dimension);
        Ok(self)
    }

    /// Sets the combiner.
    pub fn with_combiner(mut self, combiner: Combiner) -> Self {
        self.combiner = combiner;
        self
    }

    /// Returns the wrapped category column, if resolved.
    #[inline]
    pub fn category_column(&self) -> Option<&CategoryColumnKind> {
        self.category_column.as_ref()
    }

    /// Returns the column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the embedding dimension, if set.
    #[inline]
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Returns the combiner.
    #[inline]
    pub fn combiner(&self) -> Combiner {
        self.combiner
    }

    /// Returns a copy with `category_column` replaced.
    pub fn with_category_column(&self, category_column: CategoryColumnKind) -> Self {
        Self {
            category_column: Some(category_column),
            ..self.clone()
        }
    }
}

impl FeatureColumn for EmbeddingColumn {
    fn num_class(&self) -> Option<usize> {
        self.category_column.as_ref().and_then(|c| c.num_class())
    }

    fn get_field_desc(&self) -> Vec<FieldDesc> {
        self.category_column
            .as_ref()
            .map(|c| c.get_field_desc())
            .unwrap_or_default()
    }

    fn new_feature_column_from(&self, desc: &FieldDesc) -> Self {
        Self {
            category_column: self
                .category_column
                .as_ref()
                .map(|c| c.new_feature_column_from(desc)),
            name: self.name.clone(),
            dimension: self.dimension,
            combiner: self.combiner,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct EmbeddingColumnRecord {
    category_column: Option<CategoryColumnKind>,
    name: String,
    dimension: Option<usize>,
    #[serde(default)]
    combiner: Combiner,
}

impl From<EmbeddingColumn> for EmbeddingColumnRecord {
    fn from(column: EmbeddingColumn) -> Self {
        Self {
            category_column: column.category_column,
            name: column.name,
            dimension: column.dimension,
            combiner: column.combiner,
        }
    }
}

impl TryFrom<EmbeddingColumnRecord> for EmbeddingColumn {
    type Error = FeatureColumnError;

    fn try_from(record: EmbeddingColumnRecord) -> Result<Self> {
        let column = EmbeddingColumn::new(record.category_column, record.name)
            .with_combiner(record.combiner);
        match record.dimension {
            Some(dimension) => column.with_dimension(dimension),
            None => Ok(column),
        }
    }
}

/// A one-hot or multi-hot indicator of a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorColumn {
    category_column: Option<CategoryColumnKind>,
    name: String,
}

impl IndicatorColumn {
    /// Creates an indicator column.
    pub fn new(category_column: Option<CategoryColumnKind>, name: impl Into<String>) -> Self {
        Self {
            category_column,
            name: name.into(),
        }
    }

    /// Returns the wrapped category column, if resolved.
    #[inline]
    pub fn category_column(&self) -> Option<&CategoryColumnKind> {
        self.category_column.as_ref()
    }

    /// Returns the column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy with `category_column` replaced.
    pub fn with_category_column(&self, category_column: CategoryColumnKind) -> Self {
        Self {
            category_column: Some(category_column),
            name: self.name.clone(),
        }
    }
}

impl FeatureColumn for IndicatorColumn {
    fn num_class(&self) -> Option<usize> {
        self.category_column.as_ref().and_then(|c| c.num_class())
    }

    fn get_field_desc(&self) -> Vec<FieldDesc> {
        self.category_column
            .as_ref()
            .map(|c| c.get_field_desc())
            .unwrap_or_default()
    }

    fn new_feature_column_from(&self, desc: &FieldDesc) -> Self {
        Self {
            category_column: self
                .category_column
                .as_ref()
                .map(|c| c.new_feature_column_from(desc)),
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryHashColumn, CategoryIdColumn};
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

    #[test]
    fn test_embedding_column() {
        let desc = new_field_desc();
        let category_column: CategoryColumnKind =
            CategoryHashColumn::new(desc.clone(), 4096).unwrap().into();

        let fc1 = EmbeddingColumn::new(Some(category_column), "");
        let descs = fc1.get_field_desc();
        assert_eq!(descs.len(), 1);
        assert_eq!(descs[0].to_json().unwrap(), desc.to_json().unwrap());

        let fc1 = fc1.new_feature_column_from(&desc);
        let descs = fc1.get_field_desc();
        assert_eq!(descs.len(), 1);
        assert_eq!(descs[0].to_json().unwrap(), desc.to_json().unwrap());
        assert!(matches!(
            fc1.category_column(),
            Some(CategoryColumnKind::CategoryHash(_))
        ));

        let fc2 = EmbeddingColumn::new(None, "my_category_column");
        assert!(fc2.get_field_desc().is_empty());
        assert_eq!(fc2.num_class(), None);
        let fc2 = fc2.new_feature_column_from(&desc);
        assert!(fc2.get_field_desc().is_empty());
        assert_eq!(fc2.name(), "my_category_column");
    }

    #[test]
    fn test_indicator_column() {
        let desc = new_field_desc();
        let category_column: CategoryColumnKind =
            CategoryHashColumn::new(desc.clone(), 4096).unwrap().into();

        let fc1 = IndicatorColumn::new(Some(category_column), "");
        assert_eq!(fc1.num_class(), Some(4096));
        let descs = fc1.get_field_desc();
        assert_eq!(descs.len(), 1);
        assert_eq!(descs[0].to_json().unwrap(), desc.to_json().unwrap());

        let fc1 = fc1.new_feature_column_from(&desc);
        assert_eq!(fc1.get_field_desc().len(), 1);

        let fc2 = IndicatorColumn::new(None, "my_category_column");
        assert!(fc2.get_field_desc().is_empty());
        let fc2 = fc2.new_feature_column_from(&desc);
        assert!(fc2.get_field_desc().is_empty());
        assert_eq!(fc2.name(), "my_category_column");
    }

    #[test]
    fn test_rebinding_preserves_embedding_parameters() {
        let cc = CategoryIdColumn::new(FieldDesc::named("a"), 10).unwrap();
        let column = EmbeddingColumn::new(Some(cc.into()), "a_emb")
            .with_dimension(16)
            .unwrap()
            .with_combiner(Combiner::Mean);

        let rebound = column.new_feature_column_from(&FieldDesc::named("b"));
        assert_eq!(rebound.name(), "a_emb");
        assert_eq!(rebound.dimension(), Some(16));
        assert_eq!(rebound.combiner(), Combiner::Mean);
        assert_eq!(rebound.num_class(), Some(10));
        assert_eq!(rebound.get_field_desc()[0].name(), "b");
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let result = EmbeddingColumn::new(None, "e").with_dimension(0);
        assert!(matches!(
            result,
            Err(FeatureColumnError::InvalidDimension { .. })
        ));
    }

    #[test]
    fn test_with_category_column_fills_absent_source() {
        let column = IndicatorColumn::new(None, "city");
        let cc = CategoryIdColumn::new(FieldDesc::named("city"), 3).unwrap();
        let filled = column.with_category_column(cc.into());
        assert_eq!(filled.num_class(), Some(3));
        assert_eq!(filled.name(), "city");
        assert!(column.category_column().is_none());
    }

    #[test]
    fn test_combiner_json() {
        assert_eq!(serde_json::to_string(&Combiner::Sqrtn).unwrap(), "\"sqrtn\"");
        let json = r#"{"category_column":null,"name":"e","dimension":4}"#;
        let column: EmbeddingColumn = serde_json::from_str(json).unwrap();
        assert_eq!(column.combiner(), Combiner::Sum);
        assert_eq!(column.dimension(), Some(4));
    }
}
