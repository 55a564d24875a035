//! Bucketized numeric columns.
//!
//! A [`BucketColumn`] discretizes a numeric column into `boundaries.len() + 1`
//! ordinal bins. The bin of a value is the number of boundaries that are less
//! than or equal to it, so values below the first boundary land in bin 0 and
//! values at or above the last boundary land in the last bin.

use serde::{Deserialize, Serialize};

use crate::column::FeatureColumn;
use crate::error::{FeatureColumnError, Result};
use crate::field_desc::FieldDesc;
use crate::numeric::NumericColumn;

/// A numeric column discretized by sorted boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BucketColumnRecord", into = "BucketColumnRecord")]
pub struct BucketColumn {
    source_column: NumericColumn,
    boundaries: Vec<f64>,
}

impl BucketColumn {
    /// Creates a bucket column.
    ///
    /// `boundaries` must be non-empty, finite and strictly ascending.
    ///
    /// # Examples
    ///
    /// ```
    /// use feature_column::{BucketColumn, FeatureColumn, FieldDesc, NumericColumn};
    ///
    /// let source = NumericColumn::new(FieldDesc::named("price"));
    /// let column = BucketColumn::new(source, vec![-10.5, 20.0]).unwrap();
    /// assert_eq!(column.num_class(), Some(3));
    /// assert_eq!(column.bucketize(0.0), 1);
    /// ```
    pub fn new(source_column: NumericColumn, boundaries: Vec<f64>) -> Result<Self> {
        validate_boundaries(&boundaries)?;
        Ok(Self {
            source_column,
            boundaries,
        })
    }

    /// Returns the wrapped numeric column.
    #[inline]
    pub fn source_column(&self) -> &NumericColumn {
        &self.source_column
    }

    /// Returns the bucket boundaries.
    #[inline]
    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Returns the bin index of `value`.
    ///
    /// NaN compares false against every boundary and lands in bin 0.
    pub fn bucketize(&self, value: f64) -> usize {
        self.boundaries.partition_point(|&boundary| boundary <= value)
    }
}

impl FeatureColumn for BucketColumn {
    fn num_class(&self) -> Option<usize> {
        Some(self.boundaries.len() + 1)
    }

    fn get_field_desc(&self) -> Vec<FieldDesc> {
        self.source_column.get_field_desc()
    }

    fn new_feature_column_from(&self, desc: &FieldDesc) -> Self {
        // Boundaries were validated when `self` was built.
        Self {
            source_column: NumericColumn::new(desc.clone()),
            boundaries: self.boundaries.clone(),
        }
    }
}

fn validate_boundaries(boundaries: &[f64]) -> Result<()> {
    if boundaries.is_empty() {
        return Err(FeatureColumnError::InvalidBoundaries {
            message: "at least one boundary is required".to_string(),
        });
    }

    if let Some(bad) = boundaries.iter().find(|b| !b.is_finite()) {
        return Err(FeatureColumnError::InvalidBoundaries {
            message: format!("boundary {} is not finite", bad),
        });
    }

    for pair in boundaries.windows(2) {
        if pair[0] >= pair[1] {
            return Err(FeatureColumnError::InvalidBoundaries {
                message: format!(
                    "boundaries must be strictly ascending, found {} before {}",
                    pair[0], pair[1]
                ),
            });
        }
    }

    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
struct BucketColumnRecord {
    source_column: NumericColumn,
    boundaries: Vec<f64>,
}

impl From<BucketColumn> for BucketColumnRecord {
    fn from(column: BucketColumn) -> Self {
        Self {
            source_column: column.source_column,
            boundaries: column.boundaries,
        }
    }
}

impl TryFrom<BucketColumnRecord> for BucketColumn {
    type Error = FeatureColumnError;

    fn try_from(record: BucketColumnRecord) -> Result<Self> {
        BucketColumn::new(record.source_column, record.boundaries)
    }
}
