//! Untransformed numeric columns.

use serde::{Deserialize, Serialize};

use crate::column::FeatureColumn;
use crate::field_desc::FieldDesc;

/// A numeric field fed to the model as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericColumn {
    field_desc: FieldDesc,
}

impl NumericColumn {
    /// Creates a numeric column over `field_desc`.
    ///
    /// # Examples
    ///
    /// ```
    /// use feature_column::{FeatureColumn, FieldDesc, NumericColumn};
    ///
    /// let column = NumericColumn::new(FieldDesc::named("age"));
    /// assert_eq!(column.num_class(), Some(1));
    /// ```
    pub fn new(field_desc: FieldDesc) -> Self {
        Self { field_desc }
    }

    /// Returns the wrapped field descriptor.
    #[inline]
    pub fn field_desc(&self) -> &FieldDesc {
        &self.field_desc
    }
}

impl FeatureColumn for NumericColumn {
    fn num_class(&self) -> Option<usize> {
        Some(1)
    }

    fn get_field_desc(&self) -> Vec<FieldDesc> {
        vec![self.field_desc.clone()]
    }

    fn new_feature_column_from(&self, desc: &FieldDesc) -> Self {
        Self::new(desc.clone())
    }
}
