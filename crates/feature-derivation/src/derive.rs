//! Completing a feature-column list from inferred field descriptors.

use std::collections::{HashMap, HashSet};

use feature_column::{
    CategoryColumnKind, CategoryHashColumn, CategoryIdColumn, CrossColumn, CrossKey, DataType,
    FeatureColumn, FeatureColumnKind, FieldDesc, IndicatorColumn, NumericColumn,
};

use crate::config::DerivationConfig;
use crate::error::{DerivationError, Result};

/// The outcome of [`derive_feature_columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedColumns {
    /// Declared columns rebound to inferred fields, followed by default
    /// columns for the remaining fields.
    pub features: Vec<FeatureColumnKind>,
    /// The label's descriptor, when a label was requested.
    pub label: Option<FieldDesc>,
}

/// Rebinds `declared` to `descs` and adds default columns for every field
/// that no declared column uses, except `label`.
///
/// # Examples
///
/// ```
/// use feature_column::{FeatureColumn, FeatureColumnKind, FieldDesc, IndicatorColumn};
/// use feature_derivation::{derive_feature_columns, DerivationConfig};
///
/// let descs = vec![
///     FieldDesc::builder("city").dtype(feature_column::DataType::String)
///         .vocabulary(["a", "b"]).build().unwrap(),
///     FieldDesc::builder("age").build().unwrap(),
///     FieldDesc::builder("clicked").build().unwrap(),
/// ];
/// let declared: Vec<FeatureColumnKind> = vec![IndicatorColumn::new(None, "city").into()];
///
/// let derived =
///     derive_feature_columns(&declared, &descs, Some("clicked"), &DerivationConfig::default())
///         .unwrap();
/// assert_eq!(derived.features.len(), 2);
/// assert_eq!(derived.features[0].num_class(), Some(2));
/// assert!(matches!(derived.features[1], FeatureColumnKind::Numeric(_)));
/// assert_eq!(derived.label.unwrap().name(), "clicked");
/// ```
pub fn derive_feature_columns(
    declared: &[FeatureColumnKind],
    descs: &[FieldDesc],
    label: Option<&str>,
    config: &DerivationConfig,
) -> Result<DerivedColumns> {
    config.validate()?;

    let index: HashMap<&str, &FieldDesc> = descs.iter().map(|d| (d.name(), d)).collect();
    let mut used: HashSet<String> = HashSet::new();
    let mut features = Vec::with_capacity(descs.len());

    for column in declared {
        let resolved = resolve_column(column, &index, config)?;
        let fields: Vec<String> = resolved
            .get_field_desc()
            .iter()
            .map(|d| d.name().to_string())
            .collect();
        used.extend(fields.iter().cloned());
        tracing::debug!(
            column = resolved.kind_name(),
            fields = ?fields,
            "Rebound declared column"
        );
        features.push(resolved);
    }

    let label = match label {
        Some(name) => Some(
            index
                .get(name)
                .map(|d| (*d).clone())
                .ok_or_else(|| DerivationError::UnknownLabel {
                    label: name.to_string(),
                })?,
        ),
        None => None,
    };

    let mut defaults = 0;
    for desc in descs {
        let is_label = label.as_ref().map_or(false, |l| l.name() == desc.name());
        if is_label || used.contains(desc.name()) {
            continue;
        }
        let column = default_column(desc, config)?;
        tracing::debug!(
            field = desc.name(),
            column = column.kind_name(),
            "Added default column"
        );
        features.push(column);
        defaults += 1;
    }

    tracing::info!(
        declared = declared.len(),
        defaults,
        label = label.as_ref().map(|l| l.name()).unwrap_or(""),
        "Feature derivation finished"
    );

    Ok(DerivedColumns { features, label })
}

fn lookup<'a>(
    index: &HashMap<&str, &'a FieldDesc>,
    column: &'static str,
    field: &str,
) -> Result<&'a FieldDesc> {
    index
        .get(field)
        .copied()
        .ok_or_else(|| DerivationError::UnknownField {
            column,
            field: field.to_string(),
        })
}

fn resolve_column(
    column: &FeatureColumnKind,
    index: &HashMap<&str, &FieldDesc>,
    config: &DerivationConfig,
) -> Result<FeatureColumnKind> {
    let resolved: FeatureColumnKind = match column {
        FeatureColumnKind::Cross(c) => resolve_cross(c, index, config)?.into(),
        FeatureColumnKind::Embedding(c) => {
            let category =
                resolve_category(column.kind_name(), c.category_column(), c.name(), index, config)?;
            c.with_category_column(category).into()
        }
        FeatureColumnKind::Indicator(c) => {
            let category =
                resolve_category(column.kind_name(), c.category_column(), c.name(), index, config)?;
            c.with_category_column(category).into()
        }
        other => {
            let mut resolved = other.clone();
            for field in other.get_field_desc() {
                let desc = lookup(index, other.kind_name(), field.name())?;
                resolved = resolved.new_feature_column_from(desc);
            }
            resolved
        }
    };
    Ok(resolved)
}

/// Resolves the category column under an embedding or indicator column.
///
/// A missing category column is built from the field named `name`.
fn resolve_category(
    kind: &'static str,
    category: Option<&CategoryColumnKind>,
    name: &str,
    index: &HashMap<&str, &FieldDesc>,
    config: &DerivationConfig,
) -> Result<CategoryColumnKind> {
    match category {
        None => default_category_column(lookup(index, kind, name)?, config),
        Some(CategoryColumnKind::Cross(c)) => Ok(resolve_cross(c, index, config)?.into()),
        Some(other) => {
            let mut resolved = other.clone();
            for field in other.get_field_desc() {
                let desc = lookup(index, other.kind_name(), field.name())?;
                resolved = resolved.new_feature_column_from(desc);
            }
            Ok(resolved)
        }
    }
}

/// Resolves every key of a cross. Name keys become the default column of
/// their field.
fn resolve_cross(
    column: &CrossColumn,
    index: &HashMap<&str, &FieldDesc>,
    config: &DerivationConfig,
) -> Result<CrossColumn> {
    let keys = column
        .keys()
        .iter()
        .map(|key| -> Result<CrossKey> {
            let resolved = match key {
                CrossKey::Name(name) => cross_key_column(lookup(index, "cross", name)?, config)?,
                CrossKey::Column(c) => resolve_column(c, index, config)?,
            };
            Ok(CrossKey::Column(resolved))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CrossColumn::new(keys, column.hash_bucket_size())?)
}

/// Column a named cross key is read through: dense floats are crossed by
/// value, everything else by category.
fn cross_key_column(desc: &FieldDesc, config: &DerivationConfig) -> Result<FeatureColumnKind> {
    if desc.dtype() == DataType::Float32 && !desc.is_sparse() {
        return Ok(NumericColumn::new(desc.clone()).into());
    }
    Ok(default_category_column(desc, config)?.into())
}

fn id_bucket_size(desc: &FieldDesc) -> usize {
    desc.max_id().max(0) as usize + 1
}

/// Picks the category column a bare field is read through.
fn default_category_column(
    desc: &FieldDesc,
    config: &DerivationConfig,
) -> Result<CategoryColumnKind> {
    let column: CategoryColumnKind = match desc.dtype() {
        DataType::String if desc.vocabulary().is_empty() => {
            CategoryHashColumn::new(desc.clone(), config.max_vocabulary_size)?.into()
        }
        DataType::String => CategoryIdColumn::new(desc.clone(), desc.vocabulary().len())?.into(),
        DataType::Float32 if !desc.is_sparse() => {
            return Err(DerivationError::UninferableField {
                field: desc.name().to_string(),
                message: "dense float values cannot be read as categories".to_string(),
            });
        }
        DataType::Int64 | DataType::Float32 => {
            CategoryIdColumn::new(desc.clone(), id_bucket_size(desc))?.into()
        }
    };
    Ok(column)
}

fn default_column(desc: &FieldDesc, config: &DerivationConfig) -> Result<FeatureColumnKind> {
    let column: FeatureColumnKind = match desc.dtype() {
        DataType::String => {
            IndicatorColumn::new(Some(default_category_column(desc, config)?), desc.name()).into()
        }
        _ if desc.is_sparse() => CategoryIdColumn::new(desc.clone(), id_bucket_size(desc))?.into(),
        _ => NumericColumn::new(desc.clone()).into(),
    };
    Ok(column)
}
