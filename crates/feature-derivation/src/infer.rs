//! Field descriptor inference from sampled cells.
//!
//! Each column of a [`SampleTable`] is scanned cell by cell. The first
//! non-null cell fixes the column's format; later cells must agree with it.
//!
//! | Sampled cells | dtype | format | shape | sparse |
//! |---|---|---|---|---|
//! | integers | `INT64` | plain | `[1]` | no |
//! | numbers with a float | `FLOAT32` | plain | `[1]` | no |
//! | `"1,2,3"`, same length | by tokens | csv | `[len]` | no |
//! | `"1,2"` / `"7"`, varying length | `INT64` | csv | `[max_id + 1]` | yes |
//! | `"3:0.5,7:1"` | `FLOAT32` | kv | `[max_id + 1]` | yes |
//! | other strings | `STRING` | plain | `[1]` | no |

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use feature_column::{DataFormat, DataType, FieldDesc, NO_MAX_ID};

use crate::config::DerivationConfig;
use crate::error::{DerivationError, Result};
use crate::sample::{Cell, SampleTable};

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(\d+(\.\d*)?|\.\d+)([eE][-+]?\d+)?$").expect("valid number regex")
});

static INT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?\d+$").expect("valid int regex"));

static KV_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):[-+]?(\d+(\.\d*)?|\.\d+)([eE][-+]?\d+)?$").expect("valid kv regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellFormat {
    Scalar,
    Csv,
    Kv,
    Text,
}

impl CellFormat {
    fn as_str(self) -> &'static str {
        match self {
            CellFormat::Scalar => "scalar",
            CellFormat::Csv => "csv",
            CellFormat::Kv => "kv",
            CellFormat::Text => "string",
        }
    }
}

#[derive(Debug, PartialEq)]
enum ParsedText {
    Csv {
        width: usize,
        max_int: Option<i64>,
        has_float: bool,
    },
    Kv {
        max_key: i64,
    },
    Plain,
}

fn parse_text(s: &str, delimiter: &str) -> ParsedText {
    let tokens: Vec<&str> = s.split(delimiter).map(str::trim).collect();

    if tokens.iter().all(|t| NUMBER_RE.is_match(t)) {
        let mut max_int: Option<i64> = None;
        let mut has_float = false;
        for token in &tokens {
            match token.parse::<i64>() {
                Ok(v) if INT_RE.is_match(token) => {
                    max_int = Some(max_int.map_or(v, |m| m.max(v)));
                }
                _ => has_float = true,
            }
        }
        return ParsedText::Csv {
            width: tokens.len(),
            max_int,
            has_float,
        };
    }

    let mut max_key: Option<i64> = None;
    for token in &tokens {
        let key = KV_PAIR_RE
            .captures(token)
            .and_then(|c| c[1].parse::<i64>().ok());
        match key {
            Some(k) => max_key = Some(max_key.map_or(k, |m| m.max(k))),
            None => return ParsedText::Plain,
        }
    }
    match max_key {
        Some(max_key) => ParsedText::Kv { max_key },
        None => ParsedText::Plain,
    }
}

/// Running statistics of one column.
struct FieldStats<'a> {
    name: &'a str,
    format: Option<CellFormat>,
    has_float: bool,
    width: Option<usize>,
    ragged: bool,
    max_id: Option<i64>,
    vocabulary: BTreeSet<String>,
    vocabulary_overflow: bool,
}

impl<'a> FieldStats<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            name,
            format: None,
            has_float: false,
            width: None,
            ragged: false,
            max_id: None,
            vocabulary: BTreeSet::new(),
            vocabulary_overflow: false,
        }
    }

    fn set_format(&mut self, format: CellFormat) -> Result<()> {
        match self.format {
            None => {
                self.format = Some(format);
                Ok(())
            }
            Some(previous) if previous == format => Ok(()),
            Some(previous) => Err(DerivationError::ConflictingFormat {
                field: self.name.to_string(),
                previous: previous.as_str(),
                found: format.as_str(),
            }),
        }
    }

    fn update_max_id(&mut self, id: i64) {
        self.max_id = Some(self.max_id.map_or(id, |m| m.max(id)));
    }

    fn observe(&mut self, cell: &Cell, config: &DerivationConfig) -> Result<()> {
        match cell {
            Cell::Null => {}
            Cell::Int(v) => {
                self.set_format(CellFormat::Scalar)?;
                self.update_max_id(*v);
            }
            Cell::Float(_) => {
                self.set_format(CellFormat::Scalar)?;
                self.has_float = true;
            }
            Cell::Text(s) => match parse_text(s, &config.delimiter) {
                ParsedText::Csv {
                    width,
                    max_int,
                    has_float,
                } => {
                    self.set_format(CellFormat::Csv)?;
                    self.has_float |= has_float;
                    if let Some(v) = max_int {
                        self.update_max_id(v);
                    }
                    match self.width {
                        None => self.width = Some(width),
                        Some(w) if w != width => {
                            self.ragged = true;
                            self.width = Some(w.max(width));
                        }
                        Some(_) => {}
                    }
                }
                ParsedText::Kv { max_key } => {
                    self.set_format(CellFormat::Kv)?;
                    self.update_max_id(max_key);
                }
                ParsedText::Plain => {
                    self.set_format(CellFormat::Text)?;
                    self.observe_category(s, config);
                }
            },
        }
        Ok(())
    }

    fn observe_category(&mut self, value: &str, config: &DerivationConfig) {
        if self.vocabulary_overflow || self.vocabulary.contains(value) {
            return;
        }
        if self.vocabulary.len() >= config.max_vocabulary_size {
            tracing::warn!(
                field = self.name,
                limit = config.max_vocabulary_size,
                "Vocabulary limit exceeded, field will be hashed"
            );
            self.vocabulary_overflow = true;
            self.vocabulary.clear();
            return;
        }
        self.vocabulary.insert(value.to_string());
    }

    fn sparse_shape(&self) -> Result<Vec<usize>> {
        match self.max_id {
            Some(id) if id >= 0 => Ok(vec![id as usize + 1]),
            Some(id) => Err(DerivationError::UninferableField {
                field: self.name.to_string(),
                message: format!("sparse ids must be non-negative, found {}", id),
            }),
            None => Err(DerivationError::UninferableField {
                field: self.name.to_string(),
                message: "sparse field has no ids".to_string(),
            }),
        }
    }

    fn finish(self, config: &DerivationConfig) -> Result<FieldDesc> {
        let format = self.format.ok_or_else(|| DerivationError::UninferableField {
            field: self.name.to_string(),
            message: "no non-null values in sample".to_string(),
        })?;

        let numeric_dtype = if self.has_float {
            DataType::Float32
        } else {
            DataType::Int64
        };
        let max_id = if self.has_float {
            NO_MAX_ID
        } else {
            self.max_id.unwrap_or(NO_MAX_ID)
        };

        let builder = FieldDesc::builder(self.name);
        let builder = match format {
            CellFormat::Scalar => builder.dtype(numeric_dtype).shape(vec![1]).max_id(max_id),
            CellFormat::Csv if self.ragged => {
                if self.has_float {
                    return Err(DerivationError::UninferableField {
                        field: self.name.to_string(),
                        message: "variable-length CSV values must be integer ids".to_string(),
                    });
                }
                builder
                    .dtype(DataType::Int64)
                    .format(DataFormat::Csv)
                    .delimiter(config.delimiter.clone())
                    .shape(self.sparse_shape()?)
                    .sparse(true)
                    .max_id(max_id)
            }
            CellFormat::Csv => builder
                .dtype(numeric_dtype)
                .format(DataFormat::Csv)
                .delimiter(config.delimiter.clone())
                .shape(vec![self.width.unwrap_or(1)])
                .max_id(max_id),
            CellFormat::Kv => builder
                .dtype(DataType::Float32)
                .format(DataFormat::Kv)
                .delimiter(config.delimiter.clone())
                .shape(self.sparse_shape()?)
                .sparse(true)
                .max_id(self.max_id.unwrap_or(NO_MAX_ID)),
            CellFormat::Text => builder
                .dtype(DataType::String)
                .shape(vec![1])
                .vocabulary(self.vocabulary),
        };

        Ok(builder.build()?)
    }
}

/// Infers one [`FieldDesc`] per column of `table`, in column order.
///
/// At most `config.max_sample_rows` rows are inspected.
pub fn infer_field_descs(table: &SampleTable, config: &DerivationConfig) -> Result<Vec<FieldDesc>> {
    config.validate()?;

    let mut descs = Vec::with_capacity(table.columns().len());
    for (index, name) in table.columns().iter().enumerate() {
        let mut stats = FieldStats::new(name);
        for cell in table
            .column_cells(index, config.max_sample_rows)
            .into_iter()
            .flatten()
        {
            stats.observe(cell, config)?;
        }
        let desc = stats.finish(config)?;

        tracing::debug!(
            field = desc.name(),
            dtype = ?desc.dtype(),
            format = ?desc.format(),
            shape = ?desc.shape(),
            is_sparse = desc.is_sparse(),
            vocabulary = desc.vocabulary().len(),
            "Inferred field"
        );
        descs.push(desc);
    }

    tracing::info!(
        fields = descs.len(),
        rows = table.num_rows().min(config.max_sample_rows),
        "Field inference finished"
    );
    Ok(descs)
}
