//! Input record and schema types.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StreamError};

/// Lexical timestamp format used by input files and output files alike.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Declared type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    DateTime,
    Float,
    Int,
    Text,
}

impl FieldKind {
    /// Parse a type name from an input file's type header row.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "datetime" => Some(FieldKind::DateTime),
            "float" => Some(FieldKind::Float),
            "int" => Some(FieldKind::Int),
            "string" => Some(FieldKind::Text),
            _ => None,
        }
    }
}

/// A named, typed column in the input schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Declared column layout of an input stream.
///
/// Carries the designated timestamp column and the designated target
/// field (the quantity being predicted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    timestamp_index: usize,
    target_index: usize,
}

impl Schema {
    /// Build a schema, designating the timestamp column and the target
    /// field by name.
    pub fn new(fields: Vec<FieldSpec>, timestamp_index: usize, target: &str) -> Result<Self> {
        match fields.get(timestamp_index) {
            Some(spec) if spec.kind == FieldKind::DateTime => {}
            Some(spec) => {
                return Err(StreamError::InvalidSchema(format!(
                    "timestamp field '{}' is not a datetime",
                    spec.name
                )))
            }
            None => {
                return Err(StreamError::InvalidSchema(format!(
                    "timestamp index {} out of range",
                    timestamp_index
                )))
            }
        }

        let target_index = fields
            .iter()
            .position(|f| f.name == target)
            .ok_or_else(|| {
                StreamError::InvalidSchema(format!("target field '{}' not found", target))
            })?;
        match fields[target_index].kind {
            FieldKind::Float | FieldKind::Int => {}
            _ => {
                return Err(StreamError::InvalidSchema(format!(
                    "target field '{}' is not numeric",
                    target
                )))
            }
        }

        Ok(Self {
            fields,
            timestamp_index,
            target_index,
        })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn timestamp_index(&self) -> usize {
        self.timestamp_index
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn target_name(&self) -> &str {
        &self.fields[self.target_index].name
    }
}

/// A single parsed field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    DateTime(NaiveDateTime),
    Float(f64),
    Int(i64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

/// One typed input row.
///
/// Immutable once produced by a [`crate::contract::RecordSource`]; the
/// target value is pre-extracted so downstream stages never touch the
/// schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Timestamp of the row; non-decreasing across a stream.
    pub timestamp: NaiveDateTime,
    /// All field values in schema order, timestamp included.
    pub values: Vec<FieldValue>,
    /// Value of the designated target field.
    pub target: f64,
}

impl Record {
    pub fn new(timestamp: NaiveDateTime, values: Vec<FieldValue>, target: f64) -> Self {
        Self {
            timestamp,
            values,
            target,
        }
    }
}
