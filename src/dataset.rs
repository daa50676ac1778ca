use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

// date-only and date-time layouts accepted besides RFC 3339
const DATE_TIME_SUPPORTED_FORMATS: [&str; 3] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y%m%d%H%M%S"];
const DATE_SUPPORTED_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("column `{column}` has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column name `{0}`")]
    DuplicateColumn(String),

    #[error("column `{column}` is declared as {column_type} but row {row} holds {value:?}")]
    TypeMismatch {
        column: String,
        column_type: ColumnType,
        row: usize,
        value: Value,
    },
}

/// The semantic type shared by all values of a [`Column`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    #[serde(alias = "Integer", alias = "int")]
    Integer,
    #[serde(alias = "Float", alias = "number")]
    Float,
    #[serde(alias = "Text", alias = "string")]
    Text,
    #[serde(alias = "Date", alias = "datetime")]
    Date,
}

impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::Date => "date",
        };
        f.write_str(name)
    }
}

/// A single cell of a [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Date(DateTime<FixedOffset>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` if the value can be stored in a column of the given type.
    ///
    /// `Null` fits every column type. NaN and infinite floats fit none.
    pub fn fits(&self, column_type: ColumnType) -> bool {
        match (self, column_type) {
            (Value::Float(v), ColumnType::Float) => v.is_finite(),
            _ => matches!(
                (self, column_type),
                (Value::Null, _)
                    | (Value::Integer(_), ColumnType::Integer)
                    | (Value::Text(_), ColumnType::Text)
                    | (Value::Date(_), ColumnType::Date)
            ),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Parses `raw` as a value of the given column type. Empty input is `Null`.
    pub fn parse(raw: &str, column_type: ColumnType) -> Option<Value> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Some(Value::Null);
        }
        match column_type {
            ColumnType::Integer => raw.parse().ok().map(Value::Integer),
            ColumnType::Float => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Float),
            ColumnType::Text => Some(Value::Text(raw.into())),
            ColumnType::Date => parse_date(raw).map(Value::Date),
        }
    }
}

/// Canonical string form, used for hashing and CSV output. Dates are RFC 3339.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Date(v) => f.write_str(&v.to_rfc3339()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(v: DateTime<FixedOffset>) -> Self {
        Value::Date(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Parses a date or date-time. Values without an offset are taken as UTC.
pub fn parse_date(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(value) {
        return Some(date_time);
    }
    DATE_TIME_SUPPORTED_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_SUPPORTED_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc().fixed_offset())
}

/// A named, typed sequence of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    values: Vec<Value>,
}

impl Column {
    /// Creates a column, checking that every non-null value matches `column_type`.
    pub fn new(
        name: impl Into<String>,
        column_type: ColumnType,
        values: Vec<Value>,
    ) -> Result<Self, DatasetError> {
        let name = name.into();
        if let Some((row, value)) = values
            .iter()
            .enumerate()
            .find(|(_, value)| !value.fits(column_type))
        {
            return Err(DatasetError::TypeMismatch {
                column: name,
                column_type,
                row,
                value: value.clone(),
            });
        }
        Ok(Self {
            name,
            column_type,
            values,
        })
    }

    pub fn from_integers(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Integer,
            values: values.into_iter().map(Value::Integer).collect(),
        }
    }

    pub fn from_floats(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Float,
            values: values.into_iter().map(Value::Float).collect(),
        }
    }

    pub fn from_texts<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            column_type: ColumnType::Text,
            values: values.into_iter().map(|v| Value::Text(v.into())).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An ordered collection of equally long, uniquely named columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let mut names = HashSet::new();
        for column in &columns {
            if !names.insert(column.name()) {
                return Err(DatasetError::DuplicateColumn(column.name.clone()));
            }
        }
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(column) = columns.iter().find(|c| c.len() != expected) {
                return Err(DatasetError::LengthMismatch {
                    column: column.name.clone(),
                    expected,
                    actual: column.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}
