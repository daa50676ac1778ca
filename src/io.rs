//! Reading and writing datasets as CSV.
//!
//! The header row names the columns. A column's type comes from the `type` declared in its rule
//! when there is one; otherwise it is inferred from the cells: integer, then float, then date,
//! falling back to text. Empty cells are missing values.

use log::debug;
use std::io::{Read, Write};
use thiserror::Error;

use crate::config::Config;
use crate::dataset::{parse_date, Column, ColumnType, Dataset, DatasetError, Value};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IoError {
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("column `{column}`, line {line}: cannot read {value:?} as {column_type}")]
    InvalidValue {
        column: String,
        line: u64,
        value: String,
        column_type: ColumnType,
    },

    #[error("I/O error: {0}")]
    Io(String),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

impl From<csv::Error> for IoError {
    fn from(err: csv::Error) -> Self {
        IoError::Csv(format!("{err}"))
    }
}

impl From<std::io::Error> for IoError {
    fn from(err: std::io::Error) -> Self {
        IoError::Io(format!("{err}"))
    }
}

pub type Result<T, E = IoError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
}

impl CsvOptions {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Raw cells of one column together with the line each came from.
struct RawColumn {
    name: String,
    cells: Vec<(u64, String)>,
}

impl RawColumn {
    fn infer_type(&self) -> ColumnType {
        let mut cells = self
            .cells
            .iter()
            .map(|(_, cell)| cell.trim())
            .filter(|cell| !cell.is_empty())
            .peekable();
        if cells.peek().is_none() {
            return ColumnType::Text;
        }
        let cells: Vec<&str> = cells.collect();
        if cells.iter().all(|cell| cell.parse::<i64>().is_ok()) {
            ColumnType::Integer
        } else if cells
            .iter()
            .all(|cell| Value::parse(cell, ColumnType::Float).is_some())
        {
            ColumnType::Float
        } else if cells.iter().all(|cell| parse_date(cell).is_some()) {
            ColumnType::Date
        } else {
            ColumnType::Text
        }
    }

    fn into_column(self, column_type: ColumnType) -> Result<Column> {
        let values = self
            .cells
            .iter()
            .map(|(line, cell)| {
                Value::parse(cell, column_type).ok_or_else(|| IoError::InvalidValue {
                    column: self.name.clone(),
                    line: *line,
                    value: cell.clone(),
                    column_type,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Column::new(self.name, column_type, values)?)
    }
}

/// Reads a dataset from CSV, using the column types declared in `config` where present.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions, config: &Config) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let mut columns: Vec<RawColumn> = reader
        .headers()?
        .iter()
        .map(|name| RawColumn {
            name: name.to_string(),
            cells: Vec::new(),
        })
        .collect();

    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        for (column, cell) in columns.iter_mut().zip(record.iter()) {
            column.cells.push((line, cell.to_string()));
        }
    }

    let columns = columns
        .into_iter()
        .map(|column| {
            let declared = config.rule(&column.name).and_then(|rule| rule.column_type());
            let column_type = declared.unwrap_or_else(|| column.infer_type());
            debug!(
                "reading column {} as {} ({})",
                column.name,
                column_type,
                if declared.is_some() { "declared" } else { "inferred" }
            );
            column.into_column(column_type)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset::new(columns)?)
}

/// Writes a dataset as CSV. Dates are written in RFC 3339 and missing values as empty cells.
pub fn write_csv<W: Write>(writer: W, dataset: &Dataset, options: &CsvOptions) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    if dataset.columns().is_empty() {
        return Ok(());
    }

    writer.write_record(dataset.column_names())?;
    for row in 0..dataset.row_count() {
        writer.write_record(
            dataset
                .columns()
                .iter()
                .map(|column| column.values()[row].to_string()),
        )?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnRule, ConfigBuilder};

    fn read(csv: &str) -> Result<Dataset> {
        read_csv(csv.as_bytes(), &CsvOptions::default(), &Config::default())
    }

    #[test]
    fn test_infer_types() {
        let dataset = read(
            "id,score,visit,name\n\
             1,1.5,2020-01-01,Alice\n\
             2,2,2020-02-01 10:00:00,Bob\n",
        )
        .unwrap();
        let types: Vec<ColumnType> = dataset.columns().iter().map(Column::column_type).collect();
        assert_eq!(
            types,
            [
                ColumnType::Integer,
                ColumnType::Float,
                ColumnType::Date,
                ColumnType::Text
            ]
        );
        assert_eq!(dataset.row_count(), 2);
    }

    #[test]
    fn test_non_finite_numbers_are_text() {
        let dataset = read("score,ratio\n1.5,inf\nNaN,2\n").unwrap();
        let score = dataset.column("score").unwrap();
        assert_eq!(score.column_type(), ColumnType::Text);
        assert_eq!(score.values()[1], Value::from("NaN"));
        assert_eq!(
            dataset.column("ratio").unwrap().column_type(),
            ColumnType::Text
        );
    }

    #[test]
    fn test_declared_float_rejects_nan() {
        let config = ConfigBuilder::new()
            .column_rule("score", ColumnRule::new("bucket").with_type(ColumnType::Float))
            .build();
        let err = read_csv(
            "score\n1.5\nNaN\n".as_bytes(),
            &CsvOptions::default(),
            &config,
        )
        .unwrap_err();
        assert!(matches!(err, IoError::InvalidValue { line: 3, .. }));
    }

    #[test]
    fn test_empty_cells_are_null() {
        let dataset = read("age,name\n34,\n,Bob\n").unwrap();
        let age = dataset.column("age").unwrap();
        assert_eq!(age.column_type(), ColumnType::Integer);
        assert_eq!(age.values(), [Value::Integer(34), Value::Null]);
        assert_eq!(
            dataset.column("name").unwrap().values(),
            [Value::Null, Value::from("Bob")]
        );
    }

    #[test]
    fn test_declared_type() {
        let config = ConfigBuilder::new()
            .column_rule("zip", ColumnRule::new("hash").with_type(ColumnType::Text))
            .build();
        let dataset = read_csv(
            "zip\n01000\n".as_bytes(),
            &CsvOptions::default(),
            &config,
        )
        .unwrap();
        assert_eq!(
            dataset.column("zip").unwrap().values(),
            [Value::from("01000")]
        );
    }

    #[test]
    fn test_declared_type_mismatch_names_line() {
        let config = ConfigBuilder::new()
            .column_rule("age", ColumnRule::new("bucket").with_type(ColumnType::Integer))
            .build();
        let err = read_csv(
            "age\n34\nold\n".as_bytes(),
            &CsvOptions::default(),
            &config,
        )
        .unwrap_err();
        assert_eq!(
            err,
            IoError::InvalidValue {
                column: "age".into(),
                line: 3,
                value: "old".into(),
                column_type: ColumnType::Integer
            }
        );
    }

    #[test]
    fn test_ragged_rows() {
        assert!(matches!(read("a,b\n1\n"), Err(IoError::Csv(_))));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let dataset = read_csv(
            "a;b\n1;x\n".as_bytes(),
            &CsvOptions::with_delimiter(b';'),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(dataset.column_names().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_write_csv() {
        let dataset = read("age,visit,note\n34,2020-01-02,\n").unwrap();
        let mut output = Vec::new();
        write_csv(&mut output, &dataset, &CsvOptions::default()).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "age,visit,note\n34,2020-01-02T00:00:00+00:00,\n"
        );
    }

    #[test]
    fn test_header_only() {
        let dataset = read("a,b\n").unwrap();
        assert_eq!(dataset.row_count(), 0);
        assert_eq!(dataset.columns().len(), 2);
    }
}
