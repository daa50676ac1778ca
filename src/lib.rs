//! Column-wise anonymization of tabular datasets.
//!
//! A [`Config`] assigns an anonymization method (noise, bucketing, hashing, redaction, ...) with
//! its parameters to some of the columns of a [`Dataset`]. Anonymizing produces a new dataset with
//! the same columns in the same order and the same number of rows, where the configured columns
//! have been transformed and all other columns are copied unchanged.
//!
//! Every rule is validated against the dataset before any value is transformed, so a call either
//! returns a fully anonymized dataset or an error, never a partial result.
//!
//! # Example
//!
//! ```
//! use tabular_anonymization::config::{ColumnRule, ConfigBuilder};
//! use tabular_anonymization::dataset::{Column, Dataset, Value};
//! use tabular_anonymization::Anonymizer;
//!
//! let dataset = Dataset::new(vec![
//!     Column::from_integers("age", [34, 61]),
//!     Column::from_integers("salary", [50_000, 82_000]),
//! ])
//! .unwrap();
//!
//! let config = ConfigBuilder::new()
//!     .column_rule("age", ColumnRule::new("bucket").parameter("width", 10))
//!     .build();
//!
//! let anonymized = Anonymizer::new(config).anonymize(&dataset).unwrap();
//!
//! assert_eq!(
//!     anonymized.column("age").unwrap().values(),
//!     [Value::from("30-40"), Value::from("60-70")]
//! );
//! assert_eq!(anonymized.column("salary"), dataset.column("salary"));
//! ```

pub mod config;
pub mod dataset;
pub mod hashing;
pub mod io;
pub mod methods;
pub mod processor;
mod rng;
mod transforms;

use log::info;
use rayon::prelude::*;
use std::borrow::Cow;
use thiserror::Error;

pub use config::{ColumnRule, Config, ConfigBuilder};
pub use dataset::{Column, ColumnType, Dataset, DatasetError, Value};
pub use methods::{Method, ValidationError};
use processor::{ColumnProcessor, Processor};
pub use transforms::TransformError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnonymizationError {
    #[error("invalid configuration for column `{column}`: {source}")]
    InvalidConfiguration {
        column: String,
        source: ValidationError,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<processor::Error> for AnonymizationError {
    fn from(err: processor::Error) -> Self {
        match err {
            processor::Error::Validation { column, source } => {
                AnonymizationError::InvalidConfiguration { column, source }
            }
            err @ processor::Error::Transform { .. } => {
                AnonymizationError::Internal(format!("{err}"))
            }
        }
    }
}

impl From<DatasetError> for AnonymizationError {
    fn from(err: DatasetError) -> Self {
        AnonymizationError::Internal(format!("{err}"))
    }
}

pub type Result<T, E = AnonymizationError> = std::result::Result<T, E>;

/// Anonymizes datasets according to a fixed [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct Anonymizer {
    config: Config,
}

impl Anonymizer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Anonymizes `dataset`, leaving it untouched.
    ///
    /// Configured columns are transformed in parallel. Each call to this method uses a fresh
    /// random seed unless the configuration sets one.
    ///
    /// # Errors
    ///
    /// * [`AnonymizationError::InvalidConfiguration`] when a rule names a column that is not in the
    ///   dataset or does not validate for its column.
    /// * [`AnonymizationError::Internal`] when a transform fails on validated input.
    pub fn anonymize(&self, dataset: &Dataset) -> Result<Dataset> {
        let processor = ColumnProcessor::new(&self.config, dataset)?;

        let columns = dataset
            .columns()
            .par_iter()
            .map(|column| processor.process_column(column).map(Cow::into_owned))
            .collect::<processor::Result<Vec<_>>>()?;
        let anonymized = Dataset::new(columns)?;

        info!(
            "anonymized {} of {} columns ({} rows)",
            processor.len(),
            dataset.columns().len(),
            dataset.row_count()
        );
        Ok(anonymized)
    }
}

/// Anonymizes `dataset` with `config`. Shorthand for `Anonymizer::new(config).anonymize(dataset)`.
pub fn anonymize(dataset: &Dataset, config: &Config) -> Result<Dataset> {
    Anonymizer::new(config.clone()).anonymize(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::from_integers("age", [34, 61]),
            Column::from_integers("salary", [50_000, 82_000]),
        ])
        .unwrap()
    }

    #[test]
    fn test_invalid_configuration_error() {
        let config = ConfigBuilder::new()
            .column_rule("age", ColumnRule::new("bucket").parameter("width", 0))
            .build();
        let err = anonymize(&dataset(), &config).unwrap_err();
        assert!(matches!(
            err,
            AnonymizationError::InvalidConfiguration {
                ref column,
                source: ValidationError::InvalidParameterRange { .. }
            } if column == "age"
        ));
    }

    #[test]
    fn test_transform_failure_is_internal() {
        let config = ConfigBuilder::new()
            .column_rule("salary", ColumnRule::new("round").parameter("precision", -3))
            .build();
        let dataset = Dataset::new(vec![Column::from_integers("salary", [i64::MAX])]).unwrap();
        let err = anonymize(&dataset, &config).unwrap_err();
        assert!(matches!(err, AnonymizationError::Internal(_)));
    }

    #[test]
    fn test_empty_config_copies_dataset() {
        let dataset = dataset();
        let result = anonymize(&dataset, &Config::default()).unwrap();
        assert_eq!(result, dataset);
    }
}
