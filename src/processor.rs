use log::debug;
use std::borrow::Cow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use thiserror::Error;

use crate::config::Config;
use crate::dataset::{Column, Dataset};
use crate::methods::{self, Method, NoiseParams, ValidationError};
use crate::rng;
use crate::transforms::{self, TransformError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid rule for column `{column}`: {source}")]
    Validation {
        column: String,
        source: ValidationError,
    },

    #[error("failed to transform column `{column}`: {source}")]
    Transform {
        column: String,
        source: TransformError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub trait Processor {
    /// Returns the anonymized version of `column`, borrowing it when nothing has to change.
    fn process_column<'a>(&'a self, column: &'a Column) -> Result<Cow<'a, Column>>;
}

/// A validated rule, ready to be applied to its column.
#[derive(Debug, Clone, PartialEq)]
struct ColumnPlan {
    method: Method,
    seed: u64,
}

/// Applies the rules of a [`Config`] to the columns of one dataset.
///
/// All rules are validated against the dataset when the processor is created, so a processor
/// that exists never fails on configuration problems. Columns without a rule are passed through
/// unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProcessor {
    plans: HashMap<String, ColumnPlan>,
}

impl ColumnProcessor {
    /// Validates every rule in `config` against `dataset`.
    ///
    /// Unknown columns are reported before any rule is looked at; the remaining rules are checked
    /// in column name order and the first failure is returned. Noise rules sharing a correlation
    /// group must draw the same samples as the first member of the group.
    pub fn new(config: &Config, dataset: &Dataset) -> Result<Self> {
        if let Some((column, _)) = config
            .columns()
            .iter()
            .find(|(column, _)| dataset.column(column).is_none())
        {
            return Err(Error::Validation {
                column: column.into(),
                source: ValidationError::UnknownColumn(column.into()),
            });
        }

        let base_seed = config.seed().unwrap_or_else(|| {
            let seed = rng::random_seed();
            debug!("no seed configured, using {seed}");
            seed
        });
        let mut plans = HashMap::with_capacity(config.columns().len());
        let mut groups: HashMap<String, (&str, NoiseParams, u64)> = HashMap::new();
        for (name, rule) in config.columns().iter() {
            let invalid = |source| Error::Validation {
                column: name.into(),
                source,
            };
            let column = dataset
                .column(name)
                .ok_or_else(|| invalid(ValidationError::UnknownColumn(name.into())))?;
            let column_type = column.column_type();
            if rule.column_type().is_some_and(|declared| declared != column_type) {
                return Err(invalid(ValidationError::IncompatibleColumnType {
                    method: rule.method().into(),
                    column_type,
                }));
            }
            let method =
                methods::validate(rule.method(), rule.parameters(), column_type).map_err(invalid)?;
            let seed = method.seed().unwrap_or(base_seed);
            if let Method::Noise(noise) = &method {
                if let Some(group) = &noise.correlation {
                    match groups.entry(group.clone()) {
                        Entry::Occupied(entry) => {
                            let (first, shared, shared_seed) = entry.get();
                            if *shared_seed != seed || !shared.draws_like(noise) {
                                return Err(invalid(ValidationError::InvalidParameterRange {
                                    parameter: "correlation".into(),
                                    reason: format!(
                                        "noise settings differ from column `{first}` in group `{group}`"
                                    ),
                                }));
                            }
                        }
                        Entry::Vacant(entry) => {
                            entry.insert((name, noise.clone(), seed));
                        }
                    }
                }
            }
            plans.insert(name.to_string(), ColumnPlan { method, seed });
        }

        Ok(Self { plans })
    }

    /// Number of columns that will be transformed.
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl Processor for ColumnProcessor {
    fn process_column<'a>(&'a self, column: &'a Column) -> Result<Cow<'a, Column>> {
        let Some(plan) = self.plans.get(column.name()) else {
            return Ok(Cow::Borrowed(column));
        };

        let stream_key = plan.method.stream_key(column.name());
        debug!(
            "applying {:?} to column {} ({} rows, stream {})",
            plan.method.kind(),
            column.name(),
            column.len(),
            stream_key
        );
        let mut rng = rng::stream(plan.seed, stream_key);
        let transformed = transforms::transform_column(&plan.method, column, &mut rng).map_err(
            |source| Error::Transform {
                column: column.name().into(),
                source,
            },
        )?;
        Ok(Cow::Owned(transformed))
    }
}
