//! Column transforms, one per anonymization method.
//!
//! A transform receives a whole column and returns the new values for it. It never looks at other
//! columns, never changes the number of rows and draws all randomness from the generator it is
//! handed.

mod aggregate;
mod bucket;
mod categorical;
mod date_shift;
mod hash;
mod noise;
mod pattern;
mod redact;
mod rescale;
mod round;
mod words;

use rand::rngs::StdRng;
use thiserror::Error;

use crate::dataset::{Column, ColumnType, DatasetError, Value};
use crate::hashing::HashError;
use crate::methods::Method;
use aggregate::Aggregate;
use bucket::Bucket;
use categorical::Categorical;
use date_shift::DateShift;
use hash::Hash;
use noise::Noise;
use pattern::Pattern;
use redact::Redact;
use rescale::Rescale;
use round::Round;
use words::{MaskWords, TokenizeWords};

pub(crate) type Result<T, E = TransformError> = std::result::Result<T, E>;

/// A failure while transforming values that already passed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("unexpected value {value:?} in a {column_type} column")]
    UnexpectedValue {
        column_type: ColumnType,
        value: Value,
    },

    #[error("result of transforming {0} is out of range")]
    OutOfRange(String),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Hash(#[from] HashError),
}

pub(crate) trait ColumnTransform {
    /// Type of the values produced for an input column of type `input`.
    fn output_type(&self, input: ColumnType) -> ColumnType {
        input
    }

    fn apply(&self, column: &Column, rng: &mut StdRng) -> Result<Vec<Value>>;
}

impl Method {
    pub(crate) fn get_transform(&self) -> Box<dyn ColumnTransform + '_> {
        match self {
            Method::Noise(params) => Box::new(Noise::new(params)),
            Method::Bucket(params) => Box::new(Bucket::new(params)),
            Method::Round(params) => Box::new(Round::new(params.precision)),
            Method::Aggregate(params) => Box::new(Aggregate::new(*params)),
            Method::Rescale(params) => Box::new(Rescale::new(params)),
            Method::Hash(params) => Box::new(Hash::new(params)),
            Method::Redact(params) => Box::new(Redact::new(params)),
            Method::DateShift(params) => Box::new(DateShift::new(params)),
            Method::Categorical(params) => Box::new(Categorical::new(params)),
            Method::MaskWords(params) => Box::new(MaskWords::new(params)),
            Method::TokenizeWords(params) => Box::new(TokenizeWords::new(params)),
            Method::Regex(params) => Box::new(Pattern::new(params)),
        }
    }
}

/// Applies `method` to `column` and checks the result before handing it back.
pub(crate) fn transform_column(
    method: &Method,
    column: &Column,
    rng: &mut StdRng,
) -> Result<Column> {
    let transform = method.get_transform();
    let values = transform.apply(column, rng)?;
    if values.len() != column.len() {
        return Err(DatasetError::LengthMismatch {
            column: column.name().into(),
            expected: column.len(),
            actual: values.len(),
        }
        .into());
    }
    let column_type = transform.output_type(column.column_type());
    Ok(Column::new(column.name(), column_type, values)?)
}

fn unexpected(value: &Value, column_type: ColumnType) -> TransformError {
    TransformError::UnexpectedValue {
        column_type,
        value: value.clone(),
    }
}

/// Maps every non-null value with `f`, keeping nulls in place.
fn map_values<F>(column: &Column, mut f: F) -> Result<Vec<Value>>
where
    F: FnMut(&Value) -> Result<Value>,
{
    column
        .values()
        .iter()
        .map(|value| match value {
            Value::Null => Ok(Value::Null),
            value => f(value),
        })
        .collect()
}

/// The numeric content of a value from an integer or float column.
fn number(value: &Value, column_type: ColumnType) -> Result<f64> {
    value.as_f64().ok_or_else(|| unexpected(value, column_type))
}

/// Converts a computed number back to the column's numeric type. Integers round half to even.
fn numeric_value(result: f64, column_type: ColumnType) -> Result<Value> {
    match column_type {
        ColumnType::Integer => {
            let rounded = result.round_ties_even();
            // i64::MAX is not representable as f64; the bound is exclusive
            if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
                Ok(Value::Integer(rounded as i64))
            } else {
                Err(TransformError::OutOfRange(result.to_string()))
            }
        }
        ColumnType::Float => Ok(Value::Float(result)),
        _ => Err(unexpected(&Value::Float(result), column_type)),
    }
}

/// Formats a bound so whole numbers print without a fractional part.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::methods::{BucketParams, RoundParams, WidthBuckets};
    use crate::rng;

    #[test]
    fn test_numeric_value_rounds_half_to_even() {
        assert_eq!(
            numeric_value(2.5, ColumnType::Integer),
            Ok(Value::Integer(2))
        );
        assert_eq!(
            numeric_value(3.5, ColumnType::Integer),
            Ok(Value::Integer(4))
        );
        assert_eq!(
            numeric_value(-2.5, ColumnType::Integer),
            Ok(Value::Integer(-2))
        );
        assert_eq!(numeric_value(2.5, ColumnType::Float), Ok(Value::Float(2.5)));
    }

    #[test]
    fn test_numeric_value_out_of_range() {
        assert!(matches!(
            numeric_value(1e20, ColumnType::Integer),
            Err(TransformError::OutOfRange(_))
        ));
        assert!(matches!(
            numeric_value(f64::NAN, ColumnType::Integer),
            Err(TransformError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(30.0), "30");
        assert_eq!(format_number(-10.0), "-10");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn test_transform_column_sets_output_type() {
        let method = Method::Bucket(BucketParams::Width(WidthBuckets {
            width: 10.0,
            origin: 0.0,
        }));
        let column = Column::from_integers("age", [34, 61]);
        let result = transform_column(&method, &column, &mut rng::stream(0, "age")).unwrap();
        assert_eq!(result.column_type(), ColumnType::Text);
        assert_eq!(result.name(), "age");
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_transform_column_rejects_wrong_values() {
        let method = Method::Round(RoundParams { precision: 0 });
        let column = Column::from_texts("name", ["a"]);
        let result = transform_column(&method, &column, &mut rng::stream(0, "name"));
        assert!(matches!(
            result,
            Err(TransformError::UnexpectedValue { .. })
        ));
    }
}
