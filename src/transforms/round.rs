use rand::rngs::StdRng;

use super::{map_values, unexpected, ColumnTransform, Result, TransformError};
use crate::dataset::{Column, Value};

/// Rounds half to even at `precision` decimal places.
pub(crate) struct Round {
    precision: i32,
}

impl Round {
    pub(crate) fn new(precision: i32) -> Self {
        Self { precision }
    }
}

impl ColumnTransform for Round {
    fn apply(&self, column: &Column, _rng: &mut StdRng) -> Result<Vec<Value>> {
        let column_type = column.column_type();
        map_values(column, |value| match value {
            Value::Integer(v) => round_integer(*v, self.precision).map(Value::Integer),
            Value::Float(v) => Ok(Value::Float(round_float(*v, self.precision))),
            other => Err(unexpected(other, column_type)),
        })
    }
}

/// Floats of at least this magnitude have no fractional part.
const EXACT_INTEGER_LIMIT: f64 = 4_503_599_627_370_496.0; // 2^52

/// Half-to-even rounding of a float. Values too large to carry digits at `precision` are returned
/// unchanged.
pub(super) fn round_float(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision.abs());
    let scaled = if precision >= 0 {
        value * factor
    } else {
        value / factor
    };
    if !scaled.is_finite() || scaled.abs() >= EXACT_INTEGER_LIMIT {
        return value;
    }
    if precision >= 0 {
        scaled.round_ties_even() / factor
    } else {
        scaled.round_ties_even() * factor
    }
}

/// Exact half-to-even rounding of an integer to a multiple of `10^-precision`.
pub(super) fn round_integer(value: i64, precision: i32) -> Result<i64> {
    if precision >= 0 {
        return Ok(value);
    }
    let out_of_range = || TransformError::OutOfRange(value.to_string());
    let step = 10i64
        .checked_pow(precision.unsigned_abs())
        .ok_or_else(out_of_range)?;
    let quotient = value.div_euclid(step);
    let remainder = value.rem_euclid(step);
    let round_up = match (2 * remainder).cmp(&step) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => quotient % 2 != 0,
        std::cmp::Ordering::Less => false,
    };
    let quotient = if round_up { quotient + 1 } else { quotient };
    quotient.checked_mul(step).ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;

    #[test]
    fn test_round_float() {
        assert_eq!(round_float(3.14159, 2), 3.14);
        assert_eq!(round_float(0.125, 2), 0.12);
        assert_eq!(round_float(0.375, 2), 0.38);
        assert_eq!(round_float(1234.5, 0), 1234.0);
        assert_eq!(round_float(1250.0, -2), 1200.0);
        assert_eq!(round_float(1350.0, -2), 1400.0);
    }

    #[test]
    fn test_round_float_large_values_unchanged() {
        assert_eq!(round_float(1e300, 15), 1e300);
        assert_eq!(round_float(-1e300, 2), -1e300);
        assert_eq!(round_float(f64::MAX, -15), f64::MAX);
        assert_eq!(round_float(1e17, 0), 1e17);
        assert_eq!(round_float(123.456, 15), 123.456);
    }

    #[test]
    fn test_round_integer() {
        assert_eq!(round_integer(1234, 2), Ok(1234));
        assert_eq!(round_integer(1234, -2), Ok(1200));
        assert_eq!(round_integer(1250, -2), Ok(1200));
        assert_eq!(round_integer(1350, -2), Ok(1400));
        assert_eq!(round_integer(-1250, -2), Ok(-1200));
        assert_eq!(round_integer(-1251, -2), Ok(-1300));
        assert_eq!(round_integer(49, -2), Ok(0));
    }

    #[test]
    fn test_round_integer_overflow() {
        assert!(round_integer(i64::MAX, -3).is_err());
    }

    #[test]
    fn test_round_column() {
        let column = Column::from_floats("x", [1.234, 5.678]);
        let result = Round::new(1)
            .apply(&column, &mut rng::stream(0, "x"))
            .unwrap();
        assert_eq!(result, vec![Value::Float(1.2), Value::Float(5.7)]);
    }
}
