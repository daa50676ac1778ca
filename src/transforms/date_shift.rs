use chrono::TimeDelta;
use rand::rngs::StdRng;
use rand::Rng;

use super::{unexpected, ColumnTransform, Result, TransformError};
use crate::dataset::{Column, Value};
use crate::methods::DateShiftParams;

/// Moves dates by a whole number of days in `[-max_offset_days, max_offset_days]`.
pub(crate) struct DateShift<'a> {
    params: &'a DateShiftParams,
}

impl<'a> DateShift<'a> {
    pub(crate) fn new(params: &'a DateShiftParams) -> Self {
        Self { params }
    }

    /// Offset derived from the salted hash of the value, identical across runs.
    fn hashed_offset(&self, value: &Value) -> i64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.params.salt.as_bytes());
        hasher.update(value.to_string().as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hasher.finalize().as_bytes()[..8]);
        let span = 2 * self.params.max_offset_days as u64 + 1;
        (u64::from_le_bytes(bytes) % span) as i64 - self.params.max_offset_days
    }
}

impl ColumnTransform for DateShift<'_> {
    fn apply(&self, column: &Column, rng: &mut StdRng) -> Result<Vec<Value>> {
        let max = self.params.max_offset_days;
        column
            .values()
            .iter()
            .map(|value| match value {
                Value::Null => Ok(Value::Null),
                Value::Date(date) => {
                    let days = if self.params.consistent {
                        self.hashed_offset(value)
                    } else {
                        rng.gen_range(-max..=max)
                    };
                    TimeDelta::try_days(days)
                        .and_then(|delta| date.checked_add_signed(delta))
                        .map(Value::Date)
                        .ok_or_else(|| TransformError::OutOfRange(date.to_rfc3339()))
                }
                other => Err(unexpected(other, column.column_type())),
            })
            .collect()
    }
}
