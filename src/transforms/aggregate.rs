use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rand::rngs::StdRng;

use super::round::{round_float, round_integer};
use super::{map_values, unexpected, ColumnTransform, Result, TransformError};
use crate::dataset::{Column, Value};
use crate::methods::{AggregateParams, TimeUnit};

pub(crate) struct Aggregate {
    params: AggregateParams,
}

impl Aggregate {
    pub(crate) fn new(params: AggregateParams) -> Self {
        Self { params }
    }
}

impl ColumnTransform for Aggregate {
    fn apply(&self, column: &Column, _rng: &mut StdRng) -> Result<Vec<Value>> {
        let column_type = column.column_type();
        map_values(column, |value| match (value, self.params) {
            (Value::Integer(v), AggregateParams::PowerOfTen(power)) => {
                round_integer(*v, -power).map(Value::Integer)
            }
            (Value::Float(v), AggregateParams::PowerOfTen(power)) => {
                Ok(Value::Float(round_float(*v, -power)))
            }
            (Value::Date(date), AggregateParams::TimeUnit(unit)) => {
                truncate_date(date, unit).map(Value::Date)
            }
            (other, _) => Err(unexpected(other, column_type)),
        })
    }
}

/// Truncates a date to the start of `unit`, keeping its offset.
fn truncate_date(date: &DateTime<FixedOffset>, unit: TimeUnit) -> Result<DateTime<FixedOffset>> {
    let local = date.naive_local();
    let day = local.date();
    let truncated = match unit {
        TimeUnit::Second => local.with_nanosecond(0),
        TimeUnit::Minute => day.and_hms_opt(local.hour(), local.minute(), 0),
        TimeUnit::Hour => day.and_hms_opt(local.hour(), 0, 0),
        TimeUnit::Day => Some(day.and_time(NaiveTime::MIN)),
        TimeUnit::Month => start_of_day(NaiveDate::from_ymd_opt(day.year(), day.month(), 1)),
        TimeUnit::Year => start_of_day(NaiveDate::from_ymd_opt(day.year(), 1, 1)),
    };
    truncated
        .and_then(|naive| naive.and_local_timezone(*date.offset()).single())
        .ok_or_else(|| TransformError::OutOfRange(date.to_rfc3339()))
}

fn start_of_day(date: Option<NaiveDate>) -> Option<NaiveDateTime> {
    date.map(|date| date.and_time(NaiveTime::MIN))
}
