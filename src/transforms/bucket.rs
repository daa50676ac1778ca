use rand::rngs::StdRng;

use super::{format_number, map_values, number, ColumnTransform, Result, TransformError};
use crate::dataset::{Column, ColumnType, Value};
use crate::methods::{BucketParams, EdgeBuckets, WidthBuckets};

/// Generalizes numbers to the label of the half-open interval `[lower, upper)` containing them.
pub(crate) struct Bucket<'a> {
    params: &'a BucketParams,
}

impl<'a> Bucket<'a> {
    pub(crate) fn new(params: &'a BucketParams) -> Self {
        Self { params }
    }

    fn label(&self, value: f64) -> Result<String> {
        if value.is_nan() {
            return Err(TransformError::OutOfRange(value.to_string()));
        }
        match self.params {
            BucketParams::Width(buckets) => width_label(buckets, value),
            BucketParams::Edges(buckets) => edge_label(buckets, value),
        }
    }
}

fn width_label(buckets: &WidthBuckets, value: f64) -> Result<String> {
    let index = ((value - buckets.origin) / buckets.width).floor();
    let lower = buckets.origin + index * buckets.width;
    let upper = lower + buckets.width;
    if !lower.is_finite() || !upper.is_finite() {
        return Err(TransformError::OutOfRange(value.to_string()));
    }
    Ok(format!("{}-{}", format_number(lower), format_number(upper)))
}

/// Labels a non-NaN value. Infinities fall in the open-ended outer buckets.
fn edge_label(buckets: &EdgeBuckets, value: f64) -> Result<String> {
    let edges = &buckets.edges;
    // edges are validated to hold at least two strictly increasing numbers
    let (first, last) = (edges[0], edges[edges.len() - 1]);
    if value < first {
        return Ok(format!("<{}", format_number(first)));
    }
    if value >= last {
        return Ok(format!(">={}", format_number(last)));
    }
    let upper = edges.partition_point(|edge| *edge <= value);
    Ok(format!(
        "{}-{}",
        format_number(edges[upper - 1]),
        format_number(edges[upper])
    ))
}

impl ColumnTransform for Bucket<'_> {
    fn output_type(&self, _input: ColumnType) -> ColumnType {
        ColumnType::Text
    }

    fn apply(&self, column: &Column, _rng: &mut StdRng) -> Result<Vec<Value>> {
        let column_type = column.column_type();
        map_values(column, |value| {
            let number = number(value, column_type)?;
            self.label(number).map(Value::Text)
        })
    }
}
