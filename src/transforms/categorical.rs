use rand::rngs::StdRng;
use std::collections::HashMap;

use super::{map_values, ColumnTransform, Result};
use crate::dataset::{Column, ColumnType, Value};
use crate::methods::{CategoricalParams, CategoryThreshold};

/// Collapses rare categories into a single label.
pub(crate) struct Categorical<'a> {
    params: &'a CategoricalParams,
}

impl<'a> Categorical<'a> {
    pub(crate) fn new(params: &'a CategoricalParams) -> Self {
        Self { params }
    }

    fn is_rare(&self, count: usize, total: usize) -> bool {
        match self.params.threshold {
            CategoryThreshold::MinCount(min) => count < min,
            CategoryThreshold::MinFrequency(min) => (count as f64) < min * total as f64,
        }
    }
}

impl ColumnTransform for Categorical<'_> {
    fn output_type(&self, _input: ColumnType) -> ColumnType {
        ColumnType::Text
    }

    fn apply(&self, column: &Column, _rng: &mut StdRng) -> Result<Vec<Value>> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in column.values().iter().filter(|v| !v.is_null()) {
            *counts.entry(value.to_string()).or_default() += 1;
        }
        let total: usize = counts.values().sum();
        map_values(column, |value| {
            let category = value.to_string();
            let count = counts.get(&category).copied().unwrap_or_default();
            if self.is_rare(count, total) {
                Ok(Value::Text(self.params.other_label.clone()))
            } else {
                Ok(Value::Text(category))
            }
        })
    }
}
