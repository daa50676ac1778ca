use rand::rngs::StdRng;

use super::{map_values, number, numeric_value, ColumnTransform, Result};
use crate::dataset::{Column, Value};
use crate::methods::RescaleParams;

pub(crate) struct Rescale<'a> {
    params: &'a RescaleParams,
}

impl<'a> Rescale<'a> {
    pub(crate) fn new(params: &'a RescaleParams) -> Self {
        Self { params }
    }
}

impl ColumnTransform for Rescale<'_> {
    fn apply(&self, column: &Column, _rng: &mut StdRng) -> Result<Vec<Value>> {
        let column_type = column.column_type();
        let RescaleParams {
            mean,
            std_dev,
            scale,
            translation,
        } = *self.params;
        map_values(column, |value| {
            let v = number(value, column_type)?;
            numeric_value((v - mean) / std_dev * scale + translation, column_type)
        })
    }
}
