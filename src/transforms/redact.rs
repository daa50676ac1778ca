use rand::rngs::StdRng;
use rand::Rng;

use super::{ColumnTransform, Result};
use crate::dataset::{Column, Value};
use crate::methods::RedactParams;

/// Replaces values, nulls included, with a constant (or null) with the configured probability.
pub(crate) struct Redact<'a> {
    params: &'a RedactParams,
}

impl<'a> Redact<'a> {
    pub(crate) fn new(params: &'a RedactParams) -> Self {
        Self { params }
    }
}

impl ColumnTransform for Redact<'_> {
    fn apply(&self, column: &Column, rng: &mut StdRng) -> Result<Vec<Value>> {
        let probability = self.params.probability;
        Ok(column
            .values()
            .iter()
            .map(|value| {
                if probability >= 1.0 || rng.gen_bool(probability) {
                    self.params.value.clone()
                } else {
                    value.clone()
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColumnType;
    use crate::rng;

    fn params(value: Value, probability: f64) -> RedactParams {
        RedactParams {
            value,
            probability,
            seed: None,
        }
    }

    #[test]
    fn test_redact_to_null() {
        let params = params(Value::Null, 1.0);
        let column = Column::from_texts("ssn", ["123", "456"]);
        let result = Redact::new(&params)
            .apply(&column, &mut rng::stream(0, "ssn"))
            .unwrap();
        assert_eq!(result, vec![Value::Null, Value::Null]);
    }

    #[test]
    fn test_redact_constant_replaces_nulls() {
        let params = params(Value::Integer(0), 1.0);
        let column = Column::new(
            "n",
            ColumnType::Integer,
            vec![Value::Integer(5), Value::Null],
        )
        .unwrap();
        let result = Redact::new(&params)
            .apply(&column, &mut rng::stream(0, "n"))
            .unwrap();
        assert_eq!(result, vec![Value::Integer(0), Value::Integer(0)]);
    }

    #[test]
    fn test_zero_probability_keeps_values() {
        let params = params(Value::Null, 0.0);
        let column = Column::from_integers("n", [1, 2, 3]);
        let result = Redact::new(&params)
            .apply(&column, &mut rng::stream(0, "n"))
            .unwrap();
        assert_eq!(result, column.values());
    }

    #[test]
    fn test_partial_redaction() {
        let params = params(Value::Null, 0.5);
        let column = Column::from_integers("n", 0..1000);
        let result = Redact::new(&params)
            .apply(&column, &mut rng::stream(11, "n"))
            .unwrap();
        let redacted = result.iter().filter(|v| v.is_null()).count();
        assert!((400..600).contains(&redacted), "redacted {redacted}");
    }
}
