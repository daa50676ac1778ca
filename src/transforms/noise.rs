use chrono::TimeDelta;
use rand::rngs::StdRng;

use super::{number, numeric_value, unexpected, ColumnTransform, Result, TransformError};
use crate::dataset::{Column, ColumnType, Value};
use crate::methods::{Distribution, NoiseMode, NoiseParams};
use crate::rng::{standard_laplace, standard_normal, symmetric_uniform};

pub(crate) struct Noise<'a> {
    params: &'a NoiseParams,
}

impl<'a> Noise<'a> {
    pub(crate) fn new(params: &'a NoiseParams) -> Self {
        Self { params }
    }

    fn sample(&self, rng: &mut StdRng) -> f64 {
        let standard = match self.params.distribution {
            Distribution::Gaussian => standard_normal(rng),
            Distribution::Laplace => standard_laplace(rng),
            Distribution::Uniform => symmetric_uniform(rng),
        };
        self.params.mean + self.params.scale * standard
    }

    fn perturb(&self, value: f64, noise: f64) -> f64 {
        let result = match self.params.mode {
            NoiseMode::Additive => value + noise,
            NoiseMode::Multiplicative => value * (1.0 + noise),
        };
        let result = self.params.clamp_min.map_or(result, |min| result.max(min));
        self.params.clamp_max.map_or(result, |max| result.min(max))
    }
}

impl ColumnTransform for Noise<'_> {
    fn apply(&self, column: &Column, rng: &mut StdRng) -> Result<Vec<Value>> {
        let column_type = column.column_type();
        column
            .values()
            .iter()
            .map(|value| {
                // drawn for null rows too, so correlated columns stay aligned row by row
                let noise = self.sample(rng);
                match (value, column_type) {
                    (Value::Null, _) => Ok(Value::Null),
                    (Value::Integer(_) | Value::Float(_), _) => {
                        let number = number(value, column_type)?;
                        numeric_value(self.perturb(number, noise), column_type)
                    }
                    (Value::Date(date), ColumnType::Date) => {
                        let seconds = (noise * self.params.unit.seconds() as f64).round();
                        let shifted = Some(seconds)
                            .filter(|s| s.is_finite() && s.abs() < i64::MAX as f64)
                            .and_then(|s| TimeDelta::try_seconds(s as i64))
                            .and_then(|delta| date.checked_add_signed(delta))
                            .ok_or_else(|| TransformError::OutOfRange(date.to_rfc3339()))?;
                        Ok(Value::Date(shifted))
                    }
                    _ => Err(unexpected(value, column_type)),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::parse_date;
    use crate::methods::TimeUnit;
    use crate::rng;

    fn params(distribution: Distribution, scale: f64) -> NoiseParams {
        NoiseParams {
            distribution,
            mode: NoiseMode::Additive,
            mean: 0.0,
            scale,
            unit: TimeUnit::Day,
            clamp_min: None,
            clamp_max: None,
            seed: None,
            correlation: None,
        }
    }

    fn floats(values: &[Value]) -> Vec<f64> {
        values.iter().filter_map(Value::as_f64).collect()
    }

    #[test]
    fn test_same_seed_same_noise() {
        let params = params(Distribution::Gaussian, 5.0);
        let noise = Noise::new(&params);
        let column = Column::from_floats("salary", [1000.0, 2000.0, 3000.0]);
        let first = noise.apply(&column, &mut rng::stream(42, "salary")).unwrap();
        let second = noise.apply(&column, &mut rng::stream(42, "salary")).unwrap();
        assert_eq!(first, second);
        assert_ne!(floats(&first), vec![1000.0, 2000.0, 3000.0]);
    }

    #[test]
    fn test_uniform_noise_stays_within_scale() {
        let params = params(Distribution::Uniform, 3.0);
        let noise = Noise::new(&params);
        let column = Column::from_floats("x", vec![100.0; 500]);
        let result = noise.apply(&column, &mut rng::stream(1, "x")).unwrap();
        assert!(floats(&result).iter().all(|v| (97.0..=103.0).contains(v)));
    }

    #[test]
    fn test_integer_noise_stays_integer() {
        let params = params(Distribution::Laplace, 2.0);
        let noise = Noise::new(&params);
        let column = Column::from_integers("age", [30, 40, 50]);
        let result = noise.apply(&column, &mut rng::stream(3, "age")).unwrap();
        assert!(result.iter().all(|v| matches!(v, Value::Integer(_))));
    }

    #[test]
    fn test_nulls_are_kept() {
        let params = params(Distribution::Gaussian, 1.0);
        let noise = Noise::new(&params);
        let column = Column::new("x", ColumnType::Float, vec![Value::Null, Value::Float(1.0)])
            .unwrap();
        let result = noise.apply(&column, &mut rng::stream(3, "x")).unwrap();
        assert_eq!(result[0], Value::Null);
    }

    #[test]
    fn test_clamping() {
        let mut params = params(Distribution::Gaussian, 100.0);
        params.clamp_min = Some(0.0);
        params.clamp_max = Some(10.0);
        let noise = Noise::new(&params);
        let column = Column::from_floats("x", vec![5.0; 200]);
        let result = noise.apply(&column, &mut rng::stream(5, "x")).unwrap();
        assert!(floats(&result).iter().all(|v| (0.0..=10.0).contains(v)));
    }

    #[test]
    fn test_multiplicative_noise() {
        let mut params = params(Distribution::Uniform, 0.1);
        params.mode = NoiseMode::Multiplicative;
        let noise = Noise::new(&params);
        let column = Column::from_floats("x", vec![1000.0; 200]);
        let result = noise.apply(&column, &mut rng::stream(6, "x")).unwrap();
        assert!(floats(&result).iter().all(|v| (900.0..=1100.0).contains(v)));
    }

    #[test]
    fn test_correlated_columns_share_noise() {
        let params = params(Distribution::Gaussian, 10.0);
        let noise = Noise::new(&params);
        let a = Column::from_floats("a", [0.0, 0.0, 0.0]);
        let b = Column::from_floats("b", [100.0, 100.0, 100.0]);
        let a = floats(&noise.apply(&a, &mut rng::stream(9, "group")).unwrap());
        let b = floats(&noise.apply(&b, &mut rng::stream(9, "group")).unwrap());
        for (x, y) in a.iter().zip(&b) {
            assert!((y - x - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_date_noise_by_hour() {
        let mut params = params(Distribution::Uniform, 2.0);
        params.unit = TimeUnit::Hour;
        let noise = Noise::new(&params);
        let date = parse_date("2020-06-01T12:00:00+00:00").unwrap();
        let column = Column::new("d", ColumnType::Date, vec![Value::Date(date); 50]).unwrap();
        let result = noise.apply(&column, &mut rng::stream(7, "d")).unwrap();
        for value in result {
            let Value::Date(shifted) = value else {
                panic!("expected a date");
            };
            assert!((shifted - date).num_seconds().abs() <= 2 * 3_600);
        }
    }
}
