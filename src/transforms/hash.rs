use rand::rngs::StdRng;

use super::{map_values, ColumnTransform, Result};
use crate::dataset::{Column, ColumnType, Value};
use crate::methods::HashParams;

pub(crate) fn truncate_to(n: usize, s: &str) -> String {
    s.chars().take(n).collect()
}

/// Replaces every value with the hex digest of its salted canonical string form.
pub(crate) struct Hash<'a> {
    params: &'a HashParams,
}

impl<'a> Hash<'a> {
    pub(crate) fn new(params: &'a HashParams) -> Self {
        Self { params }
    }

    fn hash(&self, value: &Value) -> Result<String> {
        let hasher = self.params.algorithm.hasher();
        let digest = hasher.hash(self.params.salt.as_bytes(), &value.to_string())?;
        Ok(match self.params.length {
            Some(length) => truncate_to(length, &digest),
            None => digest,
        })
    }
}

impl ColumnTransform for Hash<'_> {
    fn output_type(&self, _input: ColumnType) -> ColumnType {
        ColumnType::Text
    }

    fn apply(&self, column: &Column, _rng: &mut StdRng) -> Result<Vec<Value>> {
        map_values(column, |value| self.hash(value).map(Value::Text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashAlgorithm;
    use crate::rng;
    use crate::transforms::TransformError;

    fn params(salt: &str, algorithm: HashAlgorithm, length: Option<usize>) -> HashParams {
        HashParams {
            salt: salt.into(),
            algorithm,
            length,
        }
    }

    #[test]
    fn test_truncate_to() {
        assert_eq!(truncate_to(3, "12345"), "123");
        assert_eq!(truncate_to(10, "12345"), "12345");
        assert!(truncate_to(0, "12345").is_empty());
    }

    #[test]
    fn test_hash_is_deterministic() {
        let params = params("abc", HashAlgorithm::Sha256, None);
        let column = Column::from_texts("name", ["alice", "bob", "alice"]);
        let first = Hash::new(&params)
            .apply(&column, &mut rng::stream(1, "name"))
            .unwrap();
        let second = Hash::new(&params)
            .apply(&column, &mut rng::stream(2, "name"))
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0], first[2]);
        assert_ne!(first[0], first[1]);
        assert_eq!(first[0].to_string().len(), 64);
    }

    #[test]
    fn test_salt_changes_output() {
        let column = Column::from_texts("name", ["alice"]);
        let abc = params("abc", HashAlgorithm::Blake3, None);
        let def = params("def", HashAlgorithm::Blake3, None);
        let a = Hash::new(&abc)
            .apply(&column, &mut rng::stream(0, "name"))
            .unwrap();
        let b = Hash::new(&def)
            .apply(&column, &mut rng::stream(0, "name"))
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_digest() {
        // sha256("")
        let params = params("", HashAlgorithm::Sha256, Some(16));
        let column = Column::from_texts("x", [""]);
        let result = Hash::new(&params)
            .apply(&column, &mut rng::stream(0, "x"))
            .unwrap();
        assert_eq!(result, vec![Value::Text("e3b0c44298fc1c14".into())]);
    }

    #[test]
    fn test_sha3_and_argon2() {
        let column = Column::from_texts("name", ["alice", "alice"]);
        let sha3 = params("abc", HashAlgorithm::Sha3, None);
        let result = Hash::new(&sha3)
            .apply(&column, &mut rng::stream(0, "name"))
            .unwrap();
        assert_eq!(result[0].to_string().len(), 64);

        let argon2 = params("a long salt", HashAlgorithm::Argon2, Some(20));
        let result = Hash::new(&argon2)
            .apply(&column, &mut rng::stream(0, "name"))
            .unwrap();
        assert_eq!(result[0], result[1]);
        assert_eq!(result[0].to_string().len(), 20);
    }

    #[test]
    fn test_argon2_short_salt_fails() {
        let params = params("abc", HashAlgorithm::Argon2, None);
        let column = Column::from_texts("name", ["alice"]);
        let result = Hash::new(&params).apply(&column, &mut rng::stream(0, "name"));
        assert!(matches!(result, Err(TransformError::Hash(_))));
    }

    #[test]
    fn test_integers_hash_their_decimal_form() {
        let params = params("s", HashAlgorithm::Sha512, None);
        let hash = Hash::new(&params);
        assert_eq!(
            hash.hash(&Value::Integer(42)),
            hash.hash(&Value::Text("42".into()))
        );
    }
}
