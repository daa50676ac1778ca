use rand::rngs::StdRng;
use regex::Captures;

use super::hash::truncate_to;
use super::{map_values, unexpected, ColumnTransform, Result};
use crate::dataset::{Column, Value};
use crate::hashing::blake3_hex;
use crate::methods::{MaskWordsParams, TokenizeWordsParams, WordMatcher};

const TOKEN_LENGTH: usize = 16;

fn replace_words<F>(column: &Column, matcher: &WordMatcher, replacement: F) -> Result<Vec<Value>>
where
    F: Fn(&Captures<'_>) -> String,
{
    map_values(column, |value| match value {
        Value::Text(text) => Ok(Value::Text(
            matcher.regex().replace_all(text, &replacement).into_owned(),
        )),
        other => Err(unexpected(other, column.column_type())),
    })
}

pub(crate) struct MaskWords<'a> {
    params: &'a MaskWordsParams,
}

impl<'a> MaskWords<'a> {
    pub(crate) fn new(params: &'a MaskWordsParams) -> Self {
        Self { params }
    }
}

impl ColumnTransform for MaskWords<'_> {
    fn apply(&self, column: &Column, _rng: &mut StdRng) -> Result<Vec<Value>> {
        replace_words(column, &self.params.matcher, |_| self.params.mask.clone())
    }
}

/// Replaces listed words with a salted token, the same token for every casing of a word.
pub(crate) struct TokenizeWords<'a> {
    params: &'a TokenizeWordsParams,
}

impl<'a> TokenizeWords<'a> {
    pub(crate) fn new(params: &'a TokenizeWordsParams) -> Self {
        Self { params }
    }

    fn token(&self, word: &str) -> String {
        let digest = blake3_hex(self.params.salt.as_bytes(), &word.to_lowercase());
        truncate_to(TOKEN_LENGTH, &digest)
    }
}

impl ColumnTransform for TokenizeWords<'_> {
    fn apply(&self, column: &Column, _rng: &mut StdRng) -> Result<Vec<Value>> {
        replace_words(column, &self.params.matcher, |caps| self.token(&caps[0]))
    }
}
