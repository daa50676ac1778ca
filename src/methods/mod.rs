//! Anonymization methods: the registry of known methods and the validation of their parameters.
//!
//! A column rule names a method and carries an untyped parameter mapping. [`validate`] turns it
//! into a [`Method`], which holds typed, range-checked parameters and is the only thing the
//! transforms ever see.
//!
//! ```
//! use serde_json::json;
//! use tabular_anonymization::dataset::ColumnType;
//! use tabular_anonymization::methods::{validate, Method, ValidationError};
//!
//! let params = json!({"width": 10});
//! let method = validate("bucket", params.as_object().unwrap(), ColumnType::Integer).unwrap();
//! assert!(matches!(method, Method::Bucket(_)));
//!
//! let params = json!({"width": -1});
//! let err = validate("bucket", params.as_object().unwrap(), ColumnType::Integer).unwrap_err();
//! assert!(matches!(err, ValidationError::InvalidParameterRange { .. }));
//! ```

pub mod params;
pub mod registry;

use serde_json::{Map, Value as Json};
use thiserror::Error;

use crate::dataset::ColumnType;
pub use params::{
    AggregateParams, BucketParams, CategoricalParams, CategoryThreshold, DateShiftParams,
    Distribution, EdgeBuckets, HashParams, MaskWordsParams, NoiseMode, NoiseParams, RedactParams,
    RegexParams, RescaleParams, RoundParams, TimeUnit, TokenizeWordsParams, WidthBuckets,
    WordMatcher,
};
pub use registry::{lookup, MethodEntry, MethodKind, ParameterKind, ParameterSpec, METHODS};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("column `{0}` does not exist in the dataset")]
    UnknownColumn(String),

    #[error("unknown anonymization method `{0}`")]
    UnknownMethod(String),

    #[error("missing required parameter `{0}`")]
    MissingParameter(String),

    #[error("parameter `{parameter}` must be {expected}")]
    InvalidParameterType { parameter: String, expected: String },

    #[error("parameter `{parameter}` is out of range: {reason}")]
    InvalidParameterRange { parameter: String, reason: String },

    #[error("method `{method}` cannot be applied to a {column_type} column")]
    IncompatibleColumnType {
        method: String,
        column_type: ColumnType,
    },
}

/// A validated anonymization rule: the method together with its typed parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Method {
    Noise(NoiseParams),
    Bucket(BucketParams),
    Round(RoundParams),
    Aggregate(AggregateParams),
    Rescale(RescaleParams),
    Hash(HashParams),
    Redact(RedactParams),
    DateShift(DateShiftParams),
    Categorical(CategoricalParams),
    MaskWords(MaskWordsParams),
    TokenizeWords(TokenizeWordsParams),
    Regex(RegexParams),
}

impl Method {
    pub fn kind(&self) -> MethodKind {
        match self {
            Method::Noise(_) => MethodKind::Noise,
            Method::Bucket(_) => MethodKind::Bucket,
            Method::Round(_) => MethodKind::Round,
            Method::Aggregate(_) => MethodKind::Aggregate,
            Method::Rescale(_) => MethodKind::Rescale,
            Method::Hash(_) => MethodKind::Hash,
            Method::Redact(_) => MethodKind::Redact,
            Method::DateShift(_) => MethodKind::DateShift,
            Method::Categorical(_) => MethodKind::Categorical,
            Method::MaskWords(_) => MethodKind::MaskWords,
            Method::TokenizeWords(_) => MethodKind::TokenizeWords,
            Method::Regex(_) => MethodKind::Regex,
        }
    }

    /// Explicit per-rule seed, if the method is randomized and one was configured.
    pub(crate) fn seed(&self) -> Option<u64> {
        match self {
            Method::Noise(params) => params.seed,
            Method::Redact(params) => params.seed,
            Method::DateShift(params) => params.seed,
            _ => None,
        }
    }

    /// Key of the random stream this method draws from; defaults to the column name.
    pub(crate) fn stream_key<'a>(&'a self, column: &'a str) -> &'a str {
        match self {
            Method::Noise(NoiseParams {
                correlation: Some(group),
                ..
            }) => group.as_str(),
            _ => column,
        }
    }
}

/// Validates the raw parameters of `method_id` for a column of `column_type`.
pub fn validate(
    method_id: &str,
    parameters: &Map<String, Json>,
    column_type: ColumnType,
) -> Result<Method, ValidationError> {
    let entry = lookup(method_id)?;
    if !entry.accepts(column_type) {
        return Err(ValidationError::IncompatibleColumnType {
            method: entry.name.into(),
            column_type,
        });
    }
    let raw = params::RawParameters::new(entry, parameters)?;
    (entry.build)(&raw, column_type)
}
