use std::fmt;

use super::params::{self, RawParameters};
use super::{Method, ValidationError};
use crate::dataset::ColumnType;

const NUMERIC: &[ColumnType] = &[ColumnType::Integer, ColumnType::Float];
const ALL_TYPES: &[ColumnType] = &[
    ColumnType::Integer,
    ColumnType::Float,
    ColumnType::Text,
    ColumnType::Date,
];

/// Identifies a built-in anonymization method.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum MethodKind {
    Noise,
    Bucket,
    Round,
    Aggregate,
    Rescale,
    Hash,
    Redact,
    DateShift,
    Categorical,
    MaskWords,
    TokenizeWords,
    Regex,
}

/// The JSON shape a parameter value must have.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ParameterKind {
    Number,
    Integer,
    UnsignedInteger,
    Boolean,
    Text,
    TextList,
    NumberList,
    Scalar,
    /// A number, or an object such as `{"precision": 2, "unit": "Day"}`.
    Duration,
}

impl ParameterKind {
    pub(crate) fn accepts(&self, value: &serde_json::Value) -> bool {
        use serde_json::Value as Json;
        match self {
            ParameterKind::Number => value.is_number(),
            ParameterKind::Integer => value.is_i64() || value.is_u64(),
            ParameterKind::UnsignedInteger => value.is_u64(),
            ParameterKind::Boolean => value.is_boolean(),
            ParameterKind::Text => value.is_string(),
            ParameterKind::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Json::is_string)),
            ParameterKind::NumberList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Json::is_number)),
            ParameterKind::Scalar => {
                matches!(value, Json::String(_) | Json::Number(_) | Json::Bool(_))
            }
            ParameterKind::Duration => {
                value.is_number()
                    || value.as_object().is_some_and(|object| {
                        object.get("precision").is_some_and(Json::is_number)
                            && object.get("unit").is_some_and(Json::is_string)
                    })
            }
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            ParameterKind::Number => "a number",
            ParameterKind::Integer => "an integer",
            ParameterKind::UnsignedInteger => "a non-negative integer",
            ParameterKind::Boolean => "a boolean",
            ParameterKind::Text => "a string",
            ParameterKind::TextList => "a list of strings",
            ParameterKind::NumberList => "a list of numbers",
            ParameterKind::Scalar => "a string, number or boolean",
            ParameterKind::Duration => "a number or a duration with `precision` and `unit`",
        };
        f.write_str(description)
    }
}

/// Schema of a single method parameter.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParameterKind,
    pub required: bool,
    /// Alternative (snake_case) names accepted for this parameter.
    pub aliases: &'static [&'static str],
}

impl ParameterSpec {
    const fn required(name: &'static str, kind: ParameterKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            aliases: &[],
        }
    }

    const fn optional(name: &'static str, kind: ParameterKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            aliases: &[],
        }
    }

    const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }
}

type BuildFn = fn(&RawParameters<'_>, ColumnType) -> Result<Method, ValidationError>;

/// A method registered under a string identifier.
pub struct MethodEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub kind: MethodKind,
    pub parameters: &'static [ParameterSpec],
    pub column_types: &'static [ColumnType],
    pub(crate) build: BuildFn,
}

impl MethodEntry {
    pub fn accepts(&self, column_type: ColumnType) -> bool {
        self.column_types.contains(&column_type)
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    fn matches(&self, method_id: &str) -> bool {
        self.name == method_id || self.aliases.contains(&method_id)
    }
}

impl fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parameters", &self.parameters)
            .field("column_types", &self.column_types)
            .finish_non_exhaustive()
    }
}

use ParameterKind::{
    Boolean, Duration, Integer, Number, NumberList, Scalar, Text, TextList, UnsignedInteger,
};

/// All built-in methods. The table is fixed at compile time.
pub static METHODS: [MethodEntry; 12] = [
    MethodEntry {
        name: "noise",
        aliases: &["noise_integer", "noise_float", "noise_date", "add_noise"],
        kind: MethodKind::Noise,
        parameters: &[
            ParameterSpec::optional("distribution", Text),
            ParameterSpec::optional("scale", Duration).aliases(&["std_dev"]),
            ParameterSpec::optional("mean", Duration),
            ParameterSpec::optional("lower_boundary", Duration),
            ParameterSpec::optional("upper_boundary", Duration),
            ParameterSpec::optional("mode", Text),
            ParameterSpec::optional("unit", Text),
            ParameterSpec::optional("clamp_min", Number),
            ParameterSpec::optional("clamp_max", Number),
            ParameterSpec::optional("seed", UnsignedInteger),
            ParameterSpec::optional("correlation", Text),
        ],
        column_types: &[ColumnType::Integer, ColumnType::Float, ColumnType::Date],
        build: params::build_noise,
    },
    MethodEntry {
        name: "bucket",
        aliases: &["bucketing", "generalize"],
        kind: MethodKind::Bucket,
        parameters: &[
            ParameterSpec::optional("width", Number).aliases(&["bucket_width"]),
            ParameterSpec::optional("edges", NumberList).aliases(&["bucket_edges"]),
            ParameterSpec::optional("origin", Number),
        ],
        column_types: NUMERIC,
        build: params::build_bucket,
    },
    MethodEntry {
        name: "round",
        aliases: &["rounding"],
        kind: MethodKind::Round,
        parameters: &[ParameterSpec::required("precision", Integer)],
        column_types: NUMERIC,
        build: params::build_round,
    },
    MethodEntry {
        name: "aggregate",
        aliases: &["aggregation_integer", "aggregation_float", "aggregation_date"],
        kind: MethodKind::Aggregate,
        parameters: &[
            ParameterSpec::optional("power_of_ten", Integer),
            ParameterSpec::optional("time_unit", Text),
        ],
        column_types: &[ColumnType::Integer, ColumnType::Float, ColumnType::Date],
        build: params::build_aggregate,
    },
    MethodEntry {
        name: "rescale",
        aliases: &["rescaling_integer", "rescaling_float"],
        kind: MethodKind::Rescale,
        parameters: &[
            ParameterSpec::required("mean", Number),
            ParameterSpec::required("std_dev", Number),
            ParameterSpec::optional("scale", Number),
            ParameterSpec::optional("translation", Number),
        ],
        column_types: NUMERIC,
        build: params::build_rescale,
    },
    MethodEntry {
        name: "hash",
        aliases: &["tokenize"],
        kind: MethodKind::Hash,
        parameters: &[
            ParameterSpec::optional("salt", Text).aliases(&["salt_value"]),
            ParameterSpec::optional("algorithm", Text).aliases(&["hash_type"]),
            ParameterSpec::optional("length", UnsignedInteger),
        ],
        column_types: ALL_TYPES,
        build: params::build_hash,
    },
    MethodEntry {
        name: "redact",
        aliases: &["redaction", "suppress"],
        kind: MethodKind::Redact,
        parameters: &[
            ParameterSpec::optional("value", Scalar).aliases(&["replacement"]),
            ParameterSpec::optional("probability", Number),
            ParameterSpec::optional("seed", UnsignedInteger),
        ],
        column_types: ALL_TYPES,
        build: params::build_redact,
    },
    MethodEntry {
        name: "date_shift",
        aliases: &["shift_date"],
        kind: MethodKind::DateShift,
        parameters: &[
            ParameterSpec::required("max_offset_days", Integer),
            ParameterSpec::optional("salt", Text),
            ParameterSpec::optional("consistent", Boolean),
            ParameterSpec::optional("seed", UnsignedInteger),
        ],
        column_types: &[ColumnType::Date],
        build: params::build_date_shift,
    },
    MethodEntry {
        name: "categorical",
        aliases: &["categorical_generalization", "generalize_categories"],
        kind: MethodKind::Categorical,
        parameters: &[
            ParameterSpec::optional("min_count", UnsignedInteger),
            ParameterSpec::optional("min_frequency", Number),
            ParameterSpec::optional("other_label", Text),
        ],
        column_types: &[ColumnType::Text, ColumnType::Integer],
        build: params::build_categorical,
    },
    MethodEntry {
        name: "mask_words",
        aliases: &[],
        kind: MethodKind::MaskWords,
        parameters: &[
            ParameterSpec::required("words", TextList),
            ParameterSpec::optional("mask", Text),
        ],
        column_types: &[ColumnType::Text],
        build: params::build_mask_words,
    },
    MethodEntry {
        name: "tokenize_words",
        aliases: &[],
        kind: MethodKind::TokenizeWords,
        parameters: &[
            ParameterSpec::required("words", TextList),
            ParameterSpec::optional("salt", Text),
        ],
        column_types: &[ColumnType::Text],
        build: params::build_tokenize_words,
    },
    MethodEntry {
        name: "regex",
        aliases: &["mask_pattern"],
        kind: MethodKind::Regex,
        parameters: &[
            ParameterSpec::required("pattern", Text),
            ParameterSpec::optional("replace", Text).aliases(&["replace_str"]),
        ],
        column_types: &[ColumnType::Text],
        build: params::build_regex,
    },
];

/// Looks up a method by identifier.
///
/// Identifiers are matched after conversion to snake_case, so `"MaskWords"` and `"mask_words"`
/// name the same method.
pub fn lookup(method_id: &str) -> Result<&'static MethodEntry, ValidationError> {
    let normalized = params::to_snake_case(method_id.trim());
    METHODS
        .iter()
        .find(|entry| entry.matches(&normalized))
        .ok_or_else(|| ValidationError::UnknownMethod(method_id.into()))
}
