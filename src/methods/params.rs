//! Typed parameter objects and the constructors that build them from raw configuration values.

use garde::Validate;
use log::warn;
use regex::Regex;
use serde_json::{Map, Value as Json};
use std::fmt;
use std::str::FromStr;

use super::registry::MethodEntry;
use super::{Method, ValidationError};
use crate::dataset::{parse_date, ColumnType, Value};
use crate::hashing::HashAlgorithm;

const DEFAULT_MASK: &str = "XXXX";
const DEFAULT_OTHER_LABEL: &str = "Other";
const MAX_PRECISION: i32 = 15;

/// Converts `camelCase` and `PascalCase` identifiers to `snake_case`.
pub(crate) fn to_snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Raw parameters of a single rule, keyed by canonical parameter name.
#[derive(Debug)]
pub(crate) struct RawParameters<'a> {
    values: Map<String, Json>,
    entry: &'a MethodEntry,
}

impl<'a> RawParameters<'a> {
    /// Normalizes parameter names and checks presence and JSON shape against the method schema.
    ///
    /// Parameters unknown to the method are dropped with a warning.
    pub(crate) fn new(entry: &'a MethodEntry, raw: &Map<String, Json>) -> Result<Self, ValidationError> {
        let mut values = Map::new();
        for (key, value) in raw {
            let key = to_snake_case(key);
            let spec = entry
                .parameters
                .iter()
                .find(|spec| spec.name == key || spec.aliases.contains(&key.as_str()));
            match spec {
                // `null` counts as absent
                Some(spec) if !value.is_null() => {
                    values.insert(spec.name.into(), value.clone());
                }
                Some(_) => {}
                None => warn!(
                    "ignoring parameter `{}` which is not used by method `{}`",
                    key, entry.name
                ),
            }
        }

        for spec in entry.parameters {
            match values.get(spec.name) {
                None if spec.required => {
                    return Err(ValidationError::MissingParameter(spec.name.into()))
                }
                Some(value) if !spec.kind.accepts(value) => {
                    return Err(ValidationError::InvalidParameterType {
                        parameter: spec.name.into(),
                        expected: spec.kind.to_string(),
                    })
                }
                _ => {}
            }
        }

        Ok(Self { values, entry })
    }

    fn get(&self, name: &str) -> Option<&Json> {
        self.values.get(name)
    }

    fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn invalid_type(&self, name: &str) -> ValidationError {
        let expected = self
            .entry
            .parameter(name)
            .map_or_else(|| "a valid value".to_string(), |spec| spec.kind.to_string());
        ValidationError::InvalidParameterType {
            parameter: name.into(),
            expected,
        }
    }

    fn number(&self, name: &str) -> Result<Option<f64>, ValidationError> {
        self.get(name)
            .map(|v| v.as_f64().ok_or_else(|| self.invalid_type(name)))
            .transpose()
    }

    fn require_number(&self, name: &str) -> Result<f64, ValidationError> {
        self.number(name)?
            .ok_or_else(|| ValidationError::MissingParameter(name.into()))
    }

    fn integer(&self, name: &str) -> Result<Option<i64>, ValidationError> {
        self.get(name)
            .map(|v| v.as_i64().ok_or_else(|| self.invalid_type(name)))
            .transpose()
    }

    fn require_integer(&self, name: &str) -> Result<i64, ValidationError> {
        self.integer(name)?
            .ok_or_else(|| ValidationError::MissingParameter(name.into()))
    }

    fn unsigned(&self, name: &str) -> Result<Option<u64>, ValidationError> {
        self.get(name)
            .map(|v| v.as_u64().ok_or_else(|| self.invalid_type(name)))
            .transpose()
    }

    fn boolean(&self, name: &str) -> Result<Option<bool>, ValidationError> {
        self.get(name)
            .map(|v| v.as_bool().ok_or_else(|| self.invalid_type(name)))
            .transpose()
    }

    fn text(&self, name: &str) -> Result<Option<String>, ValidationError> {
        self.get(name)
            .map(|v| {
                v.as_str()
                    .map(String::from)
                    .ok_or_else(|| self.invalid_type(name))
            })
            .transpose()
    }

    fn require_text(&self, name: &str) -> Result<String, ValidationError> {
        self.text(name)?
            .ok_or_else(|| ValidationError::MissingParameter(name.into()))
    }

    fn list<T>(
        &self,
        name: &str,
        item: impl Fn(&Json) -> Option<T>,
    ) -> Result<Option<Vec<T>>, ValidationError> {
        self.get(name)
            .map(|v| {
                v.as_array()
                    .and_then(|items| items.iter().map(&item).collect::<Option<Vec<T>>>())
                    .ok_or_else(|| self.invalid_type(name))
            })
            .transpose()
    }

    fn require_text_list(&self, name: &str) -> Result<Vec<String>, ValidationError> {
        self.list(name, |v| v.as_str().map(String::from))?
            .ok_or_else(|| ValidationError::MissingParameter(name.into()))
    }

    /// Parses a string parameter into one of a fixed set of choices.
    fn choice<T>(&self, name: &str) -> Result<Option<T>, ValidationError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        self.text(name)?
            .map(|text| {
                text.parse::<T>()
                    .map_err(|err| out_of_range(name, err.to_string()))
            })
            .transpose()
    }

    /// A length of time in `unit`s. Date columns also accept a `{precision, unit}` object, which
    /// is converted to `unit`s.
    fn duration(
        &self,
        name: &str,
        column_type: ColumnType,
        unit: TimeUnit,
    ) -> Result<Option<f64>, ValidationError> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        if let Some(number) = value.as_f64() {
            return Ok(Some(number));
        }
        if column_type != ColumnType::Date {
            return Err(ValidationError::InvalidParameterType {
                parameter: name.into(),
                expected: "a number".into(),
            });
        }
        let precision = value
            .get("precision")
            .and_then(Json::as_f64)
            .ok_or_else(|| self.invalid_type(name))?;
        let given: TimeUnit = value
            .get("unit")
            .and_then(Json::as_str)
            .ok_or_else(|| self.invalid_type(name))?
            .parse()
            .map_err(|err: String| out_of_range(name, err))?;
        Ok(Some(
            precision * given.seconds() as f64 / unit.seconds() as f64,
        ))
    }

    fn seed(&self) -> Result<Option<u64>, ValidationError> {
        self.unsigned("seed")
    }
}

fn out_of_range(parameter: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidParameterRange {
        parameter: parameter.into(),
        reason: reason.into(),
    }
}

/// Runs the `garde` rules of a parameter object and reports the first violation.
fn check<T: Validate<Context = ()>>(params: T) -> Result<T, ValidationError> {
    match params.validate() {
        Ok(()) => Ok(params),
        Err(report) => {
            let (parameter, reason) = report
                .iter()
                .next()
                .map(|(path, error)| (path.to_string(), error.to_string()))
                .unwrap_or_else(|| (String::new(), report.to_string()));
            Err(ValidationError::InvalidParameterRange { parameter, reason })
        }
    }
}

fn positive(value: &f64, _context: &()) -> garde::Result {
    if *value > 0.0 {
        Ok(())
    } else {
        Err(garde::Error::new("must be greater than 0"))
    }
}

#[allow(clippy::ptr_arg)]
fn strictly_increasing(value: &Vec<f64>, _context: &()) -> garde::Result {
    if value.windows(2).all(|pair| pair[0] < pair[1]) {
        Ok(())
    } else {
        Err(garde::Error::new("must be strictly increasing"))
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => [$($text:literal),+]),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($($text)|+ => Ok($name::$variant),)+
                    _ => Err(format!(
                        "`{}` is not one of: {}",
                        s,
                        [$($($text),+),+].join(", ")
                    )),
                }
            }
        }
    };
}

choice_enum! {
    /// Distribution the noise is drawn from.
    Distribution {
        Gaussian => ["gaussian", "normal"],
        Laplace => ["laplace"],
        Uniform => ["uniform"],
    }
}

choice_enum! {
    /// How a noise sample is combined with the original value.
    NoiseMode {
        Additive => ["additive"],
        Multiplicative => ["multiplicative"],
    }
}

choice_enum! {
    /// Time units for date noise and date aggregation.
    TimeUnit {
        Second => ["second", "seconds"],
        Minute => ["minute", "minutes"],
        Hour => ["hour", "hours"],
        Day => ["day", "days"],
        Month => ["month", "months"],
        Year => ["year", "years"],
    }
}

impl TimeUnit {
    /// Length of the unit in seconds. Months and years use fixed averages.
    pub fn seconds(&self) -> i64 {
        match self {
            TimeUnit::Second => 1,
            TimeUnit::Minute => 60,
            TimeUnit::Hour => 3_600,
            TimeUnit::Day => 86_400,
            TimeUnit::Month => 2_628_000,
            TimeUnit::Year => 31_536_000,
        }
    }
}

/// Parameters of the `noise` method.
///
/// Results are left unclamped unless `clamp_min` and/or `clamp_max` are set.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NoiseParams {
    #[garde(skip)]
    pub distribution: Distribution,
    #[garde(skip)]
    pub mode: NoiseMode,
    #[garde(skip)]
    pub mean: f64,
    #[garde(custom(positive))]
    pub scale: f64,
    #[garde(skip)]
    pub unit: TimeUnit,
    #[garde(skip)]
    pub clamp_min: Option<f64>,
    #[garde(skip)]
    pub clamp_max: Option<f64>,
    #[garde(skip)]
    pub seed: Option<u64>,
    #[garde(length(min = 1))]
    pub correlation: Option<String>,
}

impl NoiseParams {
    /// Whether `other` turns the same random stream into the same samples.
    pub(crate) fn draws_like(&self, other: &NoiseParams) -> bool {
        self.distribution == other.distribution
            && self.mean == other.mean
            && self.scale == other.scale
            && self.unit == other.unit
    }
}

pub(crate) fn build_noise(
    params: &RawParameters<'_>,
    column_type: ColumnType,
) -> Result<Method, ValidationError> {
    let unit = params.choice("unit")?.unwrap_or(TimeUnit::Day);
    let duration = |name: &str| params.duration(name, column_type, unit);
    let lower = duration("lower_boundary")?;
    let upper = duration("upper_boundary")?;
    let bounded = lower.is_some() || upper.is_some();
    for name in ["scale", "mean"] {
        if bounded && params.contains(name) {
            return Err(out_of_range(
                name,
                "cannot be combined with lower_boundary and upper_boundary",
            ));
        }
    }
    let (mean, scale) = match (lower, upper) {
        (Some(lower), Some(upper)) => {
            if lower >= upper {
                return Err(out_of_range(
                    "lower_boundary",
                    "must be lower than upper_boundary",
                ));
            }
            ((lower + upper) / 2.0, (upper - lower) / 2.0)
        }
        (Some(_), None) => return Err(ValidationError::MissingParameter("upper_boundary".into())),
        (None, Some(_)) => return Err(ValidationError::MissingParameter("lower_boundary".into())),
        (None, None) => (
            duration("mean")?.unwrap_or(0.0),
            duration("scale")?.ok_or_else(|| ValidationError::MissingParameter("scale".into()))?,
        ),
    };

    let noise = check(NoiseParams {
        distribution: params.choice("distribution")?.unwrap_or(Distribution::Gaussian),
        mode: params.choice("mode")?.unwrap_or(NoiseMode::Additive),
        mean,
        scale,
        unit,
        clamp_min: params.number("clamp_min")?,
        clamp_max: params.number("clamp_max")?,
        seed: params.seed()?,
        correlation: params.text("correlation")?,
    })?;

    if let (Some(min), Some(max)) = (noise.clamp_min, noise.clamp_max) {
        if min > max {
            return Err(out_of_range("clamp_min", "must not be greater than clamp_max"));
        }
    }
    if column_type == ColumnType::Date {
        if noise.mode == NoiseMode::Multiplicative {
            return Err(out_of_range(
                "mode",
                "multiplicative noise is not supported for date columns",
            ));
        }
        if noise.clamp_min.is_some() || noise.clamp_max.is_some() {
            return Err(out_of_range(
                "clamp_min",
                "clamping is only supported for numeric columns",
            ));
        }
    }
    Ok(Method::Noise(noise))
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct WidthBuckets {
    #[garde(custom(positive))]
    pub width: f64,
    #[garde(skip)]
    pub origin: f64,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct EdgeBuckets {
    #[garde(length(min = 2), custom(strictly_increasing))]
    pub edges: Vec<f64>,
}

/// Parameters of the `bucket` method: fixed-width buckets or explicit edges.
#[derive(Debug, Clone, PartialEq)]
pub enum BucketParams {
    Width(WidthBuckets),
    Edges(EdgeBuckets),
}

pub(crate) fn build_bucket(
    params: &RawParameters<'_>,
    _column_type: ColumnType,
) -> Result<Method, ValidationError> {
    let width = params.number("width")?;
    let edges = params.list("edges", Json::as_f64)?;
    let buckets = match (width, edges) {
        (Some(_), Some(_)) => {
            return Err(out_of_range("edges", "cannot be combined with width"));
        }
        (Some(width), None) => BucketParams::Width(check(WidthBuckets {
            width,
            origin: params.number("origin")?.unwrap_or(0.0),
        })?),
        (None, Some(edges)) => BucketParams::Edges(check(EdgeBuckets { edges })?),
        (None, None) => return Err(ValidationError::MissingParameter("width".into())),
    };
    Ok(Method::Bucket(buckets))
}

/// Parameters of the `round` method.
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct RoundParams {
    /// Number of decimal places; negative values round to tens, hundreds, ...
    #[garde(range(min = -15, max = 15))]
    pub precision: i32,
}

fn precision(params: &RawParameters<'_>, name: &str) -> Result<i32, ValidationError> {
    let value = params.require_integer(name)?;
    i32::try_from(value)
        .ok()
        .filter(|v| (-MAX_PRECISION..=MAX_PRECISION).contains(v))
        .ok_or_else(|| {
            out_of_range(
                name,
                format!("must be between -{MAX_PRECISION} and {MAX_PRECISION}"),
            )
        })
}

pub(crate) fn build_round(
    params: &RawParameters<'_>,
    _column_type: ColumnType,
) -> Result<Method, ValidationError> {
    let precision = precision(params, "precision")?;
    Ok(Method::Round(check(RoundParams { precision })?))
}

/// Parameters of the `aggregate` method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateParams {
    /// Round numbers to a multiple of `10^power_of_ten`.
    PowerOfTen(i32),
    /// Truncate dates to the start of the unit.
    TimeUnit(TimeUnit),
}

pub(crate) fn build_aggregate(
    params: &RawParameters<'_>,
    column_type: ColumnType,
) -> Result<Method, ValidationError> {
    let aggregate = if column_type == ColumnType::Date {
        let unit = params
            .choice("time_unit")?
            .ok_or_else(|| ValidationError::MissingParameter("time_unit".into()))?;
        AggregateParams::TimeUnit(unit)
    } else {
        AggregateParams::PowerOfTen(precision(params, "power_of_ten")?)
    };
    Ok(Method::Aggregate(aggregate))
}

/// Parameters of the `rescale` method: `(v - mean) / std_dev * scale + translation`.
#[derive(Debug, Clone, Copy, PartialEq, Validate)]
pub struct RescaleParams {
    #[garde(skip)]
    pub mean: f64,
    #[garde(custom(positive))]
    pub std_dev: f64,
    #[garde(skip)]
    pub scale: f64,
    #[garde(skip)]
    pub translation: f64,
}

pub(crate) fn build_rescale(
    params: &RawParameters<'_>,
    _column_type: ColumnType,
) -> Result<Method, ValidationError> {
    let rescale = check(RescaleParams {
        mean: params.require_number("mean")?,
        std_dev: params.require_number("std_dev")?,
        scale: params.number("scale")?.unwrap_or(1.0),
        translation: params.number("translation")?.unwrap_or(0.0),
    })?;
    Ok(Method::Rescale(rescale))
}

/// Parameters of the `hash` method.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct HashParams {
    #[garde(skip)]
    pub salt: String,
    #[garde(skip)]
    pub algorithm: HashAlgorithm,
    /// Number of hex characters to keep.
    #[garde(range(min = 8))]
    pub length: Option<usize>,
}

pub(crate) fn build_hash(
    params: &RawParameters<'_>,
    _column_type: ColumnType,
) -> Result<Method, ValidationError> {
    let length = params
        .unsigned("length")?
        .map(|length| usize::try_from(length).map_err(|_| out_of_range("length", "is too large")))
        .transpose()?;
    let hash = check(HashParams {
        salt: params.text("salt")?.unwrap_or_default(),
        algorithm: params.choice("algorithm")?.unwrap_or_default(),
        length,
    })?;
    let min_salt_len = hash.algorithm.min_salt_len();
    if hash.salt.len() < min_salt_len {
        return Err(out_of_range(
            "salt",
            format!("{} needs a salt of at least {min_salt_len} bytes", hash.algorithm),
        ));
    }
    Ok(Method::Hash(hash))
}

/// Parameters of the `redact` method.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct RedactParams {
    /// Replacement, already coerced to the column type. `Null` redacts to a missing value.
    #[garde(skip)]
    pub value: Value,
    #[garde(range(min = 0.0, max = 1.0))]
    pub probability: f64,
    #[garde(skip)]
    pub seed: Option<u64>,
}

fn coerce_replacement(value: &Json, column_type: ColumnType) -> Result<Value, ValidationError> {
    let coerced = match (column_type, value) {
        (ColumnType::Integer, Json::Number(n)) => n.as_i64().map(Value::Integer),
        (ColumnType::Float, Json::Number(n)) => n.as_f64().map(Value::Float),
        (ColumnType::Text, Json::String(s)) => Some(Value::Text(s.clone())),
        (ColumnType::Text, Json::Number(n)) => Some(Value::Text(n.to_string())),
        (ColumnType::Text, Json::Bool(b)) => Some(Value::Text(b.to_string())),
        (ColumnType::Date, Json::String(s)) => parse_date(s).map(Value::Date),
        _ => None,
    };
    coerced.ok_or_else(|| ValidationError::InvalidParameterType {
        parameter: "value".into(),
        expected: format!("a value of the column type ({column_type})"),
    })
}

pub(crate) fn build_redact(
    params: &RawParameters<'_>,
    column_type: ColumnType,
) -> Result<Method, ValidationError> {
    let value = match params.get("value") {
        Some(raw) => coerce_replacement(raw, column_type)?,
        None => Value::Null,
    };
    let redact = check(RedactParams {
        value,
        probability: params.number("probability")?.unwrap_or(1.0),
        seed: params.seed()?,
    })?;
    Ok(Method::Redact(redact))
}

/// Parameters of the `date_shift` method.
///
/// With `consistent` set (the default) the offset is derived from the salted hash of the value, so
/// equal dates are shifted by the same number of days in every run. A consistent shift needs a
/// non-empty salt, as anyone could otherwise recompute the offsets. Without `consistent` each row
/// gets an independent offset from the column's random stream.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct DateShiftParams {
    #[garde(range(min = 1, max = 36_500))]
    pub max_offset_days: i64,
    #[garde(skip)]
    pub salt: String,
    #[garde(skip)]
    pub consistent: bool,
    #[garde(skip)]
    pub seed: Option<u64>,
}

pub(crate) fn build_date_shift(
    params: &RawParameters<'_>,
    _column_type: ColumnType,
) -> Result<Method, ValidationError> {
    let consistent = params.boolean("consistent")?.unwrap_or(true);
    let salt = match params.text("salt")? {
        Some(salt) if consistent && salt.is_empty() => {
            return Err(out_of_range("salt", "must not be empty"));
        }
        Some(salt) => salt,
        None if consistent => return Err(ValidationError::MissingParameter("salt".into())),
        None => String::new(),
    };
    let shift = check(DateShiftParams {
        max_offset_days: params.require_integer("max_offset_days")?,
        salt,
        consistent,
        seed: params.seed()?,
    })?;
    Ok(Method::DateShift(shift))
}

/// When a category counts as rare.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CategoryThreshold {
    /// Fewer occurrences than this.
    MinCount(usize),
    /// A smaller share of the non-null values than this.
    MinFrequency(f64),
}

/// Parameters of the `categorical` method.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalParams {
    pub threshold: CategoryThreshold,
    pub other_label: String,
}

pub(crate) fn build_categorical(
    params: &RawParameters<'_>,
    _column_type: ColumnType,
) -> Result<Method, ValidationError> {
    let threshold = match (params.unsigned("min_count")?, params.number("min_frequency")?) {
        (Some(_), Some(_)) => {
            return Err(out_of_range("min_frequency", "cannot be combined with min_count"))
        }
        (Some(count), None) => {
            let count = usize::try_from(count)
                .ok()
                .filter(|count| *count >= 1)
                .ok_or_else(|| out_of_range("min_count", "must be at least 1"))?;
            CategoryThreshold::MinCount(count)
        }
        (None, Some(frequency)) => {
            if !(frequency > 0.0 && frequency <= 1.0) {
                return Err(out_of_range("min_frequency", "must be in (0, 1]"));
            }
            CategoryThreshold::MinFrequency(frequency)
        }
        (None, None) => return Err(ValidationError::MissingParameter("min_count".into())),
    };
    Ok(Method::Categorical(CategoricalParams {
        threshold,
        other_label: params
            .text("other_label")?
            .unwrap_or_else(|| DEFAULT_OTHER_LABEL.into()),
    }))
}

#[derive(Debug, Clone, Validate)]
struct WordList {
    #[garde(length(min = 1), inner(length(min = 1)))]
    words: Vec<String>,
}

/// Case-insensitive whole-word matcher for a list of words.
#[derive(Debug, Clone)]
pub struct WordMatcher {
    words: Vec<String>,
    regex: Regex,
}

impl WordMatcher {
    fn build(params: &RawParameters<'_>) -> Result<Self, ValidationError> {
        let WordList { words } = check(WordList {
            words: params.require_text_list("words")?,
        })?;
        let alternation = words
            .iter()
            .map(|word| regex::escape(word))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
            .map_err(|err| out_of_range("words", err.to_string()))?;
        Ok(Self { words, regex })
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl PartialEq for WordMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.words == other.words
    }
}

/// Parameters of the `mask_words` method.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskWordsParams {
    pub matcher: WordMatcher,
    pub mask: String,
}

pub(crate) fn build_mask_words(
    params: &RawParameters<'_>,
    _column_type: ColumnType,
) -> Result<Method, ValidationError> {
    Ok(Method::MaskWords(MaskWordsParams {
        matcher: WordMatcher::build(params)?,
        mask: params.text("mask")?.unwrap_or_else(|| DEFAULT_MASK.into()),
    }))
}

/// Parameters of the `tokenize_words` method.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizeWordsParams {
    pub matcher: WordMatcher,
    pub salt: String,
}

pub(crate) fn build_tokenize_words(
    params: &RawParameters<'_>,
    _column_type: ColumnType,
) -> Result<Method, ValidationError> {
    Ok(Method::TokenizeWords(TokenizeWordsParams {
        matcher: WordMatcher::build(params)?,
        salt: params.text("salt")?.unwrap_or_default(),
    }))
}

/// Parameters of the `regex` method.
#[derive(Debug, Clone)]
pub struct RegexParams {
    pub pattern: Regex,
    pub replace: String,
}

impl PartialEq for RegexParams {
    fn eq(&self, other: &Self) -> bool {
        self.pattern.as_str() == other.pattern.as_str() && self.replace == other.replace
    }
}

pub(crate) fn build_regex(
    params: &RawParameters<'_>,
    _column_type: ColumnType,
) -> Result<Method, ValidationError> {
    let pattern = params.require_text("pattern")?;
    if pattern.is_empty() {
        return Err(out_of_range("pattern", "must not be empty"));
    }
    let pattern = Regex::new(&pattern).map_err(|err| out_of_range("pattern", err.to_string()))?;
    Ok(Method::Regex(RegexParams {
        pattern,
        replace: params.text("replace")?.unwrap_or_else(|| DEFAULT_MASK.into()),
    }))
}
