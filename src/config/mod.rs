//! Anonymization configuration: which method to apply to which column.
//!
//! A configuration is usually loaded from JSON:
//!
//! ```
//! use tabular_anonymization::config::Config;
//!
//! let config = Config::from_json(r#"{
//!     "seed": 42,
//!     "columns": {
//!         "age": { "method": "bucket", "parameters": { "width": 10 } },
//!         "name": { "method": "hash", "parameters": { "salt": "abc" }, "type": "text" }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(config.seed(), Some(42));
//! assert_eq!(config.columns().len(), 2);
//! ```
//!
//! The `columns` wrapper may be left out, in which case the whole document is the column mapping.

pub mod builder;
mod column_rule_map;

use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use thiserror::Error;

use crate::dataset::ColumnType;
pub use builder::ConfigBuilder;
pub use column_rule_map::ColumnRuleMap;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidJson(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::InvalidJson(format!("{err}"))
    }
}

/// The anonymization rule for a single column.
///
/// `parameters` are kept as raw JSON here and are only checked against the method when the
/// configuration is applied to a dataset.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Validate)]
pub struct ColumnRule {
    #[garde(length(min = 1))]
    method: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    #[garde(skip)]
    parameters: Map<String, Json>,

    /// Declared type of the column, used when loading the dataset.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    column_type: Option<ColumnType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    comment: Option<String>,
}

impl ColumnRule {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            parameters: Map::new(),
            column_type: None,
            comment: None,
        }
    }

    /// Adds a method parameter.
    ///
    /// ```
    /// use tabular_anonymization::config::ColumnRule;
    ///
    /// let rule = ColumnRule::new("noise")
    ///     .parameter("distribution", "laplace")
    ///     .parameter("scale", 2.5);
    /// assert_eq!(rule.parameters().len(), 2);
    /// ```
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<Json>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_parameters(mut self, parameters: Map<String, Json>) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = Some(column_type);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn parameters(&self) -> &Map<String, Json> {
        &self.parameters
    }

    pub fn column_type(&self) -> Option<ColumnType> {
        self.column_type
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// Configuration of an anonymization run.
///
/// * `seed` - Base seed for the randomized methods. Without one, every run draws a fresh seed.
/// * `columns` - Rules keyed by column name. Columns without a rule are left untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,

    #[serde(default)]
    columns: ColumnRuleMap,
}

impl Config {
    /// Parses a configuration, with or without the `columns` wrapper.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let document: Map<String, Json> = serde_json::from_str(json)?;
        if document.contains_key("columns") || document.contains_key("seed") {
            Ok(serde_json::from_str(json)?)
        } else {
            let columns: ColumnRuleMap = serde_json::from_str(json)?;
            Ok(Self {
                seed: None,
                columns,
            })
        }
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Replaces the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn columns(&self) -> &ColumnRuleMap {
        &self.columns
    }

    pub fn rule(&self, column: &str) -> Option<&ColumnRule> {
        self.columns.get(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_wrapped() {
        let json = r#"{
            "seed": 7,
            "columns": {
                "age": {"method": "bucket", "parameters": {"width": 10}}
            }
        }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.seed(), Some(7));
        assert_eq!(config.rule("age").unwrap().method(), "bucket");
    }

    #[test]
    fn test_from_json_bare() {
        let json = r#"{"age": {"method": "bucket", "parameters": {"width": 10}}}"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.seed(), None);
        assert_eq!(
            config.rule("age"),
            Some(&ColumnRule::new("bucket").parameter("width", 10))
        );
    }

    #[test]
    fn test_from_json_seed_only() {
        let config = Config::from_json(r#"{"seed": 3}"#).unwrap();
        assert_eq!(config.seed(), Some(3));
        assert!(config.columns().is_empty());
    }

    #[test]
    fn test_from_json_unknown_top_level_field() {
        let json = r#"{"seed": 1, "colums": {}}"#;
        let err = Config::from_json(json).unwrap_err();
        assert!(err.to_string().contains("colums"));
    }

    #[test]
    fn test_from_json_rejects_duplicates_in_wrapper() {
        let json = r#"{"columns": {
            "age": {"method": "bucket"},
            "age": {"method": "round"}
        }}"#;
        assert!(Config::from_json(json).is_err());
    }

    #[test]
    fn test_from_json_not_an_object() {
        assert!(matches!(
            Config::from_json("[1, 2]"),
            Err(ConfigError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_with_seed() {
        let config = Config::default().with_seed(5);
        assert_eq!(config.seed(), Some(5));
    }

    #[test]
    fn test_serialize() {
        let config = ConfigBuilder::new()
            .seed(1)
            .column_rule(
                "name",
                ColumnRule::new("hash").with_type(ColumnType::Text),
            )
            .build();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"seed":1,"columns":{"name":{"method":"hash","type":"text"}}}"#
        );
        assert_eq!(Config::from_json(&json).unwrap(), config);
    }
}
