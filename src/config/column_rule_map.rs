use garde::Validate;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ColumnRule;

/// Column rules keyed by column name, iterated in name order.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct ColumnRuleMap(BTreeMap<String, ColumnRule>);

impl ColumnRuleMap {
    pub fn new() -> Self {
        ColumnRuleMap(BTreeMap::new())
    }

    pub fn insert(&mut self, column: impl Into<String>, rule: ColumnRule) -> Option<ColumnRule> {
        self.0.insert(column.into(), rule)
    }

    pub fn get(&self, column: &str) -> Option<&ColumnRule> {
        self.0.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnRule)> {
        self.0.iter().map(|(column, rule)| (column.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct ColumnRuleMapVisitor;

impl<'de> Visitor<'de> for ColumnRuleMapVisitor {
    type Value = ColumnRuleMap;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a mapping from column names to column rules")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut rules = BTreeMap::new();
        while let Some((column, rule)) = access.next_entry::<String, ColumnRule>()? {
            if column.is_empty() {
                return Err(serde::de::Error::custom("column name must not be empty"));
            }
            rule.validate().map_err(|err| {
                serde::de::Error::custom(format!("invalid rule for column {column}: {err}"))
            })?;
            if rules.contains_key(&column) {
                return Err(serde::de::Error::custom(format!(
                    "column {column} is configured more than once"
                )));
            }
            rules.insert(column, rule);
        }
        Ok(ColumnRuleMap(rules))
    }
}

impl<'de> Deserialize<'de> for ColumnRuleMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ColumnRuleMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColumnType;

    #[test]
    fn test_deserialize() {
        let json = r#"{
            "name": {"method": "hash", "parameters": {"salt": "abc"}, "type": "text"},
            "age": {"method": "bucket", "parameters": {"width": 10}, "comment": "decades"}
        }"#;
        let map: ColumnRuleMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.len(), 2);
        let columns: Vec<&str> = map.iter().map(|(column, _)| column).collect();
        assert_eq!(columns, ["age", "name"]);
        let name = map.get("name").unwrap();
        assert_eq!(name.method(), "hash");
        assert_eq!(name.column_type(), Some(ColumnType::Text));
        assert_eq!(map.get("age").unwrap().comment(), Some("decades"));
    }

    #[test]
    fn test_duplicate_column() {
        let json = r#"{
            "age": {"method": "bucket", "parameters": {"width": 10}},
            "age": {"method": "round", "parameters": {"precision": 0}}
        }"#;
        let err = serde_json::from_str::<ColumnRuleMap>(json).unwrap_err();
        assert!(err.to_string().contains("configured more than once"));
    }

    #[test]
    fn test_empty_method() {
        let json = r#"{"age": {"method": ""}}"#;
        let err = serde_json::from_str::<ColumnRuleMap>(json).unwrap_err();
        assert!(err.to_string().contains("invalid rule for column age"));
    }

    #[test]
    fn test_missing_parameters_default_to_empty() {
        let json = r#"{"notes": {"method": "redact"}}"#;
        let map: ColumnRuleMap = serde_json::from_str(json).unwrap();
        assert!(map.get("notes").unwrap().parameters().is_empty());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let mut map = ColumnRuleMap::new();
        map.insert("age", ColumnRule::new("bucket").parameter("width", 10));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"age":{"method":"bucket","parameters":{"width":10}}}"#);
        let deserialized: ColumnRuleMap = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, map);
    }
}
