use rand::rngs::StdRng;

use super::{map_values, unexpected, ColumnTransform, Result};
use crate::dataset::{Column, Value};
use crate::methods::RegexParams;

/// Replaces every match of a regular expression.
pub(crate) struct Pattern<'a> {
    params: &'a RegexParams,
}

impl<'a> Pattern<'a> {
    pub(crate) fn new(params: &'a RegexParams) -> Self {
        Self { params }
    }
}

impl ColumnTransform for Pattern<'_> {
    fn apply(&self, column: &Column, _rng: &mut StdRng) -> Result<Vec<Value>> {
        let RegexParams { pattern, replace } = self.params;
        map_values(column, |value| match value {
            Value::Text(text) => Ok(Value::Text(
                pattern.replace_all(text, replace.as_str()).into_owned(),
            )),
            other => Err(unexpected(other, column.column_type())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng;
    use regex::Regex;

    #[test]
    fn test_replace_all_matches() {
        let params = RegexParams {
            pattern: Regex::new(r"\d{3}-\d{4}").unwrap(),
            replace: "XXXX".into(),
        };
        let column = Column::from_texts("notes", ["call 555-1234 or 555-9876", "none"]);
        let result = Pattern::new(&params)
            .apply(&column, &mut rng::stream(0, "notes"))
            .unwrap();
        assert_eq!(
            result,
            vec![
                Value::Text("call XXXX or XXXX".into()),
                Value::Text("none".into())
            ]
        );
    }

    #[test]
    fn test_capture_groups_in_replacement() {
        let params = RegexParams {
            pattern: Regex::new(r"(?P<user>\w+)@\w+\.com").unwrap(),
            replace: "$user@example.com".into(),
        };
        let column = Column::from_texts("email", ["jane@corp.com"]);
        let result = Pattern::new(&params)
            .apply(&column, &mut rng::stream(0, "email"))
            .unwrap();
        assert_eq!(result, vec![Value::Text("jane@example.com".into())]);
    }
}
