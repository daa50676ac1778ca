use super::{ColumnRule, Config};

/// A builder for [`Config`].
///
/// # Example
///
/// ```
/// use tabular_anonymization::config::{ColumnRule, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .seed(42)
///     .column_rule("age", ColumnRule::new("bucket").parameter("width", 10))
///     .column_rule("name", ColumnRule::new("hash").parameter("salt", "abc"))
///     .build();
///
/// assert_eq!(config.columns().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder(Config);

impl ConfigBuilder {
    pub fn new() -> Self {
        ConfigBuilder(Config::default())
    }

    /// Sets the base seed, making the randomized methods reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = Some(seed);
        self
    }

    /// Sets the rule for a column, replacing any rule set before for the same column.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabular_anonymization::config::{ColumnRule, ConfigBuilder};
    ///
    /// let config = ConfigBuilder::new()
    ///     .column_rule("salary", ColumnRule::new("round").parameter("precision", -3))
    ///     .build();
    ///
    /// assert_eq!(config.rule("salary").unwrap().method(), "round");
    /// ```
    pub fn column_rule(mut self, column: impl Into<String>, rule: ColumnRule) -> Self {
        self.0.columns.insert(column, rule);
        self
    }

    pub fn build(self) -> Config {
        self.0
    }
}

impl From<Config> for ConfigBuilder {
    fn from(config: Config) -> Self {
        ConfigBuilder(config)
    }
}
