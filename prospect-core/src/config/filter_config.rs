//! Filter rule configuration.

use serde::{Deserialize, Serialize};

/// Operators available to custom filter rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOp {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    IsNull,
    NotNull,
    Regex,
}

/// Comparison value for a rule. TOML/JSON scalars only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Str(String),
    Num(f64),
    Bool(bool),
}

impl RuleValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(n) => Some(*n),
            _ => None,
        }
    }
}

/// One custom exclusion rule: a dot-addressed field path, an operator,
/// and an optional comparison value. Rules are evaluated in declared
/// order; the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRule {
    /// Dot path into the lead (e.g. `"name"`, `"enrichment.employee_count"`).
    pub field: String,
    pub op: RuleOp,
    #[serde(default)]
    pub value: Option<RuleValue>,
    /// Exclusion reason recorded when the rule matches. Defaults to
    /// `rule:<field>` when absent.
    #[serde(default)]
    pub reason: Option<String>,
}

impl FilterRule {
    /// The exclusion reason written to the lead when this rule matches.
    pub fn effective_reason(&self) -> String {
        self.reason
            .clone()
            .unwrap_or_else(|| format!("rule:{}", self.field))
    }
}

/// Blocklists plus the ordered custom rule list.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterConfig {
    /// Source tags that exclude a lead outright (case-insensitive).
    pub exclude_categories: Vec<String>,
    /// Substrings of the business name that exclude a lead
    /// (case-insensitive).
    pub exclude_keywords: Vec<String>,
    /// Custom rules, evaluated in declared order.
    pub rules: Vec<FilterRule>,
}
