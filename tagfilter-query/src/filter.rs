//! Filter tree types: bound values, connectives and conditions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};

/// A value bound to a `?` placeholder.
///
/// The compiler passes values through untouched; wildcard wrapping for
/// `like` or list expansion for `in` is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// List of values.
    List(Vec<FilterValue>),
    /// Any other JSON value (objects).
    Json(serde_json::Value),
}

impl FilterValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<u32> for FilterValue {
    fn from(v: u32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

impl From<serde_json::Value> for FilterValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;

        match v {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => n.as_f64().map(Self::Float).unwrap_or(Self::Json(Value::Number(n))),
            },
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            other @ Value::Object(_) => Self::Json(other),
        }
    }
}

/// Boolean operator joining the items of a [`Connective`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectiveKind {
    /// All items must hold.
    And,
    /// Any item must hold.
    Or,
}

impl ConnectiveKind {
    /// The SQL keyword, always lowercase.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for ConnectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for ConnectiveKind {
    type Err = FilterError;

    fn from_str(s: &str) -> FilterResult<Self> {
        match s {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            other => Err(FilterError::unknown_connective(other)),
        }
    }
}

/// An ordered boolean chain of filter nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Connective {
    /// How the items are joined.
    pub kind: ConnectiveKind,
    /// Child nodes; order determines text and parameter order.
    pub items: Vec<FilterNode>,
}

impl Connective {
    /// Create an empty connective of the given kind.
    pub fn new(kind: ConnectiveKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// Append an item.
    pub fn push(mut self, item: impl Into<FilterNode>) -> Self {
        self.items.push(item.into());
        self
    }
}

/// A single `field operator value` comparison.
///
/// `field` and `operator` stay plain strings: both come from untrusted
/// input and are validated when the node is compiled.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Source-side field alias.
    pub field: String,
    /// Operator name, e.g. `eq` or `contains`.
    pub operator: String,
    /// Bound value.
    pub value: FilterValue,
}

impl Condition {
    /// Create a new condition.
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

/// A node of a filter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// Boolean chain.
    Connective(Connective),
    /// Leaf comparison.
    Condition(Condition),
    /// Undecoded node, classified when it is compiled.
    Raw(serde_json::Value),
}

impl FilterNode {
    /// Create an `and` chain.
    pub fn and(items: impl IntoIterator<Item = FilterNode>) -> Self {
        Self::Connective(Connective {
            kind: ConnectiveKind::And,
            items: items.into_iter().collect(),
        })
    }

    /// Create an `or` chain.
    pub fn or(items: impl IntoIterator<Item = FilterNode>) -> Self {
        Self::Connective(Connective {
            kind: ConnectiveKind::Or,
            items: items.into_iter().collect(),
        })
    }

    /// Create a condition node.
    pub fn condition(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Self {
        Self::Condition(Condition::new(field, operator, value))
    }

    /// Wrap an undecoded node.
    pub fn raw(value: serde_json::Value) -> Self {
        Self::Raw(value)
    }

    /// Check if this node still needs classification.
    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// Number of conditions reachable without decoding raw nodes.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Condition(_) => 1,
            Self::Connective(c) => c.items.iter().map(Self::leaf_count).sum(),
            Self::Raw(_) => 0,
        }
    }
}

impl From<Connective> for FilterNode {
    fn from(c: Connective) -> Self {
        Self::Connective(c)
    }
}

impl From<Condition> for FilterNode {
    fn from(c: Condition) -> Self {
        Self::Condition(c)
    }
}

impl From<serde_json::Value> for FilterNode {
    fn from(v: serde_json::Value) -> Self {
        Self::Raw(v)
    }
}
