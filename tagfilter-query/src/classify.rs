//! Shape-based classification of untyped filter nodes.
//!
//! Decoded payloads carry no discriminant, so a node is identified by its
//! key set. Keys match case-insensitively, so `Type` and `type` are the same
//! key. Decoding is closed: a key outside the vocabulary, or two spellings of
//! the same key, match neither shape. An object whose keys all belong to the
//! connective is a connective, one whose keys all belong to the condition is
//! a condition. Absent members decode to their zero value: an empty kind (which
//! is then rejected), no items, an empty field or operator, a `null` value.
//!
//! ```rust
//! use serde_json::json;
//! use tagfilter_query::{classify, FilterNode, NodeKeys};
//!
//! let keys = NodeKeys::default();
//! let node = classify(&json!({"Fieldname": "age", "Operator": "gt", "Value": 18}), &keys).unwrap();
//! assert!(matches!(node, FilterNode::Condition(_)));
//!
//! // An extra key matches neither shape.
//! let err = classify(&json!({"fieldname": "age", "operator": "gt", "value": 18, "x": 1}), &keys);
//! assert!(err.is_err());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use crate::compiler::DEFAULT_MAX_DEPTH;
use crate::error::{FilterError, FilterResult};
use crate::filter::{Condition, Connective, ConnectiveKind, FilterNode, FilterValue};

/// Key names identifying the two node shapes in untyped payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeKeys {
    /// Connective kind key.
    pub kind: String,
    /// Connective items key.
    pub items: String,
    /// Condition field alias key.
    pub field: String,
    /// Condition operator key.
    pub operator: String,
    /// Condition value key.
    pub value: String,
}

impl NodeKeys {
    /// Create a custom key vocabulary.
    pub fn new(
        kind: impl Into<String>,
        items: impl Into<String>,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            items: items.into(),
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

impl Default for NodeKeys {
    fn default() -> Self {
        Self::new("type", "items", "fieldname", "operator", "value")
    }
}

/// Members of one object, sorted by the key they matched.
#[derive(Default)]
struct Members<'v> {
    kind: Option<&'v Value>,
    items: Option<&'v Value>,
    field: Option<&'v Value>,
    operator: Option<&'v Value>,
    value: Option<&'v Value>,
}

impl<'v> Members<'v> {
    /// Sort the members, or `None` on an unknown or repeated key.
    fn collect(map: &'v Map<String, Value>, keys: &NodeKeys) -> Option<Self> {
        let mut members = Self::default();
        for (key, member) in map {
            let slot = if key.eq_ignore_ascii_case(&keys.kind) {
                &mut members.kind
            } else if key.eq_ignore_ascii_case(&keys.items) {
                &mut members.items
            } else if key.eq_ignore_ascii_case(&keys.field) {
                &mut members.field
            } else if key.eq_ignore_ascii_case(&keys.operator) {
                &mut members.operator
            } else if key.eq_ignore_ascii_case(&keys.value) {
                &mut members.value
            } else {
                trace!(key = %key, "Unknown node key");
                return None;
            };
            if slot.replace(member).is_some() {
                trace!(key = %key, "Repeated node key");
                return None;
            }
        }
        Some(members)
    }

    fn has_connective_keys(&self) -> bool {
        self.kind.is_some() || self.items.is_some()
    }

    fn has_condition_keys(&self) -> bool {
        self.field.is_some() || self.operator.is_some() || self.value.is_some()
    }
}

/// Classify one level of an untyped node.
///
/// A connective's items are left as [`FilterNode::Raw`] and are classified
/// when they are reached.
pub fn classify(value: &Value, keys: &NodeKeys) -> FilterResult<FilterNode> {
    let Value::Object(map) = value else {
        trace!(kind = json_kind(value), "Node is not an object");
        return Err(unrecognized(&Map::new(), keys));
    };
    let Some(members) = Members::collect(map, keys) else {
        return Err(unrecognized(map, keys));
    };

    let node = if !members.has_condition_keys() {
        decode_connective(&members)?
    } else if !members.has_connective_keys() {
        decode_condition(&members)
    } else {
        None
    };

    node.ok_or_else(|| unrecognized(map, keys))
}

impl FilterNode {
    /// Decode a whole untyped tree into native nodes.
    ///
    /// Connectives nested [`DEFAULT_MAX_DEPTH`] levels deep are rejected.
    pub fn from_json(value: &Value, keys: &NodeKeys) -> FilterResult<Self> {
        Self::from_json_with_depth(value, keys, DEFAULT_MAX_DEPTH)
    }

    /// Decode a whole untyped tree, rejecting connectives nested `max_depth`
    /// levels deep.
    pub fn from_json_with_depth(value: &Value, keys: &NodeKeys, max_depth: usize) -> FilterResult<Self> {
        decode_tree(value, keys, 0, max_depth)
    }
}

fn decode_tree(value: &Value, keys: &NodeKeys, depth: usize, max_depth: usize) -> FilterResult<FilterNode> {
    match classify(value, keys)? {
        FilterNode::Connective(mut chain) => {
            if depth >= max_depth {
                return Err(FilterError::max_depth(max_depth));
            }
            for (i, item) in chain.items.iter_mut().enumerate() {
                if let FilterNode::Raw(raw) = item {
                    let decoded = decode_tree(raw, keys, depth + 1, max_depth)
                        .map_err(|e| e.in_item(&keys.items, i))?;
                    *item = decoded;
                }
            }
            Ok(FilterNode::Connective(chain))
        }
        node => Ok(node),
    }
}

/// A string member, `""` when absent or `null`.
fn string_member(member: Option<&Value>) -> Option<&str> {
    match member {
        None | Some(Value::Null) => Some(""),
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => None,
    }
}

fn decode_connective(members: &Members<'_>) -> FilterResult<Option<FilterNode>> {
    let Some(kind) = string_member(members.kind) else {
        return Ok(None);
    };
    let items = match members.items {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().cloned().map(FilterNode::Raw).collect(),
        Some(_) => return Ok(None),
    };

    let kind: ConnectiveKind = kind.parse()?;
    Ok(Some(FilterNode::Connective(Connective { kind, items })))
}

fn decode_condition(members: &Members<'_>) -> Option<FilterNode> {
    let field = string_member(members.field)?;
    let operator = string_member(members.operator)?;
    let value = members.value.cloned().map(FilterValue::from).unwrap_or(FilterValue::Null);

    Some(FilterNode::Condition(Condition {
        field: field.to_string(),
        operator: operator.to_string(),
        value,
    }))
}

fn unrecognized(map: &Map<String, Value>, keys: &NodeKeys) -> FilterError {
    let found: Vec<String> = map.keys().cloned().collect();
    FilterError::unrecognized_node(&found)
        .with_suggestion(format!(
            "A connective takes only the keys `{}` (string) and `{}` (array)",
            keys.kind, keys.items
        ))
        .with_suggestion(format!(
            "A condition takes only the keys `{}` (string), `{}` (string) and `{}`",
            keys.field, keys.operator, keys.value
        ))
        .with_help("Keys match case-insensitively and may appear once")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
