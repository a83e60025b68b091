//! Registry of comparison operators and their SQL tokens.

use std::fmt;

use crate::error::{FilterError, FilterResult};

/// A comparison operator accepted in a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Eq,
    /// `<>`
    Neq,
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `like`; the value is bound as given, without `%` wrapping.
    Contains,
    /// `in`; the value is bound as a single parameter.
    In,
}

impl Operator {
    /// Every registered operator.
    pub const ALL: [Operator; 8] = [
        Self::Eq,
        Self::Neq,
        Self::Lt,
        Self::Lte,
        Self::Gt,
        Self::Gte,
        Self::Contains,
        Self::In,
    ];

    /// Look up an operator by its filter name (case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(Self::Eq),
            "neq" => Some(Self::Neq),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "contains" => Some(Self::Contains),
            "in" => Some(Self::In),
            _ => None,
        }
    }

    /// The name used in filter payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Contains => "contains",
            Self::In => "in",
        }
    }

    /// The SQL token emitted between column and placeholder.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Neq => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Contains => "like",
            Self::In => "in",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Translate an operator name into its SQL token.
pub fn translate(name: &str) -> FilterResult<&'static str> {
    Operator::from_name(name)
        .map(|op| op.as_sql())
        .ok_or_else(|| FilterError::unknown_operator(name))
}
