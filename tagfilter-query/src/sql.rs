//! Compiled SQL fragments.

use std::fmt;

use serde::Serialize;

use crate::filter::FilterValue;

/// Positional placeholder emitted for every bound value.
pub const PLACEHOLDER: &str = "?";

/// A compiled condition: SQL text plus the values for its placeholders.
///
/// The n-th `?` in `sql` binds `params[n]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Fragment {
    /// SQL condition text.
    pub sql: String,
    /// Values in placeholder order.
    pub params: Vec<FilterValue>,
}

impl Fragment {
    /// Create a fragment from its parts.
    pub fn new(sql: impl Into<String>, params: Vec<FilterValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// The SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The bound values.
    pub fn params(&self) -> &[FilterValue] {
        &self.params
    }

    /// Number of `?` placeholders in the text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches(PLACEHOLDER).count()
    }

    /// Check that placeholders and values line up.
    pub fn is_balanced(&self) -> bool {
        self.placeholder_count() == self.params.len()
    }

    /// Split into text and values.
    pub fn into_parts(self) -> (String, Vec<FilterValue>) {
        (self.sql, self.params)
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

impl From<Fragment> for (String, Vec<FilterValue>) {
    fn from(fragment: Fragment) -> Self {
        fragment.into_parts()
    }
}

/// Appends SQL text and bound values in lockstep.
#[derive(Debug, Clone, Default)]
pub struct FragmentBuilder {
    sql: String,
    params: Vec<FilterValue>,
}

impl FragmentBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with room for the given number of parameters.
    pub fn with_capacity(params: usize) -> Self {
        Self {
            sql: String::with_capacity(params * 16),
            params: Vec::with_capacity(params),
        }
    }

    /// Push literal SQL text.
    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    /// Push a placeholder and bind its value.
    pub fn push_param(&mut self, value: impl Into<FilterValue>) -> &mut Self {
        self.sql.push_str(PLACEHOLDER);
        self.params.push(value.into());
        self
    }

    /// Current SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Values bound so far.
    pub fn params(&self) -> &[FilterValue] {
        &self.params
    }

    /// Finish the fragment.
    pub fn build(self) -> Fragment {
        Fragment {
            sql: self.sql,
            params: self.params,
        }
    }
}
