//! Error types for filter compilation with actionable messages.
//!
//! Every failure aborts the current compile call; there are no partial
//! fragments. Errors carry:
//! - An error code for programmatic handling
//! - Context about the model, field and node involved
//! - Suggestions for fixing the input
//!
//! # Error Codes
//!
//! Error codes follow a pattern: F{category}{number}
//! - 1xxx: Filter input errors (caller supplied a bad payload)
//! - 7xxx: Model definition errors (the model's tags are incomplete)
//!
//! ```rust
//! use tagfilter_query::{ErrorCode, FilterError};
//!
//! let err = FilterError::unknown_field("User", "emial");
//! assert_eq!(err.code, ErrorCode::UnknownField);
//! assert_eq!(err.code.code(), "F1005");
//! assert!(err.is_input_error());
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Filter input errors (1xxx)
    /// Model metadata argument absent (F1001).
    NilModel = 1001,
    /// Node matches neither a connective nor a condition (F1002).
    UnrecognizedNodeShape = 1002,
    /// Connective kind outside `and` / `or` (F1003).
    UnknownConnectiveKind = 1003,
    /// Connective without any items (F1004).
    EmptyConnective = 1004,
    /// Field alias not declared by the model (F1005).
    UnknownField = 1005,
    /// Operator name not in the registry (F1006).
    UnknownOperator = 1006,
    /// Filter nested deeper than the translator allows (F1007).
    MaxDepthExceeded = 1007,
    /// Filter payload is not valid JSON (F1008).
    InvalidJson = 1008,

    // Model definition errors (7xxx)
    /// Matched field has no storage-side name (F7001).
    MissingStorageMapping = 7001,
    /// Storage name contains the `?` placeholder (F7002).
    InvalidStorageName = 7002,
}

impl ErrorCode {
    /// Get the error code string (e.g., "F1005").
    pub fn code(&self) -> String {
        format!("F{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::NilModel => "Model metadata missing",
            Self::UnrecognizedNodeShape => "Unrecognized filter node",
            Self::UnknownConnectiveKind => "Unknown connective kind",
            Self::EmptyConnective => "Empty connective",
            Self::UnknownField => "Unknown field",
            Self::UnknownOperator => "Unknown operator",
            Self::MaxDepthExceeded => "Filter nested too deeply",
            Self::InvalidJson => "Invalid JSON payload",
            Self::MissingStorageMapping => "Missing storage mapping",
            Self::InvalidStorageName => "Invalid storage name",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The model the filter was compiled against.
    pub model: Option<String>,
    /// The field alias involved.
    pub field: Option<String>,
    /// Location of the offending node, e.g. `items[2].items[0]`.
    pub path: Option<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<String>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors that can occur while compiling a filter.
#[derive(Error, Debug)]
pub struct FilterError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)?;
        if let Some(ref path) = self.context.path {
            write!(f, " (at {})", path)?;
        }
        Ok(())
    }
}

impl FilterError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(suggestion.into());
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.context.model = Some(model.into());
        self
    }

    /// Set the field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.context.field = Some(field.into());
        self
    }

    /// Prefix the node path with an item segment, e.g. `items[2]`.
    pub fn in_item(mut self, key: &str, index: usize) -> Self {
        let segment = format!("{}[{}]", key, index);
        self.context.path = Some(match self.context.path.take() {
            Some(inner) => format!("{}.{}", segment, inner),
            None => segment,
        });
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Create a nil model error.
    pub fn nil_model() -> Self {
        Self::new(ErrorCode::NilModel, "Model cannot be nil")
            .with_help("Pass the model metadata the filter should be resolved against")
    }

    /// Create an unrecognized node shape error.
    pub fn unrecognized_node(keys: &[String]) -> Self {
        let found = if keys.is_empty() {
            "no keys".to_string()
        } else {
            format!("keys [{}]", keys.join(", "))
        };
        Self::new(
            ErrorCode::UnrecognizedNodeShape,
            format!("Unknown filter type: node with {} is neither a connective nor a condition", found),
        )
    }

    /// Create an unknown connective kind error.
    pub fn unknown_connective(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self::new(
            ErrorCode::UnknownConnectiveKind,
            format!("Unknown connection type `{}`", kind),
        )
        .with_suggestion("Use `and` or `or`")
    }

    /// Create an empty connective error.
    pub fn empty_connective(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self::new(
            ErrorCode::EmptyConnective,
            format!("Connective `{}` has no items", kind),
        )
        .with_suggestion("Drop the connective or give it at least one item")
    }

    /// Create an unknown field error.
    pub fn unknown_field(model: impl Into<String>, field: impl Into<String>) -> Self {
        let model = model.into();
        let field = field.into();
        Self::new(
            ErrorCode::UnknownField,
            format!("Field {} not found in model {}", field, model),
        )
        .with_model(&model)
        .with_field(&field)
        .with_suggestion("Check the field alias for typos; aliases are case-sensitive")
    }

    /// Create a missing storage mapping error.
    pub fn missing_storage(
        model: impl Into<String>,
        field: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        let model = model.into();
        let field = field.into();
        let tag = tag.into();
        Self::new(
            ErrorCode::MissingStorageMapping,
            format!("Tag `{}` in field {} not found", tag, field),
        )
        .with_model(&model)
        .with_field(&field)
        .with_help(format!(
            "Every field reachable from a filter must declare a `{}` tag on {}",
            tag, model
        ))
    }

    /// Create an invalid storage name error.
    pub fn invalid_storage(
        model: impl Into<String>,
        field: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let model = model.into();
        let field = field.into();
        let name = name.into();
        Self::new(
            ErrorCode::InvalidStorageName,
            format!("Storage name `{}` of field {} contains a `?` placeholder", name, field),
        )
        .with_model(&model)
        .with_field(&field)
        .with_help("Storage names are emitted verbatim and must not contain `?`")
    }

    /// Create an unknown operator error.
    pub fn unknown_operator(operator: impl Into<String>) -> Self {
        let operator = operator.into();
        Self::new(
            ErrorCode::UnknownOperator,
            format!("Operator `{}` is unknown", operator),
        )
        .with_suggestion("Supported operators: eq, neq, lt, lte, gt, gte, contains, in")
    }

    /// Create a max depth error.
    pub fn max_depth(limit: usize) -> Self {
        Self::new(
            ErrorCode::MaxDepthExceeded,
            format!("Filter is nested deeper than {} levels", limit),
        )
        .with_suggestion("Flatten nested connectives of the same kind")
    }

    /// Create an invalid JSON error.
    pub fn invalid_json(err: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::InvalidJson,
            format!("Filter payload is not valid JSON: {}", err),
        )
        .with_source(err)
    }

    // ============== Error Checks ==============

    /// Check if the caller's filter payload caused this error.
    pub fn is_input_error(&self) -> bool {
        (1000..2000).contains(&(self.code as u16))
    }

    /// Check if the model definition caused this error.
    pub fn is_model_error(&self) -> bool {
        (7000..8000).contains(&(self.code as u16))
    }

    /// Display the full error with all context and suggestions.
    pub fn display_full(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error [{}]: {}\n", self.code.code(), self.message));

        if let Some(ref model) = self.context.model {
            output.push_str(&format!("  → Model: {}\n", model));
        }
        if let Some(ref field) = self.context.field {
            output.push_str(&format!("  → Field: {}\n", field));
        }
        if let Some(ref path) = self.context.path {
            output.push_str(&format!("  → Node: {}\n", path));
        }

        if !self.context.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for (i, suggestion) in self.context.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        if let Some(ref help) = self.context.help {
            output.push_str(&format!("\nHelp: {}\n", help));
        }

        output
    }
}
