//! # tagfilter-query
//!
//! Compiles boolean filter trees into parameterized SQL condition fragments.
//!
//! A filter refers to fields by one naming convention (the *source* tag) and
//! is compiled into SQL that uses another (the *storage* tag). Both names
//! come from per-field tags in the model's metadata. This crate provides:
//! - The filter tree: [`FilterNode`], [`Connective`], [`Condition`]
//! - Bound values: [`FilterValue`]
//! - The fixed operator registry: [`Operator`]
//! - Model metadata: [`ModelMetadata`], [`TaggedModel`], [`ModelSchema`]
//! - Alias resolution: [`FieldIndex`]
//! - Shape-based decoding of untyped nodes: [`classify`]
//! - The compiler: [`FilterTranslator`] producing a [`Fragment`]
//!
//! ## Compiling a filter
//!
//! ```rust
//! use tagfilter_query::{FilterNode, FilterTranslator, FilterValue, ModelSchema};
//!
//! let model = ModelSchema::new("User")
//!     .field("Email", [("api", "email"), ("pg", "email_address")])
//!     .field("Age", [("api", "age"), ("pg", "age_years")])
//!     .field("Role", [("api", "role"), ("pg", "role")]);
//!
//! let filter = FilterNode::and([
//!     FilterNode::condition("age", "gte", 18),
//!     FilterNode::or([
//!         FilterNode::condition("role", "eq", "admin"),
//!         FilterNode::condition("email", "contains", "%@example.com"),
//!     ]),
//! ]);
//!
//! let fragment = FilterTranslator::new("api", "pg")
//!     .compile(Some(&model), &filter)
//!     .unwrap();
//!
//! assert_eq!(
//!     fragment.sql,
//!     "(age_years>=? and (role=? or email_addresslike?))"
//! );
//! assert_eq!(fragment.params.len(), 3);
//! assert!(fragment.is_balanced());
//! ```
//!
//! ## Untyped payloads
//!
//! Filters decoded from JSON carry no discriminant; they are identified by
//! their key set:
//!
//! ```rust
//! use tagfilter_query::{FilterTranslator, ModelSchema};
//!
//! let model = ModelSchema::new("User").field("Age", [("api", "age"), ("pg", "age_years")]);
//!
//! let fragment = FilterTranslator::new("api", "pg")
//!     .compile_str(
//!         Some(&model),
//!         r#"{"type": "or", "items": [{"fieldname": "age", "operator": "lt", "value": 13}]}"#,
//!     )
//!     .unwrap();
//!
//! assert_eq!(fragment.sql, "(age_years<?)");
//! ```

pub mod classify;
pub mod compiler;
pub mod error;
pub mod filter;
pub mod logging;
pub mod model;
pub mod operator;
pub mod resolver;
pub mod sql;

pub use classify::{NodeKeys, classify};
pub use compiler::{DEFAULT_MAX_DEPTH, FilterTranslator};
pub use error::{ErrorCode, ErrorContext, FilterError, FilterResult};
pub use filter::{Condition, Connective, ConnectiveKind, FilterNode, FilterValue};
pub use model::{FieldDef, FieldTag, Model, ModelMetadata, ModelSchema, TaggedModel};
pub use operator::{Operator, translate};
pub use resolver::{FieldEntry, FieldIndex};
pub use sql::{Fragment, FragmentBuilder, PLACEHOLDER};

// Re-export logging utilities
pub use logging::{get_log_format, get_log_level, init as init_logging, init_with_level, is_debug_enabled};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::classify::NodeKeys;
    pub use crate::compiler::FilterTranslator;
    pub use crate::error::{ErrorCode, FilterError, FilterResult};
    pub use crate::filter::{Condition, Connective, ConnectiveKind, FilterNode, FilterValue};
    pub use crate::model::{FieldDef, FieldTag, Model, ModelMetadata, ModelSchema, TaggedModel};
    pub use crate::operator::Operator;
    pub use crate::sql::Fragment;
}
