//! # tagfilter
//!
//! Compile boolean filter trees into parameterized SQL condition fragments,
//! translating field names through per-field tags.
//!
//! tagfilter provides:
//! - A filter tree of `and` / `or` connectives over `field op value` conditions
//! - A fixed operator registry (`eq`, `neq`, `lt`, `lte`, `gt`, `gte`, `contains`, `in`)
//! - `#[derive(FilterModel)]` for attaching field tags to a struct
//! - Shape-based decoding of JSON filter payloads
//!
//! ## Quick Start
//!
//! ```rust
//! use tagfilter::prelude::*;
//!
//! #[derive(FilterModel)]
//! struct TestModel {
//!     #[tag(manage = "field0", pg = "pg-field0,pk")]
//!     aaa: String,
//!     #[tag(manage = "field1", pg = "pg-field1")]
//!     bbb: i64,
//! }
//!
//! let translator = FilterTranslator::new("manage", "pg");
//! let fragment = translator
//!     .compile_for::<TestModel>(&FilterNode::and([
//!         FilterNode::condition("field0", "eq", "hi"),
//!         FilterNode::condition("field1", "lt", 10),
//!     ]))
//!     .unwrap();
//!
//! assert_eq!(fragment.sql, "(pg-field0=? and pg-field1<?)");
//! assert_eq!(fragment.params, vec![FilterValue::from("hi"), FilterValue::from(10)]);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Model metadata: field tags, static and runtime models.
pub mod model {
    pub use tagfilter_query::model::*;
}

/// Error types and codes.
pub mod error {
    pub use tagfilter_query::error::*;
}

/// Logging setup.
pub mod logging {
    pub use tagfilter_query::logging::*;
}

// Re-export proc macros
pub use tagfilter_codegen::FilterModel;

// Re-export key types at the crate root
pub use tagfilter_query::{
    Condition, Connective, ConnectiveKind, DEFAULT_MAX_DEPTH, ErrorCode, FieldIndex, FilterError,
    FilterNode, FilterResult, FilterTranslator, FilterValue, Fragment, ModelMetadata, ModelSchema,
    NodeKeys, Operator, TaggedModel, classify, translate,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::FilterModel;
    pub use tagfilter_query::prelude::*;
}
