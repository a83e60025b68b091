//! Procedural macros for tagfilter.
//!
//! # Macros
//!
//! - [`FilterModel`] - Derive a static field-tag table for a struct
//!
//! # Example
//!
//! ```rust,ignore
//! #[derive(tagfilter::FilterModel)]
//! struct TestModel {
//!     #[tag(manage = "field0", pg = "pg-field0,pk")]
//!     aaa: String,
//!     #[tag(manage = "field1", pg = "pg-field1")]
//!     bbb: i64,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive `TaggedModel` and `ModelMetadata` from field tags.
///
/// The generated table lists every named field in declaration order with the
/// tags given in its `#[tag(...)]` attributes. Fields without tags are
/// listed too; they simply never resolve.
///
/// # Attributes
///
/// ## Struct-level
/// - `#[filter(name = "Name")]` - Model name used in diagnostics (default: the type name)
/// - `#[filter(crate = "path")]` - Path of the tagfilter crate (default: `::tagfilter`)
///
/// ## Field-level
/// - `#[tag(key = "value", ...)]` - One or more tags; repeatable
/// - `#[filter(name = "Name")]` - Field name in the table (default: the Rust identifier)
/// - `#[filter(skip)]` - Leave the field out of the table
///
/// # Example
///
/// ```rust,ignore
/// #[derive(tagfilter::FilterModel)]
/// #[filter(name = "Account")]
/// struct AccountRow {
///     #[tag(api = "mail", pg = "email_address,unique")]
///     email: String,
///
///     #[filter(skip)]
///     cache: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(FilterModel, attributes(tag, filter))]
pub fn derive_filter_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive::derive_filter_model_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
