//! Recursive compilation of filter trees into SQL fragments.
//!
//! ```rust
//! use tagfilter_query::{FilterNode, FilterTranslator, FilterValue, ModelSchema};
//!
//! let model = ModelSchema::new("TestModel")
//!     .field("Aaa", [("manage", "field0"), ("pg", "pg-field0,pk")])
//!     .field("Bbb", [("manage", "field1"), ("pg", "pg-field1")]);
//!
//! let translator = FilterTranslator::new("manage", "pg");
//! let fragment = translator
//!     .compile(
//!         Some(&model),
//!         &FilterNode::and([
//!             FilterNode::condition("field0", "eq", "hi"),
//!             FilterNode::condition("field1", "lt", 10),
//!         ]),
//!     )
//!     .unwrap();
//!
//! assert_eq!(fragment.sql, "(pg-field0=? and pg-field1<?)");
//! assert_eq!(fragment.params, vec![FilterValue::from("hi"), FilterValue::from(10)]);
//! ```

use serde_json::Value;
use tracing::{debug, trace};

use crate::classify::{classify, NodeKeys};
use crate::error::{FilterError, FilterResult};
use crate::filter::{Condition, Connective, FilterNode};
use crate::model::{Model, ModelMetadata, TaggedModel};
use crate::operator;
use crate::resolver::FieldIndex;
use crate::sql::{Fragment, FragmentBuilder};

/// Default nesting limit; matches the recursion limit of `serde_json`.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Compiles filter trees against model metadata.
///
/// The source tag names the convention filters use to refer to fields, the
/// storage tag the convention emitted into SQL. The translator holds no
/// state between calls and can be shared across threads.
#[derive(Debug, Clone)]
pub struct FilterTranslator {
    source_tag: String,
    storage_tag: String,
    keys: NodeKeys,
    max_depth: usize,
    allow_empty: bool,
}

impl FilterTranslator {
    /// Create a translator reading aliases from `source_tag` and emitting
    /// names from `storage_tag`.
    pub fn new(source_tag: impl Into<String>, storage_tag: impl Into<String>) -> Self {
        Self {
            source_tag: source_tag.into(),
            storage_tag: storage_tag.into(),
            keys: NodeKeys::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            allow_empty: false,
        }
    }

    /// Use a custom key vocabulary for untyped nodes.
    pub fn with_keys(mut self, keys: NodeKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Limit connective nesting.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Compile connectives without items to `()` instead of failing.
    pub fn with_empty_connectives(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Tag holding the source aliases.
    pub fn source_tag(&self) -> &str {
        &self.source_tag
    }

    /// Tag holding the storage names.
    pub fn storage_tag(&self) -> &str {
        &self.storage_tag
    }

    /// Key vocabulary for untyped nodes.
    pub fn keys(&self) -> &NodeKeys {
        &self.keys
    }

    /// Compile a filter tree.
    ///
    /// A bare condition at the root compiles without parentheses; every
    /// connective is wrapped in exactly one pair.
    pub fn compile<M: ModelMetadata + ?Sized>(
        &self,
        model: Option<&M>,
        node: &FilterNode,
    ) -> FilterResult<Fragment> {
        let model = model.ok_or_else(FilterError::nil_model)?;
        let index = FieldIndex::build(model, &self.source_tag, &self.storage_tag);

        let mut out = FragmentBuilder::with_capacity(node.leaf_count());
        Compilation {
            translator: self,
            index: &index,
        }
        .node(node, 0, &mut out)
        .map_err(|e| e.with_model(index.model_name()))?;

        let fragment = out.build();
        debug!(
            model = index.model_name(),
            source_tag = %self.source_tag,
            storage_tag = %self.storage_tag,
            sql = %fragment.sql,
            params = fragment.params.len(),
            "Compiled filter"
        );
        Ok(fragment)
    }

    /// Compile an untyped filter tree, e.g. decoded JSON.
    pub fn compile_json<M: ModelMetadata + ?Sized>(
        &self,
        model: Option<&M>,
        value: &Value,
    ) -> FilterResult<Fragment> {
        let model = model.ok_or_else(FilterError::nil_model)?;
        let node = classify(value, &self.keys)?;
        self.compile(Some(model), &node)
    }

    /// Parse a JSON filter and compile it.
    pub fn compile_str<M: ModelMetadata + ?Sized>(
        &self,
        model: Option<&M>,
        json: &str,
    ) -> FilterResult<Fragment> {
        let value: Value = serde_json::from_str(json).map_err(FilterError::invalid_json)?;
        self.compile_json(model, &value)
    }

    /// Compile against a statically tagged model type.
    pub fn compile_for<T: TaggedModel + ?Sized>(&self, node: &FilterNode) -> FilterResult<Fragment> {
        self.compile(Some(&Model::<T>::new()), node)
    }
}

/// State of one compile call.
struct Compilation<'t, 'a> {
    translator: &'t FilterTranslator,
    index: &'t FieldIndex<'a>,
}

impl Compilation<'_, '_> {
    fn node(&self, node: &FilterNode, depth: usize, out: &mut FragmentBuilder) -> FilterResult<()> {
        match node {
            FilterNode::Connective(chain) => self.connective(chain, depth, out),
            FilterNode::Condition(cond) => self.condition(cond, out),
            FilterNode::Raw(value) => {
                let node = classify(value, &self.translator.keys)?;
                self.node(&node, depth, out)
            }
        }
    }

    fn connective(&self, chain: &Connective, depth: usize, out: &mut FragmentBuilder) -> FilterResult<()> {
        if depth >= self.translator.max_depth {
            return Err(FilterError::max_depth(self.translator.max_depth));
        }
        if chain.items.is_empty() && !self.translator.allow_empty {
            return Err(FilterError::empty_connective(chain.kind.as_sql()));
        }

        trace!(kind = %chain.kind, items = chain.items.len(), depth, "Compiling connective");

        out.push("(");
        for (i, item) in chain.items.iter().enumerate() {
            if i > 0 {
                out.push(" ").push(chain.kind.as_sql()).push(" ");
            }
            self.node(item, depth + 1, out)
                .map_err(|e| e.in_item(&self.translator.keys.items, i))?;
        }
        out.push(")");
        Ok(())
    }

    fn condition(&self, cond: &Condition, out: &mut FragmentBuilder) -> FilterResult<()> {
        let column = self.index.resolve(&cond.field)?;
        let op = operator::translate(&cond.operator).map_err(|e| e.with_field(&cond.field))?;

        trace!(field = %cond.field, column, op, "Compiling condition");

        out.push(column).push(op).push_param(cond.value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::filter::FilterValue;
    use crate::model::ModelSchema;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn test_model() -> ModelSchema {
        ModelSchema::new("TestModel")
            .field("Aaa", [("manage", "field0"), ("pg", "pg-field0,pk")])
            .field("Bbb", [("manage", "field1"), ("pg", "pg-field1")])
            .field("Ccc", [("manage", "field2"), ("pg", "pg-field2")])
            .field("Ddd", [("manage", "field3"), ("pg", "pg-field3")])
            .field("Eee", [("manage", "nocolumn")])
    }

    fn translator() -> FilterTranslator {
        FilterTranslator::new("manage", "pg")
    }

    #[test]
    fn test_two_item_and_chain() {
        let fragment = translator()
            .compile(
                Some(&test_model()),
                &FilterNode::and([
                    FilterNode::condition("field0", "eq", "hi"),
                    FilterNode::condition("field1", "lt", 10),
                ]),
            )
            .unwrap();

        assert_eq!(fragment.sql, "(pg-field0=? and pg-field1<?)");
        assert_eq!(fragment.params, vec![FilterValue::from("hi"), FilterValue::from(10)]);
    }

    #[test]
    fn test_mixed_native_and_raw_items() {
        let node = FilterNode::and([
            FilterNode::raw(json!({"fieldname": "field0", "operator": "eq", "value": "hi"})),
            FilterNode::condition("field1", "lt", 10),
            FilterNode::or([
                FilterNode::condition("field2", "eq", "yo"),
                FilterNode::condition("field3", "eq", "test"),
            ]),
        ]);

        let fragment = translator().compile(Some(&test_model()), &node).unwrap();
        assert_eq!(
            fragment.sql,
            "(pg-field0=? and pg-field1<? and (pg-field2=? or pg-field3=?))"
        );
        assert_eq!(
            fragment.params,
            vec![
                FilterValue::from("hi"),
                FilterValue::from(10),
                FilterValue::from("yo"),
                FilterValue::from("test"),
            ]
        );
    }

    #[test]
    fn test_nested_or_keeps_leaf_order() {
        let model = ModelSchema::new("Plain")
            .field("A", [("api", "a"), ("col", "a")])
            .field("B", [("api", "b"), ("col", "b")])
            .field("C", [("api", "c"), ("col", "c")]);

        let fragment = FilterTranslator::new("api", "col")
            .compile(
                Some(&model),
                &FilterNode::and([
                    FilterNode::condition("a", "eq", 1),
                    FilterNode::or([
                        FilterNode::condition("b", "eq", 2),
                        FilterNode::condition("c", "eq", 3),
                    ]),
                ]),
            )
            .unwrap();

        assert_eq!(fragment.sql, "(a=? and (b=? or c=?))");
        assert_eq!(
            fragment.params,
            vec![FilterValue::from(1), FilterValue::from(2), FilterValue::from(3)]
        );
    }

    #[test]
    fn test_bare_condition_has_no_parentheses() {
        let fragment = translator()
            .compile(Some(&test_model()), &FilterNode::condition("field2", "contains", "%a%"))
            .unwrap();
        assert_eq!(fragment.sql, "pg-field2like?");
        assert_eq!(fragment.params, vec![FilterValue::from("%a%")]);
    }

    #[test]
    fn test_single_item_connective_is_parenthesized() {
        let fragment = translator()
            .compile(
                Some(&test_model()),
                &FilterNode::or([FilterNode::condition("field0", "neq", 1)]),
            )
            .unwrap();
        assert_eq!(fragment.sql, "(pg-field0<>?)");
    }

    #[test]
    fn test_nil_model() {
        let err = translator()
            .compile(None::<&ModelSchema>, &FilterNode::condition("field0", "eq", 1))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NilModel);
    }

    #[test]
    fn test_error_path_points_at_item() {
        let node = FilterNode::and([
            FilterNode::condition("field0", "eq", 1),
            FilterNode::or([
                FilterNode::condition("field1", "eq", 2),
                FilterNode::condition("field2", "between", 3),
            ]),
        ]);
        let err = translator().compile(Some(&test_model()), &node).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownOperator);
        assert_eq!(err.context.path.as_deref(), Some("items[1].items[1]"));
        assert_eq!(err.context.field.as_deref(), Some("field2"));
        assert_eq!(err.context.model.as_deref(), Some("TestModel"));
    }

    #[test]
    fn test_field_checked_before_operator() {
        let err = translator()
            .compile(Some(&test_model()), &FilterNode::condition("nope", "nope", 1))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownField);
    }

    #[test]
    fn test_missing_storage_mapping() {
        let err = translator()
            .compile(Some(&test_model()), &FilterNode::condition("nocolumn", "eq", 1))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingStorageMapping);
        assert!(err.is_model_error());
    }

    #[test]
    fn test_empty_connective_policy() {
        let empty = FilterNode::and([]);

        let err = translator().compile(Some(&test_model()), &empty).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyConnective);

        let fragment = translator()
            .with_empty_connectives(true)
            .compile(Some(&test_model()), &empty)
            .unwrap();
        assert_eq!(fragment.sql, "()");
        assert!(fragment.params.is_empty());
    }

    #[test]
    fn test_max_depth() {
        let mut node = FilterNode::condition("field0", "eq", 1);
        for _ in 0..4 {
            node = FilterNode::and([node]);
        }

        let ok = translator().with_max_depth(4).compile(Some(&test_model()), &node);
        assert_eq!(ok.unwrap().sql, "((((pg-field0=?))))");

        let err = translator()
            .with_max_depth(3)
            .compile(Some(&test_model()), &node)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::MaxDepthExceeded);
    }

    #[test]
    fn test_compile_str() {
        let fragment = translator()
            .compile_str(
                Some(&test_model()),
                r#"{"type": "or", "items": [
                    {"fieldname": "field0", "operator": "in", "value": [1, 2]},
                    {"fieldname": "field1", "operator": "gte", "value": 2.5}
                ]}"#,
            )
            .unwrap();
        assert_eq!(fragment.sql, "(pg-field0in? or pg-field1>=?)");
        assert_eq!(
            fragment.params,
            vec![FilterValue::from(vec![1, 2]), FilterValue::Float(2.5)]
        );

        let err = translator()
            .compile_str(Some(&test_model()), "{not json")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidJson);
    }

    #[test]
    fn test_compile_struct_field_casing() {
        let fragment = translator()
            .compile_json(
                Some(&test_model()),
                &json!({"Type": "and", "Items": [
                    {"Fieldname": "field0", "Operator": "eq", "Value": "hi"},
                    {"Fieldname": "field1", "Operator": "lt"}
                ]}),
            )
            .unwrap();
        assert_eq!(fragment.sql, "(pg-field0=? and pg-field1<?)");
        assert_eq!(fragment.params, vec![FilterValue::from("hi"), FilterValue::Null]);
    }

    #[test]
    fn test_unrecognized_raw_item() {
        let err = translator()
            .compile_json(
                Some(&test_model()),
                &json!({"type": "and", "items": [{"fieldname": "field0", "op": "eq", "value": 1}]}),
            )
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UnrecognizedNodeShape);
        assert_eq!(err.context.path.as_deref(), Some("items[0]"));
    }
}
