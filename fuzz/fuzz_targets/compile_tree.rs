//! Fuzz target for compiling arbitrary native filter trees.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_compile_tree
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tagfilter_query::{FilterNode, FilterTranslator, FilterValue, ModelSchema};

/// A fuzzable filter value.
#[derive(Debug, Arbitrary, Clone)]
enum FuzzValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<FuzzValue>),
}

impl From<FuzzValue> for FilterValue {
    fn from(val: FuzzValue) -> Self {
        match val {
            FuzzValue::Null => FilterValue::Null,
            FuzzValue::Bool(b) => FilterValue::Bool(b),
            FuzzValue::Int(i) => FilterValue::Int(i),
            FuzzValue::Float(f) => FilterValue::Float(f),
            FuzzValue::String(s) => FilterValue::String(s),
            FuzzValue::List(list) => FilterValue::List(list.into_iter().map(FilterValue::from).collect()),
        }
    }
}

/// A fuzzable filter tree.
#[derive(Debug, Arbitrary)]
enum FuzzNode {
    And(Vec<FuzzNode>),
    Or(Vec<FuzzNode>),
    Condition { field: u8, operator: u8, value: FuzzValue },
}

const FIELDS: [&str; 4] = ["field0", "field1", "field2", "unknown"];
const OPERATORS: [&str; 9] = ["eq", "neq", "lt", "lte", "gt", "gte", "contains", "in", "between"];

fn build(node: FuzzNode) -> FilterNode {
    match node {
        FuzzNode::And(items) => FilterNode::and(items.into_iter().map(build)),
        FuzzNode::Or(items) => FilterNode::or(items.into_iter().map(build)),
        FuzzNode::Condition { field, operator, value } => FilterNode::condition(
            FIELDS[field as usize % FIELDS.len()],
            OPERATORS[operator as usize % OPERATORS.len()],
            value,
        ),
    }
}

fuzz_target!(|node: FuzzNode| {
    let model = ModelSchema::new("FuzzModel")
        .field("Aaa", [("manage", "field0"), ("pg", "pg-field0,pk")])
        .field("Bbb", [("manage", "field1"), ("pg", "pg-field1")])
        .field("Ccc", [("manage", "field2")]);

    let node = build(node);
    let leaves = node.leaf_count();

    let translator = FilterTranslator::new("manage", "pg").with_empty_connectives(true);
    if let Ok(fragment) = translator.compile(Some(&model), &node) {
        assert!(fragment.is_balanced());
        assert_eq!(fragment.params.len(), leaves);
    }
});
