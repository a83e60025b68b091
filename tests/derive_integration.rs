//! Integration tests for `#[derive(FilterModel)]`.

use pretty_assertions::assert_eq;
use tagfilter::model::{FieldDef, Model, ModelMetadata, TaggedModel};
use tagfilter::prelude::*;

#[derive(FilterModel)]
#[filter(name = "Account")]
#[allow(dead_code)]
struct AccountRow {
    #[tag(api = "mail", pg = "email_address,unique")]
    email: String,

    #[filter(name = "Age")]
    #[tag(api = "age")]
    #[tag(pg = "age_years")]
    age: u32,

    #[filter(skip)]
    #[tag(api = "cache", pg = "cache")]
    cache: Vec<u8>,

    #[tag(api = "nickname")]
    nickname: Option<String>,

    notes: String,
}

#[derive(FilterModel)]
#[allow(dead_code)]
struct Wrapper<T> {
    #[tag(api = "inner", pg = "inner_col")]
    inner: T,
}

#[derive(FilterModel)]
struct Empty;

fn names(fields: &[FieldDef]) -> Vec<&str> {
    fields.iter().map(|f| f.name.as_ref()).collect()
}

#[test]
fn test_generated_table() {
    assert_eq!(AccountRow::MODEL_NAME, "Account");
    assert_eq!(names(AccountRow::FIELDS), vec!["email", "Age", "nickname", "notes"]);

    let email = &AccountRow::FIELDS[0];
    assert_eq!(email.tag("pg"), Some("email_address,unique"));
    assert_eq!(email.tag_name("pg"), Some("email_address"));
    assert_eq!(email.tag_name("api"), Some("mail"));

    let age = &AccountRow::FIELDS[1];
    assert_eq!(age.tag_name("pg"), Some("age_years"));
    assert!(AccountRow::FIELDS[3].tags.is_empty());
}

#[test]
fn test_handle_and_dyn_metadata() {
    let handle = Model::<AccountRow>::new();
    let dynamic: &dyn ModelMetadata = &handle;
    assert_eq!(dynamic.model_name(), "Account");
    assert_eq!(dynamic.fields().len(), 4);
}

#[test]
fn test_compile_against_derived_model() {
    let fragment = FilterTranslator::new("api", "pg")
        .compile_for::<AccountRow>(&FilterNode::or([
            FilterNode::condition("mail", "contains", "%@example.com"),
            FilterNode::condition("age", "gt", 30),
        ]))
        .unwrap();
    assert_eq!(fragment.sql, "(email_addresslike? or age_years>?)");
}

#[test]
fn test_skipped_and_untagged_fields_do_not_resolve() {
    let translator = FilterTranslator::new("api", "pg");

    let err = translator
        .compile_for::<AccountRow>(&FilterNode::condition("cache", "eq", 1))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::UnknownField);

    let err = translator
        .compile_for::<AccountRow>(&FilterNode::condition("nickname", "eq", "x"))
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingStorageMapping);
    assert!(err.is_model_error());
}

#[test]
fn test_generic_and_unit_models() {
    assert_eq!(<Wrapper<i64> as TaggedModel>::MODEL_NAME, "Wrapper");
    let fragment = FilterTranslator::new("api", "pg")
        .compile_for::<Wrapper<String>>(&FilterNode::condition("inner", "eq", "v"))
        .unwrap();
    assert_eq!(fragment.sql, "inner_col=?");

    assert!(Empty::FIELDS.is_empty());
}
