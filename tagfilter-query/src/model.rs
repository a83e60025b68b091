//! Model field metadata.
//!
//! A model is described by an ordered list of [`FieldDef`]s. Each field
//! carries named tags, and a tag value is a name optionally followed by
//! comma-separated flags (`"pg-field0,pk"`). Filters refer to fields by the
//! name under one tag (the source alias) and compile to the name under
//! another (the storage name).
//!
//! Metadata is provided either statically, through `#[derive(FilterModel)]`
//! which implements [`TaggedModel`] and [`ModelMetadata`], or at runtime
//! through a [`ModelSchema`] loaded from configuration.
//!
//! ```rust
//! use tagfilter_query::model::{FieldDef, FieldTag, Model, ModelMetadata, TaggedModel};
//!
//! struct Account;
//!
//! const EMAIL_TAGS: &[FieldTag] = &[
//!     FieldTag::new("api", "mail"),
//!     FieldTag::new("pg", "email_address,unique"),
//! ];
//!
//! impl TaggedModel for Account {
//!     const MODEL_NAME: &'static str = "Account";
//!     const FIELDS: &'static [FieldDef] = &[FieldDef::new("email", EMAIL_TAGS)];
//! }
//!
//! // A collection of the model exposes the same fields.
//! let handle = Model::<Vec<Account>>::new();
//! assert_eq!(handle.fields()[0].tag_name("pg"), Some("email_address"));
//! ```

use std::borrow::Cow;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Separator between a tag's name and its modifier flags.
pub const TAG_SEPARATOR: char = ',';

/// One `key = "value"` tag on a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldTag {
    /// Tag key, e.g. `pg`.
    pub key: Cow<'static, str>,
    /// Raw tag value, e.g. `pg-field0,pk`.
    pub value: Cow<'static, str>,
}

impl FieldTag {
    /// Create a static tag.
    pub const fn new(key: &'static str, value: &'static str) -> Self {
        Self {
            key: Cow::Borrowed(key),
            value: Cow::Borrowed(value),
        }
    }

    /// Create an owned tag.
    pub fn owned(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Cow::Owned(key.into()),
            value: Cow::Owned(value.into()),
        }
    }

    /// The name segment of the value, before any flags.
    pub fn name(&self) -> &str {
        self.value.split(TAG_SEPARATOR).next().unwrap_or_default()
    }

    /// Modifier flags after the name segment.
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.value.split(TAG_SEPARATOR).skip(1)
    }
}

/// A field of a model and its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Declared field name (used in diagnostics).
    pub name: Cow<'static, str>,
    /// Tags in declaration order.
    pub tags: Cow<'static, [FieldTag]>,
}

impl FieldDef {
    /// Create a static field definition.
    pub const fn new(name: &'static str, tags: &'static [FieldTag]) -> Self {
        Self {
            name: Cow::Borrowed(name),
            tags: Cow::Borrowed(tags),
        }
    }

    /// Create an owned field definition.
    pub fn owned(name: impl Into<String>, tags: Vec<FieldTag>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            tags: Cow::Owned(tags),
        }
    }

    /// Raw value of the first tag with the given key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.find(key).map(|t| t.value.as_ref())
    }

    /// Name segment of the first tag with the given key.
    pub fn tag_name(&self, key: &str) -> Option<&str> {
        self.find(key).map(FieldTag::name)
    }

    /// Check whether the field declares a tag with the given key.
    pub fn has_tag(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    fn find(&self, key: &str) -> Option<&FieldTag> {
        self.tags.iter().find(|t| t.key == key)
    }
}

/// Read access to a model's field list.
///
/// Implemented by derived models, [`Model`] handles, [`ModelSchema`], and
/// transparently by references, boxes and shared pointers to any of them.
pub trait ModelMetadata {
    /// Model name used in diagnostics.
    fn model_name(&self) -> &str;

    /// Fields in declaration order.
    fn fields(&self) -> &[FieldDef];
}

impl<T: ModelMetadata + ?Sized> ModelMetadata for &T {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn fields(&self) -> &[FieldDef] {
        (**self).fields()
    }
}

impl<T: ModelMetadata + ?Sized> ModelMetadata for &mut T {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn fields(&self) -> &[FieldDef] {
        (**self).fields()
    }
}

impl<T: ModelMetadata + ?Sized> ModelMetadata for Box<T> {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn fields(&self) -> &[FieldDef] {
        (**self).fields()
    }
}

impl<T: ModelMetadata + ?Sized> ModelMetadata for Rc<T> {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn fields(&self) -> &[FieldDef] {
        (**self).fields()
    }
}

impl<T: ModelMetadata + ?Sized> ModelMetadata for Arc<T> {
    fn model_name(&self) -> &str {
        (**self).model_name()
    }

    fn fields(&self) -> &[FieldDef] {
        (**self).fields()
    }
}

/// Static field metadata attached to a type.
///
/// Usually implemented with `#[derive(FilterModel)]`. Pointers and
/// homogeneous collections of a tagged model are tagged models themselves
/// and expose the element's fields.
pub trait TaggedModel {
    /// Model name used in diagnostics.
    const MODEL_NAME: &'static str;

    /// Fields in declaration order.
    const FIELDS: &'static [FieldDef];
}

impl<T: TaggedModel + ?Sized> TaggedModel for &T {
    const MODEL_NAME: &'static str = T::MODEL_NAME;
    const FIELDS: &'static [FieldDef] = T::FIELDS;
}

impl<T: TaggedModel + ?Sized> TaggedModel for Box<T> {
    const MODEL_NAME: &'static str = T::MODEL_NAME;
    const FIELDS: &'static [FieldDef] = T::FIELDS;
}

impl<T: TaggedModel> TaggedModel for Option<T> {
    const MODEL_NAME: &'static str = T::MODEL_NAME;
    const FIELDS: &'static [FieldDef] = T::FIELDS;
}

impl<T: TaggedModel> TaggedModel for Vec<T> {
    const MODEL_NAME: &'static str = T::MODEL_NAME;
    const FIELDS: &'static [FieldDef] = T::FIELDS;
}

impl<T: TaggedModel> TaggedModel for [T] {
    const MODEL_NAME: &'static str = T::MODEL_NAME;
    const FIELDS: &'static [FieldDef] = T::FIELDS;
}

impl<T: TaggedModel, const N: usize> TaggedModel for [T; N] {
    const MODEL_NAME: &'static str = T::MODEL_NAME;
    const FIELDS: &'static [FieldDef] = T::FIELDS;
}

impl<T: TaggedModel> ModelMetadata for Vec<T> {
    fn model_name(&self) -> &str {
        T::MODEL_NAME
    }

    fn fields(&self) -> &[FieldDef] {
        T::FIELDS
    }
}

impl<T: TaggedModel> ModelMetadata for [T] {
    fn model_name(&self) -> &str {
        T::MODEL_NAME
    }

    fn fields(&self) -> &[FieldDef] {
        T::FIELDS
    }
}

impl<T: TaggedModel, const N: usize> ModelMetadata for [T; N] {
    fn model_name(&self) -> &str {
        T::MODEL_NAME
    }

    fn fields(&self) -> &[FieldDef] {
        T::FIELDS
    }
}

impl<T: TaggedModel> ModelMetadata for Option<T> {
    fn model_name(&self) -> &str {
        T::MODEL_NAME
    }

    fn fields(&self) -> &[FieldDef] {
        T::FIELDS
    }
}

/// Zero-sized handle exposing a [`TaggedModel`]'s fields without an instance.
pub struct Model<T: ?Sized>(PhantomData<fn(&T)>);

impl<T: ?Sized> Model<T> {
    /// Create a handle.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: ?Sized> Default for Model<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for Model<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Model<T> {}

impl<T: ?Sized> std::fmt::Debug for Model<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Model").field(&std::any::type_name::<T>()).finish()
    }
}

impl<T: TaggedModel + ?Sized> ModelMetadata for Model<T> {
    fn model_name(&self) -> &str {
        T::MODEL_NAME
    }

    fn fields(&self) -> &[FieldDef] {
        T::FIELDS
    }
}

/// A model description known only at runtime.
///
/// Deserializes from a table such as:
///
/// ```toml
/// name = "TestModel"
///
/// [[fields]]
/// name = "Aaa"
/// tags = { manage = "field0", pg = "pg-field0,pk" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "SchemaRepr", into = "SchemaRepr")]
pub struct ModelSchema {
    name: String,
    fields: Vec<FieldDef>,
}

impl ModelSchema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field with the given tags.
    pub fn field<K, V>(mut self, name: impl Into<String>, tags: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let tags = tags.into_iter().map(|(k, v)| FieldTag::owned(k, v)).collect();
        self.fields.push(FieldDef::owned(name, tags));
        self
    }

    /// Copy the fields of a static model.
    pub fn from_tagged<T: TaggedModel + ?Sized>() -> Self {
        Self {
            name: T::MODEL_NAME.to_string(),
            fields: T::FIELDS.to_vec(),
        }
    }
}

impl ModelMetadata for ModelSchema {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

#[derive(Deserialize, Serialize)]
struct SchemaRepr {
    name: String,
    #[serde(default)]
    fields: Vec<FieldRepr>,
}

#[derive(Deserialize, Serialize)]
struct FieldRepr {
    name: String,
    #[serde(default)]
    tags: IndexMap<String, String>,
}

impl From<SchemaRepr> for ModelSchema {
    fn from(repr: SchemaRepr) -> Self {
        let fields = repr
            .fields
            .into_iter()
            .map(|f| {
                let tags = f.tags.into_iter().map(|(k, v)| FieldTag::owned(k, v)).collect();
                FieldDef::owned(f.name, tags)
            })
            .collect();
        Self {
            name: repr.name,
            fields,
        }
    }
}

impl From<ModelSchema> for SchemaRepr {
    fn from(schema: ModelSchema) -> Self {
        let fields = schema
            .fields
            .into_iter()
            .map(|f| FieldRepr {
                name: f.name.into_owned(),
                tags: f
                    .tags
                    .iter()
                    .map(|t| (t.key.to_string(), t.value.to_string()))
                    .collect(),
            })
            .collect();
        Self {
            name: schema.name,
            fields,
        }
    }
}
