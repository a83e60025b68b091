//! Source alias to storage name resolution.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{FilterError, FilterResult};
use crate::model::ModelMetadata;
use crate::sql::PLACEHOLDER;

/// One resolvable alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldEntry<'a> {
    /// Declared field name.
    pub field: &'a str,
    /// Storage name, or `None` when the field has no usable storage tag.
    pub storage: Option<&'a str>,
}

/// Alias lookup table for one model under one tag pair.
///
/// Built with a single scan over the fields in declaration order. When
/// several fields declare the same alias, the first one wins.
#[derive(Debug, Clone)]
pub struct FieldIndex<'a> {
    model: &'a str,
    storage_tag: &'a str,
    entries: IndexMap<&'a str, FieldEntry<'a>>,
}

impl<'a> FieldIndex<'a> {
    /// Index the model's fields by their `source_tag` alias.
    pub fn build<M: ModelMetadata + ?Sized>(
        model: &'a M,
        source_tag: &'a str,
        storage_tag: &'a str,
    ) -> Self {
        let fields = model.fields();
        let mut entries = IndexMap::with_capacity(fields.len());

        for field in fields {
            let Some(alias) = field.tag_name(source_tag) else {
                continue;
            };
            entries.entry(alias).or_insert_with(|| FieldEntry {
                field: field.name.as_ref(),
                storage: field.tag_name(storage_tag).filter(|name| !name.is_empty()),
            });
        }

        trace!(
            model = model.model_name(),
            source_tag,
            storage_tag,
            aliases = entries.len(),
            "Built field index"
        );

        Self {
            model: model.model_name(),
            storage_tag,
            entries,
        }
    }

    /// Resolve an alias to its storage name.
    pub fn resolve(&self, alias: &str) -> FilterResult<&'a str> {
        let entry = self
            .entries
            .get(alias)
            .ok_or_else(|| FilterError::unknown_field(self.model, alias))?;

        let storage = entry
            .storage
            .ok_or_else(|| FilterError::missing_storage(self.model, entry.field, self.storage_tag))?;
        if storage.contains(PLACEHOLDER) {
            return Err(FilterError::invalid_storage(self.model, entry.field, storage));
        }
        Ok(storage)
    }

    /// Name of the indexed model.
    pub fn model_name(&self) -> &'a str {
        self.model
    }

    /// Aliases and their entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, FieldEntry<'a>)> + '_ {
        self.entries.iter().map(|(alias, entry)| (*alias, *entry))
    }

    /// Number of distinct aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no field declares the source tag.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve a single alias without keeping the index around.
pub fn resolve<'a, M: ModelMetadata + ?Sized>(
    model: &'a M,
    source_tag: &'a str,
    storage_tag: &'a str,
    alias: &str,
) -> FilterResult<&'a str> {
    FieldIndex::build(model, source_tag, storage_tag).resolve(alias)
}
