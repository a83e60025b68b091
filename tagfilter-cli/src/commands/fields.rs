//! `tagfilter fields` command - List resolvable aliases.

use tagfilter_query::{FieldIndex, ModelMetadata};

use crate::cli::FieldsArgs;
use crate::commands::load_model;
use crate::config::Config;
use crate::error::CliResult;
use crate::output::{self, style_pending};

/// Run the fields command
pub fn run(args: FieldsArgs) -> CliResult<()> {
    let mut config = Config::discover(args.config.as_deref())?;
    config.apply_tags(&args.tags);

    let model = load_model(&args.model)?;
    let index = FieldIndex::build(&model, &config.tags.source, &config.tags.storage);

    output::header(&format!(
        "{} ({} → {})",
        model.model_name(),
        config.tags.source,
        config.tags.storage
    ));

    if index.is_empty() {
        output::warn(&format!("No field declares a `{}` tag", config.tags.source));
        return Ok(());
    }

    for (i, (alias, entry)) in index.entries().enumerate() {
        let column = match entry.storage {
            Some(column) => column.to_string(),
            None => style_pending(&format!("(no `{}` name)", config.tags.storage)),
        };
        output::numbered_item(i + 1, &format!("{} → {}  [{}]", alias, column, entry.field));
    }

    output::newline();
    output::dim(&format!("{} of {} fields resolvable", index.len(), model.fields().len()));
    Ok(())
}
