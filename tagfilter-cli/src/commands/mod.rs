//! CLI command implementations.

pub mod compile;
pub mod fields;
pub mod init;
pub mod version;

use std::path::Path;

use tagfilter_query::ModelSchema;

use crate::error::{CliError, CliResult};

/// Load a TOML model description.
pub fn load_model(path: &Path) -> CliResult<ModelSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::Model(format!("Failed to read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| CliError::Model(format!("Invalid model description {}: {}", path.display(), e)))
}
