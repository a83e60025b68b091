//! CLI configuration handling.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tagfilter_query::{DEFAULT_MAX_DEPTH, FilterTranslator, NodeKeys};

use crate::cli::{OutputFormat, TagArgs};
use crate::error::{CliError, CliResult};

/// Default config file name (lives in the working directory)
pub const CONFIG_FILE_NAME: &str = "tagfilter.toml";

/// tagfilter CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tag pair used for resolution
    pub tags: TagsConfig,

    /// Key vocabulary of filter payloads
    pub keys: NodeKeys,

    /// Compiler options
    pub compile: CompileConfig,

    /// Output options
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> CliResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load an explicit config file, else `./tagfilter.toml` if present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> CliResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let local = Path::new(CONFIG_FILE_NAME);
        if local.is_file() {
            tracing::debug!(path = %local.display(), "Using local config");
            return Self::load(local);
        }
        Ok(Self::default())
    }

    /// Apply command-line tag overrides.
    pub fn apply_tags(&mut self, args: &TagArgs) {
        if let Some(source) = &args.source {
            self.tags.source = source.clone();
        }
        if let Some(storage) = &args.storage {
            self.tags.storage = storage.clone();
        }
    }

    /// Build a translator from these settings.
    pub fn translator(&self) -> FilterTranslator {
        FilterTranslator::new(&self.tags.source, &self.tags.storage)
            .with_keys(self.keys.clone())
            .with_max_depth(self.compile.max_depth)
            .with_empty_connectives(self.compile.allow_empty)
    }
}

/// Tag pair configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagsConfig {
    /// Tag holding the aliases filters use
    pub source: String,

    /// Tag holding the names emitted into SQL
    pub storage: String,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            source: "manage".to_string(),
            storage: "pg".to_string(),
        }
    }
}

/// Compiler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Maximum connective nesting
    pub max_depth: usize,

    /// Compile connectives without items to `()`
    pub allow_empty: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_empty: false,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Fragment output format
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tags.source, "manage");
        assert_eq!(config.tags.storage, "pg");
        assert_eq!(config.keys, NodeKeys::default());
        assert_eq!(config.compile.max_depth, 128);
        assert!(!config.compile.allow_empty);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [tags]
            source = "api"

            [keys]
            field = "name"

            [output]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.tags.source, "api");
        assert_eq!(config.tags.storage, "pg");
        assert_eq!(config.keys.field, "name");
        assert_eq!(config.keys.kind, "type");
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.compile.allow_empty = true;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_tag_overrides() {
        let mut config = Config::default();
        config.apply_tags(&TagArgs {
            source: None,
            storage: Some("mysql".into()),
        });
        assert_eq!(config.tags.source, "manage");
        assert_eq!(config.tags.storage, "mysql");

        let translator = config.translator();
        assert_eq!(translator.storage_tag(), "mysql");
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::discover(Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
