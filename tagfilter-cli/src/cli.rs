//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// tagfilter - compile JSON filters into parameterized SQL
#[derive(Parser, Debug)]
#[command(name = "tagfilter")]
#[command(version)]
#[command(about = "tagfilter - compile JSON filters into parameterized SQL", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a filter against a model description
    Compile(CompileArgs),

    /// List the field aliases a model resolves
    Fields(FieldsArgs),

    /// Write a default tagfilter.toml
    Init(InitArgs),

    /// Display version information
    Version,
}

/// Output format for compiled fragments
#[derive(ValueEnum, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// SQL on the first line, then one parameter per line
    #[default]
    Text,
    /// `{"sql": ..., "params": [...]}`
    Json,
}

/// Tag selection shared by commands that resolve fields
#[derive(Args, Debug, Clone, Default)]
pub struct TagArgs {
    /// Tag holding the aliases filters use (overrides config)
    #[arg(long)]
    pub source: Option<String>,

    /// Tag holding the names emitted into SQL (overrides config)
    #[arg(long)]
    pub storage: Option<String>,
}

// =============================================================================
// Compile Command
// =============================================================================

/// Arguments for the `compile` command
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Model description (TOML)
    #[arg(short, long)]
    pub model: PathBuf,

    /// Filter file (JSON); reads stdin when omitted or `-`
    #[arg(short, long)]
    pub filter: Option<PathBuf>,

    #[command(flatten)]
    pub tags: TagArgs,

    /// Output format (overrides config)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Compile connectives without items to `()`
    #[arg(long)]
    pub allow_empty: bool,

    /// Maximum connective nesting (overrides config)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Config file (defaults to ./tagfilter.toml when present)
    #[arg(short, long, env = "TAGFILTER_CONFIG")]
    pub config: Option<PathBuf>,
}

// =============================================================================
// Fields Command
// =============================================================================

/// Arguments for the `fields` command
#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Model description (TOML)
    #[arg(short, long)]
    pub model: PathBuf,

    #[command(flatten)]
    pub tags: TagArgs,

    /// Config file (defaults to ./tagfilter.toml when present)
    #[arg(short, long, env = "TAGFILTER_CONFIG")]
    pub config: Option<PathBuf>,
}

// =============================================================================
// Init Command
// =============================================================================

/// Arguments for the `init` command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write tagfilter.toml into
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
