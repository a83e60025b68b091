//! `tagfilter init` command - Write a default configuration file.

use crate::cli::InitArgs;
use crate::config::{CONFIG_FILE_NAME, Config};
use crate::error::{CliError, CliResult};
use crate::output::{self, success};

/// Run the init command
pub fn run(args: InitArgs) -> CliResult<()> {
    if !args.path.is_dir() {
        std::fs::create_dir_all(&args.path)?;
    }

    let config_path = args.path.join(CONFIG_FILE_NAME);
    if config_path.exists() && !args.force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )));
    }

    Config::default().save(&config_path)?;

    success(&format!("Created {}", config_path.display()));
    output::dim("Edit [tags] to match the tag names on your models.");
    Ok(())
}
