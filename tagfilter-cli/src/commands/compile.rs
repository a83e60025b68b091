//! `tagfilter compile` command - Compile a filter against a model.

use std::io::Read;
use std::path::Path;

use tagfilter_query::Fragment;

use crate::cli::{CompileArgs, OutputFormat};
use crate::commands::load_model;
use crate::config::Config;
use crate::error::CliResult;

/// Run the compile command
pub fn run(args: CompileArgs) -> CliResult<()> {
    let mut config = Config::discover(args.config.as_deref())?;
    config.apply_tags(&args.tags);
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(max_depth) = args.max_depth {
        config.compile.max_depth = max_depth;
    }
    if args.allow_empty {
        config.compile.allow_empty = true;
    }

    let model = load_model(&args.model)?;
    let payload = read_filter(args.filter.as_deref())?;

    let fragment = config.translator().compile_str(Some(&model), &payload)?;
    print!("{}", render(&fragment, config.output.format)?);
    Ok(())
}

/// Read the filter from a file, or stdin for `None` / `-`.
fn read_filter(path: Option<&Path>) -> CliResult<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut payload = String::new();
            std::io::stdin().read_to_string(&mut payload)?;
            Ok(payload)
        }
    }
}

/// Render a fragment in the requested format.
pub fn render(fragment: &Fragment, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(fragment)?)),
        OutputFormat::Text => {
            let mut out = format!("{}\n", fragment.sql);
            for (i, param) in fragment.params.iter().enumerate() {
                out.push_str(&format!("{}: {}\n", i + 1, serde_json::to_string(param)?));
            }
            Ok(out)
        }
    }
}
