//! tagfilter CLI - compile JSON filters into parameterized SQL.

use clap::Parser;

use tagfilter_cli::cli::{Cli, Command};
use tagfilter_cli::commands;
use tagfilter_cli::error::{CliError, CliResult};
use tagfilter_cli::output;

fn main() {
    tagfilter_query::logging::init();

    if let Err(e) = run() {
        output::error(&e.to_string());
        if let CliError::Filter(err) = &e {
            for suggestion in &err.context.suggestions {
                output::hint(suggestion);
            }
            if let Some(help) = &err.context.help {
                output::hint(help);
            }
        }
        std::process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Compile(args) => commands::compile::run(args),
        Command::Fields(args) => commands::fields::run(args),
        Command::Init(args) => commands::init::run(args),
        Command::Version => commands::version::run(),
    }
}
