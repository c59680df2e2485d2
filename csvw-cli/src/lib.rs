//! CSVW command-line converter.
//!
//! Reads a CSV file plus its `<file>-metadata.json` schema and writes RDF
//! in the chosen format. The binary parses args, sets up tracing and then
//! hands off to [`run`].

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod source;

use cli::{Cli, Commands};
use config::FileConfig;

/// Dispatch a parsed [`Cli`] to the appropriate command handler.
pub fn run(cli: Cli) -> error::CliResult<()> {
    let file = FileConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert(args) => convert::run(&args, &file.convert, cli.quiet),
    }
}
