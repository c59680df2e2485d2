use clap::{Args, Parser, Subcommand};
use csvw_graph_format::RdfFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "csvw",
    about = "Convert CSV files to RDF using CSVW metadata",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also respects NO_COLOR env var)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to a TOML config file (defaults to ./csvw.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert CSV files to RDF
    ///
    /// Each `<file>` needs its schema next to it as `<file>-metadata.json`.
    /// Output goes to `<file>.<ext>` unless `--output` is given.
    Convert(ConvertArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConvertArgs {
    /// CSV files to convert
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format: ntriples, nquads, turtle, trig, trix
    #[arg(long, short = 'f', value_parser = parse_format)]
    pub format: Option<RdfFormat>,

    /// Worker threads (1 = sequential)
    #[arg(long, short = 'w')]
    pub workers: Option<usize>,

    /// Rows per chunk
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Field delimiter (overrides the metadata dialect)
    #[arg(long, short = 'd')]
    pub delimiter: Option<char>,

    /// Quote character (overrides the metadata dialect)
    #[arg(long)]
    pub quotechar: Option<char>,

    /// Base IRI used when the metadata has no `@base`
    #[arg(long)]
    pub base: Option<String>,

    /// Dataset name for the publication graph IRIs (defaults to the file name)
    #[arg(long)]
    pub dataset_name: Option<String>,

    /// Write output here instead of `<file>.<ext>` (single input only)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

fn parse_format(s: &str) -> Result<RdfFormat, String> {
    s.parse::<RdfFormat>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_convert_flags() {
        let cli = Cli::try_parse_from([
            "csvw",
            "convert",
            "data.csv",
            "--format",
            "ttl",
            "--workers",
            "2",
            "--chunk-size",
            "10",
            "--delimiter",
            ";",
        ])
        .unwrap();

        let Commands::Convert(args) = cli.command;
        assert_eq!(args.files, vec![PathBuf::from("data.csv")]);
        assert_eq!(args.format, Some(RdfFormat::Turtle));
        assert_eq!(args.workers, Some(2));
        assert_eq!(args.chunk_size, Some(10));
        assert_eq!(args.delimiter, Some(';'));
        assert_eq!(args.quotechar, None);
    }

    #[test]
    fn rejects_unknown_format() {
        let err = Cli::try_parse_from(["csvw", "convert", "a.csv", "--format", "rdfxml"])
            .unwrap_err();
        assert!(err.to_string().contains("rdfxml"));
    }

    #[test]
    fn requires_a_file() {
        assert!(Cli::try_parse_from(["csvw", "convert"]).is_err());
    }
}
