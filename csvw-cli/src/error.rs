use colored::Colorize;
use csvw_convert::ConvertError;
use std::fmt;
use std::process;

/// Exit codes for the CLI.
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for CLI operations.
pub enum CliError {
    /// Error from the conversion engine.
    Convert(ConvertError),
    /// Config file issues.
    Config(String),
    /// CSV file or its metadata not found.
    NotFound(String),
    /// Unreadable or malformed input.
    Input(String),
    /// Output file could not be created or written.
    Output(String),
    /// Argument / usage errors.
    Usage(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => EXIT_USAGE,
            _ => EXIT_ERROR,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Convert(e) => write!(f, "{} {e}", "error:".red().bold()),
            CliError::Config(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Input(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::NotFound(msg) => write!(
                f,
                "{} {msg}\n  {} each CSV file needs its schema next to it as <file>-metadata.json",
                "error:".red().bold(),
                "help:".cyan().bold(),
            ),
            CliError::Output(msg) => write!(f, "{} {msg}", "error:".red().bold()),
            CliError::Usage(msg) => write!(f, "{} {msg}", "error:".red().bold()),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<ConvertError> for CliError {
    fn from(e: ConvertError) -> Self {
        CliError::Convert(e)
    }
}

impl From<csvw_convert::SchemaError> for CliError {
    fn from(e: csvw_convert::SchemaError) -> Self {
        CliError::Convert(ConvertError::Schema(e))
    }
}

impl From<toml::de::Error> for CliError {
    fn from(e: toml::de::Error) -> Self {
        CliError::Config(format!("invalid config file: {e}"))
    }
}

/// Print error and exit with the appropriate code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    process::exit(err.exit_code())
}

pub type CliResult<T> = std::result::Result<T, CliError>;
