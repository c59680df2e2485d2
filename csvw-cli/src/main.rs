use clap::Parser;
use csvw_cli::cli::Cli;
use csvw_cli::error::exit_with_error;

fn main() {
    let cli = Cli::parse();

    // Only the flag and NO_COLOR disable color; stdout may be piped while
    // errors still reach a terminal on stderr.
    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    init_tracing(&cli);

    if let Err(e) = csvw_cli::run(cli) {
        exit_with_error(e);
    }
}

/// Logs go to stderr. `--quiet` silences them, `--verbose` honours
/// `RUST_LOG` (default `info`), otherwise only warnings and errors show.
fn init_tracing(cli: &Cli) {
    use tracing_subscriber::EnvFilter;

    let filter = if cli.quiet {
        EnvFilter::new("off")
    } else if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new("warn")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
