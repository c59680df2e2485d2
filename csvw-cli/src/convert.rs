//! `csvw convert`

use crate::cli::ConvertArgs;
use crate::config::{ConvertSection, ConvertSettings};
use crate::error::{CliError, CliResult};
use crate::source::{CsvDialect, CsvFileSource};
use colored::Colorize;
use csvw_convert::{ConversionReport, Converter, Schema};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Schema file expected next to `csv_path`
pub fn metadata_path(csv_path: &Path) -> PathBuf {
    let mut name = csv_path.as_os_str().to_owned();
    name.push("-metadata.json");
    PathBuf::from(name)
}

/// Default output path: `<file>.<ext>`
pub fn output_path(csv_path: &Path, extension: &str) -> PathBuf {
    let mut name = csv_path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

pub fn run(args: &ConvertArgs, file: &ConvertSection, quiet: bool) -> CliResult<()> {
    if args.output.is_some() && args.files.len() > 1 {
        return Err(CliError::Usage(
            "--output can only be used with a single input file".into(),
        ));
    }

    let settings = ConvertSettings::resolve(args, file);
    for csv_path in &args.files {
        let target = args
            .output
            .clone()
            .unwrap_or_else(|| output_path(csv_path, settings.config.format.extension()));
        let report = convert_file(csv_path, &target, &settings)?;
        if !quiet {
            print_report(csv_path, &target, &report);
        }
    }
    Ok(())
}

/// Convert one CSV file and its metadata into `target`
pub fn convert_file(
    csv_path: &Path,
    target: &Path,
    settings: &ConvertSettings,
) -> CliResult<ConversionReport> {
    let schema_path = metadata_path(csv_path);
    if !csv_path.is_file() || !schema_path.is_file() {
        return Err(CliError::NotFound(format!(
            "could not find {} or {}",
            csv_path.display(),
            schema_path.display()
        )));
    }

    tracing::info!(csv = %csv_path.display(), schema = %schema_path.display(), "loading schema");
    let schema = Schema::load_path(&schema_path, &settings.config.base)?;

    if let Some(encoding) = schema.dialect().and_then(|d| d.encoding.as_deref()) {
        if !is_utf8(encoding) {
            tracing::warn!(encoding, "only UTF-8 input is supported; reading as UTF-8");
        }
    }

    let dialect = CsvDialect::resolve(settings.delimiter, settings.quotechar, schema.dialect())?;
    tracing::info!(
        delimiter = %(dialect.delimiter as char).escape_default(),
        quote = %(dialect.quote as char).escape_default(),
        "CSV dialect"
    );
    let source = CsvFileSource::new(csv_path, dialect);
    check_headers(&source, &schema)?;

    let converter = Converter::new(schema, settings.config_for(csv_path))?;

    let out = File::create(target).map_err(|e| {
        CliError::Output(format!("cannot create {}: {e}", target.display()))
    })?;
    let mut out = BufWriter::new(out);
    let result = converter
        .convert(&source, &mut out)
        .map_err(CliError::from)
        .and_then(|report| {
            out.flush().map_err(|e| {
                CliError::Output(format!("cannot write {}: {e}", target.display()))
            })?;
            Ok(report)
        });

    if result.is_err() {
        drop(out);
        if let Err(e) = fs::remove_file(target) {
            tracing::debug!(path = %target.display(), error = %e, "could not remove partial output");
        }
    }
    result
}

fn is_utf8(encoding: &str) -> bool {
    matches!(
        encoding.to_ascii_lowercase().replace('_', "-").as_str(),
        "utf-8" | "utf8" | "utf-8-sig" | "ascii" | "us-ascii"
    )
}

/// Warn about header problems that silently change the output
fn check_headers(source: &CsvFileSource, schema: &Schema) -> CliResult<()> {
    let headers = source.headers().map_err(|e| {
        CliError::Input(format!("cannot read header of {}: {e}", source.path().display()))
    })?;

    if headers.iter().any(String::is_empty) {
        tracing::warn!("one or more empty column headers; output may conflate IRIs");
    }
    let unique: HashSet<&str> = headers.iter().map(String::as_str).collect();
    if unique.len() < headers.len() {
        tracing::warn!("two or more column headers are identical; output may conflate IRIs");
    }

    for column in schema.columns().iter().filter(|c| !c.is_virtual) {
        if let Some(name) = column.name.as_deref() {
            if !unique.contains(name) {
                tracing::warn!(column = name, "schema column is not in the CSV header");
            }
        }
    }
    Ok(())
}

fn print_report(csv_path: &Path, target: &Path, report: &ConversionReport) {
    println!(
        "{} {} → {}",
        "Converted".green().bold(),
        csv_path.display(),
        target.display()
    );
    println!(
        "  {} rows, {} statements, {} cell errors ({:?}, {} chunks)",
        report.stats.rows,
        report.stats.statements + report.provenance_statements as u64,
        report.stats.cell_errors,
        report.mode,
        report.chunks,
    );
}
