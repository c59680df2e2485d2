//! CSV file row source

use crate::error::{CliError, CliResult};
use csvw_convert::{Dialect, RowIter, RowSource, RowValues, SourceError};
use std::path::{Path, PathBuf};

/// Delimiter and quote character for reading one CSV file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvDialect {
    pub delimiter: u8,
    pub quote: u8,
}

impl Default for CsvDialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
        }
    }
}

impl CsvDialect {
    /// Flags win over the metadata `dialect`, which wins over `,` and `"`
    pub fn resolve(
        delimiter: Option<char>,
        quotechar: Option<char>,
        metadata: Option<&Dialect>,
    ) -> CliResult<Self> {
        let defaults = Self::default();
        let from_metadata = |value: Option<&String>, field: &str| -> CliResult<Option<char>> {
            match value.map(String::as_str) {
                None | Some("") => Ok(None),
                Some(s) => {
                    let mut chars = s.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Ok(Some(c)),
                        _ => Err(CliError::Input(format!(
                            "metadata dialect {field} must be a single character, got '{s}'"
                        ))),
                    }
                }
            }
        };

        let delimiter = match delimiter {
            Some(c) => Some(c),
            None => from_metadata(metadata.and_then(|d| d.delimiter.as_ref()), "delimiter")?,
        };
        let quote = match quotechar {
            Some(c) => Some(c),
            None => from_metadata(metadata.and_then(|d| d.quote_char.as_ref()), "quoteChar")?,
        };

        Ok(Self {
            delimiter: delimiter
                .map(|c| ascii_byte(c, "delimiter"))
                .transpose()?
                .unwrap_or(defaults.delimiter),
            quote: quote
                .map(|c| ascii_byte(c, "quote character"))
                .transpose()?
                .unwrap_or(defaults.quote),
        })
    }
}

fn ascii_byte(c: char, what: &str) -> CliResult<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(CliError::Usage(format!(
            "{what} must be an ASCII character, got '{c}'"
        )))
    }
}

/// Rows of a CSV file with a header line, re-read on every `open`
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
    dialect: CsvDialect,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>, dialect: CsvDialect) -> Self {
        Self {
            path: path.into(),
            dialect,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header names, in file order
    pub fn headers(&self) -> Result<Vec<String>, SourceError> {
        let mut reader = self.reader()?;
        let headers = reader.headers().map_err(|e| csv_error(e, 0))?;
        Ok(headers.iter().map(str::to_string).collect())
    }

    fn reader(&self) -> Result<csv::Reader<std::fs::File>, SourceError> {
        csv::ReaderBuilder::new()
            .delimiter(self.dialect.delimiter)
            .quote(self.dialect.quote)
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| csv_error(e, 0))
    }
}

impl RowSource for CsvFileSource {
    fn open(&self) -> Result<RowIter<'_>, SourceError> {
        let mut reader = self.reader()?;
        let headers = reader.headers().map_err(|e| csv_error(e, 0))?.clone();
        tracing::debug!(
            path = %self.path.display(),
            columns = headers.len(),
            "opened CSV file"
        );

        let path = self.path.clone();
        let rows = reader
            .into_byte_records()
            .enumerate()
            .filter_map(move |(record, result)| {
                let line = result.as_ref().ok().and_then(|r| r.position()).map(|p| p.line());
                let decoded = match result {
                    Ok(bytes) => decode(&headers, &bytes).map_err(|e| e.to_string()),
                    Err(err) if err.is_io_error() => {
                        return Some(Err(csv_error(err, record as u64)))
                    }
                    Err(err) => Err(err.to_string()),
                };
                match decoded {
                    Ok(values) => Some(Ok(values)),
                    Err(error) => {
                        tracing::warn!(
                            path = %path.display(),
                            record,
                            line,
                            %error,
                            "skipping unreadable CSV record"
                        );
                        None
                    }
                }
            });
        Ok(Box::new(rows))
    }
}

/// Pair header names with UTF-8 field values; short rows leave trailing columns absent
fn decode(headers: &csv::StringRecord, record: &csv::ByteRecord) -> Result<RowValues, std::str::Utf8Error> {
    headers
        .iter()
        .zip(record.iter())
        .map(|(name, value)| Ok((name.to_string(), std::str::from_utf8(value)?.to_string())))
        .collect()
}

fn csv_error(err: csv::Error, row: u64) -> SourceError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => SourceError::Io(io),
            other => SourceError::Other(format!("{other:?}")),
        }
    } else {
        SourceError::Record {
            row,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn collect(source: &CsvFileSource) -> Vec<RowValues> {
        source.open().unwrap().map(Result::unwrap).collect()
    }

    #[test]
    fn reads_rows_by_header() {
        let file = write_csv("id,name\n1,Ann\n2,Bob\n");
        let source = CsvFileSource::new(file.path(), CsvDialect::default());

        assert_eq!(source.headers().unwrap(), vec!["id", "name"]);
        let rows = collect(&source);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("name").map(String::as_str), Some("Bob"));
    }

    #[test]
    fn can_be_reopened() {
        let file = write_csv("id\n1\n2\n3\n");
        let source = CsvFileSource::new(file.path(), CsvDialect::default());
        assert_eq!(collect(&source).len(), 3);
        assert_eq!(collect(&source).len(), 3);
    }

    #[test]
    fn honours_delimiter_and_quote() {
        let file = write_csv("id;label\n1;'a;b'\n");
        let dialect = CsvDialect {
            delimiter: b';',
            quote: b'\'',
        };
        let rows = collect(&CsvFileSource::new(file.path(), dialect));
        assert_eq!(rows[0].get("label").map(String::as_str), Some("a;b"));
    }

    #[test]
    fn short_rows_leave_columns_absent() {
        let file = write_csv("a,b,c\n1,2\n");
        let rows = collect(&CsvFileSource::new(file.path(), CsvDialect::default()));
        assert_eq!(rows[0].get("b").map(String::as_str), Some("2"));
        assert!(rows[0].get("c").is_none());
    }

    #[test]
    fn undecodable_record_is_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"id,name\n1,Ann\n2,\xff\xfe\n3,Cid\n").unwrap();
        let rows = collect(&CsvFileSource::new(file.path(), CsvDialect::default()));

        let ids: Vec<&str> = rows
            .iter()
            .filter_map(|r| r.get("id").map(String::as_str))
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(rows[1].get("name").map(String::as_str), Some("Cid"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = CsvFileSource::new("/nonexistent/data.csv", CsvDialect::default());
        assert!(matches!(source.open(), Err(SourceError::Io(_))));
    }

    #[test]
    fn dialect_resolution_order() {
        let metadata = Dialect {
            delimiter: Some(";".to_string()),
            quote_char: Some("'".to_string()),
            ..Default::default()
        };

        let from_metadata = CsvDialect::resolve(None, None, Some(&metadata)).unwrap();
        assert_eq!(from_metadata, CsvDialect { delimiter: b';', quote: b'\'' });

        let from_flags = CsvDialect::resolve(Some('\t'), None, Some(&metadata)).unwrap();
        assert_eq!(from_flags, CsvDialect { delimiter: b'\t', quote: b'\'' });

        assert_eq!(CsvDialect::resolve(None, None, None).unwrap(), CsvDialect::default());
    }

    #[test]
    fn rejects_non_ascii_delimiter() {
        assert!(matches!(
            CsvDialect::resolve(Some('§'), None, None),
            Err(CliError::Usage(_))
        ));
    }
}
