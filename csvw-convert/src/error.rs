//! Error types for schema loading and conversion

use csvw_graph_format::FormatError;
use thiserror::Error;

/// Fatal problems with the mapping schema, reported before any row is read
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema file could not be read
    #[error("failed to read schema '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Schema text is not valid JSON
    #[error("schema is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Top-level document is not a JSON object
    #[error("schema must be a JSON object")]
    NotAnObject,

    /// `tableSchema` is missing or not an object
    #[error("schema has no 'tableSchema' object")]
    MissingTableSchema,

    /// `tableSchema.columns` is missing or not an array
    #[error("'tableSchema.columns' must be an array")]
    MissingColumns,

    /// A column entry is not a JSON object
    #[error("column {index} is not an object")]
    ColumnNotObject { index: usize },

    /// A column lacks both `name` and `value`
    #[error("column {index} has neither 'name' nor 'value'")]
    NameOrValueRequired { index: usize },

    /// A column field has the wrong JSON type
    #[error("column {index}: invalid '{field}': {message}")]
    InvalidColumnField {
        index: usize,
        field: &'static str,
        message: String,
    },

    /// A table-level field has the wrong JSON type
    #[error("invalid '{field}': {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

/// Column-level failure; the column is skipped and the row continues
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    /// Rendered text could not be turned into an absolute IRI
    #[error("cannot convert `{rendered}` to a valid IRI: {reason}")]
    InvalidIri { rendered: String, reason: String },

    /// Literal column with neither a value pattern nor a cell value
    #[error("no 'value' pattern and no cell value for column '{column}'")]
    MissingField { column: String },

    /// Null list holds objects or nested lists
    #[error("malformed null specification on column '{column}'")]
    MalformedNull { column: String },

    /// Rendered `lang` pattern is not a well-formed language tag
    #[error("invalid language tag `{tag}` on column '{column}'")]
    InvalidLanguageTag { column: String, tag: String },
}

/// Failure reading the row stream
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be decoded
    #[error("row {row}: {message}")]
    Record { row: u64, message: String },

    #[error("{0}")]
    Other(String),
}

/// Structural failure of the parallel attempt; triggers sequential rerun
#[derive(Debug, Error)]
pub enum ParallelExecutionError {
    #[error("worker thread '{0}' panicked")]
    WorkerPanicked(String),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(String),

    #[error("chunk {0} never arrived")]
    MissingChunk(usize),

    #[error("row source failed: {0}")]
    Source(#[from] SourceError),

    #[error("chunk {index} could not be encoded: {message}")]
    Encode { index: usize, message: String },
}

/// Fatal conversion errors
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Invalid job configuration (worker count, chunk size, ...)
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("row source error: {0}")]
    Source(#[from] SourceError),

    #[error("serialization error: {0}")]
    Format(#[from] FormatError),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;
