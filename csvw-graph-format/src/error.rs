//! Serializer error types

use thiserror::Error;

/// Errors raised while encoding or writing RDF output
#[derive(Debug, Error)]
pub enum FormatError {
    /// Unknown output format name
    #[error("Unknown RDF format '{0}'; expected one of: nquads, ntriples, turtle, trig, trix")]
    UnknownFormat(String),

    /// XML writer failure (TriX)
    #[error("XML encoding error: {0}")]
    Xml(String),

    /// Underlying writer failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for serializer operations
pub type Result<T> = std::result::Result<T, FormatError>;
