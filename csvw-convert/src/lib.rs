//! Schema-driven conversion of tabular rows to RDF
//!
//! A CSVW-style JSON schema describes, column by column, how each cell of a
//! row becomes a statement: which subject it is about (`aboutUrl`), which
//! predicate (`propertyUrl`), and whether the object is an IRI (`valueUrl`)
//! or a literal with a datatype or language. [`Converter`] runs a schema
//! over a [`RowSource`] and streams one serialized document.
//!
//! Rows are converted in fixed-size chunks, sequentially or on a worker pool.
//! Output order follows input order either way, and a structural failure
//! in the pool reruns the whole job sequentially before anything is written.
//!
//! ```text
//! schema + rows → Orchestrator → chunks → RowProcessor → encoded chunks
//!               → ordered output → publication graphs → footer
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod iri;
pub mod namespaces;
pub mod orchestrator;
pub mod policy;
pub mod processor;
pub mod provenance;
pub mod row;
pub mod schema;
pub mod template;

pub use config::ConvertConfig;
pub use converter::{ConversionReport, Converter};
pub use error::{CellError, ConvertError, ParallelExecutionError, Result, SchemaError, SourceError};
pub use namespaces::NamespaceContext;
pub use orchestrator::ExecutionMode;
pub use processor::{ConversionStats, RowProcessor};
pub use provenance::Publication;
pub use row::{Chunk, Chunker, Row, RowIter, RowSource, RowValues, VecSource};
pub use schema::{Column, Dialect, NullSpec, ObjectRule, Schema, ValueKind};
pub use template::{Template, TemplateRenderer};
pub use csvw_graph_format::RdfFormat;
