//! RDF dataset serializers
//!
//! This crate turns `csvw_graph_ir::Quad` batches into bytes in one of the
//! supported wire formats:
//!
//! - **N-Triples** / **N-Quads**: line-based, graph names dropped / kept
//! - **Turtle** / **TriG**: prefixed, grouped by subject
//! - **TriX**: XML, one `<graph>` element per graph run
//!
//! Output is produced in three parts so that independently encoded batches
//! can be concatenated into one valid document: a header (prefix
//! declarations, XML prolog), any number of bodies, and a footer.
//!
//! # Example
//!
//! ```
//! use csvw_graph_ir::{Quad, Term};
//! use csvw_graph_format::{QuadEncoder, RdfFormat};
//!
//! let encoder = QuadEncoder::new(RdfFormat::NQuads);
//! let quads = vec![Quad::triple(
//!     Term::iri("http://example.org/alice"),
//!     Term::iri("http://xmlns.com/foaf/0.1/name"),
//!     Term::string("Alice"),
//! )];
//!
//! let body = encoder.encode(&quads).unwrap();
//! assert_eq!(
//!     String::from_utf8(body).unwrap(),
//!     "<http://example.org/alice> <http://xmlns.com/foaf/0.1/name> \"Alice\" .\n"
//! );
//! ```

mod encoder;
mod error;
mod escape;
mod format;
mod ntriples;
mod prefix;
mod trix;
mod turtle;

pub use encoder::{QuadEncoder, StreamWriter};
pub use error::{FormatError, Result};
pub use format::RdfFormat;
pub use prefix::PrefixMap;
