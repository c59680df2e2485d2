//! Format-agnostic RDF quad intermediate representation
//!
//! This crate provides the canonical types produced by the converter and
//! consumed by the serializers in `csvw-graph-format`.
//!
//! # Key Design Principles
//!
//! 1. **Expanded IRIs only** - All IRIs are stored in expanded form. Prefixed
//!    names are produced by formatters at output time.
//!
//! 2. **Explicit datatypes** - Literals always carry a datatype. Plain strings
//!    use `xsd:string`, language-tagged strings use `rdf:langString`.
//!
//! 3. **Lexical values** - Literal values are kept exactly as produced from the
//!    source cell; no numeric or date normalization is applied.
//!
//! 4. **Bag semantics by default** - `Dataset` keeps insertion order and
//!    duplicates. Call `dedupe_in_order()` for set semantics that keep the
//!    first occurrence in place.
//!
//! # Example
//!
//! ```
//! use csvw_graph_ir::{Dataset, Quad, Term};
//!
//! let mut dataset = Dataset::new();
//! dataset.add(Quad::new(
//!     Term::iri("http://example.org/alice"),
//!     Term::iri("http://xmlns.com/foaf/0.1/name"),
//!     Term::string("Alice"),
//!     Some(Term::iri("http://example.org/graph")),
//! ));
//! assert_eq!(dataset.len(), 1);
//! ```

mod datatype;
mod dataset;
mod quad;
mod term;

pub use datatype::Datatype;
pub use dataset::Dataset;
pub use quad::Quad;
pub use term::{BlankId, Term};
