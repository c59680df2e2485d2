//! Literal datatypes
//!
//! Cell values keep their lexical form; the datatype is whatever the column
//! declares (after CURIE expansion). Columns without one produce `xsd:string`.

use csvw_vocab::{rdf, xsd};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Expanded datatype IRI of a literal
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Datatype(Arc<str>);

impl Datatype {
    pub fn from_iri(iri: impl AsRef<str>) -> Self {
        Datatype(Arc::from(iri.as_ref()))
    }

    pub fn xsd_string() -> Self {
        Self::from_iri(xsd::STRING)
    }

    pub fn xsd_integer() -> Self {
        Self::from_iri(xsd::INTEGER)
    }

    /// Used for `prov:generatedAtTime`
    pub fn xsd_date_time() -> Self {
        Self::from_iri(xsd::DATE_TIME)
    }

    pub fn xsd_any_uri() -> Self {
        Self::from_iri(xsd::ANY_URI)
    }

    /// Datatype of every literal carrying a language tag
    pub fn lang_string() -> Self {
        Self::from_iri(rdf::LANG_STRING)
    }

    pub fn as_iri(&self) -> &str {
        &self.0
    }

    /// Serializers omit `^^xsd:string`, so this decides whether a suffix is written
    pub fn is_xsd_string(&self) -> bool {
        self.as_iri() == xsd::STRING
    }
}

impl std::fmt::Display for Datatype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_iri())
    }
}
