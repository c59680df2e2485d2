//! RDF Vocabulary Constants for CSVW conversion
//!
//! This crate provides a centralized location for the vocabulary IRIs used
//! while converting tabular data to RDF and describing where it came from.
//!
//! # Organization
//!
//! Constants are organized by vocabulary:
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `rdfs` - RDFS vocabulary (http://www.w3.org/2000/01/rdf-schema#)
//! - `xsd` - XSD vocabulary (http://www.w3.org/2001/XMLSchema#)
//! - `skos` - SKOS vocabulary, for coded values
//! - `prov` - PROV-O vocabulary, for provenance statements
//! - `csvw` - CSV on the Web vocabulary, for describing the schema itself
//! - `dc` / `dcterms` - Dublin Core elements and terms
//! - `np` - Nanopublication schema
//! - `prefixes` - the built-in prefix table

/// RDF vocabulary constants
pub mod rdf {
    /// RDF namespace IRI
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    /// rdf:JSON IRI
    pub const JSON: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON";
}

/// RDFS vocabulary constants
pub mod rdfs {
    /// RDFS namespace IRI
    pub const NS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

/// XSD vocabulary constants
pub mod xsd {
    /// XSD namespace IRI
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:integer IRI
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:long IRI
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";

    /// xsd:decimal IRI
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

    /// xsd:double IRI
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// xsd:boolean IRI
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

    /// xsd:dateTime IRI
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// xsd:date IRI
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

    /// xsd:gYear IRI
    pub const G_YEAR: &str = "http://www.w3.org/2001/XMLSchema#gYear";

    /// xsd:anyURI IRI
    ///
    /// Columns declaring this datatype produce IRI objects, not literals.
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

    /// xsd:linkURI IRI
    ///
    /// Not an XSD datatype. CSVW schemas produced by older tooling use it to
    /// request that subject and object patterns be cut down to their first
    /// placeholder before expansion.
    pub const LINK_URI: &str = "http://www.w3.org/2001/XMLSchema#linkURI";
}

/// SKOS vocabulary constants
pub mod skos {
    /// SKOS namespace IRI
    pub const NS: &str = "http://www.w3.org/2004/02/skos/core#";

    /// skos:Concept IRI
    pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";

    /// skos:Collection IRI
    pub const COLLECTION: &str = "http://www.w3.org/2004/02/skos/core#Collection";

    /// skos:ConceptScheme IRI
    pub const CONCEPT_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#ConceptScheme";

    /// skos:member IRI
    pub const MEMBER: &str = "http://www.w3.org/2004/02/skos/core#member";

    /// skos:inScheme IRI
    pub const IN_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#inScheme";
}

/// PROV-O vocabulary constants
pub mod prov {
    /// PROV namespace IRI
    pub const NS: &str = "http://www.w3.org/ns/prov#";

    /// prov:wasDerivedFrom IRI
    pub const WAS_DERIVED_FROM: &str = "http://www.w3.org/ns/prov#wasDerivedFrom";

    /// prov:wasAttributedTo IRI
    pub const WAS_ATTRIBUTED_TO: &str = "http://www.w3.org/ns/prov#wasAttributedTo";

    /// prov:generatedAtTime IRI
    pub const GENERATED_AT_TIME: &str = "http://www.w3.org/ns/prov#generatedAtTime";
}

/// CSV on the Web vocabulary constants
pub mod csvw {
    /// CSVW namespace IRI
    pub const NS: &str = "http://www.w3.org/ns/csvw#";

    /// csvw:Table IRI
    pub const TABLE: &str = "http://www.w3.org/ns/csvw#Table";

    /// csvw:Schema IRI
    pub const SCHEMA: &str = "http://www.w3.org/ns/csvw#Schema";

    /// csvw:Column IRI
    pub const COLUMN: &str = "http://www.w3.org/ns/csvw#Column";

    /// csvw:url IRI
    pub const URL: &str = "http://www.w3.org/ns/csvw#url";

    /// csvw:tableSchema IRI
    pub const TABLE_SCHEMA: &str = "http://www.w3.org/ns/csvw#tableSchema";

    /// csvw:column IRI
    pub const COLUMN_PROP: &str = "http://www.w3.org/ns/csvw#column";

    /// csvw:name IRI
    pub const NAME: &str = "http://www.w3.org/ns/csvw#name";

    /// csvw:virtual IRI
    pub const VIRTUAL: &str = "http://www.w3.org/ns/csvw#virtual";

    /// csvw:datatype IRI
    pub const DATATYPE: &str = "http://www.w3.org/ns/csvw#datatype";

    /// csvw:aboutUrl IRI
    pub const ABOUT_URL: &str = "http://www.w3.org/ns/csvw#aboutUrl";

    /// csvw:propertyUrl IRI
    pub const PROPERTY_URL: &str = "http://www.w3.org/ns/csvw#propertyUrl";

    /// csvw:valueUrl IRI
    pub const VALUE_URL: &str = "http://www.w3.org/ns/csvw#valueUrl";

    /// csvw:primaryKey IRI
    pub const PRIMARY_KEY: &str = "http://www.w3.org/ns/csvw#primaryKey";
}

/// Dublin Core elements
pub mod dc {
    /// DC elements namespace IRI
    pub const NS: &str = "http://purl.org/dc/elements/1.1/";

    /// dc:creator IRI
    pub const CREATOR: &str = "http://purl.org/dc/elements/1.1/creator";

    /// dc:title IRI
    pub const TITLE: &str = "http://purl.org/dc/elements/1.1/title";
}

/// Dublin Core terms
pub mod dcterms {
    /// DC terms namespace IRI
    pub const NS: &str = "http://purl.org/dc/terms/";
}

/// Nanopublication schema
pub mod np {
    /// Nanopublication namespace IRI
    pub const NS: &str = "http://www.nanopub.org/nschema#";

    /// np:Nanopublication IRI
    pub const NANOPUBLICATION: &str = "http://www.nanopub.org/nschema#Nanopublication";

    /// np:Assertion IRI
    pub const ASSERTION: &str = "http://www.nanopub.org/nschema#Assertion";

    /// np:Provenance IRI
    pub const PROVENANCE: &str = "http://www.nanopub.org/nschema#Provenance";

    /// np:PublicationInfo IRI
    pub const PUBLICATION_INFO: &str = "http://www.nanopub.org/nschema#PublicationInfo";

    /// np:hasAssertion IRI
    pub const HAS_ASSERTION: &str = "http://www.nanopub.org/nschema#hasAssertion";

    /// np:hasProvenance IRI
    pub const HAS_PROVENANCE: &str = "http://www.nanopub.org/nschema#hasProvenance";

    /// np:hasPublicationInfo IRI
    pub const HAS_PUBLICATION_INFO: &str = "http://www.nanopub.org/nschema#hasPublicationInfo";
}

/// Built-in prefix table
///
/// These prefixes are always resolvable in schema patterns. A schema's own
/// `@context` may shadow any of them.
pub mod prefixes {
    /// (prefix, namespace) pairs, in the order they are written to Turtle headers
    pub const BUILTIN: &[(&str, &str)] = &[
        ("rdf", super::rdf::NS),
        ("rdfs", super::rdfs::NS),
        ("xsd", super::xsd::NS),
        ("owl", "http://www.w3.org/2002/07/owl#"),
        ("skos", super::skos::NS),
        ("prov", super::prov::NS),
        ("csvw", super::csvw::NS),
        ("dc", super::dc::NS),
        ("dcterms", super::dcterms::NS),
        ("np", super::np::NS),
        ("schema", "http://schema.org/"),
    ];

    /// Look up a built-in prefix
    pub fn builtin(prefix: &str) -> Option<&'static str> {
        BUILTIN
            .iter()
            .find(|(p, _)| *p == prefix)
            .map(|(_, ns)| *ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaces_prefix_their_terms() {
        assert!(xsd::ANY_URI.starts_with(xsd::NS));
        assert!(xsd::LINK_URI.starts_with(xsd::NS));
        assert!(skos::CONCEPT_SCHEME.starts_with(skos::NS));
        assert!(prov::WAS_DERIVED_FROM.starts_with(prov::NS));
        assert!(csvw::VALUE_URL.starts_with(csvw::NS));
        assert!(np::HAS_ASSERTION.starts_with(np::NS));
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(prefixes::builtin("xsd"), Some(xsd::NS));
        assert_eq!(prefixes::builtin("skos"), Some(skos::NS));
        assert_eq!(prefixes::builtin("nope"), None);
    }
}
