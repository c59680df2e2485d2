//! Publication graphs (nanopublication layout)
//!
//! Graph IRIs are derived from the base IRI, the dataset name, and the
//! SHA-256 of the schema text, so converting the same inputs twice yields the
//! same graph names. Only the generation timestamp varies, and it can be
//! pinned by the caller.

use chrono::{DateTime, SecondsFormat, Utc};
use csvw_graph_ir::{Datatype, Dataset, Term};
use csvw_vocab::{csvw, dc, np, prov, rdf};

use crate::iri::{escape, IriMinter};
use crate::schema::{Column, Schema};
use crate::template::Template;

/// Graph names of one publication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub uri: String,
    pub head: String,
    pub assertion: String,
    pub provenance: String,
    pub pubinfo: String,
}

impl Publication {
    pub fn new(base: &str, dataset_name: &str, digest: &str) -> Self {
        let name = escape(dataset_name.trim_matches('/')).into_owned();
        let uri = format!("{}{}/nanopublication/{}", base, name, digest);
        Self {
            head: format!("{}/head", uri),
            assertion: format!("{}/assertion", uri),
            provenance: format!("{}/provenance", uri),
            pubinfo: format!("{}/pubinfo", uri),
            uri,
        }
    }

    /// Publication for `schema`, naming the dataset after `dataset_name`,
    /// the table `url`, or `"dataset"`
    pub fn for_schema(schema: &Schema, dataset_name: Option<&str>) -> Self {
        let name = dataset_name
            .or_else(|| schema.url())
            .filter(|n| !n.is_empty())
            .unwrap_or("dataset");
        Self::new(schema.base(), name, &schema.digest())
    }

    pub fn assertion_graph(&self) -> Term {
        Term::iri(&self.assertion)
    }

    /// Head, provenance and publication-info statements for `schema`
    pub fn statements(&self, schema: &Schema, generated_at: DateTime<Utc>) -> Dataset {
        let mut out = Dataset::new();
        self.head_graph(&mut out);
        self.provenance_graph(schema, &mut out);
        self.pubinfo_graph(schema, generated_at, &mut out);
        tracing::debug!(statements = out.len(), publication = %self.uri, "built publication graphs");
        out
    }

    fn head_graph(&self, out: &mut Dataset) {
        let g = Some(Term::iri(&self.head));
        let np_uri = Term::iri(&self.uri);
        let a = Term::iri(rdf::TYPE);

        out.add_quad(np_uri.clone(), a.clone(), Term::iri(np::NANOPUBLICATION), g.clone());
        out.add_quad(np_uri.clone(), Term::iri(np::HAS_ASSERTION), Term::iri(&self.assertion), g.clone());
        out.add_quad(np_uri.clone(), Term::iri(np::HAS_PROVENANCE), Term::iri(&self.provenance), g.clone());
        out.add_quad(np_uri, Term::iri(np::HAS_PUBLICATION_INFO), Term::iri(&self.pubinfo), g.clone());
        out.add_quad(Term::iri(&self.assertion), a.clone(), Term::iri(np::ASSERTION), g.clone());
        out.add_quad(Term::iri(&self.provenance), a.clone(), Term::iri(np::PROVENANCE), g.clone());
        out.add_quad(Term::iri(&self.pubinfo), a, Term::iri(np::PUBLICATION_INFO), g);
    }

    fn provenance_graph(&self, schema: &Schema, out: &mut Dataset) {
        let g = Some(Term::iri(&self.provenance));
        let assertion = Term::iri(&self.assertion);
        let schema_id = Term::iri(schema.id());
        let minter = IriMinter::new(std::sync::Arc::clone(schema.namespaces()));

        out.add_quad(assertion.clone(), Term::iri(prov::WAS_DERIVED_FROM), schema_id.clone(), g.clone());
        for creator in schema.creators() {
            out.add_quad(assertion.clone(), Term::iri(prov::WAS_ATTRIBUTED_TO), creator.clone(), g.clone());
        }

        // Table description
        let table_schema = Term::blank("tableSchema");
        out.add_quad(schema_id.clone(), Term::iri(rdf::TYPE), Term::iri(csvw::TABLE), g.clone());
        if let Some(url) = schema.url() {
            out.add_quad(schema_id.clone(), Term::iri(csvw::URL), Term::string(url), g.clone());
        }
        for creator in schema.creators() {
            out.add_quad(schema_id.clone(), Term::iri(dc::CREATOR), creator.clone(), g.clone());
        }
        out.add_quad(schema_id, Term::iri(csvw::TABLE_SCHEMA), table_schema.clone(), g.clone());
        out.add_quad(table_schema.clone(), Term::iri(rdf::TYPE), Term::iri(csvw::SCHEMA), g.clone());
        if let Some(about) = schema.about_url() {
            out.add_quad(table_schema.clone(), Term::iri(csvw::ABOUT_URL), Term::string(about), g.clone());
        }
        for key in schema.primary_key() {
            out.add_quad(table_schema.clone(), Term::iri(csvw::PRIMARY_KEY), Term::string(key), g.clone());
        }

        for column in schema.columns() {
            let column_term = match &column.id {
                Some(id) => Term::iri(id),
                None => Term::blank(format!("column{}", column.index)),
            };
            out.add_quad(table_schema.clone(), Term::iri(csvw::COLUMN_PROP), column_term.clone(), g.clone());
            describe_column(column, &column_term, &g, out);

            for (field, pattern) in [
                (csvw::ABOUT_URL, &column.about_url),
                (csvw::PROPERTY_URL, &column.property_url),
                (csvw::VALUE_URL, &column.value_url),
            ] {
                let Some(pattern) = pattern else { continue };
                out.add_quad(column_term.clone(), Term::iri(field), Term::string(pattern), g.clone());
                constant_pattern_links(&minter, pattern, &column_term, &g, out);
            }
        }
    }

    fn pubinfo_graph(&self, schema: &Schema, generated_at: DateTime<Utc>, out: &mut Dataset) {
        let g = Some(Term::iri(&self.pubinfo));
        let np_uri = Term::iri(&self.uri);
        let timestamp = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);

        out.add_quad(
            np_uri.clone(),
            Term::iri(prov::GENERATED_AT_TIME),
            Term::typed(timestamp, Datatype::xsd_date_time()),
            g.clone(),
        );
        for creator in schema.creators() {
            out.add_quad(np_uri.clone(), Term::iri(prov::WAS_ATTRIBUTED_TO), creator.clone(), g.clone());
            out.add_quad(Term::iri(&self.assertion), Term::iri(dc::CREATOR), creator.clone(), g.clone());
        }
    }
}

fn describe_column(column: &Column, subject: &Term, g: &Option<Term>, out: &mut Dataset) {
    out.add_quad(subject.clone(), Term::iri(rdf::TYPE), Term::iri(csvw::COLUMN), g.clone());
    if let Some(name) = &column.name {
        out.add_quad(subject.clone(), Term::iri(csvw::NAME), Term::string(name), g.clone());
    }
    if column.is_virtual {
        out.add_quad(
            subject.clone(),
            Term::iri(csvw::VIRTUAL),
            Term::typed("true", Datatype::from_iri(csvw_vocab::xsd::BOOLEAN)),
            g.clone(),
        );
    }
    if let Some(datatype) = &column.datatype {
        out.add_quad(subject.clone(), Term::iri(csvw::DATATYPE), Term::iri(datatype.as_iri()), g.clone());
    }
}

/// Links for patterns without placeholders: the minted IRI derives from the
/// column, and from the original text when escaping changed it
fn constant_pattern_links(
    minter: &IriMinter,
    pattern: &str,
    column: &Term,
    g: &Option<Term>,
    out: &mut Dataset,
) {
    if !Template::parse(pattern).is_constant() {
        return;
    }
    let Ok(iri) = minter.mint(pattern) else {
        return;
    };
    let iri_term = Term::iri(&iri);
    let expanded = minter.namespaces().expand(pattern);
    if escape(&expanded) != expanded {
        out.add_quad(
            iri_term.clone(),
            Term::iri(prov::WAS_DERIVED_FROM),
            Term::typed(pattern, Datatype::xsd_string()),
            g.clone(),
        );
    }
    out.add_quad(iri_term, Term::iri(prov::WAS_DERIVED_FROM), column.clone(), g.clone());
}
