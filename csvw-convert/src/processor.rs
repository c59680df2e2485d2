//! Row processor: one chunk of rows → assertion statements
//!
//! Each worker owns a processor. The template cache and quad buffer are
//! private to it; the schema and namespace context are shared read-only.

use std::sync::Arc;

use csvw_graph_ir::{Dataset, Quad, Term};
use csvw_vocab::{prov, rdf, skos};
use serde::Serialize;

use crate::error::CellError;
use crate::iri::IriMinter;
use crate::policy;
use crate::row::{Chunk, Row};
use crate::schema::{Column, ObjectRule, Schema, ValueKind};
use crate::template::TemplateRenderer;

/// Counters kept while converting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub rows: u64,
    pub padding_rows: u64,
    pub statements: u64,
    pub cell_errors: u64,
    pub skipped_nulls: u64,
}

impl ConversionStats {
    pub fn merge(&mut self, other: &ConversionStats) {
        self.rows += other.rows;
        self.padding_rows += other.padding_rows;
        self.statements += other.statements;
        self.cell_errors += other.cell_errors;
        self.skipped_nulls += other.skipped_nulls;
    }
}

/// Outcome of one column for one row
enum ColumnOutcome {
    Emitted,
    Skipped,
}

pub struct RowProcessor {
    schema: Arc<Schema>,
    minter: IriMinter,
    renderer: TemplateRenderer,
    graph: Option<Term>,
    buffer: Dataset,
    stats: ConversionStats,
}

impl RowProcessor {
    /// Processor writing into `graph` (the assertion graph)
    pub fn new(schema: Arc<Schema>, graph: Option<Term>) -> Self {
        let minter = IriMinter::new(Arc::clone(schema.namespaces()));
        Self {
            schema,
            minter,
            renderer: TemplateRenderer::new(),
            graph,
            buffer: Dataset::new(),
            stats: ConversionStats::default(),
        }
    }

    /// Convert every real row in `chunk`, returning its deduplicated
    /// statements and counters
    pub fn process_chunk(&mut self, chunk: &Chunk) -> (Dataset, ConversionStats) {
        for slot in chunk.rows() {
            match slot {
                Some(row) => self.process_row(&row),
                None => self.stats.padding_rows += 1,
            }
        }
        if self.stats.padding_rows > 0 {
            tracing::debug!(
                chunk = chunk.index(),
                padding = self.stats.padding_rows,
                "skipped padding rows"
            );
        }
        self.take()
    }

    /// Convert a single row into the internal buffer
    pub fn process_row(&mut self, row: &Row) {
        self.stats.rows += 1;
        let default_subject = self.default_subject(row);

        let schema = Arc::clone(&self.schema);
        for column in schema.columns() {
            if column.suppress_output {
                continue;
            }
            match self.process_column(row, column, default_subject.as_ref()) {
                Ok(ColumnOutcome::Emitted) => {}
                Ok(ColumnOutcome::Skipped) => self.stats.skipped_nulls += 1,
                Err(error) => {
                    self.stats.cell_errors += 1;
                    tracing::warn!(
                        row = row.index(),
                        column = %column.label(),
                        error = %error,
                        "skipping cell"
                    );
                }
            }
        }
    }

    /// Drain the buffer and counters
    pub fn take(&mut self) -> (Dataset, ConversionStats) {
        let mut dataset = std::mem::take(&mut self.buffer);
        dataset.dedupe_in_order();
        let mut stats = std::mem::take(&mut self.stats);
        stats.statements = dataset.len() as u64;
        (dataset, stats)
    }

    fn default_subject(&mut self, row: &Row) -> Option<Term> {
        match self.schema.about_url() {
            None => Some(Term::blank(format!("row{}", row.index()))),
            Some(pattern) => match self.minter.expand(&mut self.renderer, pattern, row) {
                Ok(iri) => Some(Term::iri(iri)),
                Err(error) => {
                    tracing::warn!(
                        row = row.index(),
                        error = %error,
                        "default subject could not be minted; only columns with their own aboutUrl apply"
                    );
                    None
                }
            },
        }
    }

    fn process_column(
        &mut self,
        row: &Row,
        column: &Column,
        default_subject: Option<&Term>,
    ) -> Result<ColumnOutcome, CellError> {
        let raw = match &column.name {
            Some(name) => row.get(name),
            None => None,
        };
        if let Some(raw) = raw {
            if policy::is_null(raw, column, self.schema.null())? {
                tracing::debug!(row = row.index(), column = %column.label(), "null value");
                return Ok(ColumnOutcome::Skipped);
            }
        } else if column.null.is_malformed() {
            return Err(CellError::MalformedNull {
                column: column.label(),
            });
        }

        let predicate = self.predicate(row, column)?;

        let mut subject = match &column.about_url {
            Some(pattern) => Term::iri(self.minter.expand(&mut self.renderer, pattern, row)?),
            None => match default_subject {
                Some(s) => s.clone(),
                None => return Ok(ColumnOutcome::Skipped),
            },
        };

        let object = match &column.object {
            ObjectRule::ValueUrl {
                pattern,
                any_uri,
                link_uri,
            } => {
                let value_pattern = if *link_uri {
                    let about = match column.about_url.as_deref() {
                        Some(about) => Some(about),
                        None => self.schema.about_url(),
                    };
                    if let Some(about) = about {
                        let truncated = policy::first_placeholder(about);
                        subject =
                            Term::iri(self.minter.expand(&mut self.renderer, truncated, row)?);
                    }
                    policy::first_placeholder(pattern)
                } else {
                    pattern.as_str()
                };

                let minted = self.minter.expand(&mut self.renderer, value_pattern, row)?;
                if policy::is_null(policy::last_segment(&minted), column, self.schema.null())? {
                    tracing::debug!(row = row.index(), column = %column.label(), iri = %minted, "valueUrl ends in a null value");
                    return Ok(ColumnOutcome::Skipped);
                }

                if *any_uri {
                    let raw = raw.ok_or_else(|| CellError::MissingField {
                        column: column.label(),
                    })?;
                    Term::iri(self.minter.mint(raw)?)
                } else {
                    Term::iri(minted)
                }
            }
            ObjectRule::Value(kind) => {
                let text = match (&column.value, raw) {
                    (Some(pattern), _) => self.renderer.render(pattern, row),
                    (None, Some(raw)) => raw.to_string(),
                    (None, None) => {
                        return Err(CellError::MissingField {
                            column: column.label(),
                        })
                    }
                };
                match kind {
                    ValueKind::Iri => Term::iri(self.minter.mint(&text)?),
                    ValueKind::LangString(lang) => {
                        let tag = self.renderer.render(lang, row);
                        let tag = policy::language_tag(&tag, column)?;
                        policy::literal(&text, kind, tag).unwrap_or_else(|| Term::string(&text))
                    }
                    other => policy::literal(&text, other, None).unwrap_or_else(|| Term::string(&text)),
                }
            }
        };

        if object.is_iri() {
            self.emit_concept_triples(row, column, &object)?;
        }

        self.emit(subject, predicate.clone(), object);
        if let Some(id) = &column.id {
            self.emit(predicate, Term::iri(prov::WAS_DERIVED_FROM), Term::iri(id));
        }
        Ok(ColumnOutcome::Emitted)
    }

    fn predicate(&mut self, row: &Row, column: &Column) -> Result<Term, CellError> {
        match (&column.property_url, &column.name) {
            (Some(pattern), _) => Ok(Term::iri(
                self.minter.expand(&mut self.renderer, pattern, row)?,
            )),
            (None, Some(name)) => {
                let iri = format!("{}{}", self.minter.namespaces().vocab(), name);
                Ok(Term::iri(self.minter.mint(&iri)?))
            }
            (None, None) => Err(CellError::MissingField {
                column: column.label(),
            }),
        }
    }

    fn emit_concept_triples(
        &mut self,
        row: &Row,
        column: &Column,
        object: &Term,
    ) -> Result<(), CellError> {
        if let Some(pattern) = &column.collection_url {
            let collection = Term::iri(self.minter.expand(&mut self.renderer, pattern, row)?);
            self.emit(collection.clone(), Term::iri(rdf::TYPE), Term::iri(skos::COLLECTION));
            self.emit(object.clone(), Term::iri(rdf::TYPE), Term::iri(skos::CONCEPT));
            self.emit(collection, Term::iri(skos::MEMBER), object.clone());
        }
        if let Some(pattern) = &column.scheme_url {
            let scheme = Term::iri(self.minter.expand(&mut self.renderer, pattern, row)?);
            self.emit(scheme.clone(), Term::iri(rdf::TYPE), Term::iri(skos::CONCEPT_SCHEME));
            self.emit(object.clone(), Term::iri(rdf::TYPE), Term::iri(skos::CONCEPT));
            self.emit(object.clone(), Term::iri(skos::IN_SCHEME), scheme);
        }
        Ok(())
    }

    fn emit(&mut self, s: Term, p: Term, o: Term) {
        self.buffer.add(Quad::new(s, p, o, self.graph.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::{Chunker, RowSource, RowValues, VecSource};
    use csvw_graph_ir::Datatype;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    const BASE: &str = "https://example.org/";

    fn schema(table: Value) -> Arc<Schema> {
        let doc = json!({
            "@context": ["http://www.w3.org/ns/csvw", {"@base": BASE, "dtsh": "https://dtsh.example/"}],
            "@id": "https://example.org/schema",
            "tableSchema": table
        });
        Arc::new(Schema::from_value(&doc, BASE).unwrap())
    }

    fn row(index: u64, pairs: &[(&str, &str)]) -> Row {
        let values: RowValues = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Row::new(index, values)
    }

    fn run(schema: Arc<Schema>, r: &Row) -> (Vec<Quad>, ConversionStats) {
        let mut processor = RowProcessor::new(schema, None);
        processor.process_row(r);
        let (dataset, stats) = processor.take();
        (dataset.into_quads(), stats)
    }

    fn primary(quads: &[Quad]) -> Vec<&Quad> {
        quads
            .iter()
            .filter(|q| q.p.as_iri() != Some(prov::WAS_DERIVED_FROM))
            .collect()
    }

    #[test]
    fn test_typed_string_literal_on_default_subject() {
        let s = schema(json!({
            "aboutUrl": "patient/{ID_PACIENTE}",
            "columns": [{"name": "ID_PACIENTE", "propertyUrl": "dtsh:Id", "datatype": "xsd:string"}]
        }));
        let (quads, stats) = run(s, &row(0, &[("ID_PACIENTE", "123")]));

        assert_eq!(
            quads,
            vec![
                Quad::triple(
                    Term::iri("https://example.org/patient/123"),
                    Term::iri("https://dtsh.example/Id"),
                    Term::typed("123", Datatype::xsd_string()),
                ),
                Quad::triple(
                    Term::iri("https://dtsh.example/Id"),
                    Term::iri(prov::WAS_DERIVED_FROM),
                    Term::iri("https://example.org/schema/column/ID_PACIENTE"),
                ),
            ]
        );
        assert_eq!(stats.rows, 1);
        assert_eq!(stats.statements, 2);
    }

    #[test]
    fn test_value_url_any_uri_is_iri() {
        let s = schema(json!({
            "columns": [{
                "name": "ID_PACIENTE",
                "propertyUrl": "dtsh:patient",
                "valueUrl": "https://example.org/{ID_PACIENTE}",
                "datatype": "xsd:anyURI"
            }]
        }));
        let (quads, _) = run(s, &row(0, &[("ID_PACIENTE", "123")]));
        let main = primary(&quads);
        assert_eq!(main.len(), 1);
        assert_eq!(main[0].s, Term::blank("row0"));
        assert_eq!(main[0].o, Term::iri("https://example.org/123"));
    }

    #[test]
    fn test_virtual_any_uri_mints_raw_value() {
        let s = schema(json!({
            "columns": [{
                "name": "homepage",
                "virtual": true,
                "propertyUrl": "dtsh:page",
                "valueUrl": "https://example.org/page/{homepage}",
                "datatype": "anyURI"
            }]
        }));
        let (quads, _) = run(s, &row(0, &[("homepage", "http://site.example/a b")]));
        assert_eq!(primary(&quads)[0].o, Term::iri("http://site.example/a%20b"));
    }

    #[test]
    fn test_empty_cell_skipped_by_default() {
        let s = schema(json!({"columns": [{"name": "a"}, {"name": "b"}]}));
        let (quads, stats) = run(s, &row(0, &[("a", ""), ("b", "x")]));
        let main = primary(&quads);
        assert_eq!(main.len(), 1);
        assert_eq!(main[0].p, Term::iri("https://example.org/vocab/b"));
        assert_eq!(stats.skipped_nulls, 1);
    }

    #[test]
    fn test_parse_on_empty_emits_empty_literal() {
        let s = schema(json!({"columns": [{"name": "a", "parseOnEmpty": true}]}));
        let (quads, _) = run(s, &row(0, &[("a", "")]));
        assert_eq!(primary(&quads)[0].o, Term::string(""));
    }

    #[test]
    fn test_null_markers_suppress_column_only() {
        let s = schema(json!({
            "null": "NA",
            "columns": [{"name": "a", "null": ["-", "?"]}, {"name": "b"}]
        }));
        let (quads, _) = run(Arc::clone(&s), &row(0, &[("a", "?"), ("b", "NA")]));
        assert!(quads.is_empty());

        let (quads, _) = run(s, &row(0, &[("a", "ok"), ("b", "NA")]));
        assert_eq!(primary(&quads).len(), 1);
    }

    #[test]
    fn test_virtual_column_uses_value_pattern_only() {
        let s = schema(json!({
            "aboutUrl": "p/{id}",
            "columns": [
                {"name": "id", "suppressOutput": true},
                {"virtual": true, "propertyUrl": "dtsh:label", "value": "Patient {id}"}
            ]
        }));
        let (quads, _) = run(s, &row(0, &[("id", "7")]));
        assert_eq!(
            quads,
            vec![Quad::triple(
                Term::iri("https://example.org/p/7"),
                Term::iri("https://dtsh.example/label"),
                Term::string("Patient 7"),
            )]
        );
    }

    #[test]
    fn test_column_about_url_overrides_subject() {
        let s = schema(json!({
            "aboutUrl": "p/{id}",
            "columns": [
                {"name": "id"},
                {"name": "exam", "aboutUrl": "exam/{exam}", "propertyUrl": "dtsh:of", "valueUrl": "p/{id}"}
            ]
        }));
        let (quads, _) = run(s, &row(0, &[("id", "7"), ("exam", "e1")]));
        let main = primary(&quads);
        assert_eq!(main[0].s, Term::iri("https://example.org/p/7"));
        assert_eq!(main[1].s, Term::iri("https://example.org/exam/e1"));
        assert_eq!(main[1].o, Term::iri("https://example.org/p/7"));
    }

    #[test]
    fn test_collection_and_scheme_triples_precede_primary() {
        let s = schema(json!({
            "aboutUrl": "p/{id}",
            "columns": [{
                "name": "sexo",
                "propertyUrl": "dtsh:sexo",
                "valueUrl": "sexo/{sexo}",
                "collectionUrl": "sexos",
                "schemeUrl": "scheme/sexo"
            }]
        }));
        let (quads, _) = run(s, &row(0, &[("id", "1"), ("sexo", "F")]));
        let concept = Term::iri("https://example.org/sexo/F");
        let coll = Term::iri("https://example.org/sexos");
        let scheme = Term::iri("https://example.org/scheme/sexo");

        assert_eq!(
            primary(&quads),
            vec![
                &Quad::triple(coll.clone(), Term::iri(rdf::TYPE), Term::iri(skos::COLLECTION)),
                &Quad::triple(concept.clone(), Term::iri(rdf::TYPE), Term::iri(skos::CONCEPT)),
                &Quad::triple(coll, Term::iri(skos::MEMBER), concept.clone()),
                &Quad::triple(scheme.clone(), Term::iri(rdf::TYPE), Term::iri(skos::CONCEPT_SCHEME)),
                &Quad::triple(concept.clone(), Term::iri(skos::IN_SCHEME), scheme),
                &Quad::triple(
                    Term::iri("https://example.org/p/1"),
                    Term::iri("https://dtsh.example/sexo"),
                    concept,
                ),
            ]
        );
    }

    #[test]
    fn test_value_url_with_null_last_segment_skipped() {
        let s = schema(json!({
            "columns": [{"name": "id"}, {"virtual": true, "value": "x", "propertyUrl": "dtsh:ref", "valueUrl": "ref/{missing}"}]
        }));
        let (quads, stats) = run(s, &row(0, &[("id", "1")]));
        assert_eq!(primary(&quads).len(), 1);
        assert_eq!(stats.skipped_nulls, 1);
    }

    #[test]
    fn test_link_uri_truncates_patterns() {
        let s = schema(json!({
            "aboutUrl": "https://example.org/p/{id}",
            "columns": [{
                "name": "ref",
                "propertyUrl": "dtsh:link",
                "valueUrl": "{ref}/extra/{id}",
                "datatype": "linkURI"
            }]
        }));
        let (quads, _) = run(s, &row(0, &[("id", "1"), ("ref", "https://other.example/x")]));
        let main = primary(&quads);
        assert_eq!(main[0].s, Term::iri("https://example.org/1"));
        assert_eq!(main[0].o, Term::iri("https://other.example/x"));
    }

    #[test]
    fn test_language_tag_pattern() {
        let s = schema(json!({
            "columns": [{"name": "nome", "datatype": "string", "lang": "{idioma}"}, {"name": "idioma", "suppressOutput": true}]
        }));
        let (quads, _) = run(s, &row(0, &[("nome", "Olá"), ("idioma", "pt")]));
        assert_eq!(primary(&quads)[0].o, Term::lang_string("Olá", "pt"));
    }

    #[test]
    fn test_empty_language_tag_gives_plain_literal() {
        let s = schema(json!({
            "columns": [{"name": "nome", "datatype": "string", "lang": "{idioma}"}, {"name": "idioma", "suppressOutput": true}]
        }));
        let (quads, stats) = run(s, &row(0, &[("nome", "Ana"), ("idioma", "")]));
        assert_eq!(primary(&quads)[0].o, Term::string("Ana"));
        assert_eq!(stats.cell_errors, 0);
    }

    #[test]
    fn test_malformed_language_tag_skips_column() {
        let s = schema(json!({
            "columns": [
                {"name": "nome", "datatype": "string", "lang": "{idioma}"},
                {"name": "idioma", "suppressOutput": true},
                {"name": "cidade"}
            ]
        }));
        let (quads, stats) = run(
            s,
            &row(0, &[("nome", "Bob"), ("idioma", "pt BR"), ("cidade", "Recife")]),
        );
        let main = primary(&quads);
        assert_eq!(main.len(), 1);
        assert_eq!(main[0].o, Term::string("Recife"));
        assert_eq!(stats.cell_errors, 1);
    }

    #[test]
    fn test_invalid_iri_skips_only_that_column() {
        let s = schema(json!({
            "columns": [
                {"name": "bad", "propertyUrl": "http://x.org:port/{bad}"},
                {"name": "good"}
            ]
        }));
        let (quads, stats) = run(s, &row(0, &[("bad", "v"), ("good", "g")]));
        assert_eq!(primary(&quads).len(), 1);
        assert_eq!(stats.cell_errors, 1);
    }

    #[test]
    fn test_failed_default_subject_keeps_columns_with_own_about_url() {
        let s = schema(json!({
            "aboutUrl": "http://x.org:port/{id}",
            "columns": [
                {"name": "id"},
                {"name": "n", "aboutUrl": "n/{n}"}
            ]
        }));
        let (quads, _) = run(s, &row(0, &[("id", "1"), ("n", "2")]));
        let main = primary(&quads);
        assert_eq!(main.len(), 1);
        assert_eq!(main[0].s, Term::iri("https://example.org/n/2"));
    }

    #[test]
    fn test_missing_field_and_malformed_null_are_cell_errors() {
        let s = schema(json!({
            "columns": [
                {"name": "absent"},
                {"name": "a", "null": [{"x": 1}]}
            ]
        }));
        let (quads, stats) = run(s, &row(0, &[("a", "v")]));
        assert!(quads.is_empty());
        assert_eq!(stats.cell_errors, 2);
    }

    #[test]
    fn test_chunk_padding_and_dedupe() {
        let s = schema(json!({"columns": [{"name": "a", "propertyUrl": "dtsh:a"}]}));
        let src = VecSource::from_pairs((0..3).map(|i| vec![("a", i.to_string())]));
        let chunk = Chunker::new(src.open().unwrap(), 5).next().unwrap().unwrap();

        let mut processor = RowProcessor::new(s, Some(Term::iri("https://example.org/g")));
        let (dataset, stats) = processor.process_chunk(&chunk);

        assert_eq!(stats.rows, 3);
        assert_eq!(stats.padding_rows, 2);
        // three primary statements plus one deduplicated provenance link
        assert_eq!(dataset.len(), 4);
        assert!(dataset
            .iter()
            .all(|q| q.g == Some(Term::iri("https://example.org/g"))));
        let subjects: Vec<_> = dataset
            .iter()
            .filter(|q| q.s.is_blank())
            .map(|q| q.s.to_string())
            .collect();
        assert_eq!(subjects, vec!["_:row0", "_:row1", "_:row2"]);
    }
}
