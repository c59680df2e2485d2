//! N-Triples and N-Quads encoding

use csvw_graph_ir::{Quad, Term};

use crate::escape::{escape_iri, escape_literal};

/// Append the N-Triples form of a term
pub(crate) fn write_term(term: &Term, out: &mut String) {
    match term {
        Term::Iri(iri) => {
            out.push('<');
            escape_iri(iri, out);
            out.push('>');
        }
        Term::BlankNode(id) => {
            out.push_str("_:");
            out.push_str(id.as_str());
        }
        Term::Literal {
            value,
            datatype,
            language,
        } => {
            out.push('"');
            escape_literal(value, out);
            out.push('"');
            if let Some(lang) = language {
                out.push('@');
                out.push_str(lang);
            } else if !datatype.is_xsd_string() {
                out.push_str("^^<");
                escape_iri(datatype.as_iri(), out);
                out.push('>');
            }
        }
    }
}

/// Encode quads one statement per line
///
/// With `with_graph == false` the graph name is dropped (N-Triples).
pub(crate) fn encode_lines(quads: &[Quad], with_graph: bool) -> String {
    let mut out = String::with_capacity(quads.len() * 96);
    for quad in quads {
        write_term(&quad.s, &mut out);
        out.push(' ');
        write_term(&quad.p, &mut out);
        out.push(' ');
        write_term(&quad.o, &mut out);
        if with_graph {
            if let Some(g) = &quad.g {
                out.push(' ');
                write_term(g, &mut out);
            }
        }
        out.push_str(" .\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvw_graph_ir::Datatype;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_nquads_and_ntriples() {
        let quads = vec![
            Quad::new(
                Term::blank("row0"),
                Term::iri("http://example.org/name"),
                Term::lang_string("Zoë \"Z\"", "en"),
                Some(Term::iri("http://example.org/g")),
            ),
            Quad::triple(
                Term::iri("http://example.org/s"),
                Term::iri("http://example.org/age"),
                Term::typed("42", Datatype::xsd_integer()),
            ),
        ];

        assert_eq!(
            encode_lines(&quads, true),
            "_:row0 <http://example.org/name> \"Zoë \\\"Z\\\"\"@en <http://example.org/g> .\n\
             <http://example.org/s> <http://example.org/age> \"42\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n"
        );
        assert!(encode_lines(&quads, false)
            .starts_with("_:row0 <http://example.org/name> \"Zoë \\\"Z\\\"\"@en .\n"));
    }
}
