//! Turtle and TriG encoding
//!
//! Statements are grouped by *consecutive* runs of the same subject (and, for
//! TriG, the same graph). Input order is never changed, so output for a batch
//! follows the order rows were converted in.

use csvw_graph_ir::{Quad, Term};
use csvw_vocab::rdf;

use crate::escape::escape_literal;
use crate::ntriples;
use crate::prefix::PrefixMap;

/// Prefix declarations for the document header
pub(crate) fn header(prefixes: &PrefixMap) -> String {
    let mut out = String::new();
    for (prefix, ns) in prefixes.iter() {
        out.push_str("@prefix ");
        out.push_str(prefix);
        out.push_str(": <");
        out.push_str(ns);
        out.push_str("> .\n");
    }
    if !prefixes.is_empty() {
        out.push('\n');
    }
    out
}

/// Encode a batch as Turtle (graph names dropped)
pub(crate) fn encode_turtle(quads: &[Quad], prefixes: &PrefixMap) -> String {
    let mut out = String::new();
    write_subject_runs(quads, prefixes, "", &mut out);
    out
}

/// Encode a batch as TriG, one `GRAPH { ... }` block per graph run
pub(crate) fn encode_trig(quads: &[Quad], prefixes: &PrefixMap) -> String {
    let mut out = String::new();
    let mut start = 0;
    while start < quads.len() {
        let graph = &quads[start].g;
        let mut end = start + 1;
        while end < quads.len() && quads[end].g == *graph {
            end += 1;
        }

        match graph {
            Some(g) => {
                write_term(g, prefixes, &mut out);
                out.push_str(" {\n");
                write_subject_runs(&quads[start..end], prefixes, "    ", &mut out);
                out.push_str("}\n\n");
            }
            None => {
                out.push_str("{\n");
                write_subject_runs(&quads[start..end], prefixes, "    ", &mut out);
                out.push_str("}\n\n");
            }
        }
        start = end;
    }
    out
}

fn write_subject_runs(quads: &[Quad], prefixes: &PrefixMap, indent: &str, out: &mut String) {
    let mut i = 0;
    while i < quads.len() {
        let subject = &quads[i].s;
        out.push_str(indent);
        write_term(subject, prefixes, out);

        let mut first_predicate = true;
        while i < quads.len() && quads[i].s == *subject {
            let predicate = &quads[i].p;
            if first_predicate {
                out.push(' ');
                first_predicate = false;
            } else {
                out.push_str(" ;\n");
                out.push_str(indent);
                out.push_str("    ");
            }
            write_predicate(predicate, prefixes, out);
            out.push(' ');
            write_term(&quads[i].o, prefixes, out);
            i += 1;

            while i < quads.len() && quads[i].s == *subject && quads[i].p == *predicate {
                out.push_str(" ,\n");
                out.push_str(indent);
                out.push_str("        ");
                write_term(&quads[i].o, prefixes, out);
                i += 1;
            }
        }
        out.push_str(" .\n");
    }
}

fn write_predicate(term: &Term, prefixes: &PrefixMap, out: &mut String) {
    if term.as_iri() == Some(rdf::TYPE) {
        out.push('a');
    } else {
        write_term(term, prefixes, out);
    }
}

fn write_term(term: &Term, prefixes: &PrefixMap, out: &mut String) {
    match term {
        Term::Iri(iri) => match prefixes.compact(iri) {
            Some(pname) => out.push_str(&pname),
            None => ntriples::write_term(term, out),
        },
        Term::BlankNode(_) => ntriples::write_term(term, out),
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
                out.push_str("^^");
                write_term(&Term::iri(datatype.as_iri()), prefixes, out);
            }
        }
    }
}
