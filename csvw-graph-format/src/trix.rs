//! TriX (XML) encoding
//!
//! Each consecutive run of statements sharing a graph name becomes one
//! `<graph>` element. The default graph is written without a `<uri>` child.

use csvw_graph_ir::{Quad, Term};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{FormatError, Result};

const TRIX_NS: &str = "http://www.w3.org/2004/03/trix/trix-1/";

/// XML prolog and opening `<TriX>` element
pub(crate) fn header() -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    writer.get_mut().push(b'\n');

    let mut root = BytesStart::new("TriX");
    root.push_attribute(("xmlns", TRIX_NS));
    writer.write_event(Event::Start(root)).map_err(xml_err)?;
    writer.get_mut().push(b'\n');
    Ok(writer.into_inner())
}

/// Closing `</TriX>` element
pub(crate) fn footer() -> Vec<u8> {
    b"</TriX>\n".to_vec()
}

/// Encode a batch as a sequence of `<graph>` elements
pub(crate) fn encode(quads: &[Quad]) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::with_capacity(quads.len() * 256));

    let mut start = 0;
    while start < quads.len() {
        let graph = &quads[start].g;
        let mut end = start + 1;
        while end < quads.len() && quads[end].g == *graph {
            end += 1;
        }

        start_tag(&mut writer, "graph")?;
        writer.get_mut().push(b'\n');
        if let Some(g) = graph {
            write_term(&mut writer, g)?;
        }
        for quad in &quads[start..end] {
            start_tag(&mut writer, "triple")?;
            write_term(&mut writer, &quad.s)?;
            write_term(&mut writer, &quad.p)?;
            write_term(&mut writer, &quad.o)?;
            end_tag(&mut writer, "triple")?;
            writer.get_mut().push(b'\n');
        }
        end_tag(&mut writer, "graph")?;
        writer.get_mut().push(b'\n');

        start = end;
    }

    Ok(writer.into_inner())
}

fn write_term(writer: &mut Writer<Vec<u8>>, term: &Term) -> Result<()> {
    match term {
        Term::Iri(iri) => text_element(writer, BytesStart::new("uri"), iri),
        Term::BlankNode(id) => text_element(writer, BytesStart::new("id"), id.as_str()),
        Term::Literal {
            value,
            datatype,
            language,
        } => {
            if language.is_some() || datatype.is_xsd_string() {
                let mut elem = BytesStart::new("plainLiteral");
                if let Some(lang) = language {
                    elem.push_attribute(("xml:lang", lang.as_ref()));
                }
                text_element(writer, elem, value)
            } else {
                let mut elem = BytesStart::new("typedLiteral");
                elem.push_attribute(("datatype", datatype.as_iri()));
                text_element(writer, elem, value)
            }
        }
    }
}

fn text_element(writer: &mut Writer<Vec<u8>>, start: BytesStart<'_>, text: &str) -> Result<()> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    end_tag(writer, &name)
}

fn start_tag(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_err)
}

fn end_tag(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)
}

fn xml_err(e: impl std::fmt::Display) -> FormatError {
    FormatError::Xml(e.to_string())
}
