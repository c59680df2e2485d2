//! IRI minting: render → expand CURIE → escape → resolve → validate

use std::borrow::Cow;
use std::sync::Arc;

use oxiri::Iri;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::CellError;
use crate::namespaces::NamespaceContext;
use crate::row::Row;
use crate::template::TemplateRenderer;

/// Characters that may never appear literally in an IRI
const FORBIDDEN: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'<')
    .add(b'>')
    .add(b'"')
    .add(b'{')
    .add(b'}')
    .add(b'|')
    .add(b'\\')
    .add(b'^')
    .add(b'`');

/// Percent-escape forbidden characters, leaving everything else (including
/// non-ASCII letters) untouched
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.chars().any(needs_escape) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    let mut buf = [0u8; 4];
    for c in text.chars() {
        if needs_escape(c) {
            out.extend(utf8_percent_encode(c.encode_utf8(&mut buf), FORBIDDEN));
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, ' ' | '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`')
}

/// Turns patterns and raw cell text into absolute IRIs
#[derive(Debug, Clone)]
pub struct IriMinter {
    namespaces: Arc<NamespaceContext>,
}

impl IriMinter {
    pub fn new(namespaces: Arc<NamespaceContext>) -> Self {
        Self { namespaces }
    }

    pub fn namespaces(&self) -> &NamespaceContext {
        &self.namespaces
    }

    /// Render `pattern` against `row` and mint the result
    pub fn expand(
        &self,
        renderer: &mut TemplateRenderer,
        pattern: &str,
        row: &Row,
    ) -> Result<String, CellError> {
        let rendered = renderer.render(pattern, row);
        self.mint(&rendered)
    }

    /// Mint already-rendered text
    pub fn mint(&self, text: &str) -> Result<String, CellError> {
        if text.trim().is_empty() {
            return Err(invalid(text, "empty IRI"));
        }
        let expanded = self.namespaces.expand(text);
        let escaped = escape(&expanded);
        let resolved = self
            .namespaces
            .resolve(&escaped)
            .ok_or_else(|| invalid(text, "relative reference cannot be resolved against the base"))?;

        match Iri::parse(resolved.as_str()) {
            Ok(_) => Ok(resolved),
            Err(e) => Err(invalid(text, &e.to_string())),
        }
    }
}

fn invalid(rendered: &str, reason: &str) -> CellError {
    CellError::InvalidIri {
        rendered: rendered.to_string(),
        reason: reason.to_string(),
    }
}
