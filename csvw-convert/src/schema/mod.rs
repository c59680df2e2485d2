//! Mapping schema model
//!
//! A [`Schema`] is loaded once per job from CSVW-style JSON metadata and is
//! read-only afterwards. Every column's object rule is decided at load time,
//! so the row processor never inspects raw JSON.

mod column;
mod loader;

use std::sync::Arc;

use csvw_graph_ir::Term;
use sha2::{Digest, Sha256};

pub use column::{Column, NullSpec, ObjectRule, ValueKind};

use crate::namespaces::NamespaceContext;

/// CSV dialect hints carried by the metadata, passed through to the reader
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: Option<String>,
    pub quote_char: Option<String>,
    pub encoding: Option<String>,
    pub header: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Schema {
    base: String,
    id: String,
    url: Option<String>,
    about_url: Option<String>,
    null: NullSpec,
    primary_key: Vec<String>,
    creators: Vec<Term>,
    dialect: Option<Dialect>,
    columns: Vec<Column>,
    namespaces: Arc<NamespaceContext>,
    source_text: String,
}

impl Schema {
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Schema identifier (`@id`, or derived from the base)
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Table `url`
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Table-wide default subject pattern
    pub fn about_url(&self) -> Option<&str> {
        self.about_url.as_deref()
    }

    /// Table-wide null marker(s)
    pub fn null(&self) -> &NullSpec {
        &self.null
    }

    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// `dc:creator` values as terms
    pub fn creators(&self) -> &[Term] {
        &self.creators
    }

    pub fn dialect(&self) -> Option<&Dialect> {
        self.dialect.as_ref()
    }

    /// Columns in schema order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.as_deref() == Some(name))
    }

    pub fn namespaces(&self) -> &Arc<NamespaceContext> {
        &self.namespaces
    }

    /// Text the schema was loaded from
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Hex SHA-256 of the schema text
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.source_text.as_bytes()))
    }
}
