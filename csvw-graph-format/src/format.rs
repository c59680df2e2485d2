//! Supported output formats

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FormatError;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RdfFormat {
    /// N-Triples (graph names dropped)
    #[serde(alias = "nt")]
    NTriples,
    /// N-Quads
    #[default]
    #[serde(alias = "nq")]
    NQuads,
    /// Turtle (graph names dropped)
    #[serde(alias = "ttl")]
    Turtle,
    /// TriG
    TriG,
    /// TriX (XML)
    TriX,
}

impl RdfFormat {
    /// All formats, in documentation order
    pub const ALL: [RdfFormat; 5] = [
        RdfFormat::NTriples,
        RdfFormat::NQuads,
        RdfFormat::Turtle,
        RdfFormat::TriG,
        RdfFormat::TriX,
    ];

    /// File extension used for converted output
    pub fn extension(&self) -> &'static str {
        match self {
            RdfFormat::NTriples => "nt",
            RdfFormat::NQuads => "nq",
            RdfFormat::Turtle => "ttl",
            RdfFormat::TriG => "trig",
            RdfFormat::TriX => "trix",
        }
    }

    /// Canonical format name
    pub fn name(&self) -> &'static str {
        match self {
            RdfFormat::NTriples => "ntriples",
            RdfFormat::NQuads => "nquads",
            RdfFormat::Turtle => "turtle",
            RdfFormat::TriG => "trig",
            RdfFormat::TriX => "trix",
        }
    }

    /// Whether graph names survive serialization
    pub fn supports_graphs(&self) -> bool {
        matches!(self, RdfFormat::NQuads | RdfFormat::TriG | RdfFormat::TriX)
    }
}

impl FromStr for RdfFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nt" | "ntriples" | "n-triples" => Ok(RdfFormat::NTriples),
            "nq" | "nquads" | "n-quads" => Ok(RdfFormat::NQuads),
            "ttl" | "turtle" => Ok(RdfFormat::Turtle),
            "trig" => Ok(RdfFormat::TriG),
            "trix" => Ok(RdfFormat::TriX),
            other => Err(FormatError::UnknownFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
