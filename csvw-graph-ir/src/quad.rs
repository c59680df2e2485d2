//! RDF quad: a triple optionally scoped to a named graph

use crate::Term;
use serde::{Deserialize, Serialize};

/// A subject-predicate-object statement with an optional graph name
///
/// `g == None` places the statement in the default graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quad {
    /// Subject (IRI or blank node)
    pub s: Term,
    /// Predicate (IRI)
    pub p: Term,
    /// Object (any term)
    pub o: Term,
    /// Graph name (IRI), `None` for the default graph
    pub g: Option<Term>,
}

impl Quad {
    /// Create a new quad
    pub fn new(s: Term, p: Term, o: Term, g: Option<Term>) -> Self {
        Self { s, p, o, g }
    }

    /// Create a quad in the default graph
    pub fn triple(s: Term, p: Term, o: Term) -> Self {
        Self::new(s, p, o, None)
    }

    /// Return the same statement placed in another graph
    pub fn in_graph(mut self, g: Option<Term>) -> Self {
        self.g = g;
        self
    }
}

impl std::fmt::Display for Quad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.g {
            Some(g) => write!(f, "{} {} {} {} .", self.s, self.p, self.o, g),
            None => write!(f, "{} {} {} .", self.s, self.p, self.o),
        }
    }
}
