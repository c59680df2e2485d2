//! RDF dataset - an ordered collection of quads
//!
//! `Dataset` uses `Vec<Quad>` to preserve emission order (bag semantics).
//! Row output order matters to the converter, so deduplication keeps the
//! first occurrence in place instead of sorting.

use crate::{Quad, Term};
use rustc_hash::FxHashSet;

/// A collection of RDF quads
///
/// # Design Decisions
///
/// - **Vec storage**: keeps statements in the order they were emitted.
/// - **Explicit deduplication**: `dedupe_in_order()` applies set semantics
///   without reordering; `canonicalize()` sorts and dedupes for comparisons.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    quads: Vec<Quad>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty dataset with room for `n` quads
    pub fn with_capacity(n: usize) -> Self {
        Self {
            quads: Vec::with_capacity(n),
        }
    }

    /// Add a quad
    pub fn add(&mut self, quad: Quad) {
        self.quads.push(quad);
    }

    /// Add a quad by components
    pub fn add_quad(&mut self, s: Term, p: Term, o: Term, g: Option<Term>) {
        self.add(Quad::new(s, p, o, g));
    }

    /// Get the number of quads
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Iterate over quads in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Quad> {
        self.quads.iter()
    }

    /// Get a reference to the quads
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// Get all quads (consuming the dataset)
    pub fn into_quads(self) -> Vec<Quad> {
        self.quads
    }

    /// Remove duplicate quads, keeping the first occurrence of each
    ///
    /// Relative order of the surviving quads is unchanged.
    pub fn dedupe_in_order(&mut self) {
        let mut seen: FxHashSet<Quad> = FxHashSet::default();
        seen.reserve(self.quads.len());
        self.quads.retain(|q| seen.insert(q.clone()));
    }

    /// Sort and dedupe (set semantics with deterministic order)
    ///
    /// Useful for comparing datasets produced under different chunking.
    pub fn canonicalize(&mut self) {
        self.quads.sort();
        self.quads.dedup();
    }

    /// Distinct graph names in order of first appearance
    pub fn graph_names(&self) -> Vec<Option<&Term>> {
        let mut names: Vec<Option<&Term>> = Vec::new();
        for q in &self.quads {
            let g = q.g.as_ref();
            if !names.contains(&g) {
                names.push(g);
            }
        }
        names
    }
}

impl IntoIterator for Dataset {
    type Item = Quad;
    type IntoIter = std::vec::IntoIter<Quad>;

    fn into_iter(self) -> Self::IntoIter {
        self.quads.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Quad;
    type IntoIter = std::slice::Iter<'a, Quad>;

    fn into_iter(self) -> Self::IntoIter {
        self.quads.iter()
    }
}

impl FromIterator<Quad> for Dataset {
    fn from_iter<T: IntoIterator<Item = Quad>>(iter: T) -> Self {
        Dataset {
            quads: iter.into_iter().collect(),
        }
    }
}

impl Extend<Quad> for Dataset {
    fn extend<T: IntoIterator<Item = Quad>>(&mut self, iter: T) {
        self.quads.extend(iter);
    }
}
