//! Prefix map used to compact IRIs in Turtle and TriG output

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Local names that can be written unescaped after `prefix:`
static PN_LOCAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9_]([A-Za-z0-9_.\-]*[A-Za-z0-9_\-])?)?$").expect("valid regex")
});

/// Ordered prefix → namespace mapping
///
/// Iteration order (and therefore header order) is by prefix name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMap {
    entries: BTreeMap<String, String>,
}

impl PrefixMap {
    /// Create an empty prefix map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a prefix mapping
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.entries.insert(prefix.into(), namespace.into());
    }

    /// Number of prefixes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (prefix, namespace) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    /// Compact an IRI to `prefix:local` if a namespace matches
    ///
    /// The longest matching namespace wins. Returns `None` when no namespace
    /// matches or the remainder is not a valid local name.
    pub fn compact(&self, iri: &str) -> Option<String> {
        let mut best: Option<(&str, &str)> = None;
        for (prefix, ns) in &self.entries {
            if ns.is_empty() || !iri.starts_with(ns.as_str()) {
                continue;
            }
            let longer = best.map_or(true, |(_, best_ns)| ns.len() > best_ns.len());
            if longer {
                best = Some((prefix.as_str(), ns.as_str()));
            }
        }

        let (prefix, ns) = best?;
        let local = &iri[ns.len()..];
        if PN_LOCAL_RE.is_match(local) {
            Some(format!("{}:{}", prefix, local))
        } else {
            None
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PrefixMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = PrefixMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
