//! Job-scoped namespace context
//!
//! Holds the prefixes a conversion may expand: the built-in vocabularies,
//! `sdr`/`sdv` derived from the base IRI, and everything the schema declares
//! in `@context`. One context is built per job and shared read-only.

use std::borrow::Cow;
use std::collections::BTreeMap;

use csvw_graph_format::PrefixMap;
use csvw_vocab::prefixes;
use oxiri::Iri;

#[derive(Debug, Clone)]
pub struct NamespaceContext {
    base: String,
    parsed_base: Option<Iri<String>>,
    vocab: Option<String>,
    prefixes: BTreeMap<String, String>,
}

impl NamespaceContext {
    /// Context with built-in prefixes plus `sdr` and `sdv` for `base`
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let parsed_base = Iri::parse(base.clone()).ok();
        if parsed_base.is_none() {
            tracing::warn!(base = %base, "base IRI is not a valid absolute IRI; relative references will not resolve");
        }

        let mut prefixes: BTreeMap<String, String> = prefixes::BUILTIN
            .iter()
            .map(|(p, ns)| (p.to_string(), ns.to_string()))
            .collect();
        prefixes.insert("sdr".to_string(), base.clone());
        prefixes.insert("sdv".to_string(), format!("{}vocab/", base));

        Self {
            base,
            parsed_base,
            vocab: None,
            prefixes,
        }
    }

    /// Declare or override a prefix
    pub fn declare(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the `@vocab` namespace
    pub fn set_vocab(&mut self, vocab: impl Into<String>) {
        self.vocab = Some(vocab.into());
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Namespace for default predicates: `@vocab` if declared, else `sdv`
    pub fn vocab(&self) -> &str {
        match &self.vocab {
            Some(v) => v,
            None => self
                .prefixes
                .get("sdv")
                .map(String::as_str)
                .unwrap_or(&self.base),
        }
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Expand `prefix:local` when the prefix is known
    ///
    /// Anything else (absolute IRIs, unknown prefixes, relative references)
    /// comes back unchanged.
    pub fn expand<'a>(&self, value: &'a str) -> Cow<'a, str> {
        let Some((prefix, local)) = value.split_once(':') else {
            return Cow::Borrowed(value);
        };
        if local.starts_with("//") || prefix.is_empty() || !is_prefix_name(prefix) {
            return Cow::Borrowed(value);
        }
        match self.prefixes.get(prefix) {
            Some(ns) => Cow::Owned(format!("{}{}", ns, local)),
            None => Cow::Borrowed(value),
        }
    }

    /// Resolve a reference against the base IRI
    ///
    /// Absolute IRIs are returned as-is. Returns `None` when the reference
    /// cannot be resolved.
    pub fn resolve(&self, reference: &str) -> Option<String> {
        if has_scheme(reference) {
            return Some(reference.to_string());
        }
        let base = self.parsed_base.as_ref()?;
        base.resolve(reference).ok().map(Iri::into_inner)
    }

    /// Prefixes for Turtle and TriG output
    pub fn prefix_map(&self) -> PrefixMap {
        self.prefixes
            .iter()
            .map(|(p, ns)| (p.clone(), ns.clone()))
            .collect()
    }
}

fn is_prefix_name(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic())
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

fn has_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_and_derived_prefixes() {
        let ctx = NamespaceContext::new("https://example.org/");
        assert_eq!(
            ctx.expand("xsd:string"),
            "http://www.w3.org/2001/XMLSchema#string"
        );
        assert_eq!(ctx.expand("sdr:patient/1"), "https://example.org/patient/1");
        assert_eq!(ctx.expand("sdv:age"), "https://example.org/vocab/age");
        assert_eq!(ctx.vocab(), "https://example.org/vocab/");
    }

    #[test]
    fn test_unknown_prefixes_and_absolute_iris_unchanged() {
        let ctx = NamespaceContext::new("https://example.org/");
        assert_eq!(ctx.expand("nope:x"), "nope:x");
        assert_eq!(ctx.expand("https://a.org/x"), "https://a.org/x");
        assert_eq!(ctx.expand("plain"), "plain");
    }

    #[test]
    fn test_declared_prefix_overrides_builtin_and_vocab() {
        let mut ctx = NamespaceContext::new("https://example.org/");
        ctx.declare("dtsh", "https://dtsh.example/");
        ctx.declare("schema", "http://schema.org/");
        ctx.set_vocab("https://voc.example/");
        assert_eq!(ctx.expand("dtsh:Id"), "https://dtsh.example/Id");
        assert_eq!(ctx.expand("schema:name"), "http://schema.org/name");
        assert_eq!(ctx.vocab(), "https://voc.example/");
    }

    #[test]
    fn test_resolve_relative_reference() {
        let ctx = NamespaceContext::new("https://example.org/data/");
        assert_eq!(
            ctx.resolve("patient/1").as_deref(),
            Some("https://example.org/data/patient/1")
        );
        assert_eq!(
            ctx.resolve("/root").as_deref(),
            Some("https://example.org/root")
        );
        assert_eq!(
            ctx.resolve("urn:x:1").as_deref(),
            Some("urn:x:1")
        );
    }

    #[test]
    fn test_prefix_map_contains_declared() {
        let mut ctx = NamespaceContext::new("https://example.org/");
        ctx.declare("ex", "http://ex.org/");
        let map = ctx.prefix_map();
        assert_eq!(map.compact("http://ex.org/a").as_deref(), Some("ex:a"));
    }
}
