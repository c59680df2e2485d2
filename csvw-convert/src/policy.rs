//! Null detection and literal casting

use csvw_graph_ir::Term;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CellError;
use crate::schema::{Column, NullSpec, ValueKind};

/// `LANGTAG` production shared by N-Triples, Turtle and TriG
static LANGUAGE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{1,8}(-[A-Za-z0-9]{1,8})*$").expect("valid regex"));

/// Whether a raw cell value counts as null for `column`
///
/// Empty is null unless the column sets `parseOnEmpty`; otherwise the value
/// is null when it equals a column marker, a member of the column's marker
/// list, or the table-wide marker.
pub fn is_null(value: &str, column: &Column, table_null: &NullSpec) -> Result<bool, CellError> {
    if column.null.is_malformed() {
        return Err(CellError::MalformedNull {
            column: column.label(),
        });
    }
    if value.is_empty() {
        return Ok(!column.parse_on_empty);
    }
    Ok(column.null.matches(value) || table_null.matches(value))
}

/// Check a rendered language tag for `column`
///
/// An empty tag yields `None` (the value becomes a plain string literal).
pub fn language_tag<'a>(tag: &'a str, column: &Column) -> Result<Option<&'a str>, CellError> {
    if tag.is_empty() {
        return Ok(None);
    }
    if LANGUAGE_TAG_RE.is_match(tag) {
        Ok(Some(tag))
    } else {
        Err(CellError::InvalidLanguageTag {
            column: column.label(),
            tag: tag.to_string(),
        })
    }
}

/// Literal object for a non-IRI value kind
///
/// `lang` is the rendered language tag for [`ValueKind::LangString`].
/// Returns `None` for [`ValueKind::Iri`], which goes through the minter.
pub fn literal(value: &str, kind: &ValueKind, lang: Option<&str>) -> Option<Term> {
    match kind {
        ValueKind::Iri => None,
        ValueKind::LangString(_) => match lang {
            Some(tag) if !tag.is_empty() => Some(Term::lang_string(value, tag)),
            _ => Some(Term::string(value)),
        },
        ValueKind::Typed(datatype) => Some(Term::typed(value, datatype.clone())),
        ValueKind::Plain => Some(Term::string(value)),
    }
}

/// Truncate a pattern to its first `{...}` placeholder (`linkURI` columns)
pub fn first_placeholder(pattern: &str) -> &str {
    match (pattern.find('{'), pattern.find('}')) {
        (Some(open), Some(close)) if open < close => &pattern[open..=close],
        _ => pattern,
    }
}

/// Last `/`-separated segment of an IRI
pub fn last_segment(iri: &str) -> &str {
    iri.rsplit('/').next().unwrap_or(iri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ObjectRule, Schema};
    use csvw_graph_ir::Datatype;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn column(spec: serde_json::Value) -> Column {
        let schema = Schema::from_value(
            &json!({"tableSchema": {"columns": [spec]}}),
            "https://example.org/",
        )
        .unwrap();
        schema.columns()[0].clone()
    }

    #[test]
    fn test_empty_is_null_by_default() {
        let c = column(json!({"name": "a"}));
        assert_eq!(is_null("", &c, &NullSpec::None), Ok(true));
        assert_eq!(is_null("x", &c, &NullSpec::None), Ok(false));
    }

    #[test]
    fn test_parse_on_empty_wins_over_empty_marker() {
        let c = column(json!({"name": "a", "parseOnEmpty": true, "null": ""}));
        assert_eq!(is_null("", &c, &NullSpec::Single(String::new())), Ok(false));
    }

    #[test]
    fn test_column_and_table_markers() {
        let c = column(json!({"name": "a", "null": ["-", "NA"]}));
        assert_eq!(is_null("NA", &c, &NullSpec::None), Ok(true));
        assert_eq!(is_null("na", &c, &NullSpec::None), Ok(false));
        assert_eq!(is_null("?", &c, &NullSpec::Single("?".into())), Ok(true));

        let c = column(json!({"name": "a", "null": 99}));
        assert_eq!(is_null("99", &c, &NullSpec::None), Ok(true));
    }

    #[test]
    fn test_malformed_null_is_cell_error() {
        let c = column(json!({"name": "a", "null": [["x"]]}));
        assert_eq!(
            is_null("x", &c, &NullSpec::None),
            Err(CellError::MalformedNull { column: "a".into() })
        );
    }

    #[test]
    fn test_literal_casting() {
        assert_eq!(
            literal("123", &ValueKind::Typed(Datatype::xsd_string()), None),
            Some(Term::typed("123", Datatype::xsd_string()))
        );
        assert_eq!(
            literal("Olá", &ValueKind::LangString("{l}".into()), Some("pt")),
            Some(Term::lang_string("Olá", "pt"))
        );
        assert_eq!(literal("x", &ValueKind::Plain, None), Some(Term::string("x")));
        assert_eq!(literal("x", &ValueKind::Iri, None), None);

        let c = column(json!({"name": "a", "datatype": "integer"}));
        let ObjectRule::Value(kind) = &c.object else {
            panic!("expected literal rule");
        };
        assert_eq!(
            literal("007", kind, None),
            Some(Term::typed("007", Datatype::xsd_integer()))
        );
    }

    #[test]
    fn test_language_tags() {
        let c = column(json!({"name": "a", "lang": "{l}"}));
        assert_eq!(language_tag("pt", &c), Ok(Some("pt")));
        assert_eq!(language_tag("pt-BR", &c), Ok(Some("pt-BR")));
        assert_eq!(language_tag("", &c), Ok(None));
        for bad in ["pt BR", "pt-", "-pt", "1a", "pt_BR"] {
            assert_eq!(
                language_tag(bad, &c),
                Err(CellError::InvalidLanguageTag {
                    column: "a".into(),
                    tag: bad.into(),
                })
            );
        }
    }

    #[test]
    fn test_link_uri_helpers() {
        assert_eq!(first_placeholder("https://ex.org/{a}/{b}"), "{a}");
        assert_eq!(first_placeholder("no-placeholders"), "no-placeholders");
        assert_eq!(last_segment("https://ex.org/sexo/"), "");
        assert_eq!(last_segment("https://ex.org/sexo/9"), "9");
    }
}
