//! JSON metadata → [`Schema`]

use std::path::Path;
use std::sync::Arc;

use csvw_graph_ir::{Datatype, Term};
use csvw_vocab::{rdf, xsd};
use oxiri::Iri;
use serde_json::{Map, Value};

use super::column::{Column, NullSpec, ObjectRule};
use super::{Dialect, Schema};
use crate::error::SchemaError;
use crate::iri::escape;
use crate::namespaces::NamespaceContext;

type JsonObject = Map<String, Value>;

const CREATOR_KEYS: [&str; 2] = ["dc:creator", "http://purl.org/dc/elements/1.1/creator"];

/// CSVW built-in datatype names that are not plain XSD local names
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("any", "http://www.w3.org/2001/XMLSchema#anyAtomicType"),
    ("number", "http://www.w3.org/2001/XMLSchema#double"),
    ("binary", "http://www.w3.org/2001/XMLSchema#base64Binary"),
    ("datetime", "http://www.w3.org/2001/XMLSchema#dateTime"),
    ("xml", "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral"),
    ("html", "http://www.w3.org/1999/02/22-rdf-syntax-ns#HTML"),
    ("json", rdf::JSON),
];

const XSD_NAMES: &[&str] = &[
    "anyAtomicType", "anyURI", "base64Binary", "boolean", "byte", "date", "dateTime",
    "dateTimeStamp", "dayTimeDuration", "decimal", "double", "duration", "float", "gDay",
    "gMonth", "gMonthDay", "gYear", "gYearMonth", "hexBinary", "int", "integer", "language",
    "linkURI", "long", "Name", "NMTOKEN", "negativeInteger", "nonNegativeInteger",
    "nonPositiveInteger", "normalizedString", "positiveInteger", "QName", "short", "string",
    "time", "token", "unsignedByte", "unsignedInt", "unsignedLong", "unsignedShort",
    "yearMonthDuration",
];

impl Schema {
    /// Load from a metadata file
    pub fn load_path(path: impl AsRef<Path>, default_base: &str) -> Result<Schema, SchemaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "read schema");
        Self::from_json_str(&text, default_base)
    }

    /// Load from JSON text
    pub fn from_json_str(text: &str, default_base: &str) -> Result<Schema, SchemaError> {
        let value: Value = serde_json::from_str(text)?;
        build(&value, text.to_string(), default_base)
    }

    /// Load from an already-parsed JSON value
    pub fn from_value(value: &Value, default_base: &str) -> Result<Schema, SchemaError> {
        let text = serde_json::to_string(value)?;
        build(value, text, default_base)
    }
}

fn build(value: &Value, source_text: String, default_base: &str) -> Result<Schema, SchemaError> {
    let doc = value.as_object().ok_or(SchemaError::NotAnObject)?;
    let contexts = context_objects(doc);

    let base = read_base(doc, &contexts)?.unwrap_or_else(|| default_base.to_string());
    let namespaces = Arc::new(build_namespaces(&base, &contexts));

    let url = table_string(doc, "url")?;
    let id = match table_string(doc, "@id")? {
        Some(id) => to_iri(&namespaces, &id).unwrap_or(id),
        None => url
            .as_deref()
            .and_then(|u| to_iri(&namespaces, u))
            .unwrap_or_else(|| format!("{}schema", base)),
    };

    let creators = read_creators(doc, &namespaces);
    let dialect = read_dialect(doc)?;

    let table = doc
        .get("tableSchema")
        .and_then(Value::as_object)
        .ok_or(SchemaError::MissingTableSchema)?;

    let about_url = table_string(table, "aboutUrl")?;
    let null = parse_null(table.get("null"));
    let primary_key = match table.get("primaryKey") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str().map(str::to_string).ok_or(SchemaError::InvalidField {
                    field: "primaryKey",
                    message: "expected a string or an array of strings".to_string(),
                })
            })
            .collect::<Result<_, _>>()?,
        Some(_) => {
            return Err(SchemaError::InvalidField {
                field: "primaryKey",
                message: "expected a string or an array of strings".to_string(),
            })
        }
    };

    let raw_columns = table
        .get("columns")
        .and_then(Value::as_array)
        .ok_or(SchemaError::MissingColumns)?;

    let mut columns = Vec::with_capacity(raw_columns.len());
    for (index, raw) in raw_columns.iter().enumerate() {
        let obj = raw
            .as_object()
            .ok_or(SchemaError::ColumnNotObject { index })?;
        columns.push(read_column(index, obj, &id, &namespaces)?);
    }

    tracing::info!(
        base = %base,
        schema = %id,
        columns = columns.len(),
        "loaded schema"
    );

    Ok(Schema {
        base,
        id,
        url,
        about_url,
        null,
        primary_key,
        creators,
        dialect,
        columns,
        namespaces,
        source_text,
    })
}

fn context_objects(doc: &JsonObject) -> Vec<&JsonObject> {
    match doc.get("@context") {
        Some(Value::Object(obj)) => vec![obj],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).collect(),
        _ => Vec::new(),
    }
}

fn read_base(doc: &JsonObject, contexts: &[&JsonObject]) -> Result<Option<String>, SchemaError> {
    let candidates = std::iter::once(doc).chain(contexts.iter().copied());
    for obj in candidates {
        match obj.get("@base") {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) if s.is_empty() => continue,
            Some(Value::String(s)) => return Ok(Some(s.clone())),
            Some(_) => {
                return Err(SchemaError::InvalidField {
                    field: "@base",
                    message: "expected a string".to_string(),
                })
            }
        }
    }
    Ok(None)
}

fn build_namespaces(base: &str, contexts: &[&JsonObject]) -> NamespaceContext {
    let mut ns = NamespaceContext::new(base);
    for ctx in contexts {
        for (key, value) in ctx.iter() {
            let target = match value {
                Value::String(s) => s.as_str(),
                Value::Object(o) => match o.get("@id").and_then(Value::as_str) {
                    Some(s) => s,
                    None => continue,
                },
                _ => continue,
            };
            match key.as_str() {
                "@vocab" => ns.set_vocab(target),
                k if k.starts_with('@') => {}
                k => ns.declare(k, target),
            }
        }
    }
    ns
}

/// Expand and resolve `value`, returning it only if it is an absolute IRI
fn to_iri(ns: &NamespaceContext, value: &str) -> Option<String> {
    let expanded = ns.expand(value);
    let resolved = ns.resolve(&escape(&expanded))?;
    Iri::parse(resolved.as_str()).ok()?;
    Some(resolved)
}

fn read_creators(doc: &JsonObject, ns: &NamespaceContext) -> Vec<Term> {
    let mut creators = Vec::new();
    for key in CREATOR_KEYS {
        let Some(value) = doc.get(key) else { continue };
        let items: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };
        for item in items {
            let term = match item {
                Value::String(s) => Some(creator_from_text(ns, s)),
                Value::Object(o) => {
                    if let Some(id) = o.get("@id").and_then(Value::as_str) {
                        to_iri(ns, id).map(Term::iri)
                    } else {
                        o.get("@value").and_then(Value::as_str).map(Term::string)
                    }
                }
                _ => None,
            };
            match term {
                Some(term) => creators.push(term),
                None => tracing::warn!(value = %item, "ignoring unusable dc:creator value"),
            }
        }
    }
    creators
}

fn creator_from_text(ns: &NamespaceContext, text: &str) -> Term {
    let expanded = ns.expand(text);
    let looks_like_iri = expanded.contains("://") || expanded.starts_with("urn:");
    match Iri::parse(&*expanded) {
        Ok(_) if looks_like_iri => Term::iri(&*expanded),
        _ => Term::string(text),
    }
}

fn read_dialect(doc: &JsonObject) -> Result<Option<Dialect>, SchemaError> {
    let Some(value) = doc.get("dialect") else {
        return Ok(None);
    };
    let obj = value.as_object().ok_or(SchemaError::InvalidField {
        field: "dialect",
        message: "expected an object".to_string(),
    })?;
    Ok(Some(Dialect {
        delimiter: table_string(obj, "delimiter")?,
        quote_char: table_string(obj, "quoteChar")?,
        encoding: table_string(obj, "encoding")?,
        header: obj.get("header").and_then(Value::as_bool),
    }))
}

fn table_string(obj: &JsonObject, field: &'static str) -> Result<Option<String>, SchemaError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(SchemaError::InvalidField {
            field,
            message: "expected a string".to_string(),
        }),
    }
}

fn read_column(
    index: usize,
    obj: &JsonObject,
    schema_id: &str,
    ns: &NamespaceContext,
) -> Result<Column, SchemaError> {
    let string = |field: &'static str| -> Result<Option<String>, SchemaError> {
        match obj.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(SchemaError::InvalidColumnField {
                index,
                field,
                message: format!("expected a string, found {}", json_type(other)),
            }),
        }
    };
    let flag = |field: &'static str| -> Result<bool, SchemaError> {
        match obj.get(field) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s == "true" => Ok(true),
            Some(Value::String(s)) if s == "false" => Ok(false),
            Some(other) => Err(SchemaError::InvalidColumnField {
                index,
                field,
                message: format!("expected a boolean, found {}", json_type(other)),
            }),
        }
    };

    let name = string("name")?;
    let value = string("value")?;
    if name.is_none() && value.is_none() {
        return Err(SchemaError::NameOrValueRequired { index });
    }

    let datatype = match obj.get("datatype") {
        None | Some(Value::Null) => None,
        Some(v) => Some(parse_datatype(v, ns).map_err(|message| {
            SchemaError::InvalidColumnField {
                index,
                field: "datatype",
                message,
            }
        })?),
    };

    let id = match string("@id")? {
        Some(id) => Some(to_iri(ns, &id).unwrap_or(id)),
        None => name.as_ref().map(|n| {
            format!(
                "{}/column/{}",
                schema_id.trim_end_matches('/'),
                escape(n).replace('/', "%2F")
            )
        }),
    };

    let null = parse_null(obj.get("null"));
    if null.is_malformed() {
        tracing::warn!(column = index, "null specification contains objects or nested lists");
    }

    let mut column = Column {
        index,
        id,
        name,
        is_virtual: flag("virtual")?,
        suppress_output: flag("suppressOutput")?,
        value,
        about_url: string("aboutUrl")?,
        property_url: string("propertyUrl")?,
        value_url: string("valueUrl")?,
        datatype,
        lang: string("lang")?,
        null,
        parse_on_empty: flag("parseOnEmpty")?,
        collection_url: string("collectionUrl")?,
        scheme_url: string("schemeUrl")?,
        object: ObjectRule::Value(super::ValueKind::Plain),
    };
    column.object = ObjectRule::decide(&column);
    Ok(column)
}

fn parse_null(value: Option<&Value>) -> NullSpec {
    match value {
        None | Some(Value::Null) => NullSpec::None,
        Some(Value::String(s)) => NullSpec::Single(s.clone()),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => NullSpec::Single(v.to_string()),
        Some(Value::Array(items)) => {
            let mut markers = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => markers.push(s.clone()),
                    Value::Number(_) | Value::Bool(_) => markers.push(item.to_string()),
                    Value::Null => {}
                    Value::Array(_) | Value::Object(_) => return NullSpec::Malformed,
                }
            }
            NullSpec::List(markers)
        }
        Some(Value::Object(_)) => NullSpec::Malformed,
    }
}

fn parse_datatype(value: &Value, ns: &NamespaceContext) -> Result<Datatype, String> {
    match value {
        Value::String(s) => Ok(datatype_from_name(s, ns)),
        Value::Object(obj) => {
            let inner = obj
                .get("@id")
                .or_else(|| obj.get("base"))
                .and_then(Value::as_str)
                .ok_or_else(|| "datatype object needs a string '@id' or 'base'".to_string())?;
            Ok(datatype_from_name(inner, ns))
        }
        other => Err(format!("expected a string or object, found {}", json_type(other))),
    }
}

fn datatype_from_name(name: &str, ns: &NamespaceContext) -> Datatype {
    if let Some((_, iri)) = BUILTIN_ALIASES.iter().find(|(alias, _)| *alias == name) {
        return Datatype::from_iri(iri);
    }
    if XSD_NAMES.contains(&name) {
        return Datatype::from_iri(format!("{}{}", xsd::NS, name));
    }
    let expanded = ns.expand(name);
    if expanded.contains(':') {
        Datatype::from_iri(&*expanded)
    } else {
        tracing::debug!(datatype = name, "unknown datatype name; assuming XSD namespace");
        Datatype::from_iri(format!("{}{}", xsd::NS, name))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
