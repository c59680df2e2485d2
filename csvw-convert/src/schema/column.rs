//! Column descriptors

use csvw_graph_ir::Datatype;
use csvw_vocab::xsd;

/// `null` specification of a column or table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NullSpec {
    #[default]
    None,
    Single(String),
    List(Vec<String>),
    /// List holding objects or nested lists; reported per cell
    Malformed,
}

impl NullSpec {
    /// Whether `value` equals a declared marker
    pub fn matches(&self, value: &str) -> bool {
        match self {
            NullSpec::Single(marker) => marker == value,
            NullSpec::List(markers) => markers.iter().any(|m| m == value),
            NullSpec::None | NullSpec::Malformed => false,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, NullSpec::Malformed)
    }
}

/// How a literal column builds its object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// `anyURI`: the value is minted into an IRI
    Iri,
    /// `string` with a `lang` pattern
    LangString(String),
    Typed(Datatype),
    Plain,
}

/// Object rule, fixed at schema load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectRule {
    /// Object property: the object is minted from `valueUrl`
    ValueUrl {
        pattern: String,
        /// Virtual `anyURI` column: mint the raw cell instead
        any_uri: bool,
        /// `linkURI`: truncate aboutUrl/valueUrl to their first placeholder
        link_uri: bool,
    },
    Value(ValueKind),
}

impl ObjectRule {
    pub(crate) fn decide(column: &Column) -> ObjectRule {
        let datatype = column.datatype.as_ref().map(Datatype::as_iri);
        if let Some(pattern) = &column.value_url {
            return ObjectRule::ValueUrl {
                pattern: pattern.clone(),
                any_uri: datatype == Some(xsd::ANY_URI) && column.is_virtual && column.name.is_some(),
                link_uri: datatype == Some(xsd::LINK_URI),
            };
        }
        let kind = match (&column.datatype, &column.lang) {
            (Some(dt), _) if dt.as_iri() == xsd::ANY_URI => ValueKind::Iri,
            (Some(dt), Some(lang)) if dt.is_xsd_string() => ValueKind::LangString(lang.clone()),
            (Some(dt), _) => ValueKind::Typed(dt.clone()),
            (None, _) => ValueKind::Plain,
        };
        ObjectRule::Value(kind)
    }

    /// Whether the column's object is an IRI
    pub fn is_iri(&self) -> bool {
        matches!(self, ObjectRule::ValueUrl { .. } | ObjectRule::Value(ValueKind::Iri))
    }
}

/// One entry of `tableSchema.columns`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub index: usize,
    /// Column schema identifier (`@id`)
    pub id: Option<String>,
    pub name: Option<String>,
    pub is_virtual: bool,
    /// `suppressOutput`: the column produces no statements
    pub suppress_output: bool,
    pub value: Option<String>,
    pub about_url: Option<String>,
    pub property_url: Option<String>,
    pub value_url: Option<String>,
    pub datatype: Option<Datatype>,
    pub lang: Option<String>,
    pub null: NullSpec,
    pub parse_on_empty: bool,
    pub collection_url: Option<String>,
    pub scheme_url: Option<String>,
    pub object: ObjectRule,
}

impl Column {
    /// Label for log and error context
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", self.index),
        }
    }
}
