use std::fmt;

/// Expected shape of a single field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    /// ISO-8601 timestamp or date
    DateTime,
    /// Absolute IRI (serialized as a node reference)
    Iri,
    Email,
    /// IANA media type; bare `type/subtype` and `iana:` forms are expanded
    /// to the IANA registry IRI
    MediaType,
    /// Nested entity; candidates in priority order
    Entity(Vec<String>),
    /// Anything the value model can hold
    Any,
}

impl FieldKind {
    pub fn entity(type_name: impl Into<String>) -> Self {
        FieldKind::Entity(vec![type_name.into()])
    }

    pub fn union(candidates: &[&str]) -> Self {
        FieldKind::Entity(candidates.iter().map(|c| c.to_string()).collect())
    }

    /// Entity candidates, empty for scalar kinds
    pub fn candidates(&self) -> &[String] {
        match self {
            FieldKind::Entity(c) => c,
            _ => &[],
        }
    }

    pub fn is_entity(&self) -> bool {
        matches!(self, FieldKind::Entity(_))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "string"),
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Float => write!(f, "number"),
            FieldKind::Boolean => write!(f, "boolean"),
            FieldKind::DateTime => write!(f, "datetime"),
            FieldKind::Iri => write!(f, "IRI"),
            FieldKind::Email => write!(f, "email address"),
            FieldKind::MediaType => write!(f, "media type"),
            FieldKind::Entity(c) => write!(f, "{}", c.join(" | ")),
            FieldKind::Any => write!(f, "any"),
        }
    }
}

/// How many values a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    /// Exactly one value; repeated triples are a coercion error on decode
    #[default]
    One,
    /// Always a list, even with a single element
    Many,
    /// A lone value stays scalar, repeats fold into a list
    OneOrMany,
}

/// Declaration of one field on a type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub cardinality: Cardinality,
    pub required: bool,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            cardinality: Cardinality::One,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn many(mut self) -> Self {
        self.cardinality = Cardinality::Many;
        self
    }

    pub fn one_or_many(mut self) -> Self {
        self.cardinality = Cardinality::OneOrMany;
        self
    }
}
