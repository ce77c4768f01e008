//! Type schemas
//!
//! A `TypeSchema` is the declarative record of one entity type: its parents,
//! its own fields, how its fields map onto ontology predicates and what to do
//! with attributes it does not declare. Schemas are composed by name at
//! lookup time (ancestors first, subtype overrides last), never by copying.

mod field;

pub use field::{Cardinality, FieldKind, FieldSpec};

/// Policy for attributes a type does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtraFields {
    /// Kept as extra attributes and serialized under the local namespace
    #[default]
    Allow,
    /// Dropped silently
    Ignore,
    /// Rejected with a validation error
    Forbid,
}

/// Declarative description of an entity type
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSchema {
    pub name: String,
    pub parents: Vec<String>,
    pub fields: Vec<FieldSpec>,
    /// `(field_or_type_name, predicate)` pairs, in declaration order
    pub uri_refs: Vec<(String, String)>,
    pub extra: ExtraFields,
}

impl TypeSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parents: Vec::new(),
            fields: Vec::new(),
            uri_refs: Vec::new(),
            extra: ExtraFields::default(),
        }
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parents.push(parent.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Map a field (or the type itself, keyed by its own name) to a predicate
    pub fn uri(mut self, key: impl Into<String>, predicate: impl Into<String>) -> Self {
        self.uri_refs.push((key.into(), predicate.into()));
        self
    }

    pub fn extra(mut self, policy: ExtraFields) -> Self {
        self.extra = policy;
        self
    }

    /// Own (non-inherited) field declaration
    pub fn own_field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
