use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;
use uuid::Uuid;

use super::coerce::coerce_field;
use super::value::Value;
use crate::errors::{OgmError, Result, ValidationErrors};
use crate::namespace::{blank_token, is_absolute_iri, is_blank_id, is_valid_field_name, UriRegistry};
use crate::schema::{Cardinality, ExtraFields, FieldKind};

static NULL: Value = Value::Null;

/// Identity of an entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    /// Document-scoped handle with no external identity
    Blank(String),
    /// Globally stable IRI
    Iri(String),
}

impl EntityId {
    /// Parse `_:x`, `local:x` (both blank) or an absolute IRI
    pub fn parse(value: &str) -> Result<Self> {
        if is_blank_id(value) {
            return match blank_token(value) {
                Some(token) if !token.is_empty() => Ok(EntityId::Blank(token.to_string())),
                _ => Err(OgmError::Parse(format!("empty blank node id '{}'", value))),
            };
        }
        if is_absolute_iri(value) {
            Ok(EntityId::Iri(value.to_string()))
        } else {
            Err(OgmError::Parse(format!(
                "'{}' is neither an absolute IRI nor a blank node id",
                value
            )))
        }
    }

    pub fn blank(token: impl Into<String>) -> Self {
        EntityId::Blank(token.into())
    }

    pub fn iri(iri: impl Into<String>) -> Self {
        EntityId::Iri(iri.into())
    }

    /// Fresh blank id, unique with overwhelming probability
    pub fn fresh() -> Self {
        EntityId::Blank(Uuid::new_v4().simple().to_string())
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, EntityId::Blank(_))
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            EntityId::Iri(iri) => Some(iri),
            EntityId::Blank(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Blank(token) => write!(f, "_:{}", token),
            EntityId::Iri(iri) => write!(f, "{}", iri),
        }
    }
}

/// One typed, identity-bearing record
///
/// Equality compares the type and the field values; the id is ignored.
#[derive(Debug, Clone)]
pub struct Entity {
    id: Option<EntityId>,
    type_name: String,
    fields: BTreeMap<String, Value>,
    extra: BTreeMap<String, Value>,
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.fields == other.fields && self.extra == other.extra
    }
}

impl Entity {
    pub fn builder(type_name: impl Into<String>) -> EntityBuilder {
        EntityBuilder {
            type_name: type_name.into(),
            id: None,
            values: Vec::new(),
        }
    }

    /// Validate and construct an entity of `type_name`.
    ///
    /// Every offending field is reported in a single `Validation` error.
    pub fn new<K, I>(registry: &UriRegistry, type_name: &str, id: Option<EntityId>, values: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        if !registry.contains_type(type_name) {
            return Err(OgmError::UnknownType(type_name.to_string()));
        }

        let mut entity = Entity {
            id,
            type_name: type_name.to_string(),
            fields: BTreeMap::new(),
            extra: BTreeMap::new(),
        };
        let mut errors = ValidationErrors::new(type_name);

        for (name, value) in values {
            entity.assign(registry, name.into(), value, &mut errors);
        }

        for spec in registry.all_fields(type_name) {
            if spec.required && !entity.fields.contains_key(&spec.name) && !errors.fields().contains(&spec.name.as_str()) {
                errors.push(spec.name.clone(), "field required");
            }
        }

        errors.into_result()?;
        Ok(entity)
    }

    /// Id-only stand-in for a node that is referenced but not described.
    /// Required fields are not enforced.
    pub fn reference(type_name: impl Into<String>, id: EntityId) -> Self {
        Entity {
            id: Some(id),
            type_name: type_name.into(),
            fields: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }

    fn assign(&mut self, registry: &UriRegistry, name: String, value: Value, errors: &mut ValidationErrors) {
        match registry.field(&self.type_name, &name) {
            Some(spec) => match coerce_field(registry, spec, value, errors) {
                Some(v) => {
                    self.fields.insert(name, v);
                }
                None => {
                    self.fields.remove(&name);
                }
            },
            None => match registry.extra_policy(&self.type_name) {
                ExtraFields::Allow if !is_valid_field_name(&name) => {
                    errors.push(name, "not usable as a predicate local name");
                }
                ExtraFields::Allow => {
                    if value.is_empty() {
                        self.extra.remove(&name);
                    } else {
                        self.extra.insert(name, value);
                    }
                }
                ExtraFields::Ignore => {
                    debug!("Dropping undeclared field '{}' on {}", name, self.type_name);
                }
                ExtraFields::Forbid => {
                    errors.push(name, "extra fields not permitted");
                }
            },
        }
    }

    pub fn id(&self) -> Option<&EntityId> {
        self.id.as_ref()
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Declared field or extra attribute
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).or_else(|| self.extra.get(name))
    }

    /// Declared fields that hold a value
    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    /// Attributes the type does not declare
    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// True when nothing but the id is known
    pub fn is_reference(&self) -> bool {
        self.fields.is_empty() && self.extra.is_empty()
    }

    /// Replace a field value after validating it. `Value::Null` clears the
    /// field. On error the entity is left unchanged.
    pub fn set(&mut self, registry: &UriRegistry, name: &str, value: impl Into<Value>) -> Result<()> {
        let mut errors = ValidationErrors::new(self.type_name.clone());
        let mut updated = self.clone();
        updated.assign(registry, name.to_string(), value.into(), &mut errors);

        if let Some(spec) = registry.field(&self.type_name, name) {
            if spec.required && !updated.fields.contains_key(name) && errors.is_empty() {
                errors.push(name, "field required");
            }
        }
        errors.into_result()?;

        *self = updated;
        Ok(())
    }

    /// Append a value: an empty field takes it as is, a scalar becomes a
    /// two-element list, a list grows. Single-valued fields only accept a
    /// value while empty.
    pub fn push(&mut self, registry: &UriRegistry, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let merged = match self.get(name) {
            None => value,
            Some(current) => {
                if let Some(spec) = registry.field(&self.type_name, name) {
                    if spec.cardinality == Cardinality::One {
                        let mut errors = ValidationErrors::new(self.type_name.clone());
                        errors.push(name, "field holds a single value");
                        return errors.into_result();
                    }
                }
                let mut items = current.items().to_vec();
                items.extend(value.items().iter().cloned());
                Value::List(items)
            }
        };
        self.set(registry, name, merged)
    }

    /// Declared fields in declaration order (inherited first), then extra
    /// attributes. With `exclude_empty`, unset fields are omitted; otherwise
    /// they appear as `Value::Null`.
    pub fn fields_with_values<'a>(&'a self, registry: &'a UriRegistry, exclude_empty: bool) -> Vec<(&'a str, &'a Value)> {
        let mut out = Vec::new();
        for spec in registry.all_fields(&self.type_name) {
            match self.fields.get(&spec.name) {
                Some(v) if !(exclude_empty && v.is_empty()) => out.push((spec.name.as_str(), v)),
                Some(_) => {}
                None if !exclude_empty => out.push((spec.name.as_str(), &NULL)),
                None => {}
            }
        }
        for (name, v) in &self.extra {
            if !(exclude_empty && v.is_empty()) {
                out.push((name.as_str(), v));
            }
        }
        out
    }

    /// Plain record: `{"@type": ..., "@id": ..., field: value, ...}` with
    /// nested entities as nested records.
    pub fn to_record(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("@type".to_string(), serde_json::Value::String(self.type_name.clone()));
        if let Some(id) = &self.id {
            map.insert("@id".to_string(), serde_json::Value::String(id.to_string()));
        }
        for (name, value) in self.fields.iter().chain(self.extra.iter()) {
            map.insert(name.clone(), value.to_json());
        }
        serde_json::Value::Object(map)
    }

    /// Build an entity from a plain record (`field -> value`, plus optional
    /// `id`/`@id`). Nested objects become nested entities of the type named
    /// by their `@type`, or of the field's first candidate type.
    pub fn from_record(registry: &UriRegistry, type_name: &str, record: &serde_json::Value) -> Result<Self> {
        let map = record.as_object().ok_or_else(|| {
            OgmError::Parse(format!("record for {} must be a JSON object", type_name))
        })?;

        let mut errors = ValidationErrors::new(type_name);
        let mut id = None;
        let mut values = Vec::new();

        for (key, json) in map {
            match key.as_str() {
                "@type" => {}
                "id" | "@id" => match json.as_str().map(EntityId::parse) {
                    Some(Ok(parsed)) => id = Some(parsed),
                    Some(Err(e)) => errors.push("id", e.to_string()),
                    None if json.is_null() => {}
                    None => errors.push("id", "expected a string"),
                },
                _ => {
                    let kind = registry.field(type_name, key).map(|f| &f.kind);
                    match record_value(registry, kind, json) {
                        Ok(v) => values.push((key.clone(), v)),
                        Err(msg) => errors.push(key.clone(), msg),
                    }
                }
            }
        }

        if !errors.is_empty() {
            return Err(OgmError::Validation(errors));
        }
        Entity::new(registry, type_name, id, values)
    }
}

fn record_value(registry: &UriRegistry, kind: Option<&FieldKind>, json: &serde_json::Value) -> std::result::Result<Value, String> {
    match json {
        serde_json::Value::Object(map) => {
            let declared = map.get("@type").and_then(|t| t.as_str());
            let candidates = kind.map(|k| k.candidates()).unwrap_or(&[]);

            let type_name = match declared {
                Some(t) if registry.contains_type(t) => t.to_string(),
                _ => candidates
                    .first()
                    .cloned()
                    .ok_or_else(|| "nested object has no registered @type".to_string())?,
            };
            Entity::from_record(registry, &type_name, json)
                .map(Value::from)
                .map_err(|e| e.to_string())
        }
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| record_value(registry, kind, item))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::List),
        scalar => Value::from_json_scalar(scalar).ok_or_else(|| "unsupported value".to_string()),
    }
}

/// Incremental construction; validation happens in `build`
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    type_name: String,
    id: Option<String>,
    values: Vec<(String, Value)>,
}

impl EntityBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.push((name.into(), value.into()));
        self
    }

    pub fn build(self, registry: &UriRegistry) -> Result<Entity> {
        let id = match self.id.as_deref().map(EntityId::parse) {
            Some(Ok(id)) => Some(id),
            Some(Err(e)) => {
                let mut errors = ValidationErrors::new(self.type_name.clone());
                errors.push("id", e.to_string());
                return Err(OgmError::Validation(errors));
            }
            None => None,
        };
        Entity::new(registry, &self.type_name, id, self.values)
    }
}
