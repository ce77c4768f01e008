/**
 * registry.rs
 * Process-wide table of namespace bindings and per-type predicate mappings
 *
 * Namespaces: prefix -> absolute base IRI (last writer wins)
 * Types:      name -> schema + own {field_or_type_name: predicate} pairs
 *
 * Lookups walk the ancestor chain most-specific first, so a subtype's own
 * pairs shadow inherited ones without mutating the ancestors. Fields that no
 * ancestor maps resolve to `local:<field>`.
 */

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::iri::{is_absolute_iri, is_valid_prefix};
use super::predicate::Predicate;
use super::well_known::{LOCAL, LOCAL_PREFIX, WELL_KNOWN};
use crate::errors::{OgmError, Result};
use crate::schema::{ExtraFields, FieldSpec, TypeSchema};

static GLOBAL_REGISTRY: Lazy<RwLock<UriRegistry>> =
    Lazy::new(|| RwLock::new(UriRegistry::with_well_known()));

/// Shared read access to the process-wide registry
pub fn global() -> RwLockReadGuard<'static, UriRegistry> {
    GLOBAL_REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}

/// Exclusive access for registration; serializes concurrent writers
pub fn global_mut() -> RwLockWriteGuard<'static, UriRegistry> {
    GLOBAL_REGISTRY.write().unwrap_or_else(PoisonError::into_inner)
}

/// Register the built-in vocabulary types into the process-wide registry.
///
/// Safe to call repeatedly; registration is idempotent.
pub fn init_builtin() -> Result<()> {
    let mut registry = global_mut();
    crate::ontology::register_builtin(&mut registry)
}

/// Drop every registration and start over from the well-known namespaces.
/// Intended for test isolation.
pub fn reset() {
    *global_mut() = UriRegistry::with_well_known();
}

#[derive(Debug, Clone)]
struct TypeEntry {
    schema: TypeSchema,
    mapping: Vec<(String, Predicate)>,
}

/// Namespace and predicate lookup table
#[derive(Debug, Clone)]
pub struct UriRegistry {
    namespaces: BTreeMap<String, String>,
    types: BTreeMap<String, TypeEntry>,
}

impl Default for UriRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UriRegistry {
    /// Empty registry; only the reserved `local` prefix is bound
    pub fn new() -> Self {
        let mut namespaces = BTreeMap::new();
        namespaces.insert(LOCAL_PREFIX.to_string(), LOCAL.to_string());
        Self {
            namespaces,
            types: BTreeMap::new(),
        }
    }

    /// Registry with the common vocabulary prefixes (foaf, prov, dcat, m4i, ...)
    pub fn with_well_known() -> Self {
        let mut registry = Self::new();
        for (prefix, iri) in WELL_KNOWN {
            registry.namespaces.insert(prefix.to_string(), iri.to_string());
        }
        registry
    }

    // ---------------------------------------------------------------------
    // Namespaces
    // ---------------------------------------------------------------------

    /// Bind `prefix` to `iri`, replacing any previous binding
    pub fn register_namespace(&mut self, prefix: &str, iri: &str) -> Result<()> {
        if !is_valid_prefix(prefix) {
            return Err(OgmError::InvalidNamespace(format!(
                "'{}' is not a valid prefix",
                prefix
            )));
        }
        if !is_absolute_iri(iri) {
            return Err(OgmError::InvalidNamespace(format!(
                "{} -> {} (base IRI must be absolute)",
                prefix, iri
            )));
        }

        if let Some(previous) = self.namespaces.insert(prefix.to_string(), iri.to_string()) {
            if previous != iri {
                debug!("Namespace '{}' rebound: {} -> {}", prefix, previous, iri);
            }
        }
        Ok(())
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(|s| s.as_str())
    }

    /// All prefix bindings, sorted by prefix
    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    // ---------------------------------------------------------------------
    // Types
    // ---------------------------------------------------------------------

    /// Register a type schema together with its declared predicate pairs.
    ///
    /// Parents must already be registered. Every mapping key must name the
    /// type itself or a declared/inherited field, and every compact
    /// predicate must use a bound prefix. Nothing is stored unless all
    /// checks pass. Registering an identical schema again is a no-op.
    pub fn register_type(&mut self, schema: TypeSchema) -> Result<()> {
        if let Some(existing) = self.types.get(&schema.name) {
            if existing.schema == schema {
                return Ok(());
            }
            debug!("Re-registering type '{}'", schema.name);
        }

        for parent in &schema.parents {
            if !self.types.contains_key(parent) || parent == &schema.name {
                return Err(OgmError::UnknownType(format!(
                    "{} (parent of {})",
                    parent, schema.name
                )));
            }
        }

        let pairs: Vec<(&str, &str)> = schema
            .uri_refs
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let mapping = self.parse_mapping(&schema, &pairs)?;

        debug!(
            "Registered type '{}' ({} fields, {} predicates)",
            schema.name,
            schema.fields.len(),
            mapping.len()
        );
        self.types
            .insert(schema.name.clone(), TypeEntry { schema, mapping });
        Ok(())
    }

    /// Add or replace predicate pairs on an already registered type.
    ///
    /// Only the type's own entries change; ancestors are untouched.
    pub fn register_type_mapping(&mut self, type_name: &str, pairs: &[(&str, &str)]) -> Result<()> {
        let schema = self
            .types
            .get(type_name)
            .map(|entry| entry.schema.clone())
            .ok_or_else(|| OgmError::UnknownType(type_name.to_string()))?;

        let parsed = self.parse_mapping(&schema, pairs)?;

        if let Some(entry) = self.types.get_mut(type_name) {
            for (key, predicate) in parsed {
                match entry.mapping.iter_mut().find(|(k, _)| *k == key) {
                    Some(slot) => slot.1 = predicate,
                    None => entry.mapping.push((key, predicate)),
                }
            }
        }
        Ok(())
    }

    fn parse_mapping(&self, schema: &TypeSchema, pairs: &[(&str, &str)]) -> Result<Vec<(String, Predicate)>> {
        let mut parsed = Vec::with_capacity(pairs.len());

        for (key, raw) in pairs {
            let known = *key == schema.name
                || schema.own_field(key).is_some()
                || schema.parents.iter().any(|p| self.field(p, key).is_some());
            if !known {
                return Err(OgmError::UnknownFieldRegistration {
                    type_name: schema.name.clone(),
                    field: key.to_string(),
                });
            }

            let predicate = Predicate::parse(raw)?;
            if let Some(prefix) = predicate.prefix() {
                if !self.namespaces.contains_key(prefix) {
                    return Err(OgmError::InvalidNamespace(format!(
                        "prefix '{}' used by {}.{} is not registered",
                        prefix, schema.name, key
                    )));
                }
            }
            parsed.push((key.to_string(), predicate));
        }
        Ok(parsed)
    }

    pub fn contains_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn schema(&self, type_name: &str) -> Option<&TypeSchema> {
        self.types.get(type_name).map(|e| &e.schema)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|k| k.as_str())
    }

    /// The type followed by its ancestors, nearest first, each listed once
    pub fn ancestors(&self, type_name: &str) -> Vec<&str> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([type_name]);

        while let Some(name) = queue.pop_front() {
            let Some((key, entry)) = self.types.get_key_value(name) else {
                continue;
            };
            if !seen.insert(key.as_str()) {
                continue;
            }
            order.push(key.as_str());
            queue.extend(entry.schema.parents.iter().map(|p| p.as_str()));
        }
        order
    }

    pub fn is_subtype(&self, type_name: &str, ancestor: &str) -> bool {
        self.ancestors(type_name).contains(&ancestor)
    }

    /// Field declaration visible on `type_name`, subtype first
    pub fn field(&self, type_name: &str, field: &str) -> Option<&FieldSpec> {
        self.ancestors(type_name)
            .into_iter()
            .filter_map(|t| self.types.get(t))
            .find_map(|e| e.schema.own_field(field))
    }

    /// Every field visible on `type_name`: inherited fields first, in
    /// declaration order, with subtype redeclarations replacing them in place
    pub fn all_fields(&self, type_name: &str) -> Vec<&FieldSpec> {
        let mut fields: Vec<&FieldSpec> = Vec::new();
        for t in self.ancestors(type_name).into_iter().rev() {
            let Some(entry) = self.types.get(t) else {
                continue;
            };
            for spec in &entry.schema.fields {
                match fields.iter_mut().find(|f| f.name == spec.name) {
                    Some(slot) => *slot = spec,
                    None => fields.push(spec),
                }
            }
        }
        fields
    }

    pub fn extra_policy(&self, type_name: &str) -> ExtraFields {
        self.schema(type_name).map(|s| s.extra).unwrap_or_default()
    }

    // ---------------------------------------------------------------------
    // Resolution
    // ---------------------------------------------------------------------

    /// Predicate for `field` on `type_name`.
    ///
    /// Never fails: fields that no ancestor maps become `local:<field>`.
    pub fn resolve(&self, type_name: &str, field: &str) -> Predicate {
        for t in self.ancestors(type_name) {
            if let Some(entry) = self.types.get(t) {
                if let Some((_, predicate)) =
                    entry.mapping.iter().find(|(k, _)| k == field && k != t)
                {
                    return predicate.clone();
                }
            }
        }
        Predicate::compact(LOCAL_PREFIX, field)
    }

    /// Full IRI for `field` on `type_name`
    pub fn resolve_iri(&self, type_name: &str, field: &str) -> Result<String> {
        self.expand(&self.resolve(type_name, field))
    }

    /// The type's own RDF type predicate; not inherited
    pub fn type_predicate(&self, type_name: &str) -> Option<&Predicate> {
        self.types
            .get(type_name)?
            .mapping
            .iter()
            .find(|(k, _)| k == type_name)
            .map(|(_, p)| p)
    }

    pub fn type_iri(&self, type_name: &str) -> Option<String> {
        self.type_predicate(type_name)
            .and_then(|p| self.expand(p).ok())
    }

    /// `rdf:type` of instances of `type_name`: its own type predicate, or
    /// the bare type name in the local namespace
    pub fn instance_type_iri(&self, type_name: &str) -> String {
        self.type_iri(type_name).unwrap_or_else(|| {
            format!("{}{}", self.namespace(LOCAL_PREFIX).unwrap_or(LOCAL), type_name)
        })
    }

    /// Registered type whose own type predicate expands to `iri`
    pub fn type_for_iri(&self, iri: &str) -> Option<&str> {
        self.types
            .keys()
            .find(|name| self.type_iri(name).as_deref() == Some(iri))
            .map(|s| s.as_str())
    }

    /// Expand a predicate to a full IRI using the bound namespaces
    pub fn expand(&self, predicate: &Predicate) -> Result<String> {
        match predicate {
            Predicate::Absolute(iri) => Ok(iri.clone()),
            Predicate::Compact { prefix, local } => self
                .namespace(prefix)
                .map(|base| format!("{}{}", base, local))
                .ok_or_else(|| {
                    OgmError::InvalidNamespace(format!("prefix '{}' is not registered", prefix))
                }),
        }
    }

    /// Field name that `iri` maps to on `type_name`, or `None` when the type
    /// does not declare it.
    ///
    /// Subtype remappings win: an inherited predicate for a field the subtype
    /// maps elsewhere does not resolve back to that field.
    pub fn resolve_inverse(&self, type_name: &str, iri: &str) -> Option<String> {
        let mut shadowed: HashSet<&str> = HashSet::new();

        for t in self.ancestors(type_name) {
            let Some(entry) = self.types.get(t) else {
                continue;
            };
            for (key, predicate) in &entry.mapping {
                if key == t || !shadowed.insert(key.as_str()) {
                    continue;
                }
                if self.expand(predicate).ok().as_deref() == Some(iri) {
                    return Some(key.clone());
                }
            }
        }

        let local_base = self.namespace(LOCAL_PREFIX)?;
        let candidate = iri.strip_prefix(local_base)?;
        if shadowed.contains(candidate) {
            return None;
        }
        self.field(type_name, candidate).map(|f| f.name.clone())
    }
}
