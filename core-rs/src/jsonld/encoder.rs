//! Entity to JSON-LD
//!
//! Every node gets an `@id` (its own, or a fresh `_:<uuid>`) and exactly one
//! `@type`. Field keys are compact predicates whose prefixes are always
//! present in the emitted `@context`. Children with a stable IRI are written
//! as `{"@id": ...}` references and lifted once to the top-level `@graph`;
//! blank children are embedded.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use serde_json::{json, Map, Number, Value as Json};
use tracing::debug;

use super::context::{default_context, ContextMode};
use crate::errors::Result;
use crate::model::{Entity, EntityId, Value};
use crate::namespace::{UriRegistry, LOCAL, LOCAL_PREFIX};

const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// `None` uses the process-wide default (see `set_default_context`)
    pub context: Option<ContextMode>,
    /// Write a lone top-level node without the `@graph` array
    pub single_root: bool,
}

pub struct Encoder<'a> {
    registry: &'a UriRegistry,
    options: EncodeOptions,
}

#[derive(Default)]
struct EncodeState {
    lifted: Vec<Map<String, Json>>,
    emitted: HashSet<String>,
    prefixes: BTreeSet<String>,
    vocab: bool,
}

impl<'a> Encoder<'a> {
    pub fn new(registry: &'a UriRegistry) -> Self {
        Self::with_options(registry, EncodeOptions::default())
    }

    pub fn with_options(registry: &'a UriRegistry, options: EncodeOptions) -> Self {
        Self { registry, options }
    }

    /// Encode `roots` (and everything they reach) into one document
    pub fn encode(&self, roots: &[Entity]) -> Result<Json> {
        let mut state = EncodeState::default();
        let mut graph = Vec::with_capacity(roots.len());

        for root in roots {
            if let Some(iri) = root.id().and_then(EntityId::as_iri) {
                if !state.emitted.insert(iri.to_string()) {
                    debug!("Skipping repeated root {}", iri);
                    continue;
                }
            }
            graph.push(Json::Object(self.node(root, &mut state)?));
        }
        graph.extend(state.lifted.drain(..).map(Json::Object));

        let context = self.context(&state);
        let mut document = Map::new();
        document.insert("@context".to_string(), context);

        if self.options.single_root && graph.len() == 1 {
            if let Some(Json::Object(node)) = graph.pop() {
                document.extend(node);
            }
        } else {
            document.insert("@graph".to_string(), Json::Array(graph));
        }
        Ok(Json::Object(document))
    }

    pub fn encode_one(&self, root: &Entity) -> Result<Json> {
        self.encode(std::slice::from_ref(root))
    }

    pub fn encode_to_string(&self, roots: &[Entity]) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.encode(roots)?)?)
    }

    pub fn encode_to_file(&self, roots: &[Entity], path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.encode_to_string(roots)?)?;
        debug!("Wrote {} root entit(ies) to {}", roots.len(), path.display());
        Ok(())
    }

    fn node(&self, entity: &Entity, state: &mut EncodeState) -> Result<Map<String, Json>> {
        let mut node = Map::new();

        let id = entity.id().cloned().unwrap_or_else(EntityId::fresh);
        node.insert("@id".to_string(), Json::String(id.to_string()));
        node.insert("@type".to_string(), self.type_token(entity.type_name(), state)?);

        for (name, value) in entity.fields_with_values(self.registry, true) {
            let predicate = self.registry.resolve(entity.type_name(), name);
            // Fails if the prefix is unbound; the output must never carry a
            // token its own context cannot expand.
            self.registry.expand(&predicate)?;
            if let Some(prefix) = predicate.prefix() {
                state.prefixes.insert(prefix.to_string());
            }
            node.insert(predicate.to_string(), self.value(value, state)?);
        }

        Ok(node)
    }

    fn type_token(&self, type_name: &str, state: &mut EncodeState) -> Result<Json> {
        match self.registry.type_predicate(type_name) {
            Some(predicate) => {
                self.registry.expand(predicate)?;
                if let Some(prefix) = predicate.prefix() {
                    state.prefixes.insert(prefix.to_string());
                }
                Ok(Json::String(predicate.to_string()))
            }
            None => {
                state.vocab = true;
                Ok(Json::String(type_name.to_string()))
            }
        }
    }

    fn value(&self, value: &Value, state: &mut EncodeState) -> Result<Json> {
        let json = match value {
            Value::Null => Json::Null,
            Value::String(s) => Json::String(s.clone()),
            Value::Integer(i) => Json::from(*i),
            Value::Float(f) => match Number::from_f64(*f) {
                Some(n) => Json::Number(n),
                None => json!({"@value": non_finite_lexical(*f), "@type": XSD_DOUBLE}),
            },
            Value::Boolean(b) => Json::Bool(*b),
            Value::DateTime(dt) => json!({"@value": dt.to_rfc3339(), "@type": XSD_DATE_TIME}),
            Value::Iri(iri) => json!({ "@id": iri }),
            Value::Entity(child) => match child.id() {
                Some(EntityId::Iri(iri)) => {
                    if state.emitted.insert(iri.clone()) {
                        let slot = state.lifted.len();
                        state.lifted.push(Map::new());
                        let node = self.node(child, state)?;
                        state.lifted[slot] = node;
                        debug!("Lifted {} to the top level", iri);
                    }
                    json!({ "@id": iri })
                }
                _ => Json::Object(self.node(child, state)?),
            },
            Value::List(items) => Json::Array(
                items
                    .iter()
                    .map(|item| self.value(item, state))
                    .collect::<Result<Vec<_>>>()?,
            ),
        };
        Ok(json)
    }

    fn context(&self, state: &EncodeState) -> Json {
        let mode = self.options.context.clone().unwrap_or_else(default_context);
        let mut context = Map::new();

        match mode {
            ContextMode::Inline => {
                for (prefix, iri) in self.registry.namespaces() {
                    context.insert(prefix.to_string(), Json::String(iri.to_string()));
                }
            }
            ContextMode::External(url) => {
                context.insert("@import".to_string(), Json::String(url));
                for prefix in &state.prefixes {
                    if let Some(iri) = self.registry.namespace(prefix) {
                        context.insert(prefix.clone(), Json::String(iri.to_string()));
                    }
                }
            }
        }

        if state.vocab {
            let local = self.registry.namespace(LOCAL_PREFIX).unwrap_or(LOCAL);
            context.insert("@vocab".to_string(), Json::String(local.to_string()));
        }
        Json::Object(context)
    }
}

fn non_finite_lexical(f: f64) -> &'static str {
    if f.is_nan() {
        "NaN"
    } else if f.is_sign_positive() {
        "INF"
    } else {
        "-INF"
    }
}
