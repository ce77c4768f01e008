/**
 * decoder module
 *
 * JSON-LD document -> typed entities:
 * 1. load the source and expand it into a GraphStore (registry prefixes,
 *    then the caller's context, then the document's own @context)
 * 2. select every triple about every node typed as the target type
 * 3. per node, map predicates back to fields, fold repeated predicates in
 *    first-seen order, coerce literals and materialize nested entities
 * 4. construct and validate the entity
 *
 * Bulk decoding is lenient: a node that fails is skipped and recorded in
 * `DecodeOutcome::errors`. With `strict` the first failure is returned.
 */

mod literal;

use std::collections::HashSet;

use oxigraph::model::vocab::rdf;
use oxigraph::model::{NamedNode, Subject, Term};
use tracing::{debug, warn};

use crate::cache::DocumentLoader;
use crate::errors::{OgmError, Result};
use crate::graph::{term_to_subject, Description, GraphStore};
use crate::jsonld::{expand, Context, Source};
use crate::model::{coerce_scalar, Entity, EntityId, Value};
use crate::namespace::{is_valid_field_name, local_name, UriRegistry};
use crate::schema::{Cardinality, FieldKind, FieldSpec};

pub use literal::literal_value;

#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    /// Fail on the first node that cannot be decoded
    pub strict: bool,
    /// Stop after this many entities
    pub limit: Option<usize>,
    /// Context applied before the document's own `@context`
    pub context: Option<serde_json::Value>,
}

/// A node that could not be decoded
#[derive(Debug)]
pub struct NodeError {
    pub subject: String,
    pub error: OgmError,
}

#[derive(Debug, Default)]
pub struct DecodeOutcome {
    pub entities: Vec<Entity>,
    pub errors: Vec<NodeError>,
}

impl DecodeOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct Decoder<'a> {
    registry: &'a UriRegistry,
    loader: &'a dyn DocumentLoader,
    options: DecodeOptions,
}

impl<'a> Decoder<'a> {
    pub fn new(registry: &'a UriRegistry, loader: &'a dyn DocumentLoader) -> Self {
        Self {
            registry,
            loader,
            options: DecodeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse `source` into a graph under the active context
    pub fn load_graph(&self, source: &Source) -> Result<GraphStore> {
        let document = source.load(self.loader)?;

        let mut context = Context::from_registry(self.registry);
        if let Some(extra) = &self.options.context {
            context.process(extra, self.loader)?;
        }

        let mut graph = GraphStore::new()?;
        expand(&document, &context, self.loader, &mut graph)?;
        debug!("Loaded {} triple(s)", graph.len());
        Ok(graph)
    }

    /// Every decodable instance of `type_name` in `source`
    pub fn decode(&self, source: &Source, type_name: &str) -> Result<Vec<Entity>> {
        Ok(self.decode_outcome(source, type_name)?.entities)
    }

    /// Like `decode`, also returning the nodes that were skipped
    pub fn decode_outcome(&self, source: &Source, type_name: &str) -> Result<DecodeOutcome> {
        if !self.registry.contains_type(type_name) {
            return Err(OgmError::UnknownType(type_name.to_string()));
        }
        let graph = self.load_graph(source)?;
        self.decode_graph(&graph, type_name)
    }

    /// First decodable instance of `type_name`, if any
    pub fn query_one(&self, source: &Source, type_name: &str) -> Result<Option<Entity>> {
        let decoder = Decoder {
            registry: self.registry,
            loader: self.loader,
            options: DecodeOptions {
                limit: Some(1),
                ..self.options.clone()
            },
        };
        Ok(decoder.decode(source, type_name)?.into_iter().next())
    }

    pub fn decode_graph(&self, graph: &GraphStore, type_name: &str) -> Result<DecodeOutcome> {
        if !self.registry.contains_type(type_name) {
            return Err(OgmError::UnknownType(type_name.to_string()));
        }

        let type_iri = self.registry.instance_type_iri(type_name);
        let mut outcome = DecodeOutcome::default();

        for (subject, description) in graph.describe_type(&type_iri)? {
            if self.options.limit.is_some_and(|limit| outcome.entities.len() >= limit) {
                break;
            }

            let mut visiting = HashSet::new();
            match self.materialize(graph, type_name, &subject, &description, &mut visiting) {
                Ok(entity) => outcome.entities.push(entity),
                Err(error) if self.options.strict => return Err(error),
                Err(error) => {
                    warn!("Skipping {} node {}: {}", type_name, subject, error);
                    outcome.errors.push(NodeError {
                        subject: subject.to_string(),
                        error,
                    });
                }
            }
        }

        debug!(
            "Decoded {} {} entit(ies), skipped {}",
            outcome.entities.len(),
            type_name,
            outcome.errors.len()
        );
        Ok(outcome)
    }

    fn materialize(
        &self,
        graph: &GraphStore,
        type_name: &str,
        subject: &Subject,
        description: &Description,
        visiting: &mut HashSet<Subject>,
    ) -> Result<Entity> {
        visiting.insert(subject.clone());

        // field -> values in first-seen order
        let mut grouped: Vec<(String, Vec<Value>)> = Vec::new();

        for (predicate, object) in description {
            if predicate.as_ref() == rdf::TYPE {
                continue;
            }

            let (name, spec) = match self.registry.resolve_inverse(type_name, predicate.as_str()) {
                Some(name) => {
                    let spec = self.registry.field(type_name, &name);
                    (name, spec)
                }
                None => {
                    let name = local_name(predicate.as_str()).to_string();
                    if !is_valid_field_name(&name) || self.registry.field(type_name, &name).is_some() {
                        debug!("Ignoring <{}> on {}: no usable field name", predicate, type_name);
                        continue;
                    }
                    (name, None)
                }
            };

            let values = self.object_values(graph, &name, spec, object, visiting)?;
            match grouped.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) => existing.extend(values),
                None => grouped.push((name, values)),
            }
        }

        visiting.remove(subject);

        let mut fields = Vec::with_capacity(grouped.len());
        for (name, values) in grouped {
            let cardinality = self.registry.field(type_name, &name).map(|f| f.cardinality);
            let value = fold(&name, cardinality, values)?;
            fields.push((name, value));
        }

        Entity::new(self.registry, type_name, Some(subject_id(subject)), fields)
    }

    fn object_values(
        &self,
        graph: &GraphStore,
        field: &str,
        spec: Option<&FieldSpec>,
        object: &Term,
        visiting: &mut HashSet<Subject>,
    ) -> Result<Vec<Value>> {
        if let Term::Literal(literal) = object {
            let value = literal_value(literal);
            return match spec {
                Some(spec) => Ok(vec![self.coerce(spec, value, literal.value())?]),
                None => Ok(vec![value]),
            };
        }

        let is_nil = matches!(object, Term::NamedNode(n) if n.as_ref() == rdf::NIL);
        if matches!(object, Term::BlankNode(_)) || is_nil {
            if let Some(items) = graph.list_items(object)? {
                let mut values = Vec::with_capacity(items.len());
                for item in &items {
                    values.extend(self.object_values(graph, field, spec, item, visiting)?);
                }
                return Ok(values);
            }
        }

        let Some(node) = term_to_subject(object) else {
            return Err(OgmError::coercion(field, object, "unsupported RDF term"));
        };

        match spec.map(|s| &s.kind) {
            Some(FieldKind::Entity(candidates)) => {
                Ok(vec![Value::from(self.nested(graph, candidates, &node, visiting)?)])
            }
            Some(FieldKind::Any) | None => match self.registered_type(graph, &node)? {
                Some(type_name) => {
                    Ok(vec![Value::from(self.nested(graph, &[type_name], &node, visiting)?)])
                }
                None => Ok(vec![match &node {
                    Subject::NamedNode(n) => Value::Iri(n.as_str().to_string()),
                    other => Value::String(other.to_string()),
                }]),
            },
            Some(_) => match &node {
                Subject::NamedNode(n) => {
                    let spec = spec.ok_or_else(|| OgmError::coercion(field, n, "no field"))?;
                    Ok(vec![self.coerce(spec, Value::Iri(n.as_str().to_string()), n.as_str())?])
                }
                other => Err(OgmError::coercion(
                    field,
                    other,
                    "a blank node cannot stand for a scalar value",
                )),
            },
        }
    }

    fn coerce(&self, spec: &FieldSpec, value: Value, lexical: &str) -> Result<Value> {
        coerce_scalar(self.registry, &spec.kind, value)
            .map_err(|reason| OgmError::coercion(&spec.name, lexical, reason))
    }

    /// Entity for a node referenced from a field whose kind lists
    /// `candidates`. An `rdf:type` naming a candidate (or one of its
    /// subtypes) wins; otherwise the first candidate. Nodes with nothing
    /// but a type, and cycles, become id-only references.
    fn nested(
        &self,
        graph: &GraphStore,
        candidates: &[String],
        node: &Subject,
        visiting: &mut HashSet<Subject>,
    ) -> Result<Entity> {
        let declared = graph
            .types_of(node)?
            .into_iter()
            .filter_map(|t| self.registry.type_for_iri(t.as_str()).map(str::to_string))
            .find(|t| candidates.iter().any(|c| self.registry.is_subtype(t, c)));

        let type_name = declared
            .or_else(|| candidates.first().cloned())
            .ok_or_else(|| OgmError::coercion(&node.to_string(), node, "no candidate entity type"))?;

        if visiting.contains(node) {
            return Ok(Entity::reference(type_name, subject_id(node)));
        }

        let description = graph.describe(node)?;
        if description.iter().all(|(p, _)| p.as_ref() == rdf::TYPE) {
            return Ok(Entity::reference(type_name, subject_id(node)));
        }
        self.materialize(graph, &type_name, node, &description, visiting)
    }

    fn registered_type(&self, graph: &GraphStore, node: &Subject) -> Result<Option<String>> {
        Ok(graph
            .types_of(node)?
            .iter()
            .find_map(|t: &NamedNode| self.registry.type_for_iri(t.as_str()))
            .map(str::to_string))
    }
}

/// Apply the field's cardinality to its collected values. Undeclared
/// fields behave like `OneOrMany`.
fn fold(name: &str, cardinality: Option<Cardinality>, mut values: Vec<Value>) -> Result<Value> {
    match cardinality {
        Some(Cardinality::Many) => Ok(Value::List(values)),
        Some(Cardinality::One) if values.len() > 1 => Err(OgmError::coercion(
            name,
            format!("{} values", values.len()),
            "field holds a single value",
        )),
        _ if values.len() == 1 => Ok(values.pop().unwrap_or(Value::Null)),
        _ => Ok(Value::List(values)),
    }
}

fn subject_id(subject: &Subject) -> EntityId {
    match subject {
        Subject::NamedNode(n) => EntityId::iri(n.as_str()),
        Subject::BlankNode(b) => EntityId::blank(b.as_str()),
        #[allow(unreachable_patterns)]
        _ => EntityId::fresh(),
    }
}

/// Decode every instance of `type_name` from `source`
pub fn decode(
    registry: &UriRegistry,
    source: &Source,
    type_name: &str,
    options: &DecodeOptions,
    loader: &dyn DocumentLoader,
) -> Result<Vec<Entity>> {
    Decoder::new(registry, loader)
        .with_options(options.clone())
        .decode(source, type_name)
}

pub fn query_one(
    registry: &UriRegistry,
    source: &Source,
    type_name: &str,
    loader: &dyn DocumentLoader,
) -> Result<Option<Entity>> {
    Decoder::new(registry, loader).query_one(source, type_name)
}
