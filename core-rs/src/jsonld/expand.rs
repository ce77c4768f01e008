//! JSON-LD document to triples
//!
//! A compacted document is walked directly against the active context and
//! every statement is inserted into a `GraphStore`. Supports `@graph`
//! envelopes, single-root documents, top-level arrays, embedded nodes,
//! node references, value objects, `@list`/`@set` and scoped `@context`s.
//! Keys that expand to no IRI are dropped.

use std::borrow::Cow;
use std::collections::HashMap;

use oxigraph::model::vocab::{rdf, xsd};
use oxigraph::model::{BlankNode, Literal, NamedNode, Subject, Term};
use serde_json::{Map, Value};
use tracing::debug;

use super::context::{Container, Context, TermDefinition};
use crate::cache::DocumentLoader;
use crate::errors::{OgmError, Result};
use crate::graph::GraphStore;
use crate::namespace::{blank_token, is_blank_id};

/// Expand `document` under `base` and insert its triples into `graph`
pub fn expand(document: &Value, base: &Context, loader: &dyn DocumentLoader, graph: &mut GraphStore) -> Result<()> {
    let mut expander = Expander {
        loader,
        graph,
        blanks: HashMap::new(),
    };

    match document {
        Value::Array(items) => {
            for item in items {
                expander.node(item, base)?;
            }
        }
        Value::Object(map) => {
            let Some(nodes) = map.get("@graph") else {
                expander.node(document, base)?;
                return Ok(());
            };

            let mut context = base.clone();
            if let Some(local) = map.get("@context") {
                context.process(local, loader)?;
            }
            match nodes {
                Value::Array(items) => {
                    for item in items {
                        expander.node(item, &context)?;
                    }
                }
                Value::Object(_) => {
                    expander.node(nodes, &context)?;
                }
                _ => return Err(OgmError::Parse("@graph must be an array or an object".to_string())),
            }
        }
        _ => {
            return Err(OgmError::Parse(
                "a JSON-LD document must be an object or an array".to_string(),
            ));
        }
    }
    Ok(())
}

struct Expander<'a> {
    loader: &'a dyn DocumentLoader,
    graph: &'a mut GraphStore,
    /// Document labels to store nodes; one document, one label space
    blanks: HashMap<String, BlankNode>,
}

impl Expander<'_> {
    fn node(&mut self, value: &Value, context: &Context) -> Result<Subject> {
        let map = value
            .as_object()
            .ok_or_else(|| OgmError::Parse(format!("expected a node object, got {}", value)))?;

        let context = match map.get("@context") {
            Some(local) => {
                let mut scoped = context.clone();
                scoped.process(local, self.loader)?;
                Cow::Owned(scoped)
            }
            None => Cow::Borrowed(context),
        };

        let subject = match map.get("@id") {
            Some(Value::String(id)) => self.subject(id, &context)?,
            Some(other) => return Err(OgmError::Parse(format!("@id must be a string, got {}", other))),
            None => Subject::from(BlankNode::default()),
        };

        if let Some(types) = map.get("@type") {
            for t in one_or_many(types) {
                let t = t
                    .as_str()
                    .ok_or_else(|| OgmError::Parse(format!("@type must be a string, got {}", t)))?;
                match context.expand_iri(t, true) {
                    Some(iri) => {
                        self.graph.insert(subject.clone(), rdf::TYPE.into_owned(), named(&iri)?.into())?;
                    }
                    None => debug!("Dropping unresolvable @type '{}'", t),
                }
            }
        }

        self.properties(&subject, map, &context)?;
        Ok(subject)
    }

    fn properties(&mut self, subject: &Subject, map: &Map<String, Value>, context: &Context) -> Result<()> {
        for (key, value) in map {
            if key.starts_with('@') {
                continue;
            }
            let Some(iri) = context.expand_iri(key, true) else {
                debug!("Dropping key '{}' with no IRI mapping", key);
                continue;
            };
            if is_blank_id(&iri) {
                debug!("Dropping blank-node predicate '{}'", key);
                continue;
            }

            let predicate = named(&iri)?;
            let definition = context.term(key);
            for object in self.objects(value, definition, context)? {
                self.graph.insert(subject.clone(), predicate.clone(), object)?;
            }
        }
        Ok(())
    }

    fn objects(&mut self, value: &Value, definition: Option<&TermDefinition>, context: &Context) -> Result<Vec<Term>> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => {
                if definition.and_then(|d| d.container.as_ref()) == Some(&Container::List) {
                    return Ok(vec![self.list(items, definition, context)?]);
                }
                let mut out = Vec::new();
                for item in items {
                    out.extend(self.objects(item, definition, context)?);
                }
                Ok(out)
            }
            Value::Object(map) => {
                if map.contains_key("@value") {
                    return Ok(self.value_object(map, context)?.into_iter().map(Term::from).collect());
                }
                if let Some(items) = map.get("@list") {
                    let items: Vec<Value> = one_or_many(items).into_iter().cloned().collect();
                    return Ok(vec![self.list(&items, definition, context)?]);
                }
                if let Some(items) = map.get("@set") {
                    return self.objects(items, definition, context);
                }
                if map.len() == 1 {
                    if let Some(Value::String(id)) = map.get("@id") {
                        return Ok(vec![self.reference(id, context, false)?]);
                    }
                }
                Ok(vec![Term::from(self.node(value, context)?)])
            }
            Value::String(s) => {
                let term = match definition.and_then(|d| d.type_mapping.as_deref()) {
                    Some("@id") => self.reference(s, context, false)?,
                    Some("@vocab") => self.reference(s, context, true)?,
                    Some(datatype) => literal(value, Some(datatype), None)?.into(),
                    None => literal(value, None, context.default_language.as_deref())?.into(),
                };
                Ok(vec![term])
            }
            scalar => {
                let datatype = definition
                    .and_then(|d| d.type_mapping.as_deref())
                    .filter(|t| !t.starts_with('@'));
                Ok(vec![literal(scalar, datatype, None)?.into()])
            }
        }
    }

    fn value_object(&mut self, map: &Map<String, Value>, context: &Context) -> Result<Option<Literal>> {
        let value = map.get("@value").unwrap_or(&Value::Null);
        if value.is_null() {
            return Ok(None);
        }
        if value.is_object() || value.is_array() {
            return Err(OgmError::Parse(format!("@value must be a scalar, got {}", value)));
        }

        let datatype = match map.get("@type") {
            Some(Value::String(t)) => Some(
                context
                    .expand_iri(t, true)
                    .ok_or_else(|| OgmError::Parse(format!("cannot expand datatype '{}'", t)))?,
            ),
            Some(other) => return Err(OgmError::Parse(format!("@type of a value must be a string, got {}", other))),
            None => None,
        };
        let language = map.get("@language").and_then(|l| l.as_str());

        literal(value, datatype.as_deref(), language).map(Some)
    }

    /// RDF collection of `items`; returns its head
    fn list(&mut self, items: &[Value], definition: Option<&TermDefinition>, context: &Context) -> Result<Term> {
        let item_definition = definition.map(|d| TermDefinition {
            container: None,
            ..d.clone()
        });

        let mut terms = Vec::new();
        for item in items {
            terms.extend(self.objects(item, item_definition.as_ref(), context)?);
        }

        let mut head = Term::from(rdf::NIL.into_owned());
        for term in terms.into_iter().rev() {
            let cell = BlankNode::default();
            self.graph.insert(cell.clone().into(), rdf::FIRST.into_owned(), term)?;
            self.graph.insert(cell.clone().into(), rdf::REST.into_owned(), head)?;
            head = cell.into();
        }
        Ok(head)
    }

    fn subject(&mut self, id: &str, context: &Context) -> Result<Subject> {
        match self.reference(id, context, false)? {
            Term::NamedNode(n) => Ok(n.into()),
            Term::BlankNode(b) => Ok(b.into()),
            other => Err(OgmError::Parse(format!("'{}' cannot be a subject", other))),
        }
    }

    /// Node term for an identifier; `_:x` and `local:x` are blank
    fn reference(&mut self, id: &str, context: &Context, vocab: bool) -> Result<Term> {
        if is_blank_id(id) {
            let token = blank_token(id).unwrap_or_default();
            if token.is_empty() {
                return Err(OgmError::Parse(format!("empty blank node id '{}'", id)));
            }
            return Ok(self.blank(token).into());
        }

        let iri = context
            .expand_iri(id, vocab)
            .ok_or_else(|| OgmError::Parse(format!("cannot resolve IRI reference '{}'", id)))?;
        Ok(named(&iri)?.into())
    }

    fn blank(&mut self, label: &str) -> BlankNode {
        self.blanks
            .entry(label.to_string())
            .or_insert_with(|| BlankNode::new(label).unwrap_or_default())
            .clone()
    }
}

fn named(iri: &str) -> Result<NamedNode> {
    NamedNode::new(iri).map_err(|e| OgmError::Parse(format!("invalid IRI '{}': {}", iri, e)))
}

fn one_or_many(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Literal for a JSON scalar; numbers and booleans get their XSD datatype
/// unless one is given
fn literal(value: &Value, datatype: Option<&str>, language: Option<&str>) -> Result<Literal> {
    let (lexical, default_datatype) = match value {
        Value::String(s) => {
            return match (datatype, language) {
                (Some(dt), _) => Ok(Literal::new_typed_literal(s.as_str(), named(dt)?)),
                (None, Some(lang)) => Literal::new_language_tagged_literal(s.as_str(), lang)
                    .map_err(|e| OgmError::Parse(format!("invalid language tag '{}': {}", lang, e))),
                (None, None) => Ok(Literal::new_simple_literal(s.as_str())),
            };
        }
        Value::Number(n) if n.is_i64() || n.is_u64() => (n.to_string(), xsd::INTEGER),
        Value::Number(n) => (
            n.as_f64().map(|f| format!("{:E}", f)).unwrap_or_else(|| n.to_string()),
            xsd::DOUBLE,
        ),
        Value::Bool(b) => (b.to_string(), xsd::BOOLEAN),
        other => return Err(OgmError::Parse(format!("expected a scalar value, got {}", other))),
    };

    let datatype = match datatype {
        Some(dt) => named(dt)?,
        None => default_datatype.into_owned(),
    };
    Ok(Literal::new_typed_literal(lexical, datatype))
}
