/**
 * store.rs
 * In-memory triple store used while decoding one document
 *
 * oxigraph does not keep insertion order, but decoding folds repeated
 * predicates into lists in first-seen order. The store therefore records
 * the position at which each quad was first inserted and every read sorts
 * by it.
 */

use std::collections::{HashMap, HashSet};

use oxigraph::model::vocab::rdf;
use oxigraph::model::{GraphName, NamedNode, Quad, Subject, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use tracing::debug;

use super::query::SparqlQuery;
use crate::errors::{OgmError, Result};

/// Triples about one subject: `(predicate, object)` in first-seen order
pub type Description = Vec<(NamedNode, Term)>;

pub struct GraphStore {
    store: Store,
    positions: HashMap<Quad, usize>,
    next: usize,
}

impl GraphStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            store: Store::new()?,
            positions: HashMap::new(),
            next: 0,
        })
    }

    /// Insert a triple into the default graph. Returns false if it was
    /// already present.
    pub fn insert(&mut self, subject: Subject, predicate: NamedNode, object: Term) -> Result<bool> {
        let quad = Quad::new(subject, predicate, object, GraphName::DefaultGraph);
        let inserted = self.store.insert(&quad)?;
        if inserted {
            self.positions.insert(quad, self.next);
            self.next += 1;
        }
        Ok(inserted)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn position(&self, subject: &Subject, predicate: &NamedNode, object: &Term) -> usize {
        let quad = Quad::new(subject.clone(), predicate.clone(), object.clone(), GraphName::DefaultGraph);
        self.positions.get(&quad).copied().unwrap_or(usize::MAX)
    }

    /// Execute SPARQL query
    pub fn query_sparql(&self, query: &str) -> Result<Vec<HashMap<String, Term>>> {
        let results = self.store.query(query)?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();

                for solution in solutions {
                    let solution = solution?;

                    let mut row = HashMap::new();

                    for (var, term) in solution.iter() {
                        row.insert(var.as_str().to_string(), term.clone());
                    }

                    rows.push(row);
                }

                Ok(rows)
            }
            QueryResults::Boolean(result) => {
                let mut row = HashMap::new();
                row.insert("result".to_string(), Term::from(oxigraph::model::Literal::from(result)));
                Ok(vec![row])
            }
            QueryResults::Graph(_) => Err(OgmError::Store(
                "CONSTRUCT/DESCRIBE queries are not supported".to_string(),
            )),
        }
    }

    /// Every instance of `type_iri` with all of its triples, subjects in the
    /// order they were first seen.
    pub fn describe_type(&self, type_iri: &str) -> Result<Vec<(Subject, Description)>> {
        let type_node = NamedNode::new(type_iri)
            .map_err(|e| OgmError::Store(format!("invalid type IRI '{}': {}", type_iri, e)))?;
        let rows = self.query_sparql(SparqlQuery::describe_instances(type_node.as_ref()).as_str())?;

        let mut triples = Vec::with_capacity(rows.len());
        for row in rows {
            let (Some(s), Some(Term::NamedNode(p)), Some(o)) = (row.get("s"), row.get("p"), row.get("o")) else {
                continue;
            };
            let Some(subject) = term_to_subject(s) else {
                continue;
            };
            let position = self.position(&subject, p, o);
            triples.push((position, subject, p.clone(), o.clone()));
        }
        triples.sort_by_key(|(position, ..)| *position);

        let mut order: Vec<Subject> = Vec::new();
        let mut grouped: HashMap<Subject, Description> = HashMap::new();
        for (_, subject, predicate, object) in triples {
            grouped
                .entry(subject.clone())
                .or_insert_with(|| {
                    order.push(subject);
                    Vec::new()
                })
                .push((predicate, object));
        }

        debug!("{} instance(s) of <{}>", order.len(), type_iri);
        Ok(order
            .into_iter()
            .filter_map(|s| grouped.remove(&s).map(|d| (s, d)))
            .collect())
    }

    pub fn count_instances(&self, type_iri: &str) -> Result<usize> {
        let type_node = NamedNode::new(type_iri)
            .map_err(|e| OgmError::Store(format!("invalid type IRI '{}': {}", type_iri, e)))?;
        let rows = self.query_sparql(SparqlQuery::count_instances(type_node.as_ref()).as_str())?;

        Ok(rows
            .first()
            .and_then(|row| row.get("count"))
            .and_then(|term| match term {
                Term::Literal(lit) => lit.value().parse().ok(),
                _ => None,
            })
            .unwrap_or(0))
    }

    /// All triples with `subject`, in first-seen order
    pub fn describe(&self, subject: &Subject) -> Result<Description> {
        let mut triples = Vec::new();
        for quad in self.store.quads_for_pattern(Some(subject.as_ref()), None, None, None) {
            let quad = quad?;
            let position = self.positions.get(&quad).copied().unwrap_or(usize::MAX);
            triples.push((position, quad.predicate, quad.object));
        }
        triples.sort_by_key(|(position, ..)| *position);
        Ok(triples.into_iter().map(|(_, p, o)| (p, o)).collect())
    }

    /// `rdf:type` objects of `subject`, in first-seen order
    pub fn types_of(&self, subject: &Subject) -> Result<Vec<NamedNode>> {
        Ok(self
            .describe(subject)?
            .into_iter()
            .filter(|(p, _)| p.as_ref() == rdf::TYPE)
            .filter_map(|(_, o)| match o {
                Term::NamedNode(n) => Some(n),
                _ => None,
            })
            .collect())
    }

    /// Items of the RDF collection headed by `head`, or `None` when `head`
    /// is not a well-formed list.
    pub fn list_items(&self, head: &Term) -> Result<Option<Vec<Term>>> {
        let mut items = Vec::new();
        let mut seen = HashSet::new();
        let mut current = head.clone();

        loop {
            if let Term::NamedNode(n) = &current {
                if n.as_ref() == rdf::NIL {
                    return Ok(Some(items));
                }
            }
            let Some(subject) = term_to_subject(&current) else {
                return Ok(None);
            };
            if !seen.insert(subject.clone()) {
                return Ok(None);
            }

            let description = self.describe(&subject)?;
            let first = description.iter().find(|(p, _)| p.as_ref() == rdf::FIRST);
            let rest = description.iter().find(|(p, _)| p.as_ref() == rdf::REST);
            match (first, rest) {
                (Some((_, f)), Some((_, r))) => {
                    items.push(f.clone());
                    current = r.clone();
                }
                _ => return Ok(None),
            }
        }
    }
}

/// A node term as a triple subject; literals have no subject form
pub fn term_to_subject(term: &Term) -> Option<Subject> {
    match term {
        Term::NamedNode(n) => Some(Subject::NamedNode(n.clone())),
        Term::BlankNode(b) => Some(Subject::BlankNode(b.clone())),
        _ => None,
    }
}
