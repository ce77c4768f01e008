/**
 * query.rs
 * SPARQL query builders for the decode graph
 */

use oxigraph::model::NamedNodeRef;

pub struct SparqlQuery {
    query: String,
}

impl SparqlQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.query
    }

    /// Every triple about every instance of `type_iri`
    ///
    /// One "select everything" pattern instead of a per-field SELECT, so
    /// optional and undeclared predicates come back too.
    pub fn describe_instances(type_iri: NamedNodeRef<'_>) -> Self {
        Self::new(format!(
            r#"
            PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>

            SELECT ?s ?p ?o
            WHERE {{
                ?s rdf:type {} .
                ?s ?p ?o .
            }}
            "#,
            type_iri
        ))
    }

    /// Number of instances of `type_iri`
    pub fn count_instances(type_iri: NamedNodeRef<'_>) -> Self {
        Self::new(format!(
            r#"
            PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>

            SELECT (COUNT(DISTINCT ?s) AS ?count)
            WHERE {{
                ?s rdf:type {} .
            }}
            "#,
            type_iri
        ))
    }
}
