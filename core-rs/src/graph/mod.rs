//! In-memory RDF graph used by the decoder
//!
//! Documents are expanded into a `GraphStore` (an oxigraph `Store` that also
//! remembers insertion order) and queried with `SparqlQuery` builders.

pub mod query;
pub mod store;

pub use query::SparqlQuery;
pub use store::{term_to_subject, Description, GraphStore};
