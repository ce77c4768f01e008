//! # pivmeta-core - PIV metadata object-graph mapping
//!
//! Typed ontology entities (persons, datasets, PIV setups, standard names, ...)
//! with a JSON-LD codec over an RDF graph.
//!
//! ## Core Principle
//!
//! **Field names are local, predicates are global**: every entity type maps
//! its field names to namespace-qualified predicates through the URI
//! registry. Encoding writes those predicates into a JSON-LD document;
//! decoding expands any compatible JSON-LD document into triples and maps
//! the predicates back onto fields.
//!
//! ## Architecture
//!
//! ```text
//!            ┌───────────────────────────┐
//!            │  namespace::UriRegistry   │
//!            │  prefixes, type mappings  │
//!            └───────────────────────────┘
//!               ▲                     ▲
//!               │                     │
//!   ┌───────────┴─────────┐   ┌───────┴──────────────┐
//!   │ jsonld::Encoder     │   │ decoder::Decoder     │
//!   │ Entity -> JSON-LD   │   │ JSON-LD -> Graph ->  │
//!   │                     │   │ Entity               │
//!   └─────────────────────┘   └──────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use pivmeta_core::{Entity, Encoder, UriRegistry};
//!
//! let mut registry = UriRegistry::new();
//! pivmeta_core::ontology::register_builtin(&mut registry).unwrap();
//!
//! let person = Entity::builder("Person")
//!     .id("https://orcid.org/0000-0001-8729-0482")
//!     .set("firstName", "Matthias")
//!     .build(&registry)
//!     .unwrap();
//!
//! let doc = Encoder::new(&registry).encode_one(&person).unwrap();
//! assert_eq!(doc["@graph"][0]["foaf:firstName"], "Matthias");
//! ```

pub mod errors;
pub mod namespace;
pub mod schema;
pub mod model;
pub mod ontology;
pub mod graph;
pub mod jsonld;
pub mod decoder;
pub mod cache;
pub mod config;

pub use errors::{OgmError, ValidationErrors};
pub use namespace::{init_builtin, Predicate, UriRegistry};
pub use schema::{Cardinality, ExtraFields, FieldKind, FieldSpec, TypeSchema};
pub use model::{Entity, EntityBuilder, EntityId, Value};
pub use graph::GraphStore;
pub use jsonld::{ContextMode, EncodeOptions, Encoder, Source};
pub use decoder::{decode, query_one, DecodeOptions, DecodeOutcome, Decoder};
pub use cache::{CachingLoader, DocumentLoader, StaticLoader};
pub use config::CodecConfig;

/// Version of the pivmeta ontology the built-in types follow
pub const VERSION: &str = "0.4.0";
