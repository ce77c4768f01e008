//! Namespace bindings and predicate resolution
//!
//! Maps entity types and their field names to namespace-qualified
//! predicates (`prefix:local`), and prefixes to base IRIs.
//!
//! # Example
//!
//! ```
//! use pivmeta_core::namespace::UriRegistry;
//! use pivmeta_core::schema::{FieldKind, FieldSpec, TypeSchema};
//!
//! let mut registry = UriRegistry::new();
//! registry.register_namespace("good", "https://example.org/ns#").unwrap();
//! registry.register_type(
//!     TypeSchema::new("Foo")
//!         .field(FieldSpec::new("label", FieldKind::String))
//!         .uri("Foo", "good:Foo")
//!         .uri("label", "good:label"),
//! ).unwrap();
//!
//! assert_eq!(registry.type_iri("Foo").as_deref(), Some("https://example.org/ns#Foo"));
//! assert_eq!(registry.resolve("Foo", "label").to_string(), "good:label");
//! assert_eq!(registry.resolve("Foo", "other").to_string(), "local:other");
//! ```

pub mod iri;
pub mod predicate;
pub mod registry;
pub mod well_known;

pub use iri::{
    blank_token, is_absolute_iri, is_blank_id, is_valid_field_name, is_valid_prefix, local_name,
    split_compact,
};
pub use predicate::Predicate;
pub use registry::{global, global_mut, init_builtin, reset, UriRegistry};
pub use well_known::{LOCAL, LOCAL_PREFIX, RDF_TYPE};
