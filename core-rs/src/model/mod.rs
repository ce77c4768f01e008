//! Entity model
//!
//! Typed in-memory records: an optional identity (`EntityId`), a type tag
//! naming a registered `TypeSchema`, and validated field values.
//!
//! # Example
//!
//! ```
//! use pivmeta_core::model::{Entity, Value};
//! use pivmeta_core::namespace::UriRegistry;
//! use pivmeta_core::ontology;
//!
//! let mut registry = UriRegistry::with_well_known();
//! ontology::register_builtin(&mut registry).unwrap();
//!
//! let person = Entity::builder("Person")
//!     .set("firstName", "John")
//!     .set("lastName", "Doe")
//!     .build(&registry)
//!     .unwrap();
//!
//! assert_eq!(person.get("firstName"), Some(&Value::from("John")));
//! assert!(person.id().is_none());
//! ```

mod coerce;
mod entity;
mod value;

pub(crate) use coerce::coerce_scalar;
pub use coerce::{normalize_media_type, parse_datetime, IANA_MEDIA_TYPES};
pub use entity::{Entity, EntityBuilder, EntityId};
pub use value::Value;
