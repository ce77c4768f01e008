//! URI Registry Contract Tests
//!
//! These tests pin down INVARIANTS of predicate resolution that documents in
//! the wild depend on. Changing any of them silently changes the IRIs that
//! encoded metadata carries.

use pivmeta_core::ontology::register_builtin;
use pivmeta_core::{
    Entity, FieldKind, FieldSpec, OgmError, Predicate, TypeSchema, UriRegistry,
};

fn builtin_registry() -> UriRegistry {
    let mut registry = UriRegistry::new();
    register_builtin(&mut registry).unwrap();
    registry
}

/// WHY: A namespace is the base every compact predicate expands against
/// REASON: A relative base would produce relative predicate IRIs
/// BREAKS: Every document that uses the prefix
#[test]
fn namespace_base_must_be_absolute() {
    let mut registry = UriRegistry::new();

    let err = registry.register_namespace("bad", "example.org/ns#").unwrap_err();
    assert!(matches!(err, OgmError::InvalidNamespace(_)));
    assert!(registry.namespace("bad").is_none());

    registry.register_namespace("good", "https://example.org/ns#").unwrap();
    registry
        .register_type(TypeSchema::new("Foo").uri("Foo", "good:Foo"))
        .unwrap();
    assert_eq!(registry.type_iri("Foo").as_deref(), Some("https://example.org/ns#Foo"));
}

/// WHY: Unbound prefixes are rejected when the mapping is registered
/// REASON: Failing at encode time would surface far from the faulty schema
/// BREAKS: Schema authors lose the error at the line that caused it
#[test]
fn unbound_prefix_is_rejected_at_registration() {
    let mut registry = UriRegistry::new();
    let err = registry
        .register_type(
            TypeSchema::new("Sample")
                .field(FieldSpec::new("mass", FieldKind::Float))
                .uri("mass", "nowhere:mass"),
        )
        .unwrap_err();
    assert!(matches!(err, OgmError::InvalidNamespace(_)));
    assert!(!registry.contains_type("Sample"));
}

/// WHY: Mapping keys must name the type or one of its fields
/// REASON: A typo in a key would otherwise leave the real field on `local:`
/// BREAKS: Silent loss of the intended predicate
#[test]
fn mapping_unknown_field_is_rejected() {
    let mut registry = builtin_registry();
    let err = registry
        .register_type_mapping("Person", &[("fristName", "foaf:firstName")])
        .unwrap_err();
    assert!(matches!(
        err,
        OgmError::UnknownFieldRegistration { ref type_name, ref field }
            if type_name == "Person" && field == "fristName"
    ));
}

/// WHY: Subtypes inherit their ancestors' predicates
/// REASON: PivImageDistribution is a dcat:Distribution and must speak DCAT
/// BREAKS: Generic DCAT consumers no longer see media types or sizes
#[test]
fn predicates_are_inherited() {
    let registry = builtin_registry();
    assert_eq!(
        registry.resolve_iri("PivImageDistribution", "mediaType").unwrap(),
        "http://www.w3.org/ns/dcat#mediaType"
    );
    assert_eq!(
        registry.resolve_iri("Person", "label").unwrap(),
        "http://www.w3.org/2000/01/rdf-schema#label"
    );
}

/// WHY: A subtype may remap an inherited field without touching its parent
/// REASON: m4i variables describe themselves with hasVariableDescription
/// BREAKS: Either the parent or the subtype emits the wrong predicate
#[test]
fn subtype_override_does_not_leak_to_parent() {
    let mut registry = builtin_registry();
    registry
        .register_type(
            TypeSchema::new("Sample")
                .parent("Thing")
                .field(FieldSpec::new("description", FieldKind::String))
                .uri("description", "dcterms:description"),
        )
        .unwrap();
    registry
        .register_type(
            TypeSchema::new("Specimen")
                .parent("Sample")
                .uri("description", "schema:description"),
        )
        .unwrap();

    assert_eq!(registry.resolve("Specimen", "description").to_string(), "schema:description");
    assert_eq!(registry.resolve("Sample", "description").to_string(), "dcterms:description");
    assert_eq!(
        registry.resolve_inverse("Specimen", "http://purl.org/dc/terms/description"),
        None
    );
}

/// WHY: Unmapped fields fall back to the reserved `local` namespace
/// REASON: Resolution never fails, so encoding never drops a value
/// BREAKS: Extra attributes vanish from encoded documents
#[test]
fn unknown_field_falls_back_to_local() {
    let registry = builtin_registry();
    assert_eq!(registry.resolve("Person", "shoeSize"), Predicate::compact("local", "shoeSize"));
    assert_eq!(
        registry.resolve_iri("Person", "shoeSize").unwrap(),
        "http://example.com/shoeSize"
    );
}

/// WHY: Entities reject values their declared kinds cannot hold
/// REASON: Every violation is reported at once, keyed by field
/// BREAKS: Users fix one field per run
#[test]
fn construction_reports_every_violation() {
    let registry = builtin_registry();
    let err = Entity::builder("Distribution")
        .set("byteSize", "large")
        .set("downloadURL", "not/absolute")
        .build(&registry)
        .unwrap_err();

    let violations = err.violations().unwrap();
    assert_eq!(violations.len(), 2);
    assert!(violations.fields().contains(&"byteSize"));
    assert!(violations.fields().contains(&"downloadURL"));
}
