//! Integration tests for encode -> decode round trips
//!
//! Entities are encoded to JSON-LD and decoded back with the same registry:
//! - Agents with nested organizations
//! - Datasets with multi-valued and union-typed fields
//! - Timestamps, floats and IRIs
//! - Types without a type mapping
//! - Documents written to disk

use chrono::{TimeZone, Utc};
use pivmeta_core::ontology::register_builtin;
use pivmeta_core::{
    ContextMode, Decoder, EncodeOptions, Encoder, Entity, EntityId, FieldKind, FieldSpec, Source,
    StaticLoader, TypeSchema, UriRegistry, Value,
};
use tempfile::TempDir;

fn builtin_registry() -> UriRegistry {
    let mut registry = UriRegistry::new();
    register_builtin(&mut registry).unwrap();
    registry
}

fn inline(registry: &UriRegistry) -> Encoder<'_> {
    Encoder::with_options(
        registry,
        EncodeOptions {
            context: Some(ContextMode::Inline),
            single_root: false,
        },
    )
}

fn roundtrip(registry: &UriRegistry, entities: &[Entity], type_name: &str) -> Vec<Entity> {
    let document = inline(registry).encode(entities).unwrap();
    let loader = StaticLoader::new();
    Decoder::new(registry, &loader)
        .decode(&Source::Json(document), type_name)
        .unwrap()
}

#[test]
fn test_person_with_affiliation_roundtrip() {
    let registry = builtin_registry();

    let lab = Entity::builder("Organization")
        .id("https://ror.org/04t3en479")
        .set("name", "Karlsruhe Institute of Technology")
        .set("hasRorId", "https://ror.org/04t3en479")
        .build(&registry)
        .unwrap();
    let person = Entity::builder("Person")
        .id("https://orcid.org/0000-0001-8729-0482")
        .set("firstName", "Matthias")
        .set("lastName", "Probst")
        .set("mbox", "matthias.probst@kit.edu")
        .set("affiliation", lab.clone())
        .build(&registry)
        .unwrap();

    let decoded = roundtrip(&registry, &[person.clone()], "Person");

    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0], person);
    assert_eq!(decoded[0].id(), person.id());

    let affiliation = decoded[0].get("affiliation").unwrap().as_entity().unwrap();
    assert_eq!(affiliation, &lab);
    assert_eq!(
        affiliation.id().and_then(EntityId::as_iri),
        Some("https://ror.org/04t3en479")
    );
}

#[test]
fn test_dataset_with_creators_and_keywords_roundtrip() {
    let registry = builtin_registry();

    let alice = Entity::builder("Person")
        .set("firstName", "Alice")
        .build(&registry)
        .unwrap();
    let lab = Entity::builder("Organization")
        .set("name", "Fluid Lab")
        .build(&registry)
        .unwrap();
    let dataset = Entity::builder("Dataset")
        .id("https://example.org/datasets/piv-challenge")
        .set("title", "PIV challenge case A")
        .set("keyword", "piv")
        .set("creator", Value::List(vec![alice.into(), lab.into()]))
        .set("license", "https://creativecommons.org/licenses/by/4.0/")
        .build(&registry)
        .unwrap();

    let decoded = roundtrip(&registry, &[dataset.clone()], "Dataset");

    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0], dataset);

    // Many-valued fields stay lists even with a single element
    assert_eq!(decoded[0].get("keyword"), Some(&Value::List(vec![Value::from("piv")])));

    let creators = decoded[0].get("creator").unwrap().items();
    assert_eq!(creators.len(), 2);
    assert_eq!(creators[0].as_entity().unwrap().type_name(), "Person");
    assert_eq!(creators[1].as_entity().unwrap().type_name(), "Organization");
    assert!(creators[0].as_entity().unwrap().id().unwrap().is_blank());
}

#[test]
fn test_processing_step_scalars_roundtrip() {
    let registry = builtin_registry();

    let window = Entity::builder("NumericalVariable")
        .id("https://example.org/vars/window")
        .set("hasNumericalValue", 32.0)
        .set("hasMinimumValue", 16)
        .set("hasUnit", "pixel")
        .build(&registry)
        .unwrap();
    let method = Entity::builder("Method")
        .id("https://example.org/methods/multi-pass")
        .set("description", "multi-pass cross-correlation")
        .set("hasParameter", window)
        .build(&registry)
        .unwrap();
    let step = Entity::builder("ProcessingStep")
        .id("https://example.org/steps/1")
        .set("startTime", Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap())
        .set("endTime", "2024-03-01T10:00:00+01:00")
        .set("realizesMethod", method)
        .build(&registry)
        .unwrap();

    let decoded = roundtrip(&registry, &[step.clone()], "ProcessingStep");

    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0], step);

    let method = decoded[0].get("realizesMethod").unwrap().as_entity().unwrap();
    let parameter = method.get("hasParameter").unwrap().as_entity().unwrap();
    assert_eq!(parameter.get("hasNumericalValue"), Some(&Value::Float(32.0)));
    assert_eq!(parameter.get("hasMinimumValue"), Some(&Value::Float(16.0)));
}

#[test]
fn test_many_roots_share_a_lifted_node() {
    let registry = builtin_registry();

    let lab = Entity::builder("Organization")
        .id("https://ror.org/lab")
        .set("name", "Lab")
        .build(&registry)
        .unwrap();
    let people: Vec<Entity> = ["Ann", "Ben"]
        .iter()
        .map(|name| {
            Entity::builder("Person")
                .set("firstName", *name)
                .set("affiliation", lab.clone())
                .build(&registry)
                .unwrap()
        })
        .collect();

    let document = inline(&registry).encode(&people).unwrap();
    let graph = document["@graph"].as_array().unwrap();
    assert_eq!(graph.len(), 3);

    let loader = StaticLoader::new();
    let decoder = Decoder::new(&registry, &loader);
    let decoded = decoder.decode(&Source::Json(document.clone()), "Person").unwrap();
    assert_eq!(decoded, people);

    let labs = decoder.decode(&Source::Json(document), "Organization").unwrap();
    assert_eq!(labs, vec![lab]);
}

#[test]
fn test_unmapped_type_roundtrip() {
    let mut registry = UriRegistry::new();
    registry
        .register_type(
            TypeSchema::new("Note")
                .field(FieldSpec::new("text", FieldKind::String))
                .field(FieldSpec::new("page", FieldKind::Integer)),
        )
        .unwrap();

    let note = Entity::builder("Note")
        .set("text", "seeding density too low")
        .set("page", 3)
        .build(&registry)
        .unwrap();

    let document = inline(&registry).encode_one(&note).unwrap();
    assert_eq!(document["@context"]["@vocab"], registry.namespace("local").unwrap());
    assert_eq!(document["@graph"][0]["@type"], "Note");

    let loader = StaticLoader::new();
    let decoded = Decoder::new(&registry, &loader)
        .decode(&Source::Json(document), "Note")
        .unwrap();
    assert_eq!(decoded, vec![note]);
}

#[test]
fn test_extra_fields_roundtrip_on_allowing_types() {
    let registry = builtin_registry();

    let person = Entity::builder("Person")
        .set("firstName", "John")
        .set("nickname", "JD")
        .build(&registry)
        .unwrap();

    let decoded = roundtrip(&registry, &[person.clone()], "Person");
    assert_eq!(decoded[0].extra().get("nickname"), Some(&Value::from("JD")));
    assert_eq!(decoded[0], person);
}

#[test]
fn test_extra_timestamp_roundtrip() {
    let registry = builtin_registry();
    let recorded = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

    let person = Entity::builder("Person")
        .set("firstName", "John")
        .set("recordedAt", recorded)
        .build(&registry)
        .unwrap();

    let decoded = roundtrip(&registry, &[person.clone()], "Person");
    assert!(matches!(
        decoded[0].get("recordedAt"),
        Some(Value::DateTime(dt)) if dt.timestamp() == recorded.timestamp()
    ));
    assert_eq!(decoded, vec![person]);
}

#[test]
fn test_file_roundtrip() {
    let registry = builtin_registry();
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("setup.jsonld");

    let laser = Entity::builder("Laser")
        .id("https://example.org/laser/nd-yag")
        .set("label", "Nd:YAG double-pulse laser")
        .build(&registry)
        .unwrap();

    inline(&registry).encode_to_file(&[laser.clone()], &path).unwrap();

    let loader = StaticLoader::new();
    let decoded = Decoder::new(&registry, &loader)
        .decode(&Source::File(path), "Laser")
        .unwrap();
    assert_eq!(decoded, vec![laser]);
}
