//! JSON-LD Wire Format Contract Tests
//!
//! These tests verify the shape of encoded documents. Other JSON-LD tools
//! (pyld, rdflib, jsonld.js) read what we write, so the layout is a
//! protocol, not an implementation detail.

use pivmeta_core::jsonld::Context;
use pivmeta_core::ontology::register_builtin;
use pivmeta_core::{
    ContextMode, Decoder, EncodeOptions, Encoder, Entity, Source, StaticLoader, UriRegistry, Value,
};
use serde_json::Value as Json;

const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

fn builtin_registry() -> UriRegistry {
    let mut registry = UriRegistry::new();
    register_builtin(&mut registry).unwrap();
    registry
}

fn encoder(registry: &UriRegistry, context: ContextMode, single_root: bool) -> Encoder<'_> {
    Encoder::with_options(
        registry,
        EncodeOptions {
            context: Some(context),
            single_root,
        },
    )
}

fn sample_dataset(registry: &UriRegistry) -> Entity {
    let creator = Entity::builder("Person")
        .id("https://orcid.org/0000-0001-8729-0482")
        .set("firstName", "Matthias")
        .build(registry)
        .unwrap();
    Entity::builder("Dataset")
        .id("https://example.org/datasets/1")
        .set("title", "Vortex ring")
        .set("keyword", Value::List(vec!["piv".into(), "vortex".into()]))
        .set("creator", creator)
        .set("created", "2024-05-01T12:00:00Z")
        .set("nickname", "ring")
        .build(registry)
        .unwrap()
}

/// WHY: Every key of an encoded node must expand with the document's own context
/// REASON: Consumers resolve predicates only through the embedded @context
/// BREAKS: Triples are silently dropped by every JSON-LD processor
#[test]
fn every_predicate_expands_with_embedded_context() {
    let registry = builtin_registry();
    let document = encoder(&registry, ContextMode::Inline, false)
        .encode_one(&sample_dataset(&registry))
        .unwrap();

    let mut context = Context::default();
    context
        .process(&document["@context"], &StaticLoader::new())
        .unwrap();

    for node in document["@graph"].as_array().unwrap() {
        for key in node.as_object().unwrap().keys() {
            if key.starts_with('@') {
                continue;
            }
            let iri = context.expand_iri(key, true);
            assert!(
                iri.as_deref().is_some_and(|i| i.starts_with("http")),
                "predicate '{}' does not expand to an absolute IRI",
                key
            );
        }
    }
}

/// WHY: @context is the first member of the document
/// REASON: Streaming processors read the context before any node
/// BREAKS: Streaming consumers and human readers of large documents
#[test]
fn context_is_first_member() {
    let registry = builtin_registry();
    for single_root in [false, true] {
        let document = encoder(&registry, ContextMode::Inline, single_root)
            .encode_one(&sample_dataset(&registry))
            .unwrap();
        let first = document.as_object().unwrap().keys().next().unwrap();
        assert_eq!(first, "@context");
    }
}

/// WHY: Entities with IRI ids appear once at the top level, referenced elsewhere
/// REASON: Shared nodes (a person on many datasets) must not be duplicated
/// BREAKS: Decoders see conflicting copies of one node
#[test]
fn iri_identified_children_are_lifted() {
    let registry = builtin_registry();
    let document = encoder(&registry, ContextMode::Inline, false)
        .encode_one(&sample_dataset(&registry))
        .unwrap();

    let graph = document["@graph"].as_array().unwrap();
    assert_eq!(graph.len(), 2);
    assert_eq!(graph[0]["@type"], "dcat:Dataset");
    assert_eq!(
        graph[0]["dcterms:creator"],
        serde_json::json!({"@id": "https://orcid.org/0000-0001-8729-0482"})
    );
    assert_eq!(graph[1]["@id"], "https://orcid.org/0000-0001-8729-0482");
    assert_eq!(graph[1]["@type"], "prov:Person");
}

/// WHY: Values keep JSON-native shapes
/// REASON: Timestamps are typed RFC 3339 values, lists are arrays, extras use `local:`
/// BREAKS: Round trips through third-party tools
#[test]
fn value_shapes() {
    let registry = builtin_registry();
    let document = encoder(&registry, ContextMode::Inline, false)
        .encode_one(&sample_dataset(&registry))
        .unwrap();
    let node = &document["@graph"][0];

    assert_eq!(
        node["dcterms:created"],
        serde_json::json!({"@value": "2024-05-01T12:00:00+00:00", "@type": XSD_DATE_TIME})
    );
    assert_eq!(node["dcat:keyword"], serde_json::json!(["piv", "vortex"]));
    assert_eq!(node["local:nickname"], "ring");
    assert_eq!(document["@context"]["local"], "http://example.com/");
}

/// WHY: Non-finite floats become typed value objects
/// REASON: JSON has no literal for NaN or infinity
/// BREAKS: Encoding fails or writes `null` for legitimate measurements
#[test]
fn non_finite_floats_are_typed_values() {
    let registry = builtin_registry();
    let variable = Entity::builder("NumericalVariable")
        .set("hasMaximumValue", f64::INFINITY)
        .build(&registry)
        .unwrap();

    let document = encoder(&registry, ContextMode::Inline, false)
        .encode_one(&variable)
        .unwrap();
    assert_eq!(
        document["@graph"][0]["m4i:hasMaximumValue"],
        serde_json::json!({"@value": "INF", "@type": XSD_DOUBLE})
    );

    let decoded = Decoder::new(&registry, &StaticLoader::new())
        .decode(&Source::Json(document), "NumericalVariable")
        .unwrap();
    assert!(matches!(
        decoded[0].get("hasMaximumValue"),
        Some(Value::Float(f)) if f.is_infinite() && f.is_sign_positive()
    ));
}

/// WHY: Entities without an id get a blank node token
/// REASON: Every node needs an @id so references stay unambiguous
/// BREAKS: Nodes merge or split differently in other processors
#[test]
fn anonymous_entities_get_blank_ids() {
    let registry = builtin_registry();
    let person = Entity::builder("Person").set("firstName", "Ann").build(&registry).unwrap();

    let document = encoder(&registry, ContextMode::Inline, false)
        .encode_one(&person)
        .unwrap();
    let id = document["@graph"][0]["@id"].as_str().unwrap();
    assert!(id.starts_with("_:"));
    assert!(id.len() > 2);
}

/// WHY: The single-root form merges the node into the document
/// REASON: Small documents (one setup, one person) are commonly written this way
/// BREAKS: Readers that expect a flat object
#[test]
fn single_root_form_decodes() {
    let registry = builtin_registry();
    let person = Entity::builder("Person")
        .id("https://orcid.org/0000-0002-0000-0001")
        .set("firstName", "Ann")
        .build(&registry)
        .unwrap();

    let document = encoder(&registry, ContextMode::Inline, true)
        .encode_one(&person)
        .unwrap();
    assert!(document.get("@graph").is_none());
    assert_eq!(document["@id"], "https://orcid.org/0000-0002-0000-0001");
    assert_eq!(document["foaf:firstName"], "Ann");

    let decoded = Decoder::new(&registry, &StaticLoader::new())
        .decode(&Source::Json(document), "Person")
        .unwrap();
    assert_eq!(decoded, vec![person]);
}

/// WHY: External mode imports the shared context and binds only the used prefixes
/// REASON: Keeps documents small while staying self-sufficient for used prefixes
/// BREAKS: Documents that reference prefixes the import does not define
#[test]
fn external_context_binds_used_prefixes() {
    let registry = builtin_registry();
    let url = "https://example.org/contexts/pivmeta.jsonld";
    let person = Entity::builder("Person").set("firstName", "Ann").build(&registry).unwrap();

    let document = encoder(&registry, ContextMode::External(url.to_string()), false)
        .encode_one(&person)
        .unwrap();
    let context = document["@context"].as_object().unwrap();

    assert_eq!(context["@import"], url);
    assert_eq!(context["foaf"], "http://xmlns.com/foaf/0.1/");
    assert_eq!(context["prov"], "http://www.w3.org/ns/prov#");
    assert!(!context.contains_key("dcat"));
    assert!(context.values().all(Json::is_string));
}
