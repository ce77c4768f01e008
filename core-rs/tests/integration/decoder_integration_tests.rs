//! Integration tests for decoding third-party JSON-LD
//!
//! Tests documents that were not written by the encoder:
//! - Remote contexts with term definitions
//! - Inline text sources and list containers
//! - Typed and language-tagged values
//! - Blank node cross references
//! - Lenient vs strict handling of invalid nodes

use pivmeta_core::ontology::register_builtin;
use pivmeta_core::{
    DecodeOptions, Decoder, OgmError, Source, StaticLoader, UriRegistry, Value,
};
use serde_json::json;

const CONTEXT_URL: &str = "https://example.org/contexts/people.jsonld";

fn builtin_registry() -> UriRegistry {
    let mut registry = UriRegistry::new();
    register_builtin(&mut registry).unwrap();
    registry
}

fn people_context() -> serde_json::Value {
    json!({"@context": {
        "prov": "http://www.w3.org/ns/prov#",
        "foaf": "http://xmlns.com/foaf/0.1/",
        "m4i": "http://w3id.org/nfdi4ing/metadata4ing#",
        "Person": "prov:Person",
        "firstName": "foaf:firstName",
        "lastName": {"@id": "foaf:lastName"},
        "orcid": {"@id": "m4i:orcidId", "@type": "@id"}
    }})
}

#[test]
fn test_remote_context_terms() {
    let registry = builtin_registry();
    let loader = StaticLoader::new().with(CONTEXT_URL, people_context());

    let document = json!({
        "@context": CONTEXT_URL,
        "@id": "https://orcid.org/0000-0002-1825-0097",
        "@type": "Person",
        "firstName": "Jane",
        "lastName": "Doe",
        "orcid": "https://orcid.org/0000-0002-1825-0097"
    });

    let people = Decoder::new(&registry, &loader)
        .decode(&Source::Json(document), "Person")
        .unwrap();

    assert_eq!(people.len(), 1);
    assert_eq!(people[0].get("firstName"), Some(&Value::from("Jane")));
    assert_eq!(people[0].get("lastName"), Some(&Value::from("Doe")));
    assert_eq!(
        people[0].get("orcidId"),
        Some(&Value::Iri("https://orcid.org/0000-0002-1825-0097".to_string()))
    );
}

#[test]
fn test_missing_remote_context_is_retryable() {
    let registry = builtin_registry();
    let loader = StaticLoader::new();

    let err = Decoder::new(&registry, &loader)
        .decode(
            &Source::Json(json!({"@context": CONTEXT_URL, "@type": "Person"})),
            "Person",
        )
        .unwrap_err();
    assert!(err.is_retryable());
}

#[test]
fn test_text_source_with_list_container() {
    let registry = builtin_registry();
    let loader = StaticLoader::new();

    let text = r#"{
        "@context": {"kw": {"@id": "dcat:keyword", "@container": "@list"}},
        "@type": "dcat:Dataset",
        "dcterms:title": {"@value": "Kanalströmung", "@language": "de"},
        "kw": ["turbulence", "channel flow", "piv"]
    }"#;

    let datasets = Decoder::new(&registry, &loader)
        .decode(&Source::detect(text), "Dataset")
        .unwrap();

    assert_eq!(datasets.len(), 1);
    assert_eq!(datasets[0].get("title"), Some(&Value::from("Kanalströmung")));
    assert_eq!(
        datasets[0].get("keyword"),
        Some(&Value::List(vec![
            Value::from("turbulence"),
            Value::from("channel flow"),
            Value::from("piv"),
        ]))
    );
}

#[test]
fn test_invalid_text_source() {
    let registry = builtin_registry();
    let loader = StaticLoader::new();

    let err = Decoder::new(&registry, &loader)
        .decode(&Source::detect("{\"@type\": "), "Person")
        .unwrap_err();
    assert!(matches!(err, OgmError::Parse(_)));
}

#[test]
fn test_typed_literals() {
    let registry = builtin_registry();
    let loader = StaticLoader::new();

    let document = json!({
        "@type": "pivmeta:PivImageDistribution",
        "dcat:mediaType": "image/tiff",
        "dcat:byteSize": {"@value": "1048576", "@type": "xsd:integer"},
        "pivmeta:imageBitDepth": 12,
        "dcterms:created": {"@value": "2024-01-15T08:00:00Z", "@type": "xsd:dateTime"},
        "dcat:downloadURL": {"@id": "https://example.org/data/img_0001.tif"}
    });

    let images = Decoder::new(&registry, &loader)
        .decode(&Source::Json(document), "PivImageDistribution")
        .unwrap();

    let image = &images[0];
    assert_eq!(
        image.get("mediaType"),
        Some(&Value::Iri("https://www.iana.org/assignments/media-types/image/tiff".to_string()))
    );
    assert_eq!(image.get("byteSize"), Some(&Value::Integer(1_048_576)));
    assert_eq!(image.get("imageBitDepth"), Some(&Value::Integer(12)));
    assert!(matches!(image.get("created"), Some(Value::DateTime(_))));
    assert_eq!(
        image.get("downloadURL"),
        Some(&Value::Iri("https://example.org/data/img_0001.tif".to_string()))
    );
}

#[test]
fn test_blank_node_cross_reference() {
    let registry = builtin_registry();
    let loader = StaticLoader::new();

    let document = json!({"@graph": [
        {"@id": "local:p", "@type": "prov:Person", "foaf:firstName": "Ann", "schema:affiliation": {"@id": "_:org"}},
        {"@id": "_:org", "@type": "prov:Organization", "foaf:name": "Fluid Lab"}
    ]});

    let people = Decoder::new(&registry, &loader)
        .decode(&Source::Json(document), "Person")
        .unwrap();

    assert_eq!(people.len(), 1);
    assert!(people[0].id().unwrap().is_blank());
    let lab = people[0].get("affiliation").unwrap().as_entity().unwrap();
    assert_eq!(lab.type_name(), "Organization");
    assert_eq!(lab.get("name"), Some(&Value::from("Fluid Lab")));
}

#[test]
fn test_only_exact_type_is_selected() {
    let registry = builtin_registry();
    let loader = StaticLoader::new();

    let document = json!({"@graph": [
        {"@type": "dcat:Dataset", "dcat:distribution": [
            {"@type": "pivmeta:PivImageDistribution", "pivmeta:numberOfRecords": 100},
            {"@type": "pivmeta:PivMaskDistribution", "pivmeta:filenamePattern": "mask_*.png"}
        ]}
    ]});

    let decoder = Decoder::new(&registry, &loader);
    let images = decoder
        .decode(&Source::Json(document.clone()), "PivImageDistribution")
        .unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].get("numberOfRecords"), Some(&Value::Integer(100)));

    let datasets = decoder.decode(&Source::Json(document), "Dataset").unwrap();
    let distributions = datasets[0].get("distribution").unwrap().items();
    assert_eq!(distributions.len(), 2);
    assert_eq!(distributions[0].as_entity().unwrap().type_name(), "PivImageDistribution");
    assert_eq!(distributions[1].as_entity().unwrap().type_name(), "PivMaskDistribution");
}

#[test]
fn test_standard_names_lenient_and_strict() {
    let registry = builtin_registry();
    let loader = StaticLoader::new();

    let document = json!({"@graph": [
        {"@id": "https://example.org/sn/x_velocity", "@type": "ssno:StandardName",
         "ssno:standardName": "x_velocity", "ssno:unit": {"@id": "unit:M-PER-SEC"}},
        {"@id": "https://example.org/sn/unnamed", "@type": "ssno:StandardName",
         "ssno:description": "missing its name"}
    ]});

    let outcome = Decoder::new(&registry, &loader)
        .decode_outcome(&Source::Json(document.clone()), "StandardName")
        .unwrap();

    assert!(!outcome.is_clean());
    assert_eq!(outcome.entities.len(), 1);
    assert_eq!(
        outcome.entities[0].get("unit"),
        Some(&Value::Iri("http://qudt.org/vocab/unit/M-PER-SEC".to_string()))
    );
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].subject.contains("https://example.org/sn/unnamed"));
    let violations = outcome.errors[0].error.violations().unwrap();
    assert_eq!(violations.fields(), vec!["standardName"]);

    let strict = Decoder::new(&registry, &loader)
        .with_options(DecodeOptions {
            strict: true,
            ..DecodeOptions::default()
        })
        .decode(&Source::Json(document), "StandardName");
    assert!(matches!(strict, Err(OgmError::Validation(_))));
}
