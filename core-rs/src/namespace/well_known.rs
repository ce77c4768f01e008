//! Namespaces of the vocabularies the built-in types are drawn from

pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const PROV: &str = "http://www.w3.org/ns/prov#";
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
pub const DCAT: &str = "http://www.w3.org/ns/dcat#";
pub const DCTERMS: &str = "http://purl.org/dc/terms/";
pub const SCHEMA: &str = "https://schema.org/";
pub const M4I: &str = "http://w3id.org/nfdi4ing/metadata4ing#";
pub const SSNO: &str = "https://matthiasprobst.github.io/ssno#";
pub const PIVMETA: &str = "https://matthiasprobst.github.io/pivmeta#";
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
pub const QUDT_UNIT: &str = "http://qudt.org/vocab/unit/";

/// Reserved prefix for fields that no ontology maps
pub const LOCAL_PREFIX: &str = "local";
pub const LOCAL: &str = "http://example.com/";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Prefix bindings registered by `UriRegistry::with_well_known`
pub const WELL_KNOWN: &[(&str, &str)] = &[
    ("owl", OWL),
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("xsd", XSD),
    ("prov", PROV),
    ("foaf", FOAF),
    ("dcat", DCAT),
    ("dcterms", DCTERMS),
    ("schema", SCHEMA),
    ("m4i", M4I),
    ("ssno", SSNO),
    ("pivmeta", PIVMETA),
    ("skos", SKOS),
    ("unit", QUDT_UNIT),
    (LOCAL_PREFIX, LOCAL),
];
