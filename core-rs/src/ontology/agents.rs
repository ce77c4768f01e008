//! owl:Thing and the PROV/FOAF agent hierarchy

use crate::schema::{FieldKind, FieldSpec, TypeSchema};

pub fn thing() -> TypeSchema {
    TypeSchema::new("Thing")
        .field(FieldSpec::new("label", FieldKind::String))
        .uri("Thing", "owl:Thing")
        .uri("label", "rdfs:label")
}

pub fn agent() -> TypeSchema {
    TypeSchema::new("Agent")
        .parent("Thing")
        .field(FieldSpec::new("mbox", FieldKind::Email))
        .uri("Agent", "prov:Agent")
        .uri("mbox", "foaf:mbox")
}

pub fn person() -> TypeSchema {
    TypeSchema::new("Person")
        .parent("Agent")
        .field(FieldSpec::new("firstName", FieldKind::String))
        .field(FieldSpec::new("lastName", FieldKind::String))
        .field(FieldSpec::new("orcidId", FieldKind::Iri))
        .field(FieldSpec::new("affiliation", FieldKind::entity("Organization")))
        .uri("Person", "prov:Person")
        .uri("firstName", "foaf:firstName")
        .uri("lastName", "foaf:lastName")
        .uri("orcidId", "m4i:orcidId")
        .uri("affiliation", "schema:affiliation")
}

pub fn organization() -> TypeSchema {
    TypeSchema::new("Organization")
        .parent("Agent")
        .field(FieldSpec::new("name", FieldKind::String))
        .field(FieldSpec::new("url", FieldKind::Iri))
        .field(FieldSpec::new("hasRorId", FieldKind::Iri))
        .uri("Organization", "prov:Organization")
        .uri("name", "foaf:name")
        .uri("url", "schema:url")
        .uri("hasRorId", "m4i:hasRorId")
}
