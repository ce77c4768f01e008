//! DCAT resources, datasets and distributions

use crate::schema::{FieldKind, FieldSpec, TypeSchema};

const AGENTS: &[&str] = &["Person", "Organization"];

pub fn resource() -> TypeSchema {
    TypeSchema::new("Resource")
        .parent("Thing")
        .field(FieldSpec::new("title", FieldKind::String))
        .field(FieldSpec::new("description", FieldKind::String))
        .field(FieldSpec::new("creator", FieldKind::union(AGENTS)).one_or_many())
        .field(FieldSpec::new("publisher", FieldKind::union(AGENTS)))
        .field(FieldSpec::new("version", FieldKind::String))
        .field(FieldSpec::new("identifier", FieldKind::Iri))
        .field(FieldSpec::new("license", FieldKind::Iri))
        .field(FieldSpec::new("keyword", FieldKind::String).many())
        .field(FieldSpec::new("created", FieldKind::DateTime))
        .field(FieldSpec::new("modified", FieldKind::DateTime))
        .uri("Resource", "dcat:Resource")
        .uri("title", "dcterms:title")
        .uri("description", "dcterms:description")
        .uri("creator", "dcterms:creator")
        .uri("publisher", "dcterms:publisher")
        .uri("version", "dcat:version")
        .uri("identifier", "dcterms:identifier")
        .uri("license", "dcterms:license")
        .uri("keyword", "dcat:keyword")
        .uri("created", "dcterms:created")
        .uri("modified", "dcterms:modified")
}

pub fn distribution() -> TypeSchema {
    TypeSchema::new("Distribution")
        .parent("Resource")
        .field(FieldSpec::new("downloadURL", FieldKind::Iri))
        .field(FieldSpec::new("accessURL", FieldKind::Iri))
        .field(FieldSpec::new("mediaType", FieldKind::MediaType))
        .field(FieldSpec::new("byteSize", FieldKind::Integer))
        .uri("Distribution", "dcat:Distribution")
        .uri("downloadURL", "dcat:downloadURL")
        .uri("accessURL", "dcat:accessURL")
        .uri("mediaType", "dcat:mediaType")
        .uri("byteSize", "dcat:byteSize")
}

pub fn dataset() -> TypeSchema {
    TypeSchema::new("Dataset")
        .parent("Resource")
        .field(FieldSpec::new("distribution", FieldKind::entity("Distribution")).one_or_many())
        .field(FieldSpec::new("landingPage", FieldKind::Iri))
        .field(FieldSpec::new("contact", FieldKind::union(AGENTS)))
        .uri("Dataset", "dcat:Dataset")
        .uri("distribution", "dcat:distribution")
        .uri("landingPage", "dcat:landingPage")
        .uri("contact", "dcat:contactPoint")
}
