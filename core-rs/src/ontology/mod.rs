/**
 * ontology module
 *
 * Built-in entity types for PIV metadata, drawn from:
 * - agents: owl:Thing, prov:Agent/Person/Organization (FOAF properties)
 * - dcat: dcat:Resource/Dataset/Distribution (DCTERMS properties)
 * - m4i: Metadata4Ing variables, methods, tools and processing steps
 * - piv: SSNO standard names and the pivmeta vocabulary
 *
 * Every type keeps the default `ExtraFields::Allow` policy.
 */

pub mod agents;
pub mod dcat;
pub mod m4i;
pub mod piv;

use crate::errors::Result;
use crate::namespace::UriRegistry;
use crate::schema::TypeSchema;

/// Built-in schemas, parents before children
pub fn builtin_schemas() -> Vec<TypeSchema> {
    vec![
        agents::thing(),
        agents::agent(),
        agents::person(),
        agents::organization(),
        dcat::resource(),
        dcat::distribution(),
        dcat::dataset(),
        m4i::variable(),
        m4i::numerical_variable(),
        m4i::text_variable(),
        m4i::method(),
        m4i::tool(),
        m4i::processing_step(),
        piv::standard_name(),
        piv::standard_name_table(),
        piv::piv_distribution(),
        piv::piv_image_distribution(),
        piv::piv_mask_distribution(),
        piv::piv_result_distribution(),
        piv::piv_processing_step(),
        piv::piv_setup(),
        piv::laser(),
        piv::temporal_variable(),
    ]
}

/// Register the well-known namespaces and every built-in type.
///
/// Idempotent; namespaces already bound to another IRI are rebound.
pub fn register_builtin(registry: &mut UriRegistry) -> Result<()> {
    for (prefix, iri) in crate::namespace::well_known::WELL_KNOWN {
        registry.register_namespace(prefix, iri)?;
    }
    for schema in builtin_schemas() {
        registry.register_type(schema)?;
    }
    Ok(())
}
