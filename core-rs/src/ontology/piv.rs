//! Standard names (SSNO) and the PIV-specific vocabulary

use crate::schema::{FieldKind, FieldSpec, TypeSchema};

pub fn standard_name() -> TypeSchema {
    TypeSchema::new("StandardName")
        .parent("Thing")
        .field(FieldSpec::new("standardName", FieldKind::String).required())
        .field(FieldSpec::new("unit", FieldKind::Iri))
        .field(FieldSpec::new("description", FieldKind::String))
        .field(FieldSpec::new("standardNameTable", FieldKind::entity("StandardNameTable")))
        .uri("StandardName", "ssno:StandardName")
        .uri("standardName", "ssno:standardName")
        .uri("unit", "ssno:unit")
        .uri("description", "ssno:description")
        .uri("standardNameTable", "ssno:standardNameTable")
}

pub fn standard_name_table() -> TypeSchema {
    TypeSchema::new("StandardNameTable")
        .parent("Dataset")
        .field(FieldSpec::new("standardNames", FieldKind::entity("StandardName")).many())
        .uri("StandardNameTable", "ssno:StandardNameTable")
        .uri("standardNames", "ssno:standardNames")
}

pub fn piv_distribution() -> TypeSchema {
    TypeSchema::new("PivDistribution")
        .parent("Distribution")
        .field(FieldSpec::new("filenamePattern", FieldKind::String))
        .uri("PivDistribution", "pivmeta:PivDistribution")
        .uri("filenamePattern", "pivmeta:filenamePattern")
}

pub fn piv_image_distribution() -> TypeSchema {
    TypeSchema::new("PivImageDistribution")
        .parent("PivDistribution")
        .field(FieldSpec::new("pivImageType", FieldKind::Iri))
        .field(FieldSpec::new("imageBitDepth", FieldKind::Integer))
        .field(FieldSpec::new("numberOfRecords", FieldKind::Integer))
        .uri("PivImageDistribution", "pivmeta:PivImageDistribution")
        .uri("pivImageType", "pivmeta:pivImageType")
        .uri("imageBitDepth", "pivmeta:imageBitDepth")
        .uri("numberOfRecords", "pivmeta:numberOfRecords")
}

pub fn piv_mask_distribution() -> TypeSchema {
    TypeSchema::new("PivMaskDistribution")
        .parent("PivDistribution")
        .uri("PivMaskDistribution", "pivmeta:PivMaskDistribution")
}

pub fn piv_result_distribution() -> TypeSchema {
    TypeSchema::new("PivResultDistribution")
        .parent("PivDistribution")
        .uri("PivResultDistribution", "pivmeta:PivResultDistribution")
}

pub fn piv_processing_step() -> TypeSchema {
    TypeSchema::new("PivProcessingStep")
        .parent("ProcessingStep")
        .uri("PivProcessingStep", "pivmeta:PivProcessingStep")
}

pub fn piv_setup() -> TypeSchema {
    TypeSchema::new("PIVSetup")
        .parent("Thing")
        .field(FieldSpec::new("hasPart", FieldKind::entity("Thing")).one_or_many())
        .uri("PIVSetup", "pivmeta:PIVSetup")
        .uri("hasPart", "schema:hasPart")
}

pub fn laser() -> TypeSchema {
    TypeSchema::new("Laser")
        .parent("Tool")
        .uri("Laser", "pivmeta:Laser")
}

pub fn temporal_variable() -> TypeSchema {
    TypeSchema::new("TemporalVariable")
        .parent("TextVariable")
        .field(FieldSpec::new("timeValue", FieldKind::DateTime).one_or_many())
        .uri("TemporalVariable", "pivmeta:TemporalVariable")
        .uri("timeValue", "pivmeta:timeValue")
}
