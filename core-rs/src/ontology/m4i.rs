//! Metadata4Ing variables, methods, tools and processing steps

use crate::schema::{FieldKind, FieldSpec, TypeSchema};

pub fn variable() -> TypeSchema {
    TypeSchema::new("Variable")
        .parent("Thing")
        .field(FieldSpec::new("description", FieldKind::String))
        .field(FieldSpec::new("hasUnit", FieldKind::String))
        .field(FieldSpec::new("hasKindOfQuantity", FieldKind::String))
        .field(FieldSpec::new("hasSymbol", FieldKind::String))
        .field(FieldSpec::new("hasStandardName", FieldKind::entity("StandardName")))
        .uri("Variable", "m4i:Variable")
        .uri("description", "m4i:hasVariableDescription")
        .uri("hasUnit", "m4i:hasUnit")
        .uri("hasKindOfQuantity", "m4i:hasKindOfQuantity")
        .uri("hasSymbol", "m4i:hasSymbol")
        .uri("hasStandardName", "pivmeta:hasStandardName")
}

pub fn numerical_variable() -> TypeSchema {
    TypeSchema::new("NumericalVariable")
        .parent("Variable")
        .field(FieldSpec::new("hasNumericalValue", FieldKind::Float))
        .field(FieldSpec::new("hasMinimumValue", FieldKind::Float))
        .field(FieldSpec::new("hasMaximumValue", FieldKind::Float))
        .uri("NumericalVariable", "m4i:NumericalVariable")
        .uri("hasNumericalValue", "m4i:hasNumericalValue")
        .uri("hasMinimumValue", "m4i:hasMinimumValue")
        .uri("hasMaximumValue", "m4i:hasMaximumValue")
}

pub fn text_variable() -> TypeSchema {
    TypeSchema::new("TextVariable")
        .parent("Variable")
        .field(FieldSpec::new("hasStringValue", FieldKind::String))
        .uri("TextVariable", "m4i:TextVariable")
        .uri("hasStringValue", "m4i:hasStringValue")
}

pub fn method() -> TypeSchema {
    TypeSchema::new("Method")
        .parent("Thing")
        .field(FieldSpec::new("description", FieldKind::String))
        .field(FieldSpec::new("hasParameter", FieldKind::entity("Variable")).one_or_many())
        .uri("Method", "m4i:Method")
        .uri("description", "schema:description")
        .uri("hasParameter", "m4i:hasParameter")
}

pub fn tool() -> TypeSchema {
    TypeSchema::new("Tool")
        .parent("Thing")
        .field(FieldSpec::new("hasParameter", FieldKind::entity("Variable")).one_or_many())
        .field(FieldSpec::new("manufacturer", FieldKind::entity("Organization")))
        .uri("Tool", "m4i:Tool")
        .uri("hasParameter", "m4i:hasParameter")
        .uri("manufacturer", "pivmeta:manufacturer")
}

pub fn processing_step() -> TypeSchema {
    TypeSchema::new("ProcessingStep")
        .parent("Thing")
        .field(FieldSpec::new("startTime", FieldKind::DateTime))
        .field(FieldSpec::new("endTime", FieldKind::DateTime))
        .field(FieldSpec::new("startsWith", FieldKind::entity("ProcessingStep")))
        .field(FieldSpec::new("endsWith", FieldKind::entity("ProcessingStep")))
        .field(FieldSpec::new("hasEmployedTool", FieldKind::entity("Tool")))
        .field(FieldSpec::new("realizesMethod", FieldKind::entity("Method")))
        .field(FieldSpec::new("hasInput", FieldKind::entity("Thing")).one_or_many())
        .field(FieldSpec::new("hasOutput", FieldKind::entity("Thing")).one_or_many())
        .field(FieldSpec::new("investigates", FieldKind::entity("Thing")))
        .field(FieldSpec::new("usageInstruction", FieldKind::String))
        .uri("ProcessingStep", "m4i:ProcessingStep")
        .uri("startTime", "schema:startTime")
        .uri("endTime", "schema:endTime")
        .uri("startsWith", "m4i:startsWith")
        .uri("endsWith", "m4i:endsWith")
        .uri("hasEmployedTool", "m4i:hasEmployedTool")
        .uri("realizesMethod", "m4i:realizesMethod")
        .uri("hasInput", "m4i:hasInput")
        .uri("hasOutput", "m4i:hasOutput")
        .uri("investigates", "m4i:investigates")
        .uri("usageInstruction", "m4i:usageInstruction")
}
