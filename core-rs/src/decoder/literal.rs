//! RDF literals to field values
//!
//! The datatype picks the variant; unknown datatypes and lexical forms that
//! do not parse stay strings and are left to field coercion.

use oxigraph::model::vocab::xsd;
use oxigraph::model::Literal;

use crate::model::{parse_datetime, Value};

pub fn literal_value(literal: &Literal) -> Value {
    let lexical = literal.value();
    if literal.language().is_some() {
        return Value::String(lexical.to_string());
    }

    let datatype = literal.datatype();
    let fallback = || Value::String(lexical.to_string());

    if datatype == xsd::INTEGER
        || datatype == xsd::INT
        || datatype == xsd::LONG
        || datatype == xsd::SHORT
        || datatype == xsd::NON_NEGATIVE_INTEGER
        || datatype == xsd::POSITIVE_INTEGER
    {
        lexical.trim().parse().map(Value::Integer).unwrap_or_else(|_| fallback())
    } else if datatype == xsd::DOUBLE || datatype == xsd::FLOAT || datatype == xsd::DECIMAL {
        lexical.trim().parse().map(Value::Float).unwrap_or_else(|_| fallback())
    } else if datatype == xsd::BOOLEAN {
        match lexical.trim() {
            "true" | "1" => Value::Boolean(true),
            "false" | "0" => Value::Boolean(false),
            _ => fallback(),
        }
    } else if datatype == xsd::DATE_TIME || datatype == xsd::DATE {
        parse_datetime(lexical).map(Value::DateTime).unwrap_or_else(fallback)
    } else if datatype == xsd::ANY_URI {
        Value::Iri(lexical.to_string())
    } else {
        fallback()
    }
}
