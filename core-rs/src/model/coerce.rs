//! Field value coercion and shape checks
//!
//! Values are coerced towards the declared `FieldKind` (strings into
//! timestamps, IRIs, numbers) and the declared `Cardinality` is applied.
//! Failures are reported as messages and collected by the caller so that a
//! single construction reports every offending field.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::entity::{Entity, EntityId};
use super::value::Value;
use crate::errors::ValidationErrors;
use crate::namespace::{is_absolute_iri, UriRegistry};
use crate::schema::{Cardinality, FieldKind, FieldSpec};

pub const IANA_MEDIA_TYPES: &str = "https://www.iana.org/assignments/media-types/";

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"));

static MEDIA_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][a-z0-9!#$&^_.+-]*/[a-z0-9][a-z0-9!#$&^_.+-]*$").expect("static regex")
});

/// Parse an ISO-8601 timestamp. Offset-less values and plain dates are
/// taken as UTC (dates at midnight).
pub fn parse_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|n| n.and_utc().fixed_offset())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|n| n.and_utc().fixed_offset())
        })
}

/// Expand a media type to its IANA registry IRI.
///
/// ```
/// use pivmeta_core::model::normalize_media_type;
///
/// assert_eq!(
///     normalize_media_type("application/zip").as_deref(),
///     Some("https://www.iana.org/assignments/media-types/application/zip")
/// );
/// assert_eq!(
///     normalize_media_type("iana:text/csv").as_deref(),
///     Some("https://www.iana.org/assignments/media-types/text/csv")
/// );
/// assert_eq!(normalize_media_type("zip"), None);
/// ```
pub fn normalize_media_type(value: &str) -> Option<String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return is_absolute_iri(value).then(|| value.to_string());
    }
    if let Some(rest) = value.strip_prefix("iana:") {
        return MEDIA_TYPE_RE
            .is_match(rest)
            .then(|| format!("{}{}", IANA_MEDIA_TYPES, rest));
    }
    MEDIA_TYPE_RE
        .is_match(value)
        .then(|| format!("{}{}", IANA_MEDIA_TYPES, value))
}

fn mismatch(kind: &FieldKind, value: &Value) -> String {
    format!("expected {}, got {}", kind, value.kind_name())
}

/// Coerce a single (non-list) value towards `kind`
pub(crate) fn coerce_scalar(registry: &UriRegistry, kind: &FieldKind, value: Value) -> Result<Value, String> {
    match (kind, value) {
        (FieldKind::Any, v) => Ok(v),

        (FieldKind::String, Value::String(s)) | (FieldKind::String, Value::Iri(s)) => Ok(Value::String(s)),

        (FieldKind::Integer, Value::Integer(i)) => Ok(Value::Integer(i)),
        (FieldKind::Integer, Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|_| format!("'{}' is not an integer", s)),

        (FieldKind::Float, Value::Float(f)) => Ok(Value::Float(f)),
        (FieldKind::Float, Value::Integer(i)) => Ok(Value::Float(i as f64)),
        (FieldKind::Float, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| format!("'{}' is not a number", s)),

        (FieldKind::Boolean, Value::Boolean(b)) => Ok(Value::Boolean(b)),
        (FieldKind::Boolean, Value::String(s)) => match s.trim() {
            "true" | "1" => Ok(Value::Boolean(true)),
            "false" | "0" => Ok(Value::Boolean(false)),
            _ => Err(format!("'{}' is not a boolean", s)),
        },

        (FieldKind::DateTime, Value::DateTime(dt)) => Ok(Value::DateTime(dt)),
        (FieldKind::DateTime, Value::String(s)) => parse_datetime(&s)
            .map(Value::DateTime)
            .ok_or_else(|| format!("'{}' is not an ISO-8601 timestamp", s)),

        (FieldKind::Iri, Value::Iri(s)) | (FieldKind::Iri, Value::String(s)) => {
            if is_absolute_iri(&s) {
                Ok(Value::Iri(s))
            } else {
                Err(format!("'{}' is not an absolute IRI", s))
            }
        }

        (FieldKind::Email, Value::String(s)) => {
            let address = s.strip_prefix("mailto:").unwrap_or(&s);
            if EMAIL_RE.is_match(address) {
                Ok(Value::String(address.to_string()))
            } else {
                Err(format!("'{}' is not a valid email address", s))
            }
        }

        (FieldKind::MediaType, Value::String(s)) | (FieldKind::MediaType, Value::Iri(s)) => normalize_media_type(&s)
            .map(Value::Iri)
            .ok_or_else(|| format!("'{}' is not a media type", s)),

        (FieldKind::Entity(candidates), Value::Entity(e)) => {
            if candidates.iter().any(|c| registry.is_subtype(e.type_name(), c)) {
                Ok(Value::Entity(e))
            } else {
                Err(format!("expected {}, got {}", kind, e.type_name()))
            }
        }
        // A bare identifier stands for a not-yet-described node of the
        // first candidate type
        (FieldKind::Entity(candidates), Value::String(s)) | (FieldKind::Entity(candidates), Value::Iri(s)) => {
            let first = candidates
                .first()
                .ok_or_else(|| "entity field declares no candidate type".to_string())?;
            let id = EntityId::parse(&s).map_err(|e| e.to_string())?;
            Ok(Value::from(Entity::reference(first, id)))
        }

        (kind, v) => Err(mismatch(kind, &v)),
    }
}

/// Coerce a field value and apply its cardinality.
///
/// Returns `None` when the field ends up empty. Violations are pushed onto
/// `errors` under the field name (list items as `name[i]`).
pub(crate) fn coerce_field(
    registry: &UriRegistry,
    spec: &FieldSpec,
    value: Value,
    errors: &mut ValidationErrors,
) -> Option<Value> {
    if value.is_null() {
        return None;
    }

    let (items, was_list) = match value {
        Value::List(items) => (items, true),
        other => (vec![other], false),
    };

    if spec.cardinality == Cardinality::One && was_list && items.len() > 1 {
        errors.push(
            spec.name.clone(),
            format!("expected a single value, got a list of {}", items.len()),
        );
        return None;
    }

    let mut coerced = Vec::with_capacity(items.len());
    let mut failed = false;
    let many = items.len() > 1;
    for (i, item) in items.into_iter().enumerate() {
        if item.is_null() {
            continue;
        }
        match coerce_scalar(registry, &spec.kind, item) {
            Ok(v) => coerced.push(v),
            Err(msg) => {
                let field = if many {
                    format!("{}[{}]", spec.name, i)
                } else {
                    spec.name.clone()
                };
                errors.push(field, msg);
                failed = true;
            }
        }
    }
    if failed || coerced.is_empty() {
        return None;
    }

    match spec.cardinality {
        Cardinality::Many => Some(Value::List(coerced)),
        Cardinality::One | Cardinality::OneOrMany if coerced.len() == 1 => coerced.pop(),
        _ => Some(Value::List(coerced)),
    }
}
