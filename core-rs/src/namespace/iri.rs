//! IRI helpers: absolute-IRI checks, compact IRI splitting, local names and
//! blank-node id conventions.

use once_cell::sync::Lazy;
use regex::Regex;

static SCHEME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):(\S+)$").expect("static regex"));

static PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("static regex"));

static FIELD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*$").expect("static regex"));

/// Schemes that are absolute without an authority component
const OPAQUE_SCHEMES: &[&str] = &["urn", "mailto", "did", "tag", "tel", "data", "file"];

/// Prefix under which anonymous ids may appear in documents (`local:<uuid>`)
pub const LOCAL_ID_PREFIX: &str = "local:";

/// True when `value` is an absolute IRI (has a scheme and either an
/// authority or a well-known opaque scheme).
///
/// ```
/// use pivmeta_core::namespace::is_absolute_iri;
///
/// assert!(is_absolute_iri("https://example.org/ns#"));
/// assert!(is_absolute_iri("urn:uuid:1234"));
/// assert!(!is_absolute_iri("foaf:firstName"));
/// assert!(!is_absolute_iri("not-a-url"));
/// ```
pub fn is_absolute_iri(value: &str) -> bool {
    let Some(caps) = SCHEME_RE.captures(value) else {
        return false;
    };
    let scheme = caps[1].to_ascii_lowercase();
    let rest = &caps[2];
    rest.starts_with("//") && rest.len() > 2 || OPAQUE_SCHEMES.contains(&scheme.as_str())
}

/// True when `prefix` can stand before the `:` of a compact IRI
pub fn is_valid_prefix(prefix: &str) -> bool {
    PREFIX_RE.is_match(prefix)
}

/// True when `name` can be used as a field name and, unmapped, as the
/// local part of `local:<name>`
pub fn is_valid_field_name(name: &str) -> bool {
    FIELD_NAME_RE.is_match(name)
}

/// Split a compact IRI `prefix:local` into its parts.
///
/// Absolute IRIs and strings without a valid prefix return `None`.
pub fn split_compact(value: &str) -> Option<(&str, &str)> {
    if is_absolute_iri(value) || is_blank_id(value) {
        return None;
    }
    let (prefix, local) = value.split_once(':')?;
    if is_valid_prefix(prefix) {
        Some((prefix, local))
    } else {
        None
    }
}

/// Bare local name of an IRI: whatever follows the last `#`, or the last
/// `/` when there is no fragment.
///
/// ```
/// use pivmeta_core::namespace::local_name;
///
/// assert_eq!(local_name("http://xmlns.com/foaf/0.1/firstName"), "firstName");
/// assert_eq!(local_name("http://w3id.org/nfdi4ing/metadata4ing#hasUnit"), "hasUnit");
/// ```
pub fn local_name(iri: &str) -> &str {
    if let Some((_, name)) = iri.rsplit_once('#') {
        return name;
    }
    match iri.rsplit_once('/') {
        Some((_, name)) => name,
        None => iri,
    }
}

/// True for ids that carry no stable external identity (`_:x`, `local:x`)
pub fn is_blank_id(value: &str) -> bool {
    value.starts_with("_:") || value.starts_with(LOCAL_ID_PREFIX)
}

/// Document-scoped token of a blank id, without its `_:`/`local:` marker
pub fn blank_token(value: &str) -> Option<&str> {
    value
        .strip_prefix("_:")
        .or_else(|| value.strip_prefix(LOCAL_ID_PREFIX))
}
