use std::fmt;

use super::iri::{is_absolute_iri, split_compact};
use crate::errors::{OgmError, Result};

/// A predicate as declared in a type mapping: either `prefix:local` or an
/// absolute IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    Compact { prefix: String, local: String },
    Absolute(String),
}

impl Predicate {
    /// Parse a declared predicate.
    ///
    /// Absolute IRIs are taken verbatim; anything else must be a compact IRI
    /// with a syntactically valid prefix.
    pub fn parse(value: &str) -> Result<Self> {
        if is_absolute_iri(value) {
            return Ok(Predicate::Absolute(value.to_string()));
        }
        match split_compact(value) {
            Some((prefix, local)) if !local.is_empty() => Ok(Predicate::Compact {
                prefix: prefix.to_string(),
                local: local.to_string(),
            }),
            _ => Err(OgmError::InvalidNamespace(format!(
                "predicate '{}' is neither an absolute IRI nor prefix:local",
                value
            ))),
        }
    }

    pub fn compact(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Predicate::Compact {
            prefix: prefix.into(),
            local: local.into(),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        match self {
            Predicate::Compact { prefix, .. } => Some(prefix),
            Predicate::Absolute(_) => None,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compact { prefix, local } => write!(f, "{}:{}", prefix, local),
            Predicate::Absolute(iri) => write!(f, "{}", iri),
        }
    }
}
