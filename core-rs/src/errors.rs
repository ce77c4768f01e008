//! Error types for the PIV metadata codec

use std::fmt;
use thiserror::Error;

/// A single violated field constraint
#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every constraint an entity violated, in field order
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors {
    pub type_name: String,
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            violations: Vec::new(),
        }
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Names of the offending fields
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    /// Ok when nothing was violated, otherwise the collected error
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(OgmError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s) for {}", self.violations.len(), self.type_name)?;
        for v in &self.violations {
            write!(f, "; {}: {}", v.field, v.message)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum OgmError {
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    #[error("Unknown field registration: type '{type_name}' has no field '{field}'")]
    UnknownFieldRegistration { type_name: String, field: String },

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("JSON-LD parse error: {0}")]
    Parse(String),

    #[error("Context resolution error: {0}")]
    ContextResolution(String),

    #[error("Coercion error: field '{field}' cannot hold {value:?}: {reason}")]
    Coercion {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    /// Fetched content does not match its expected digest
    #[error("Integrity check failed: {0}")]
    Integrity(String),

    #[error("Graph store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl OgmError {
    pub fn coercion(field: &str, value: impl fmt::Display, reason: impl Into<String>) -> Self {
        OgmError::Coercion {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Only network failures are worth retrying; everything else is a data
    /// or configuration problem.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OgmError::Network(_))
    }

    /// Field-level violations when this is a validation failure
    pub fn violations(&self) -> Option<&ValidationErrors> {
        match self {
            OgmError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OgmError {
    fn from(err: reqwest::Error) -> Self {
        OgmError::Network(err.to_string())
    }
}

impl From<oxigraph::store::StorageError> for OgmError {
    fn from(err: oxigraph::store::StorageError) -> Self {
        OgmError::Store(err.to_string())
    }
}

impl From<oxigraph::sparql::EvaluationError> for OgmError {
    fn from(err: oxigraph::sparql::EvaluationError) -> Self {
        OgmError::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OgmError>;
