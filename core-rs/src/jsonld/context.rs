//! `@context` handling
//!
//! `Context` is the active context used while expanding a document: term
//! definitions, `@vocab`, `@base` and a default language. `ContextMode`
//! chooses how the encoder writes its `@context`.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use tracing::debug;

use crate::cache::DocumentLoader;
use crate::errors::{OgmError, Result};
use crate::namespace::{is_absolute_iri, UriRegistry};

/// Published pivmeta context
pub const DEFAULT_CONTEXT_URL: &str =
    "https://raw.githubusercontent.com/matthiasprobst/pivmeta/main/pivmeta_context.jsonld";

/// Remote contexts may import further contexts; stop runaway chains
const MAX_REMOTE_DEPTH: usize = 8;

// ---------------------------------------------------------------------
// Encoder side
// ---------------------------------------------------------------------

/// How the encoder writes `@context`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContextMode {
    /// Every registered prefix inline
    #[default]
    Inline,
    /// `{"@import": url}` plus the prefixes the document actually uses
    External(String),
}

static DEFAULT_CONTEXT: Lazy<RwLock<ContextMode>> = Lazy::new(|| RwLock::new(ContextMode::Inline));

/// Context mode used by encoders that were not given one
pub fn default_context() -> ContextMode {
    DEFAULT_CONTEXT
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

pub fn set_default_context(mode: ContextMode) {
    *DEFAULT_CONTEXT
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = mode;
}

// ---------------------------------------------------------------------
// Decoder side
// ---------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container {
    Set,
    List,
}

/// One term of the active context
#[derive(Debug, Clone)]
pub struct TermDefinition {
    pub iri: String,
    /// `@id`, `@vocab` or a datatype IRI
    pub type_mapping: Option<String>,
    pub container: Option<Container>,
}

#[derive(Debug, Clone, Default)]
pub struct Context {
    pub terms: HashMap<String, TermDefinition>,
    pub vocab: Option<String>,
    pub base: Option<String>,
    pub default_language: Option<String>,
}

impl Context {
    /// Every namespace of `registry` as a prefix term
    pub fn from_registry(registry: &UriRegistry) -> Self {
        let terms = registry
            .namespaces()
            .map(|(prefix, iri)| {
                (
                    prefix.to_string(),
                    TermDefinition {
                        iri: iri.to_string(),
                        type_mapping: None,
                        container: None,
                    },
                )
            })
            .collect();

        Self {
            terms,
            ..Self::default()
        }
    }

    /// Merge a `@context` value (object, URL, array of those, or null)
    pub fn process(&mut self, value: &Value, loader: &dyn DocumentLoader) -> Result<()> {
        self.process_at_depth(value, loader, 0)
    }

    fn process_at_depth(&mut self, value: &Value, loader: &dyn DocumentLoader, depth: usize) -> Result<()> {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.process_at_depth(item, loader, depth)?;
                }
            }
            Value::String(url) => self.process_remote(url, loader, depth)?,
            Value::Object(map) => self.process_object(map, loader, depth)?,
            Value::Null => *self = Context::default(),
            other => {
                return Err(OgmError::ContextResolution(format!("invalid @context value: {}", other)));
            }
        }
        Ok(())
    }

    fn process_remote(&mut self, url: &str, loader: &dyn DocumentLoader, depth: usize) -> Result<()> {
        if depth >= MAX_REMOTE_DEPTH {
            return Err(OgmError::ContextResolution(format!(
                "too many nested remote contexts at {}",
                url
            )));
        }
        debug!("Loading remote context {}", url);

        let document = loader.load(url).map_err(|e| match e {
            OgmError::Json(e) => {
                OgmError::ContextResolution(format!("{} is not a JSON document: {}", url, e))
            }
            other => other,
        })?;
        let inner = match document {
            Value::Object(mut map) => map.remove("@context").ok_or_else(|| {
                OgmError::ContextResolution(format!("{} has no @context member", url))
            })?,
            _ => {
                return Err(OgmError::ContextResolution(format!(
                    "{} is not a context document",
                    url
                )));
            }
        };
        self.process_at_depth(&inner, loader, depth + 1)
    }

    fn process_object(&mut self, map: &Map<String, Value>, loader: &dyn DocumentLoader, depth: usize) -> Result<()> {
        if let Some(import) = map.get("@import") {
            let url = import.as_str().ok_or_else(|| {
                OgmError::ContextResolution("@import must be a URL string".to_string())
            })?;
            self.process_remote(url, loader, depth)?;
        }

        if let Some(vocab) = map.get("@vocab") {
            self.vocab = match vocab {
                Value::Null => None,
                Value::String(v) => Some(self.expand_iri(v, true).unwrap_or_else(|| v.clone())),
                _ => return Err(OgmError::ContextResolution("@vocab must be a string".to_string())),
            };
        }
        if let Some(base) = map.get("@base") {
            self.base = base.as_str().map(|s| s.to_string());
        }
        if let Some(language) = map.get("@language") {
            self.default_language = language.as_str().map(|s| s.to_string());
        }

        // Absolute prefix bindings first so other terms in the same object
        // can use them regardless of key order.
        for (term, definition) in map {
            if term.starts_with('@') {
                continue;
            }
            if let Value::String(iri) = definition {
                if is_absolute_iri(iri) {
                    self.define(term, iri.clone(), None, None);
                }
            }
        }

        for (term, definition) in map {
            if term.starts_with('@') {
                continue;
            }
            match definition {
                Value::Null => {
                    self.terms.remove(term);
                }
                Value::String(iri) => {
                    let iri = self.expand_term_iri(term, iri)?;
                    self.define(term, iri, None, None);
                }
                Value::Object(expanded) => self.process_term(term, expanded)?,
                other => {
                    return Err(OgmError::ContextResolution(format!(
                        "invalid definition for term '{}': {}",
                        term, other
                    )));
                }
            }
        }

        Ok(())
    }

    fn process_term(&mut self, term: &str, expanded: &Map<String, Value>) -> Result<()> {
        let id = match expanded.get("@id") {
            Some(Value::String(id)) => id.as_str(),
            Some(other) => {
                return Err(OgmError::ContextResolution(format!(
                    "@id of term '{}' must be a string, got {}",
                    term, other
                )));
            }
            None => term,
        };
        let iri = self.expand_term_iri(term, id)?;

        let type_mapping = match expanded.get("@type").and_then(|t| t.as_str()) {
            Some(t) if t.starts_with('@') => Some(t.to_string()),
            Some(t) => Some(self.expand_iri(t, true).ok_or_else(|| {
                OgmError::ContextResolution(format!("cannot expand @type '{}' of term '{}'", t, term))
            })?),
            None => None,
        };

        let container = match expanded.get("@container").and_then(|c| c.as_str()) {
            Some("@list") => Some(Container::List),
            Some("@set") => Some(Container::Set),
            _ => None,
        };

        self.define(term, iri, type_mapping, container);
        Ok(())
    }

    fn expand_term_iri(&self, term: &str, iri: &str) -> Result<String> {
        self.expand_iri(iri, true).ok_or_else(|| {
            OgmError::ContextResolution(format!("cannot expand '{}' for term '{}'", iri, term))
        })
    }

    fn define(&mut self, term: &str, iri: String, type_mapping: Option<String>, container: Option<Container>) {
        self.terms.insert(
            term.to_string(),
            TermDefinition {
                iri,
                type_mapping,
                container,
            },
        );
    }

    pub fn term(&self, term: &str) -> Option<&TermDefinition> {
        self.terms.get(term)
    }

    /// Expand a term, compact IRI or absolute IRI.
    ///
    /// `vocab` selects vocabulary-relative expansion (keys and `@type`
    /// values: terms and `@vocab` apply) versus document-relative expansion
    /// (`@id` values: only prefixes and `@base` apply). Keywords and
    /// unresolvable values yield `None`.
    pub fn expand_iri(&self, value: &str, vocab: bool) -> Option<String> {
        if value.starts_with('@') {
            return None;
        }
        if vocab {
            if let Some(definition) = self.terms.get(value) {
                return Some(definition.iri.clone());
            }
        }
        if let Some((prefix, suffix)) = value.split_once(':') {
            if !suffix.starts_with("//") {
                if let Some(definition) = self.terms.get(prefix) {
                    return Some(format!("{}{}", definition.iri, suffix));
                }
            }
        }
        if is_absolute_iri(value) {
            return Some(value.to_string());
        }
        if vocab {
            self.vocab.as_ref().map(|v| format!("{}{}", v, value))
        } else {
            self.base.as_ref().map(|b| format!("{}{}", b, value))
        }
    }
}
