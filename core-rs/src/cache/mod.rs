//! Remote document loading
//!
//! `DocumentLoader` is the seam through which remote `@context` documents
//! and remote graph sources are fetched. `CachingLoader` fetches over HTTP
//! and keeps a local copy per URL; `StaticLoader` serves documents held in
//! memory.

pub mod document_cache;

use std::collections::HashMap;

use crate::errors::{OgmError, Result};

pub use document_cache::{sha256_hex, CacheEntry, CachingLoader, DEFAULT_TIMEOUT_SECS};

/// Fetches a JSON(-LD) document by URL.
///
/// A body that is not JSON comes back as `OgmError::Json`; callers decide
/// whether that is a parse error or an unusable context.
pub trait DocumentLoader {
    fn load(&self, url: &str) -> Result<serde_json::Value>;
}

/// In-memory loader; unknown URLs fail as if the network were down
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    documents: HashMap<String, serde_json::Value>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: impl Into<String>, document: serde_json::Value) -> Self {
        self.insert(url, document);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, document: serde_json::Value) {
        self.documents.insert(url.into(), document);
    }
}

impl DocumentLoader for StaticLoader {
    fn load(&self, url: &str) -> Result<serde_json::Value> {
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| OgmError::Network(format!("{} is not available offline", url)))
    }
}
