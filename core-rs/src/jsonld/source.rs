//! Where a JSON-LD document comes from

use std::fs;
use std::path::PathBuf;

use crate::cache::DocumentLoader;
use crate::errors::{OgmError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// Already-parsed document
    Json(serde_json::Value),
    /// JSON-LD text
    Text(String),
    File(PathBuf),
    /// Remote document, fetched through a `DocumentLoader`
    Url(String),
}

impl Source {
    /// Guess the kind of a command-line style argument: URLs, inline JSON,
    /// otherwise a file path.
    pub fn detect(value: &str) -> Self {
        let trimmed = value.trim_start();
        if ["http://", "https://", "file://"].iter().any(|s| value.starts_with(s)) {
            Source::Url(value.to_string())
        } else if trimmed.starts_with('{') || trimmed.starts_with('[') {
            Source::Text(value.to_string())
        } else {
            Source::File(PathBuf::from(value))
        }
    }

    /// Read and parse the document
    pub fn load(&self, loader: &dyn DocumentLoader) -> Result<serde_json::Value> {
        match self {
            Source::Json(document) => Ok(document.clone()),
            Source::Text(text) => parse(text, "inline document"),
            Source::File(path) => {
                let text = fs::read_to_string(path)?;
                parse(&text, &path.display().to_string())
            }
            Source::Url(url) => loader.load(url).map_err(|e| match e {
                OgmError::Json(e) => OgmError::Parse(format!("{} is not valid JSON: {}", url, e)),
                other => other,
            }),
        }
    }
}

impl From<serde_json::Value> for Source {
    fn from(document: serde_json::Value) -> Self {
        Source::Json(document)
    }
}

fn parse(text: &str, origin: &str) -> Result<serde_json::Value> {
    serde_json::from_str(text).map_err(|e| OgmError::Parse(format!("{} is not valid JSON: {}", origin, e)))
}
