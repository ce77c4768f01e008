//! On-disk cache for remote JSON-LD documents and contexts
//!
//! Documents are stored in a flat directory, one file per URL:
//! `<sanitized-last-segment>-<crc32 hex>.jsonld`.
//! A cached copy is served without touching the network unless
//! `force_download` is set; when a download fails and a cached copy exists,
//! the cached copy is used instead.
//!
//! `fetch_verified` additionally checks a SHA-256 digest; content that does
//! not match is never written to the cache.

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::DocumentLoader;
use crate::errors::{OgmError, Result};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const CACHE_EXTENSION: &str = "jsonld";
const JSONLD_ACCEPT: &str = "application/ld+json, application/json;q=0.9, */*;q=0.1";

/// One file in the cache directory
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// HTTP document loader backed by a local cache directory
#[derive(Debug, Clone)]
pub struct CachingLoader {
    cache_dir: PathBuf,
    timeout: Duration,
    force_download: bool,
}

impl CachingLoader {
    /// Create a loader caching into `cache_dir` (created if missing)
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        if !cache_dir.exists() {
            fs::create_dir_all(&cache_dir)?;
        }

        Ok(Self {
            cache_dir,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            force_download: false,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Always re-download, even when a cached copy exists
    pub fn with_force_download(mut self, force: bool) -> Self {
        self.force_download = force;
        self
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Where the document for `url` is (or would be) cached
    pub fn cached_path(&self, url: &str) -> PathBuf {
        self.cache_dir.join(cache_file_name(url))
    }

    /// Make the document for `url` available locally and return its path.
    ///
    /// `file://` URLs are read in place and never cached.
    pub fn fetch(&self, url: &str) -> Result<PathBuf> {
        self.fetch_verified(url, None)
    }

    /// Like `fetch`, checking the content against a hex SHA-256 digest.
    ///
    /// A cached copy that does not match is downloaded again; a download
    /// that does not match fails with `OgmError::Integrity` and leaves the
    /// cache untouched.
    pub fn fetch_verified(&self, url: &str, sha256: Option<&str>) -> Result<PathBuf> {
        if let Some(path) = url.strip_prefix("file://") {
            let path = PathBuf::from(path);
            if let Some(expected) = sha256 {
                verify_digest(url, &fs::read(&path)?, expected)?;
            } else {
                fs::metadata(&path)?;
            }
            return Ok(path);
        }

        let cached = self.cached_path(url);
        let cached_ok = cached.exists() && self.cached_matches(&cached, sha256)?;
        if cached_ok && !self.force_download {
            debug!("Cache hit for {} ({})", url, cached.display());
            return Ok(cached);
        }

        match self.download(url) {
            Ok(body) => self.store(url, &body, sha256),
            Err(err) if cached_ok => {
                warn!("Download of {} failed ({}); using cached copy", url, err);
                Ok(cached)
            }
            Err(err) => Err(err),
        }
    }

    fn cached_matches(&self, cached: &Path, sha256: Option<&str>) -> Result<bool> {
        let Some(expected) = sha256 else {
            return Ok(true);
        };
        let matches = verify_digest(&cached.display().to_string(), &fs::read(cached)?, expected).is_ok();
        if !matches {
            warn!("Cached copy {} does not match the expected digest", cached.display());
        }
        Ok(matches)
    }

    /// Write a downloaded body to the cache once it passes the digest check
    fn store(&self, url: &str, body: &[u8], sha256: Option<&str>) -> Result<PathBuf> {
        if let Some(expected) = sha256 {
            verify_digest(url, body, expected)?;
        }

        let cached = self.cached_path(url);
        let tmp = cached.with_extension("part");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &cached)?;
        info!("Cached {} ({} bytes)", url, body.len());
        Ok(cached)
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        debug!("Downloading {} (timeout {:?})", url, self.timeout);

        let client = Client::builder().timeout(self.timeout).build()?;
        let response = client.get(url).header(ACCEPT, JSONLD_ACCEPT).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(OgmError::Network(format!("{} returned HTTP {}", url, status)));
        }

        Ok(response.bytes()?.to_vec())
    }

    /// Cached documents, sorted by file name
    pub fn list(&self) -> Result<Vec<CacheEntry>> {
        let mut entries = Vec::new();
        if !self.cache_dir.exists() {
            return Ok(entries);
        }

        for entry in fs::read_dir(&self.cache_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some(CACHE_EXTENSION) {
                continue;
            }
            let metadata = entry.metadata()?;
            entries.push(CacheEntry {
                file_name: entry.file_name().to_string_lossy().to_string(),
                path,
                size_bytes: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(entries)
    }

    /// Remove every cached document; returns how many were removed
    pub fn clear(&self) -> Result<usize> {
        let entries = self.list()?;
        for entry in &entries {
            fs::remove_file(&entry.path)?;
        }
        debug!("Cleared {} cached document(s) from {}", entries.len(), self.cache_dir.display());
        Ok(entries.len())
    }
}

impl DocumentLoader for CachingLoader {
    fn load(&self, url: &str) -> Result<serde_json::Value> {
        let path = self.fetch(url)?;
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Lowercase hex SHA-256 of `content`
pub fn sha256_hex(content: &[u8]) -> String {
    hex::encode(Sha256::digest(content))
}

fn verify_digest(origin: &str, content: &[u8], expected: &str) -> Result<()> {
    let actual = sha256_hex(content);
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(OgmError::Integrity(format!(
            "{} has SHA-256 {}, expected {}",
            origin,
            actual,
            expected.trim()
        )))
    }
}

/// Cache file name: readable tail of the URL plus a checksum of the full URL
fn cache_file_name(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let tail = trimmed.rsplit('/').next().unwrap_or(trimmed);
    let tail = tail.strip_suffix(".jsonld").unwrap_or(tail);

    let mut readable: String = tail
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' { c } else { '_' })
        .take(64)
        .collect();
    if readable.is_empty() {
        readable.push_str("document");
    }

    let checksum = crc32fast::hash(url.as_bytes());
    format!("{}-{}.{}", readable, hex::encode(checksum.to_be_bytes()), CACHE_EXTENSION)
}
