/**
 * config.rs
 * Codec configuration (YAML)
 *
 * Format:
 * ```yaml
 * defaultContext: https://raw.githubusercontent.com/matthiasprobst/pivmeta/main/pivmeta_context.jsonld
 * inlineContext: true
 * cacheDir: /var/cache/pivmeta
 * timeoutSecs: 10
 * strict: false
 * forceDownload: false
 * ```
 *
 * Every key is optional.
 */

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::{CachingLoader, DEFAULT_TIMEOUT_SECS};
use crate::decoder::DecodeOptions;
use crate::errors::{Result, ValidationErrors};
use crate::jsonld::{ContextMode, EncodeOptions, DEFAULT_CONTEXT_URL};
use crate::namespace::is_absolute_iri;

pub const CACHE_DIR_ENV: &str = "PIVMETA_CACHE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CodecConfig {
    /// Context URL written by the encoder when `inline_context` is off,
    /// and applied by the decoder before each document's own context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_context: Option<String>,
    pub inline_context: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    pub timeout_secs: u64,
    pub strict: bool,
    pub force_download: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            default_context: None,
            inline_context: true,
            cache_dir: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            strict: false,
            force_download: false,
        }
    }
}

impl CodecConfig {
    /// Load and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: CodecConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = ValidationErrors::new("CodecConfig");

        if self.timeout_secs == 0 {
            errors.push("timeoutSecs", "must be at least 1");
        }
        if let Some(url) = &self.default_context {
            if !is_absolute_iri(url) {
                errors.push("defaultContext", format!("'{}' is not an absolute URL", url));
            }
        }

        errors.into_result()
    }

    /// Cache directory: `cacheDir`, then `$PIVMETA_CACHE_DIR`, then
    /// `$XDG_CACHE_HOME/pivmeta`, then `$HOME/.cache/pivmeta`
    pub fn resolve_cache_dir(&self) -> PathBuf {
        if let Some(dir) = &self.cache_dir {
            return dir.clone();
        }
        if let Ok(dir) = env::var(CACHE_DIR_ENV) {
            return PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("XDG_CACHE_HOME") {
            return PathBuf::from(dir).join("pivmeta");
        }
        match env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(".cache").join("pivmeta"),
            Err(_) => env::temp_dir().join("pivmeta"),
        }
    }

    pub fn context_mode(&self) -> ContextMode {
        if self.inline_context {
            ContextMode::Inline
        } else {
            ContextMode::External(
                self.default_context
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CONTEXT_URL.to_string()),
            )
        }
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            context: Some(self.context_mode()),
            single_root: false,
        }
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            strict: self.strict,
            context: self
                .default_context
                .as_ref()
                .map(|url| serde_json::Value::String(url.clone())),
            ..DecodeOptions::default()
        }
    }

    pub fn loader(&self) -> Result<CachingLoader> {
        self.validate()?;
        Ok(CachingLoader::new(self.resolve_cache_dir())?
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_force_download(self.force_download))
    }
}
