//! Integration tests for the remote document cache
//!
//! Tests the caching loader without network access:
//! - file:// documents and SHA-256 pins
//! - Cache hits and forced downloads with a cached fallback
//! - Unreachable hosts with an empty cache
//! - Offline decoding against a pre-seeded context
//! - Config-driven loader construction

use pivmeta_core::cache::{sha256_hex, DocumentLoader};
use pivmeta_core::ontology::register_builtin;
use pivmeta_core::{CachingLoader, CodecConfig, Decoder, OgmError, Source, UriRegistry, Value};
use serde_json::json;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

/// Nothing listens on the discard port, so connections are refused quickly
const UNREACHABLE: &str = "http://127.0.0.1:9/contexts/pivmeta_context.jsonld";

fn loader(tmp: &TempDir) -> CachingLoader {
    CachingLoader::new(tmp.path().join("cache"))
        .unwrap()
        .with_timeout(Duration::from_secs(2))
}

fn seed(loader: &CachingLoader, url: &str, document: &serde_json::Value) {
    fs::write(loader.cached_path(url), document.to_string()).unwrap();
}

#[test]
fn test_file_url_is_read_in_place() {
    let tmp = TempDir::new().unwrap();
    let loader = loader(&tmp);
    let path = tmp.path().join("local.jsonld");
    fs::write(&path, r#"{"@context": {"ex": "https://example.org/"}}"#).unwrap();

    let url = format!("file://{}", path.display());
    assert_eq!(loader.fetch(&url).unwrap(), path);
    assert_eq!(loader.load(&url).unwrap()["@context"]["ex"], "https://example.org/");
    assert!(loader.list().unwrap().is_empty());
}

#[test]
fn test_missing_file_url() {
    let tmp = TempDir::new().unwrap();
    let loader = loader(&tmp);
    let url = format!("file://{}", tmp.path().join("absent.jsonld").display());
    assert!(matches!(loader.load(&url), Err(OgmError::Io(_))));
}

#[test]
fn test_file_url_digest_is_checked() {
    let tmp = TempDir::new().unwrap();
    let loader = loader(&tmp);
    let body = r#"{"@context": {"ex": "https://example.org/"}}"#;
    let path = tmp.path().join("pinned.jsonld");
    fs::write(&path, body).unwrap();
    let url = format!("file://{}", path.display());

    let digest = sha256_hex(body.as_bytes());
    assert_eq!(loader.fetch_verified(&url, Some(&digest)).unwrap(), path);

    let err = loader
        .fetch_verified(&url, Some(&sha256_hex(b"tampered")))
        .unwrap_err();
    assert!(matches!(err, OgmError::Integrity(_)), "got {:?}", err);
    assert!(!err.is_retryable());
}

#[test]
fn test_unreachable_without_cache_fails() {
    let tmp = TempDir::new().unwrap();
    let loader = loader(&tmp);

    let err = loader.load(UNREACHABLE).unwrap_err();
    assert!(err.is_retryable());
    assert!(!loader.cached_path(UNREACHABLE).exists());
}

#[test]
fn test_cached_copy_is_used() {
    let tmp = TempDir::new().unwrap();
    let loader = loader(&tmp);
    seed(&loader, UNREACHABLE, &json!({"@context": {"foaf": "http://xmlns.com/foaf/0.1/"}}));

    let document = loader.load(UNREACHABLE).unwrap();
    assert_eq!(document["@context"]["foaf"], "http://xmlns.com/foaf/0.1/");

    // A forced download that fails falls back to the cached copy
    let forced = loader.clone().with_force_download(true);
    assert_eq!(forced.load(UNREACHABLE).unwrap(), document);
}

#[test]
fn test_cached_non_json_as_context_is_a_context_error() {
    let tmp = TempDir::new().unwrap();
    let loader = loader(&tmp);
    fs::write(loader.cached_path(UNREACHABLE), "<html>rate limited</html>").unwrap();

    let mut registry = UriRegistry::new();
    register_builtin(&mut registry).unwrap();
    let document = json!({"@context": UNREACHABLE, "@type": "Person"});
    let err = Decoder::new(&registry, &loader)
        .decode(&Source::Json(document), "Person")
        .unwrap_err();
    assert!(matches!(err, OgmError::ContextResolution(_)), "got {:?}", err);
    assert!(!err.is_retryable());
}

#[test]
fn test_malformed_url_source_is_a_parse_error() {
    let tmp = TempDir::new().unwrap();
    let loader = loader(&tmp);
    let path = tmp.path().join("doc.jsonld");
    fs::write(&path, "{not json").unwrap();

    let mut registry = UriRegistry::new();
    register_builtin(&mut registry).unwrap();
    let source = Source::Url(format!("file://{}", path.display()));
    let err = Decoder::new(&registry, &loader)
        .decode(&source, "Person")
        .unwrap_err();
    assert!(matches!(err, OgmError::Parse(_)), "got {:?}", err);
}

#[test]
fn test_list_and_clear() {
    let tmp = TempDir::new().unwrap();
    let loader = loader(&tmp);
    seed(&loader, "https://example.org/a.jsonld", &json!({"@context": {}}));
    seed(&loader, "https://example.org/b.jsonld", &json!({"@context": {}}));
    fs::write(tmp.path().join("cache").join("notes.txt"), "not a document").unwrap();

    let entries = loader.list().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].file_name.starts_with("a-"));
    assert!(entries[1].file_name.starts_with("b-"));
    assert!(entries.iter().all(|e| e.size_bytes > 0));

    assert_eq!(loader.clear().unwrap(), 2);
    assert!(loader.list().unwrap().is_empty());
    assert!(tmp.path().join("cache").join("notes.txt").exists());
}

#[test]
fn test_offline_decode_with_seeded_context() {
    let tmp = TempDir::new().unwrap();
    let loader = loader(&tmp);
    seed(
        &loader,
        UNREACHABLE,
        &json!({"@context": {
            "foaf": "http://xmlns.com/foaf/0.1/",
            "Person": "http://www.w3.org/ns/prov#Person",
            "name": "foaf:firstName"
        }}),
    );

    let mut registry = UriRegistry::new();
    register_builtin(&mut registry).unwrap();

    let document = json!({"@context": UNREACHABLE, "@type": "Person", "name": "Lena"});
    let people = Decoder::new(&registry, &loader)
        .decode(&Source::Json(document), "Person")
        .unwrap();
    assert_eq!(people[0].get("firstName"), Some(&Value::from("Lena")));
}

#[test]
fn test_config_builds_loader() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("pivmeta.yaml");
    fs::write(
        &config_path,
        format!(
            "cacheDir: {}\ntimeoutSecs: 3\nforceDownload: true\n",
            tmp.path().join("docs").display()
        ),
    )
    .unwrap();

    let config = CodecConfig::load(&config_path).unwrap();
    let loader = config.loader().unwrap();
    assert_eq!(loader.cache_dir(), tmp.path().join("docs").as_path());
    assert!(tmp.path().join("docs").is_dir());
}
