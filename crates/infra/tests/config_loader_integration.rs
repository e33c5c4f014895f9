//! Integration tests for configuration loader
//!
//! Loads configuration from real files and builds a working client from it.

mod support;

use std::io::Write;
use std::path::PathBuf;

use badgekit_domain::{BadgeKitError, ResourceKind, Segment, SigningAlgorithm};
use badgekit_infra::config;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create config file");
    file.write_all(contents.as_bytes()).expect("Failed to write config file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        "badgekit.json",
        r#"{
            "base_url": "https://badges.example.org/api",
            "secret": "integration-secret",
            "key": "integration",
            "expiry_seconds": 45,
            "timeout_seconds": 10,
            "defaults": {"system": "badgekit", "issuer": "mozilla"}
        }"#,
    );

    let config = config::load_from_file(Some(path)).expect("Failed to load config from JSON");

    assert_eq!(config.base_url, "https://badges.example.org/api");
    assert_eq!(config.secret, "integration-secret");
    assert_eq!(config.key, "integration");
    assert_eq!(config.expiry_seconds, 45);
    assert_eq!(config.timeout_seconds, 10);
    assert_eq!(config.algorithm, SigningAlgorithm::HS256);

    let defaults = config.defaults.location();
    assert_eq!(defaults.segment(Segment::System), Some("badgekit"));
    assert_eq!(defaults.segment(Segment::Issuer), Some("mozilla"));
}

#[test]
fn test_load_config_from_toml_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(
        &dir,
        "badgekit.toml",
        r#"
base_url = "http://localhost:8080"
secret = "toml-secret"
algorithm = "HS512"

[defaults]
system = "local"
archived = true
"#,
    );

    let config = config::load_from_file(Some(path)).expect("Failed to load config from TOML");

    assert_eq!(config.base_url, "http://localhost:8080");
    assert_eq!(config.key, "master");
    assert_eq!(config.algorithm, SigningAlgorithm::HS512);
    assert_eq!(config.defaults.location().segment(Segment::System), Some("local"));
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Some("/nonexistent/path/badgekit.json".into()));

    match result {
        Err(BadgeKitError::Config(msg)) => {
            assert!(msg.contains("not found"), "Error message should mention 'not found'");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_load_config_with_invalid_format() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "badgekit.json", r#"{ "base_url": "not closed" "#);

    match config::load_from_file(Some(path)) {
        Err(BadgeKitError::Config(msg)) => {
            assert!(msg.contains("Invalid JSON"), "Error message should mention invalid JSON");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_load_config_missing_secret() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_config(&dir, "badgekit.json", r#"{"base_url": "http://localhost:8080"}"#);

    assert!(matches!(config::load_from_file(Some(path)), Err(BadgeKitError::Config(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_client_from_loaded_config_applies_file_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/systems/from-file/badges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"badges": []})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let contents = format!(
        r#"{{"base_url": "{}", "secret": "{}", "defaults": {{"system": "from-file"}}}}"#,
        server.uri(),
        support::TEST_SECRET,
    );
    let path = write_config(&dir, "badgekit.json", &contents);
    let loaded = config::load_from_file(Some(path)).expect("Failed to load config");

    let badges = support::with_client(loaded, |client| {
        client.list(ResourceKind::Badge, &Default::default())
    })
    .await
    .expect("list should succeed");
    assert_eq!(badges, json!({"badges": []}));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(support::verified_claims(&requests[0])["key"], "master");
}
