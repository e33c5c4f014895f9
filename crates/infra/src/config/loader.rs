//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `BADGEKIT_API_URL`: Root URL of the API server (required)
//! - `BADGEKIT_API_SECRET`: Shared signing secret (required)
//! - `BADGEKIT_API_KEY`: Name of the secret, sent as the `key` claim
//! - `BADGEKIT_API_EXPIRY`: Token lifetime in seconds
//! - `BADGEKIT_API_TIMEOUT`: Request timeout in seconds
//! - `BADGEKIT_SYSTEM`, `BADGEKIT_ISSUER`, `BADGEKIT_PROGRAM`: Default
//!   location slugs applied to every call
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./badgekit.json` or `./badgekit.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. The same names next to the executable

use std::path::{Path, PathBuf};

use badgekit_domain::{BadgeKitError, ClientConfig, ClientDefaults, Location, Result, Segment};
use url::Url;

const CONFIG_FILE_NAMES: [&str; 4] =
    ["badgekit.json", "badgekit.toml", "config.json", "config.toml"];

const DEFAULT_SEGMENT_VARS: [(Segment, &str); 3] = [
    (Segment::System, "BADGEKIT_SYSTEM"),
    (Segment::Issuer, "BADGEKIT_ISSUER"),
    (Segment::Program, "BADGEKIT_PROGRAM"),
];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `BadgeKitError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<ClientConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `BadgeKitError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config = ClientConfig::new(env_var("BADGEKIT_API_URL")?, env_var("BADGEKIT_API_SECRET")?);

    if let Some(key) = optional_env_var("BADGEKIT_API_KEY") {
        config.key = key;
    }
    if let Some(expiry) = env_u64("BADGEKIT_API_EXPIRY")? {
        config.expiry_seconds = expiry;
    }
    if let Some(timeout) = env_u64("BADGEKIT_API_TIMEOUT")? {
        config.timeout_seconds = timeout;
    }

    let mut defaults = Location::new();
    for (segment, key) in DEFAULT_SEGMENT_VARS {
        if let Some(slug) = optional_env_var(key) {
            defaults.set(segment, slug);
        }
    }
    config.defaults = ClientDefaults::new(defaults);

    validate(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `BadgeKitError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BadgeKitError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BadgeKitError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BadgeKitError::Config(format!("Failed to read config file: {e}")))?;

    validate(parse_config(&contents, &config_path)?)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BadgeKitError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BadgeKitError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(BadgeKitError::Config(format!("Unsupported config format: {extension}"))),
    }
}

fn validate(config: ClientConfig) -> Result<ClientConfig> {
    config.validate()?;
    Url::parse(config.base_url.trim()).map_err(|e| {
        BadgeKitError::Config(format!("Invalid base URL `{}`: {e}", config.base_url))
    })?;
    Ok(config)
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `BadgeKitError::Config` if the variable is unset or empty.
fn env_var(key: &str) -> Result<String> {
    optional_env_var(key).ok_or_else(|| {
        BadgeKitError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Non-empty value of an environment variable, if set.
fn optional_env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    optional_env_var(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| BadgeKitError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use badgekit_domain::SigningAlgorithm;
    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 8] = [
        "BADGEKIT_API_URL",
        "BADGEKIT_API_SECRET",
        "BADGEKIT_API_KEY",
        "BADGEKIT_API_EXPIRY",
        "BADGEKIT_API_TIMEOUT",
        "BADGEKIT_SYSTEM",
        "BADGEKIT_ISSUER",
        "BADGEKIT_PROGRAM",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn write_temp(contents: &str, extension: &str) -> (NamedTempFile, PathBuf) {
        let mut temp_file = tempfile::Builder::new()
            .suffix(&format!(".{extension}"))
            .tempfile()
            .expect("temp file");
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().to_path_buf();
        (temp_file, path)
    }

    #[test]
    fn test_load_from_env_required_only() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BADGEKIT_API_URL", "http://localhost:8080");
        std::env::set_var("BADGEKIT_API_SECRET", "s3cr3t");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.secret, "s3cr3t");
        assert_eq!(config.key, "master");
        assert_eq!(config.expiry_seconds, 30);
        assert!(config.defaults.location().is_empty());

        clear_env();
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BADGEKIT_API_URL", "http://localhost:8080");
        std::env::set_var("BADGEKIT_API_SECRET", "s3cr3t");
        std::env::set_var("BADGEKIT_API_KEY", "client-key");
        std::env::set_var("BADGEKIT_API_EXPIRY", "120");
        std::env::set_var("BADGEKIT_API_TIMEOUT", "5");
        std::env::set_var("BADGEKIT_SYSTEM", "badgekit");
        std::env::set_var("BADGEKIT_PROGRAM", "summer");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.key, "client-key");
        assert_eq!(config.expiry_seconds, 120);
        assert_eq!(config.timeout_seconds, 5);
        let defaults = config.defaults.location();
        assert_eq!(defaults.segment(Segment::System), Some("badgekit"));
        assert_eq!(defaults.segment(Segment::Issuer), None);
        assert_eq!(defaults.segment(Segment::Program), Some("summer"));

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BADGEKIT_API_URL", "http://localhost:8080");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, BadgeKitError::Config(_)));
        assert!(err.to_string().contains("BADGEKIT_API_SECRET"));

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BADGEKIT_API_URL", "http://localhost:8080");
        std::env::set_var("BADGEKIT_API_SECRET", "s3cr3t");
        std::env::set_var("BADGEKIT_API_EXPIRY", "soon");

        assert!(matches!(load_from_env(), Err(BadgeKitError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BADGEKIT_API_URL", "localhost without scheme");
        std::env::set_var("BADGEKIT_API_SECRET", "s3cr3t");

        assert!(matches!(load_from_env(), Err(BadgeKitError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_prefers_env() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("BADGEKIT_API_URL", "http://env.example.com");
        std::env::set_var("BADGEKIT_API_SECRET", "s3cr3t");

        assert_eq!(load().unwrap().base_url, "http://env.example.com");

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let (_file, path) = write_temp(
            r#"{
                "base_url": "http://example.com",
                "secret": "s3cr3t",
                "expiry_seconds": 60,
                "defaults": {"system": "badgekit"}
            }"#,
            "json",
        );

        let config = load_from_file(Some(path)).expect("config from JSON");
        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.expiry_seconds, 60);
        assert_eq!(config.defaults.location().segment(Segment::System), Some("badgekit"));
    }

    #[test]
    fn test_load_from_file_toml() {
        let (_file, path) = write_temp(
            r#"
base_url = "http://example.com"
secret = "s3cr3t"
algorithm = "HS384"

[defaults]
issuer = "mozilla"
"#,
            "toml",
        );

        let config = load_from_file(Some(path)).expect("config from TOML");
        assert_eq!(config.algorithm, SigningAlgorithm::HS384);
        assert_eq!(config.defaults.location().segment(Segment::Issuer), Some("mozilla"));
    }

    #[test]
    fn test_load_from_file_rejects_empty_secret() {
        let (_file, path) =
            write_temp(r#"{"base_url": "http://example.com", "secret": ""}"#, "json");
        assert!(matches!(load_from_file(Some(path)), Err(BadgeKitError::Config(_))));
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/badgekit.json")));
        assert!(matches!(result, Err(BadgeKitError::Config(_))));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let (_file, path) = write_temp(r#"{ "base_url": "#, "json");
        assert!(matches!(load_from_file(Some(path)), Err(BadgeKitError::Config(_))));
    }

    #[test]
    fn test_unknown_default_segment_rejected() {
        let content = r#"{"base_url": "http://example.com", "secret": "s", "defaults": {"planet": "x"}}"#;
        let result = parse_config(content, Path::new("badgekit.json"));
        assert!(matches!(result, Err(BadgeKitError::Config(_))));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("badgekit.yaml"));
        assert!(matches!(result, Err(BadgeKitError::Config(_))));
    }
}
