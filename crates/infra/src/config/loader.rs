//! Configuration loader
//!
//! Loads client configuration from an optional file, then applies
//! environment overrides. Every field has a built-in default, so a
//! missing file is not an error.
//!
//! ## Environment Variables
//! - `CARESYNC_API_BASE_URL`: REST API base URL
//! - `CARESYNC_PUSH_URL`: websocket push endpoint URL
//! - `CARESYNC_TIMEOUT_SECONDS`: per-request HTTP timeout
//! - `CARESYNC_CACHE_TTL_SECONDS`: resource cache TTL
//! - `CARESYNC_CACHE_SWEEP_INTERVAL_SECONDS`: expired-entry sweep interval
//! - `CARESYNC_RECONNECT_MAX_ATTEMPTS`: push reconnect attempt cap
//! - `CARESYNC_RECONNECT_BASE_DELAY_MS`: first reconnect delay
//! - `CARESYNC_RECONNECT_MAX_DELAY_MS`: reconnect delay ceiling
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./caresync.json` or `./caresync.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use caresync_domain::constants::PUSH_ENDPOINT_PATH;
use caresync_domain::{CareSyncError, ClientConfig, Result};
use url::Url;

/// Load configuration with the full pipeline: file, environment, validation.
///
/// Probes the standard file locations; when none holds a config file the
/// built-in defaults are used. Environment variables override individual
/// fields either way.
///
/// # Errors
/// Returns `CareSyncError::Config` if:
/// - A config file exists but cannot be parsed
/// - An environment override has an invalid value
/// - The resulting configuration fails [`validate`]
pub fn load() -> Result<ClientConfig> {
    let mut config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("no config file found; using built-in defaults");
            ClientConfig::default()
        }
    };

    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// Fields absent from the file keep their defaults.
///
/// # Errors
/// Returns `CareSyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CareSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CareSyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CareSyncError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CareSyncError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CareSyncError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(CareSyncError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("caresync.json"),
            cwd.join("caresync.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("caresync.json"),
                exe_dir.join("caresync.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Overlay `CARESYNC_*` environment variables onto a loaded configuration.
///
/// Unset variables leave the corresponding field untouched.
fn apply_env_overrides(config: &mut ClientConfig) -> Result<()> {
    env_override("CARESYNC_API_BASE_URL", &mut config.api.base_url)?;
    if let Ok(raw) = std::env::var("CARESYNC_PUSH_URL") {
        config.api.push_url = Some(raw);
    }
    env_override("CARESYNC_TIMEOUT_SECONDS", &mut config.api.timeout_seconds)?;
    env_override("CARESYNC_CACHE_TTL_SECONDS", &mut config.cache.ttl_seconds)?;
    env_override("CARESYNC_CACHE_SWEEP_INTERVAL_SECONDS", &mut config.cache.sweep_interval_seconds)?;
    env_override("CARESYNC_RECONNECT_MAX_ATTEMPTS", &mut config.reconnect.max_attempts)?;
    env_override("CARESYNC_RECONNECT_BASE_DELAY_MS", &mut config.reconnect.base_delay_ms)?;
    env_override("CARESYNC_RECONNECT_MAX_DELAY_MS", &mut config.reconnect.max_delay_ms)?;
    Ok(())
}

fn env_override<T>(key: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: Display,
{
    if let Ok(raw) = std::env::var(key) {
        *target =
            raw.parse::<T>().map_err(|e| CareSyncError::Config(format!("Invalid {key}: {e}")))?;
    }
    Ok(())
}

/// Check a configuration for values that cannot work at runtime.
///
/// # Errors
/// Returns `CareSyncError::Config` if the base URL is not `http`/`https`,
/// the push URL is not `ws`/`wss`, or a timing value is zero.
pub fn validate(config: &ClientConfig) -> Result<()> {
    let base = Url::parse(&config.api.base_url)
        .map_err(|e| CareSyncError::Config(format!("Invalid API base URL: {}", e)))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(CareSyncError::Config(format!(
            "API base URL must use http or https, got '{}'",
            base.scheme()
        )));
    }

    if let Some(push_url) = &config.api.push_url {
        let push = Url::parse(push_url)
            .map_err(|e| CareSyncError::Config(format!("Invalid push URL: {}", e)))?;
        if !matches!(push.scheme(), "ws" | "wss") {
            return Err(CareSyncError::Config(format!(
                "Push URL must use ws or wss, got '{}'",
                push.scheme()
            )));
        }
    }

    if config.api.timeout_seconds == 0 {
        return Err(CareSyncError::Config("timeout_seconds must be greater than zero".to_string()));
    }
    if config.cache.sweep_interval_seconds == 0 {
        return Err(CareSyncError::Config(
            "sweep_interval_seconds must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

/// Derive the push endpoint URL from the API base URL.
///
/// `http` maps to `ws` and `https` to `wss`; host and port carry over,
/// the path is replaced with the push endpoint path.
pub fn derive_push_url(base_url: &str) -> Result<String> {
    let mut url = Url::parse(base_url)
        .map_err(|e| CareSyncError::Config(format!("Invalid API base URL: {}", e)))?;

    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => {
            return Err(CareSyncError::Config(format!(
                "Cannot derive a websocket URL from scheme '{other}'"
            )));
        }
    };

    url.set_scheme(scheme).map_err(|_| {
        CareSyncError::Config(format!("Cannot derive a websocket URL from '{base_url}'"))
    })?;
    url.set_path(PUSH_ENDPOINT_PATH);
    url.set_query(None);

    Ok(url.to_string())
}

/// The push URL to connect to: the configured one when present, otherwise
/// derived from the API base URL.
pub fn resolve_push_url(config: &ClientConfig) -> Result<String> {
    match &config.api.push_url {
        Some(url) => Ok(url.clone()),
        None => derive_push_url(&config.api.base_url),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use caresync_domain::constants::{DEFAULT_CACHE_TTL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};
    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    #[test]
    fn test_load_from_file_json_partial() {
        let json_content = r#"{
            "api": {
                "base_url": "https://clinic.example.com/api"
            }
        }"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_ok(), "Should load config from JSON file, error: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.api.base_url, "https://clinic.example.com/api");
        // Unlisted fields keep their defaults.
        assert_eq!(config.api.timeout_seconds, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.cache.ttl_seconds, DEFAULT_CACHE_TTL_SECS);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
[api]
base_url = "https://clinic.example.com/api"
timeout_seconds = 20

[cache]
ttl_seconds = 120
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_ok(), "Should load config from TOML file, error: {:?}", result.err());

        let config = result.unwrap();
        assert_eq!(config.api.timeout_seconds, 20);
        assert_eq!(config.cache.ttl_seconds, 120);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(result.is_err(), "Should fail when file not found");

        let err = result.unwrap_err();
        assert!(matches!(err, CareSyncError::Config(_)), "Should be a Config error");
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("api: {}", &PathBuf::from("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }

    #[test]
    fn test_parse_config_invalid_json() {
        let result = parse_config(r#"{ "api": { "#, &PathBuf::from("test.json"));
        assert!(result.is_err(), "Should fail with invalid JSON");
    }

    #[test]
    fn test_env_overrides_replace_fields() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("CARESYNC_API_BASE_URL", "https://override.example.com/api");
        std::env::set_var("CARESYNC_TIMEOUT_SECONDS", "30");
        std::env::set_var("CARESYNC_RECONNECT_MAX_ATTEMPTS", "8");

        let mut config = ClientConfig::default();
        apply_env_overrides(&mut config).unwrap();

        assert_eq!(config.api.base_url, "https://override.example.com/api");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.reconnect.max_attempts, 8);
        // Untouched fields keep their defaults.
        assert_eq!(config.cache.ttl_seconds, DEFAULT_CACHE_TTL_SECS);

        std::env::remove_var("CARESYNC_API_BASE_URL");
        std::env::remove_var("CARESYNC_TIMEOUT_SECONDS");
        std::env::remove_var("CARESYNC_RECONNECT_MAX_ATTEMPTS");
    }

    #[test]
    fn test_invalid_env_number_is_a_config_error() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("CARESYNC_TIMEOUT_SECONDS", "soon");

        let mut config = ClientConfig::default();
        let result = apply_env_overrides(&mut config);
        assert!(matches!(result, Err(CareSyncError::Config(_))));

        std::env::remove_var("CARESYNC_TIMEOUT_SECONDS");
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(validate(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_base_scheme() {
        let mut config = ClientConfig::default();
        config.api.base_url = "ftp://clinic.example.com/api".to_string();

        assert!(matches!(validate(&config), Err(CareSyncError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_http_push_url() {
        let mut config = ClientConfig::default();
        config.api.push_url = Some("http://clinic.example.com/ws/".to_string());

        assert!(matches!(validate(&config), Err(CareSyncError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = ClientConfig::default();
        config.api.timeout_seconds = 0;

        assert!(matches!(validate(&config), Err(CareSyncError::Config(_))));
    }

    #[test]
    fn test_derive_push_url_maps_schemes() {
        assert_eq!(
            derive_push_url("http://localhost:8000/api").unwrap(),
            "ws://localhost:8000/ws/notifications/"
        );
        assert_eq!(
            derive_push_url("https://clinic.example.com/api").unwrap(),
            "wss://clinic.example.com/ws/notifications/"
        );

        assert!(derive_push_url("file:///tmp/api").is_err());
    }

    #[test]
    fn test_resolve_prefers_configured_push_url() {
        let mut config = ClientConfig::default();
        config.api.push_url = Some("wss://push.example.com/ws/".to_string());

        assert_eq!(resolve_push_url(&config).unwrap(), "wss://push.example.com/ws/");

        config.api.push_url = None;
        assert_eq!(
            resolve_push_url(&config).unwrap(),
            "ws://localhost:8000/ws/notifications/"
        );
    }
}
