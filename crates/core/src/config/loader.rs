//! Configuration file loader for `omni.toml`.
//!
//! All keys are optional; anything missing falls back to the built-in
//! local-development defaults, and `OMNI_*` environment variables override
//! the file.

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::models::AppConfig;
use serde::Deserialize;
use std::path::Path;

/// On-disk shape of `omni.toml`. Every key is optional.
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    backend_url: Option<String>,
    store_url: Option<String>,
    store_key: Option<String>,
}

/// Loads configuration from `<root>/omni.toml`, then applies `OMNI_*`
/// environment overrides.
///
/// A missing file is not an error: the defaults apply unchanged.
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let mut config = load_file_config(&root.join("omni.toml"))?;
    apply_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

fn load_file_config(path: &Path) -> ConfigResult<AppConfig> {
    let mut config = AppConfig::default();

    if !path.exists() {
        return Ok(config);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let file: FileConfig = toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(backend_url) = file.backend_url {
        config.backend_url = backend_url;
    }
    if let Some(store_url) = file.store_url {
        config.store_url = store_url;
    }
    if let Some(store_key) = file.store_key {
        config.store_key = store_key;
    }

    Ok(config)
}

/// Applies environment-style overrides from a lookup function.
///
/// Split out from [`load_config`] so tests can inject values without
/// mutating the process environment.
pub fn apply_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(backend_url) = lookup("OMNI_BACKEND_URL") {
        config.backend_url = backend_url;
    }
    if let Some(store_url) = lookup("OMNI_STORE_URL") {
        config.store_url = store_url;
    }
    if let Some(store_key) = lookup("OMNI_STORE_KEY") {
        config.store_key = store_key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.backend_url, "https://api.localhost");
        assert_eq!(config.store_url, "http://localhost:8000");
        assert_eq!(config.store_key, "");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("omni.toml"),
            r#"
backend_url = "https://api.example.com"
store_key = "anon-key"
"#,
        )
        .unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.backend_url, "https://api.example.com");
        // Unset keys keep their defaults
        assert_eq!(config.store_url, "http://localhost:8000");
        assert_eq!(config.store_key, "anon-key");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("omni.toml"), "backend_url = [broken").unwrap();

        let result = load_config(dir.path());
        assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
    }

    #[test]
    fn env_overrides_beat_file_values() {
        let mut config = AppConfig {
            backend_url: "https://from-file.example.com".to_string(),
            ..AppConfig::default()
        };

        apply_overrides(&mut config, |name| match name {
            "OMNI_BACKEND_URL" => Some("https://from-env.example.com".to_string()),
            _ => None,
        });

        assert_eq!(config.backend_url, "https://from-env.example.com");
        assert_eq!(config.store_url, "http://localhost:8000");
    }
}
