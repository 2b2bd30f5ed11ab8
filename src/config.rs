//! Configuration file parser for ~/.config/folio/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde, though we log a warning when the file
//! contains potential typos.
use crate::catalog::{CatalogSettings, LinkLabels, UiStrings};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// SEC-014: Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
///
/// SEC-015: Custom Debug impl masks `password`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Origin serving the catalog, e.g. `http://localhost:8000`.
    pub base_url: String,

    /// Catalog prefix, the first path segment of every catalog feed.
    pub catalog_prefix: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// HTTP basic auth user name.
    pub username: Option<String>,

    /// HTTP basic auth password. Only used together with `username`.
    pub password: Option<String>,

    /// Navigation label overrides, keyed by link relation.
    pub link_labels: HashMap<String, String>,

    /// UI string overrides.
    pub strings: UiStrings,

    /// Terminal color theme, `"dark"` or `"light"`.
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            catalog_prefix: "opds".to_string(),
            request_timeout_secs: 30,
            username: None,
            password: None,
            link_labels: HashMap::new(),
            strings: UiStrings::default(),
            theme: "dark".to_string(),
        }
    }
}

/// SEC-015: Mask password in Debug output to prevent secret leakage.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("catalog_prefix", &self.catalog_prefix)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("link_labels", &self.link_labels)
            .field("strings", &self.strings)
            .field("theme", &self.theme)
            .finish()
    }
}

impl Config {
    /// SEC-014: Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 8] = [
        "base_url",
        "catalog_prefix",
        "request_timeout_secs",
        "username",
        "password",
        "link_labels",
        "strings",
        "theme",
    ];

    /// Default location: `$XDG_CONFIG_HOME/folio/config.toml`, falling back
    /// to `~/.config/folio/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
        Some(base.join("folio").join("config.toml"))
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // SEC-014: Check file size before reading
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            base_url = %config.base_url,
            prefix = %config.catalog_prefix,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Immutable lookup tables for the navigator and renderers.
    pub fn settings(&self) -> CatalogSettings {
        CatalogSettings::new(
            &self.catalog_prefix,
            LinkLabels::with_overrides(&self.link_labels),
            self.strings.clone(),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.catalog_prefix, "opds");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.username.is_none());
        assert!(config.password.is_none());
        assert!(config.link_labels.is_empty());
        assert_eq!(config.strings, UiStrings::default());
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/folio_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.catalog_prefix, "opds");
    }

    #[test]
    fn test_empty_file_returns_default() {
        let (dir, path) = write_config("folio_config_test_empty", "");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let (dir, path) = write_config("folio_config_test_whitespace", "   \n  \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.catalog_prefix, "opds");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let (dir, path) = write_config(
            "folio_config_test_partial",
            "base_url = \"https://books.example\"\n",
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, "https://books.example");
        assert_eq!(config.catalog_prefix, "opds");
        assert_eq!(config.request_timeout_secs, 30);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
base_url = "https://library.example:8443"
catalog_prefix = "catalog"
request_timeout_secs = 10
username = "reader"
password = "secret"
theme = "light"

[link_labels]
start = "ГЛАВНАЯ"
first = "FIRST"

[strings]
added = "Добавлено"
empty_query = "Введите поисковой запрос"
"#;
        let (dir, path) = write_config("folio_config_test_full", content);

        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, "https://library.example:8443");
        assert_eq!(config.catalog_prefix, "catalog");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.username.as_deref(), Some("reader"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.theme, "light");
        assert_eq!(config.strings.added, "Добавлено");
        // Unset strings keep their defaults
        assert_eq!(config.strings.fetch_failed, "Failed to fetch OPDS data");

        let settings = config.settings();
        assert_eq!(settings.prefix, "catalog");
        assert_eq!(settings.labels.label_for(Some("start"), "/"), "ГЛАВНАЯ");
        assert_eq!(settings.labels.label_for(Some("first"), "/"), "FIRST");
        assert_eq!(settings.labels.label_for(Some("next"), "/"), "NEXT");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("folio_config_test_invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let content = r#"
catalog_prefix = "opds"
totally_fake_key = "should not fail"
"#;
        let (dir, path) = write_config("folio_config_test_unknown", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.catalog_prefix, "opds");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let (dir, path) = write_config("folio_config_test_wrongtype", "request_timeout_secs = \"soon\"\n");
        assert!(Config::load(&path).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    // SEC-014: File size limit
    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("folio_config_test_too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        std::fs::remove_dir_all(&dir).ok();
    }

    // SEC-015: Debug output masks the password
    #[test]
    fn test_debug_masks_password() {
        let config = Config {
            username: Some("reader".to_string()),
            password: Some("hunter2-secret".to_string()),
            ..Config::default()
        };
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("hunter2-secret"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(debug_output.contains("reader"));
    }

    #[test]
    fn test_settings_trim_prefix_slashes() {
        let config = Config {
            catalog_prefix: "/opds/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.settings().prefix, "opds");
    }
}
