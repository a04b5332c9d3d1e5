//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.querychat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct QueryChatConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub query_path: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    /// Open the history panel on startup.
    pub show_history: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_QUERY_PATH: &str = "/query";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub query_path: String,
    pub show_history: bool,
}

/// Values that can come from the environment. Split out so resolution
/// stays a pure function in tests.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub base_url: Option<String>,
    pub query_path: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("QUERYCHAT_API_URL").ok(),
            query_path: std::env::var("QUERYCHAT_QUERY_PATH").ok(),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.querychat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".querychat").join("config.toml"))
}

/// Load config from `~/.querychat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `QueryChatConfig::default()`.
pub fn load_config() -> Result<QueryChatConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(QueryChatConfig::default());
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<QueryChatConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(QueryChatConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: QueryChatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# QueryChat Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://localhost:8000"   # Or set QUERYCHAT_API_URL
# query_path = "/query"                # Or set QUERYCHAT_QUERY_PATH

# [ui]
# show_history = false
"#;

fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_TEMPLATE) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_base_url` is from the `--api-url` flag (None = not specified).
pub fn resolve(
    config: &QueryChatConfig,
    env: &EnvOverrides,
    cli_base_url: Option<&str>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli_base_url
        .map(|s| s.to_string())
        .or_else(|| env.base_url.clone())
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Query path: env → config → default
    let query_path = env
        .query_path
        .clone()
        .or_else(|| config.backend.query_path.clone())
        .unwrap_or_else(|| DEFAULT_QUERY_PATH.to_string());

    ResolvedConfig {
        base_url,
        query_path,
        show_history: config.ui.show_history.unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve(&QueryChatConfig::default(), &EnvOverrides::default(), None);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.query_path, DEFAULT_QUERY_PATH);
        assert!(!resolved.show_history);
    }

    #[test]
    fn test_override_order() {
        let config = QueryChatConfig {
            backend: BackendConfig {
                base_url: Some("http://from-file:1".into()),
                query_path: Some("/api/query".into()),
            },
            ..Default::default()
        };
        let env = EnvOverrides {
            base_url: Some("http://from-env:2".into()),
            query_path: None,
        };

        let resolved = resolve(&config, &EnvOverrides::default(), None);
        assert_eq!(resolved.base_url, "http://from-file:1");
        assert_eq!(resolved.query_path, "/api/query");

        let resolved = resolve(&config, &env, None);
        assert_eq!(resolved.base_url, "http://from-env:2");

        let resolved = resolve(&config, &env, Some("http://from-cli:3"));
        assert_eq!(resolved.base_url, "http://from-cli:3");
        assert_eq!(resolved.query_path, "/api/query");
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[backend]
base_url = "http://10.0.0.5:8000"
"#;
        let config: QueryChatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url.as_deref(), Some("http://10.0.0.5:8000"));
        assert!(config.backend.query_path.is_none());
        assert!(config.ui.show_history.is_none());
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let config: QueryChatConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(config.backend.base_url.is_none());
    }

    #[test]
    fn test_missing_file_is_generated() {
        let dir = std::env::temp_dir().join(format!("querychat-test-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.backend.base_url.is_none());
        assert!(path.exists());

        fs::write(&path, "[ui]\nshow_history = true\n").unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.ui.show_history, Some(true));

        fs::write(&path, "[ui\n").unwrap();
        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));

        let _ = fs::remove_dir_all(dir);
    }
}
