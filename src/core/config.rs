//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.adl-chat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::history::DEFAULT_HISTORY_LIMIT;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AdlConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub service_key: Option<String>,
    pub platform: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub history_limit: Option<usize>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_PLATFORM: &str = "terminal";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub service_key: Option<String>,
    pub platform: String,
    pub connect_timeout: Option<Duration>,
    pub history_limit: usize,
}

/// Overrides taken from the command line (None = flag not given).
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub base_url: Option<&'a str>,
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

/// Returns the path to `~/.adl-chat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".adl-chat").join("config.toml"))
}

/// Load config from `~/.adl-chat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `AdlConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<AdlConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(AdlConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(AdlConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<AdlConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AdlConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    // Never log the key itself
    debug!(
        "Config: base_url={:?}, service_key set={}, platform={:?}, history_limit={:?}",
        config.service.base_url,
        config.service.service_key.is_some(),
        config.service.platform,
        config.general.history_limit
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Adl Chat Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [service]
# base_url = "http://localhost:8000"     # Or set ADL_BASE_URL, or pass --base-url
# service_key = "..."                    # Or set ADL_SERVICE_KEY; header omitted when unset
# platform = "terminal"                  # Sent as user_context.platform (or ADL_PLATFORM)
# connect_timeout_secs = 10              # Bounds connection setup only

# [general]
# history_limit = 10                     # Turns sent back with each question
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &AdlConfig, cli: &CliOverrides<'_>) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &AdlConfig,
    cli: &CliOverrides<'_>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .map(|s| s.to_string())
        .or_else(|| env("ADL_BASE_URL"))
        .or_else(|| config.service.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Service key: env → config; empty means unset
    let service_key = env("ADL_SERVICE_KEY")
        .or_else(|| config.service.service_key.clone())
        .filter(|k| !k.trim().is_empty());

    // Platform: env → config → default
    let platform = env("ADL_PLATFORM")
        .or_else(|| config.service.platform.clone())
        .unwrap_or_else(|| DEFAULT_PLATFORM.to_string());

    ResolvedConfig {
        base_url,
        service_key,
        platform,
        connect_timeout: config.service.connect_timeout_secs.map(Duration::from_secs),
        history_limit: config
            .general
            .history_limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_is_empty() {
        let config = AdlConfig::default();
        assert!(config.service.base_url.is_none());
        assert!(config.general.history_limit.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&AdlConfig::default(), &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.platform, DEFAULT_PLATFORM);
        assert_eq!(resolved.history_limit, 10);
        assert!(resolved.service_key.is_none());
        assert!(resolved.connect_timeout.is_none());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = AdlConfig {
            service: ServiceConfig {
                base_url: Some("https://legal.example.com".to_string()),
                service_key: Some("from-file".to_string()),
                platform: Some("kiosk".to_string()),
                connect_timeout_secs: Some(5),
            },
            general: GeneralConfig {
                history_limit: Some(4),
            },
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert_eq!(resolved.base_url, "https://legal.example.com");
        assert_eq!(resolved.service_key.as_deref(), Some("from-file"));
        assert_eq!(resolved.platform, "kiosk");
        assert_eq!(resolved.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(resolved.history_limit, 4);
    }

    #[test]
    fn test_env_overrides_config() {
        let config = AdlConfig {
            service: ServiceConfig {
                base_url: Some("https://from-file".to_string()),
                service_key: Some("from-file".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let env: HashMap<&str, &str> = [
            ("ADL_BASE_URL", "https://from-env"),
            ("ADL_SERVICE_KEY", "from-env"),
            ("ADL_PLATFORM", "ci"),
        ]
        .into_iter()
        .collect();

        let resolved = resolve_with_env(&config, &CliOverrides::default(), |k| {
            env.get(k).map(|v| v.to_string())
        });
        assert_eq!(resolved.base_url, "https://from-env");
        assert_eq!(resolved.service_key.as_deref(), Some("from-env"));
        assert_eq!(resolved.platform, "ci");
    }

    #[test]
    fn test_cli_base_url_wins() {
        let cli = CliOverrides {
            base_url: Some("http://127.0.0.1:9000"),
        };
        let resolved = resolve_with_env(&AdlConfig::default(), &cli, |k| {
            (k == "ADL_BASE_URL").then(|| "https://from-env".to_string())
        });
        assert_eq!(resolved.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_blank_service_key_is_unset() {
        let config = AdlConfig {
            service: ServiceConfig {
                service_key: Some("  ".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert!(resolved.service_key.is_none());
    }

    #[test]
    fn test_toml_parses() {
        let toml_str = r#"
[service]
base_url = "https://legal.example.com"
service_key = "sk-test-123"
platform = "terminal"
connect_timeout_secs = 10

[general]
history_limit = 6
"#;
        let config: AdlConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.service.base_url.as_deref(),
            Some("https://legal.example.com")
        );
        assert_eq!(config.service.service_key.as_deref(), Some("sk-test-123"));
        assert_eq!(config.service.connect_timeout_secs, Some(10));
        assert_eq!(config.general.history_limit, Some(6));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[general]
history_limit = 20
"#;
        let config: AdlConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.history_limit, Some(20));
        assert!(config.service.base_url.is_none());
        assert!(config.service.service_key.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = std::env::temp_dir().join(format!("adl-chat-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[service\nbase_url = ").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_generated_default_parses_to_empty_config() {
        let dir = std::env::temp_dir().join(format!("adl-chat-default-{}", std::process::id()));
        let path = dir.join("config.toml");
        generate_default_config(&path);

        let config = load_config_from(&path).unwrap();
        assert!(config.service.base_url.is_none());
        assert!(config.general.history_limit.is_none());

        fs::remove_dir_all(&dir).unwrap();
    }
}
