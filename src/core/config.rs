//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.blogforge/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::generation::{Audience, GenerationSettings, Tone};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BlogforgeConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub user_id: Option<i64>,
    /// 0 disables the timeout.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GenerationConfig {
    pub tone: Option<Tone>,
    pub audience: Option<Audience>,
    pub length: Option<u32>,
    pub keywords: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_USER_ID: i64 = 1;
/// Generation runs a multi-step pipeline server-side; allow it time.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

pub const ENV_API_URL: &str = "BLOGFORGE_API_URL";
pub const ENV_USER_ID: &str = "BLOGFORGE_USER_ID";
pub const ENV_TIMEOUT_SECS: &str = "BLOGFORGE_TIMEOUT_SECS";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub user_id: i64,
    /// `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    pub settings: GenerationSettings,
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

/// Returns the path to `~/.blogforge/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".blogforge").join("config.toml"))
}

/// Load config from `~/.blogforge/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `BlogforgeConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<BlogforgeConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(BlogforgeConfig::default());
        }
    };
    load_config_from(&path)
}

fn load_config_from(path: &Path) -> Result<BlogforgeConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(BlogforgeConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: BlogforgeConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# Blogforge Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://localhost:8000/api"   # Or BLOGFORGE_API_URL / --api-url
# user_id = 1                              # Or BLOGFORGE_USER_ID
# request_timeout_secs = 300               # 0 = wait forever; or BLOGFORGE_TIMEOUT_SECS

# [generation]
# tone = "professional"      # professional, witty, casual, formal, experimental
# audience = "general"       # general, technical, c-suite, creators, venture-scale
# length = 1000              # words
# keywords = "rust, async"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_api_url` is the `--api-url` flag (None = not specified).
pub fn resolve(config: &BlogforgeConfig, cli_api_url: Option<&str>) -> ResolvedConfig {
    resolve_with_env(config, cli_api_url, &|key| std::env::var(key).ok())
}

/// [`resolve`] with an injectable environment lookup.
pub fn resolve_with_env(
    config: &BlogforgeConfig,
    cli_api_url: Option<&str>,
    env: &dyn Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli_api_url
        .map(|s| s.to_string())
        .or_else(|| env(ENV_API_URL))
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // User id: env → config → default
    let user_id = env_parsed(env, ENV_USER_ID)
        .or(config.backend.user_id)
        .unwrap_or(DEFAULT_USER_ID);

    // Timeout: env → config → default; 0 disables
    let timeout_secs = env_parsed(env, ENV_TIMEOUT_SECS)
        .or(config.backend.request_timeout_secs)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    let request_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

    let generation = &config.generation;
    ResolvedConfig {
        base_url,
        user_id,
        request_timeout,
        settings: GenerationSettings {
            tone: generation.tone,
            audience: generation.audience,
            length: generation.length.filter(|&words| words > 0),
            keywords: generation
                .keywords
                .clone()
                .filter(|k| !k.trim().is_empty()),
        },
    }
}

fn env_parsed<T: std::str::FromStr>(env: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}
