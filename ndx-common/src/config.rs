//! Configuration loading and resolution
//!
//! Per-field resolution priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default backend (collection store + usage meter) base URL
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:3000";

/// Default recognizer endpoint (multipart image POST)
pub const DEFAULT_RECOGNIZER_URL: &str = "http://127.0.0.1:8000/describe";

const ENV_CONFIG_PATH: &str = "NDX_CONFIG";
const ENV_BACKEND_URL: &str = "NDX_BACKEND_URL";
const ENV_RECOGNIZER_URL: &str = "NDX_RECOGNIZER_URL";
const ENV_AUTH_TOKEN: &str = "NDX_AUTH_TOKEN";
const ENV_USER_ID: &str = "NDX_USER_ID";

/// Resolved engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Backend base URL (discovery store, usage meter, collection state)
    pub backend_url: String,
    /// Recognizer endpoint URL
    pub recognizer_url: String,
    /// Bearer token identifying the signed-in user (backend calls)
    pub auth_token: Option<String>,
    /// User id for read-only usage queries
    pub user_id: Option<String>,
}

/// Config file shape (all fields optional; unset fields fall through)
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    backend_url: Option<String>,
    recognizer_url: Option<String>,
    auth_token: Option<String>,
    user_id: Option<String>,
}

/// Command-line overrides, each taking priority over every other source
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    /// Explicit config file path (overrides the NDX_CONFIG / platform path)
    pub config_path: Option<PathBuf>,
    pub backend_url: Option<String>,
    pub recognizer_url: Option<String>,
    pub auth_token: Option<String>,
    pub user_id: Option<String>,
}

/// Resolve the engine configuration from all sources
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<EngineConfig> {
    let file = load_file_config(overrides.config_path.as_deref())?;

    Ok(EngineConfig {
        backend_url: resolve_field(
            overrides.backend_url.clone(),
            ENV_BACKEND_URL,
            file.backend_url,
        )
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
        recognizer_url: resolve_field(
            overrides.recognizer_url.clone(),
            ENV_RECOGNIZER_URL,
            file.recognizer_url,
        )
        .unwrap_or_else(|| DEFAULT_RECOGNIZER_URL.to_string()),
        auth_token: resolve_field(overrides.auth_token.clone(), ENV_AUTH_TOKEN, file.auth_token),
        user_id: resolve_field(overrides.user_id.clone(), ENV_USER_ID, file.user_id),
    })
}

/// Apply the CLI > ENV > file priority for one field
fn resolve_field(cli: Option<String>, env_var: &str, file: Option<String>) -> Option<String> {
    cli.or_else(|| std::env::var(env_var).ok()).or(file)
}

/// Load the TOML config file, if one can be located
///
/// An explicitly requested path (CLI or NDX_CONFIG) must exist and parse; a
/// missing file at the platform default path is not an error.
fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit_path {
        Some(p) => Some(p.to_path_buf()),
        None => match std::env::var(ENV_CONFIG_PATH) {
            Ok(p) => Some(PathBuf::from(p)),
            Err(_) => default_config_path().filter(|p| p.exists()),
        },
    };

    let Some(path) = path else {
        return Ok(FileConfig::default());
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

    tracing::debug!("Loaded config file: {}", path.display());

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Platform default config file path (~/.config/naturedex/config.toml on Linux)
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("naturedex").join("config.toml"))
}
