use std::path::{Path, PathBuf};

use super::types::{AppConfig, CredentialTransport};
use crate::error::ConfigError;

pub const ENV_API_URL: &str = "CAREBOOK_API_URL";
pub const ENV_API_TOKEN: &str = "CAREBOOK_API_TOKEN";

/// Get the default carebook data directory: ~/.carebook
pub fn get_carebook_data_dir() -> Result<PathBuf, ConfigError> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| ConfigError::HomeDir)?;
    Ok(PathBuf::from(home).join(".carebook"))
}

pub fn load_default() -> Result<AppConfig, ConfigError> {
    // Priority 1: ~/.carebook/config.toml
    let user_config = get_carebook_data_dir()?.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if user_config.exists() {
        load_from_path(&user_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    validate(&cfg)?;
    Ok(cfg)
}

pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str::<AppConfig>(&s).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Environment variables win over any file.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_API_URL) {
        if !v.trim().is_empty() {
            cfg.backend.base_url = v.trim().to_string();
        }
    }
    if let Some(v) = lookup(ENV_API_TOKEN) {
        if !v.trim().is_empty() {
            cfg.backend.credentials = CredentialTransport::Bearer(v.trim().to_string());
        }
    }
}

pub fn validate(cfg: &AppConfig) -> Result<(), ConfigError> {
    let url = cfg.backend.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Invalid(format!(
            "backend.base_url must be an http(s) URL, got {url:?}"
        )));
    }

    let timeouts = [
        ("probe_timeout_ms", cfg.backend.probe_timeout_ms),
        ("identity_timeout_ms", cfg.backend.identity_timeout_ms),
        ("logout_timeout_ms", cfg.backend.logout_timeout_ms),
        ("request_timeout_ms", cfg.backend.request_timeout_ms),
    ];
    if let Some((name, _)) = timeouts.iter().find(|(_, v)| *v == 0) {
        return Err(ConfigError::Invalid(format!(
            "backend.{name} must be greater than zero"
        )));
    }

    if let CredentialTransport::Bearer(token) = &cfg.backend.credentials {
        if token.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "backend.credentials.bearer must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}
