use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the hospital REST backend, without the `/api` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Budget for the startup `/api/health` probe.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Budget for the `/api/user` identity fetch issued after a successful probe.
    #[serde(default = "default_identity_timeout_ms")]
    pub identity_timeout_ms: u64,

    /// Budget for the best-effort `/api/logout` notification.
    #[serde(default = "default_logout_timeout_ms")]
    pub logout_timeout_ms: u64,

    /// Budget for every other request (login, register, doctors, appointments, users).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default)]
    pub credentials: CredentialTransport,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_probe_timeout_ms() -> u64 {
    3_000
}

fn default_identity_timeout_ms() -> u64 {
    10_000
}

fn default_logout_timeout_ms() -> u64 {
    3_000
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            probe_timeout_ms: default_probe_timeout_ms(),
            identity_timeout_ms: default_identity_timeout_ms(),
            logout_timeout_ms: default_logout_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            credentials: CredentialTransport::default(),
        }
    }
}

/// How stored credentials travel with every request.
///
/// `Cookies` keeps a cookie jar on the HTTP client, which is what the backend's
/// session cookie expects. `Bearer` attaches a fixed token instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialTransport {
    #[default]
    Cookies,
    Bearer(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a daily file under `directory` (default `~/.carebook/logs`).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// Level for the `carebook*` targets, e.g. "debug"; full EnvFilter directives are used as-is.
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    false
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.backend.base_url, "http://localhost:5000");
        assert_eq!(cfg.backend.probe_timeout_ms, 3_000);
        assert_eq!(cfg.backend.logout_timeout_ms, 3_000);
        assert_eq!(cfg.backend.credentials, CredentialTransport::Cookies);
        assert!(cfg.logging.enabled);
        assert!(!cfg.logging.file);
    }

    #[test]
    fn test_bearer_credentials_parse() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [backend]
            base_url = "https://clinic.example.org"
            credentials = { bearer = "abc" }
            "#,
        )
        .unwrap();
        assert_eq!(cfg.backend.base_url, "https://clinic.example.org");
        assert_eq!(
            cfg.backend.credentials,
            CredentialTransport::Bearer("abc".to_string())
        );
        assert_eq!(cfg.backend.request_timeout_ms, 10_000);
    }
}
