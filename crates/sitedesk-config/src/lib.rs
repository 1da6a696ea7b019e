//! Startup configuration for sitedesk tools.
//!
//! Two values are required before anything can talk to the backend: the
//! project URL and its public key. They come from `SITEDESK_*`
//! environment variables layered over an optional TOML file, and are
//! translated into a `sitedesk_core::GatewayConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sitedesk_core::{GatewayConfig, TlsVerification};

const ENV_PREFIX: &str = "SITEDESK_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting '{key}' (set {env} or add it to the config file)")]
    Missing { key: &'static str, env: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML / env shape ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Backend project URL, e.g. `https://abc.supabase.co`.
    pub url: Option<String>,

    /// Public (anon) key sent as `apikey` on every request.
    pub public_key: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Extra CA certificate for the backend connection.
    pub ca_cert: Option<PathBuf>,

    /// Default sign-in email for the CLI.
    pub email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            public_key: None,
            timeout: default_timeout(),
            ca_cert: None,
            email: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Platform config file location (`.../sitedesk/config.toml`).
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "sitedesk", "sitedesk").map_or_else(
        || PathBuf::from(".sitedesk").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load from `path` (or the platform default) with environment overrides.
/// A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).only(&["url", "public_key", "timeout", "ca_cert", "email"]))
        .extract()?;
    Ok(config)
}

/// Load and validate in one step.
pub fn load_gateway_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    load_config(path)?.gateway_config()
}

impl Config {
    /// Validate the required settings and build the gateway configuration.
    pub fn gateway_config(&self) -> Result<GatewayConfig, ConfigError> {
        let raw_url = required(self.url.as_deref(), "url")?;
        let url: url::Url = raw_url.parse().map_err(|e| ConfigError::Validation {
            field: "url".into(),
            reason: format!("{raw_url}: {e}"),
        })?;
        let public_key = required(self.public_key.as_deref(), "public_key")?;

        let mut config = GatewayConfig::new(url, SecretString::from(public_key.to_owned()));
        config.timeout = Duration::from_secs(self.timeout);
        if let Some(ca) = &self.ca_cert {
            config.tls = TlsVerification::CustomCa(ca.clone());
        }
        Ok(config)
    }
}

/// Empty strings count as missing.
fn required<'a>(value: Option<&'a str>, key: &'static str) -> Result<&'a str, ConfigError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::Missing {
            key,
            env: format!("{ENV_PREFIX}{}", key.to_uppercase()),
        }),
    }
}
