//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use sitedesk_config::ConfigError;
use sitedesk_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFIG: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("{source}")]
    #[diagnostic(
        code(sitedesk::config),
        help(
            "Set SITEDESK_URL and SITEDESK_PUBLIC_KEY, or add url and public_key to {path}"
        )
    )]
    Config {
        #[source]
        source: ConfigError,
        path: String,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Sign-in required but no email was given")]
    #[diagnostic(
        code(sitedesk::no_credentials),
        help("Pass --email or set SITEDESK_EMAIL; the password is read from SITEDESK_PASSWORD or prompted.")
    )]
    NoCredentials,

    #[error("Authentication failed: {message}")]
    #[diagnostic(code(sitedesk::auth_failed), help("Check the email and password."))]
    AuthFailed { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{entity_type} '{identifier}' not found")]
    #[diagnostic(
        code(sitedesk::not_found),
        help("Run: sitedesk list <kind> to see available items")
    )]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Could not find any of these tables: {candidates}")]
    #[diagnostic(
        code(sitedesk::schema),
        help("The backend does not expose a table for this kind under any known name.")
    )]
    SchemaUnresolved { candidates: String },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Backend error: {message}")]
    #[diagnostic(code(sitedesk::backend))]
    Backend { message: String, status: Option<u16> },

    #[error("{message}")]
    #[diagnostic(code(sitedesk::failed))]
    Failed { message: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(sitedesk::validation))]
    Validation { field: String, reason: String },

    #[error("Could not read {path}")]
    #[diagnostic(code(sitedesk::io))]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(sitedesk::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => exit_code::CONFIG,
            Self::NoCredentials | Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Backend { status: None, .. } => exit_code::CONNECTION,
            Self::SchemaUnresolved { .. }
            | Self::Backend { .. }
            | Self::Failed { .. }
            | Self::ReadFile { .. }
            | Self::Io(_)
            | Self::Json(_) => exit_code::GENERAL,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(source: ConfigError) -> Self {
        Self::Config {
            source,
            path: sitedesk_config::config_path().display().to_string(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SchemaUnresolved { candidates } => Self::SchemaUnresolved {
                candidates: candidates.join(", "),
            },
            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                entity_type,
                identifier,
            },
            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::Config { message } => Self::Validation {
                field: "configuration".into(),
                reason: message,
            },
            CoreError::Gateway {
                message, status, ..
            } => Self::Backend { message, status },
            CoreError::OperationFailed { message } | CoreError::Decode { message } => {
                Self::Failed { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_setting_is_a_config_error() {
        let err = CliError::from(ConfigError::Missing {
            key: "url",
            env: "SITEDESK_URL".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONFIG);
        assert!(err.to_string().contains("'url'"));
    }

    #[test]
    fn unreachable_backend_maps_to_connection() {
        let err = CliError::from(CoreError::Gateway {
            message: "cannot reach backend".into(),
            code: None,
            status: None,
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }
}
