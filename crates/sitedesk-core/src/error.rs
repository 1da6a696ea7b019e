// ── Core error types ──
//
// User-facing errors from sitedesk-core. Stores surface these as plain
// messages in their error slot; only the gateway's "table missing"
// signal is interpreted, and that happens inside the resolver.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Schema errors ────────────────────────────────────────────────
    #[error("Could not find any of these tables: {}", candidates.join(", "))]
    SchemaUnresolved { candidates: Vec<String> },

    // ── Auth errors ──────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Unexpected row shape: {message}")]
    Decode { message: String },

    // ── Gateway errors (wrapped, not exposed raw) ────────────────────
    #[error("{message}")]
    Gateway {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Message for a store's error slot, with a fallback when the
    /// underlying error carries no text.
    pub fn user_message(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_owned()
        } else {
            message
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<sitedesk_api::Error> for CoreError {
    fn from(err: sitedesk_api::Error) -> Self {
        match err {
            sitedesk_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            sitedesk_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Gateway {
                message,
                code,
                status: Some(status),
            },
            sitedesk_api::Error::Storage { message, status } => CoreError::Gateway {
                message,
                code: None,
                status: Some(status),
            },
            sitedesk_api::Error::Transport(ref e) => {
                let message = if e.is_timeout() {
                    "request timed out".to_owned()
                } else if e.is_connect() {
                    format!("cannot reach backend: {e}")
                } else {
                    e.to_string()
                };
                CoreError::Gateway {
                    message,
                    code: None,
                    status: e.status().map(|s| s.as_u16()),
                }
            }
            sitedesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid backend URL: {e}"),
            },
            sitedesk_api::Error::Tls(message) => CoreError::Config { message },
            sitedesk_api::Error::Deserialization { message, .. } => CoreError::Decode { message },
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Decode {
            message: err.to_string(),
        }
    }
}
