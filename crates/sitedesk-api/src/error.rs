use thiserror::Error;

/// PostgREST code for "relation not found in the schema cache".
pub const TABLE_MISSING_CODE: &str = "PGRST205";

/// PostgREST code for "single row requested, zero rows returned".
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Top-level error type for the `sitedesk-api` crate.
///
/// Covers every failure mode across the gateway surfaces: the REST
/// data API, object storage, and the auth endpoints. Only the
/// [`TABLE_MISSING_CODE`] code carries meaning for callers; everything
/// else is surfaced as an opaque message.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Sign-in rejected (wrong credentials, unconfirmed account, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data API ────────────────────────────────────────────────────
    /// Structured error from the data API (`{code, message, details, hint}`).
    #[error("{message}")]
    Api {
        message: String,
        code: Option<String>,
        status: u16,
    },

    // ── Storage ─────────────────────────────────────────────────────
    /// Error from the object storage API.
    #[error("Storage error (HTTP {status}): {message}")]
    Storage { message: String, status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Build a data API error carrying a PostgREST code.
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            code: Some(code.into()),
            status,
        }
    }

    /// The error a backend returns when a table does not exist.
    pub fn table_missing(table: &str) -> Self {
        Self::api(
            404,
            TABLE_MISSING_CODE,
            format!("Could not find the table 'public.{table}' in the schema cache"),
        )
    }

    /// Returns `true` if this error means "table not found".
    ///
    /// This is the only error the schema resolver interprets; permission
    /// and transport failures are not evidence that a table is absent.
    pub fn is_table_missing(&self) -> bool {
        self.api_error_code() == Some(TABLE_MISSING_CODE)
    }

    /// Returns `true` if a single-row request matched nothing.
    pub fn is_no_rows(&self) -> bool {
        self.api_error_code() == Some(NO_ROWS_CODE)
    }

    /// Returns `true` if this error indicates the session is no longer valid.
    pub fn is_auth_expired(&self) -> bool {
        match self {
            Self::Authentication { .. } => true,
            Self::Api { status, .. } | Self::Storage { status, .. } => *status == 401,
            _ => false,
        }
    }

    /// Extract the API error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
