// ── Gateway contract ──
//
// Everything the content stores need from the hosted backend: table
// reads and writes, object storage, and the auth session. Stores hold
// an `Arc<dyn Gateway>` and never see HTTP.

use async_trait::async_trait;
use bytes::Bytes;
use secrecy::SecretString;
use tokio::sync::watch;

use crate::auth::Session;
use crate::error::Error;
use crate::query::{Filter, Select};
use crate::row::Row;

/// Options for a single object upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// `Cache-Control` max-age in seconds, as a string.
    pub cache_control: String,
    /// Overwrite an existing object at the same path.
    pub upsert: bool,
    pub content_type: Option<String>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            cache_control: "3600".into(),
            upsert: false,
            content_type: None,
        }
    }
}

#[async_trait]
pub trait Gateway: Send + Sync {
    // ── Tables ───────────────────────────────────────────────────────

    /// Read rows. Unknown tables fail with a table-missing error.
    async fn select(&self, query: &Select) -> Result<Vec<Row>, Error>;

    /// Insert rows and return them as stored (with generated columns).
    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, Error>;

    /// Apply `patch` to every row matching all `filters`.
    async fn update(&self, table: &str, patch: Row, filters: &[Filter]) -> Result<(), Error>;

    /// Delete every row matching all `filters`.
    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), Error>;

    // ── Object storage ───────────────────────────────────────────────

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> Result<(), Error>;

    /// The public URL of an object. Pure; performs no I/O.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), Error>;

    // ── Auth ─────────────────────────────────────────────────────────

    async fn get_session(&self) -> Result<Option<Session>, Error>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, Error>;

    async fn sign_out(&self) -> Result<(), Error>;

    /// Session changes pushed by the gateway (sign-in, sign-out, expiry).
    fn subscribe_auth(&self) -> watch::Receiver<Option<Session>>;
}
