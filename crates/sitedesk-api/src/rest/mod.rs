// Hosted-backend HTTP gateway.
//
// Wraps `reqwest::Client` with project-key headers, bearer-token
// selection and error-body parsing. Endpoint families live in sibling
// files as inherent methods (`tables`, `storage`, `auth`); this module
// keeps the transport mechanics and the `Gateway` impl that ties them
// together.

mod auth;
mod storage;
mod tables;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use url::Url;

use crate::auth::Session;
use crate::error::Error;
use crate::gateway::{Gateway, UploadOptions};
use crate::query::{Filter, Select};
use crate::row::Row;
use crate::transport::TransportConfig;

// ── Error response shapes ────────────────────────────────────────────

/// PostgREST, storage and auth each use a slightly different error body.
/// All fields are optional so one struct parses any of them.
#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ErrorResponse {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.error_description)
            .or(self.msg)
            .or(self.error)
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async gateway to a hosted Postgres + storage + auth project.
///
/// Every request carries the project's public key in `apikey`. Requests
/// made while signed in carry the session's access token as the bearer;
/// otherwise the public key doubles as the bearer.
pub struct RestGateway {
    http: reqwest::Client,
    base_url: Url,
    public_key: SecretString,
    session: watch::Sender<Option<Session>>,
}

impl RestGateway {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from the project URL and public key.
    pub fn new(
        base_url: &str,
        public_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut key_value =
            HeaderValue::from_str(public_key.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid public key header value: {e}"),
            })?;
        key_value.set_sensitive(true);
        headers.insert("apikey", key_value);

        let http = transport.build_client_with_headers(headers)?;
        Self::from_parts(base_url, http, public_key.clone())
    }

    /// Wrap an existing `reqwest::Client` (caller manages the `apikey` header).
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        public_key: SecretString,
    ) -> Result<Self, Error> {
        Self::from_parts(base_url, http, public_key)
    }

    fn from_parts(
        base_url: &str,
        http: reqwest::Client,
        public_key: SecretString,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        let (session, _) = watch::channel(None);
        Ok(Self {
            http,
            base_url,
            public_key,
            session,
        })
    }

    /// Ensure the base URL ends with `/` so relative joins append.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn rest_url(&self, table: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("rest/v1/{table}"))?)
    }

    fn storage_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("storage/v1/{path}"))?)
    }

    fn auth_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("auth/v1/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Attach the bearer token for the current session (or the public key).
    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let session = self.session.borrow();
        let token = session
            .as_ref()
            .map_or(self.public_key.expose_secret(), |s| {
                s.access_token.expose_secret()
            });
        builder.bearer_auth(token)
    }

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_api_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_api_error(status, resp).await)
        }
    }

    async fn parse_api_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(err) => {
                let code = err.code.clone();
                Error::Api {
                    status: status.as_u16(),
                    message: err.into_message().unwrap_or_else(|| status.to_string()),
                    code,
                }
            }
            Err(_) => Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            },
        }
    }

    async fn parse_storage_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(ErrorResponse::into_message)
            .unwrap_or(if raw.is_empty() {
                status.to_string()
            } else {
                raw
            });
        Error::Storage {
            message,
            status: status.as_u16(),
        }
    }
}

// ── Gateway impl ─────────────────────────────────────────────────────

#[async_trait]
impl Gateway for RestGateway {
    async fn select(&self, query: &Select) -> Result<Vec<Row>, Error> {
        self.select_rows(query).await
    }

    async fn insert(&self, table: &str, rows: Vec<Row>) -> Result<Vec<Row>, Error> {
        self.insert_rows(table, &rows).await
    }

    async fn update(&self, table: &str, patch: Row, filters: &[Filter]) -> Result<(), Error> {
        self.update_rows(table, &patch, filters).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), Error> {
        self.delete_rows(table, filters).await
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> Result<(), Error> {
        self.upload_object(bucket, path, data, options).await
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        self.object_public_url(bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<(), Error> {
        self.remove_objects(bucket, paths).await
    }

    async fn get_session(&self) -> Result<Option<Session>, Error> {
        Ok(self.session.borrow().clone())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Session, Error> {
        self.password_grant(email, password).await
    }

    async fn sign_out(&self) -> Result<(), Error> {
        self.logout().await
    }

    fn subscribe_auth(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }
}
