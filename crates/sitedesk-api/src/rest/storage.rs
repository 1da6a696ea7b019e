// Object storage endpoints (`/storage/v1/object/...`).
//
// Uploads are raw bodies with cache and upsert headers; removal is a
// single DELETE on the bucket carrying the list of object paths.

use bytes::Bytes;
use serde_json::json;
use tracing::debug;

use super::RestGateway;
use crate::error::Error;
use crate::gateway::UploadOptions;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

impl RestGateway {
    pub(super) async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: &UploadOptions,
    ) -> Result<(), Error> {
        let url = self.storage_url(&format!("object/{bucket}/{path}"))?;
        debug!("POST {url} ({} bytes)", data.len());

        let content_type = options
            .content_type
            .as_deref()
            .unwrap_or(FALLBACK_CONTENT_TYPE);
        let resp = self
            .authorized(self.http.post(url))
            .header("cache-control", format!("max-age={}", options.cache_control))
            .header("x-upsert", options.upsert.to_string())
            .header("content-type", content_type)
            .body(data)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_storage_error(status, resp).await)
        }
    }

    pub(super) fn object_public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}storage/v1/object/public/{bucket}/{path}",
            self.base_url
        )
    }

    pub(super) async fn remove_objects(&self, bucket: &str, paths: &[String]) -> Result<(), Error> {
        let url = self.storage_url(&format!("object/{bucket}"))?;
        debug!("DELETE {url} ({} objects)", paths.len());

        let resp = self
            .authorized(self.http.delete(url))
            .json(&json!({ "prefixes": paths }))
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_storage_error(status, resp).await)
        }
    }
}
