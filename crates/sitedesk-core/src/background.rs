// ── Section background image ──
//
// One optional image per keyed site section, linked through the same
// tables the site-section store uses. The section row is created on
// first upload. Assets may also be linked from timeline items, so
// removal keeps catalog rows that are still referenced.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use sitedesk_api::{Filter, Gateway, RowId, Select};
use tracing::{error, info};

use crate::error::CoreError;
use crate::kinds::SHARED_IMAGE_TABLES;
use crate::media::{self, UnlinkOutcome};
use crate::model::{FileUpload, ImageLink};
use crate::schema::{ImageSpec, ImageTables};
use crate::store::{StateCell, StoreState};
use crate::stream::StateStream;

const SECTION_TABLE: &str = "site_section";
const DEFAULT_KEY: &str = "installations";

/// Only the asset join is read when listing links.
static LINK_SPEC: ImageSpec = ImageSpec::new(DEFAULT_KEY, "");

fn link_tables() -> ImageTables {
    ImageTables {
        table: "site_section_images".into(),
        fk_column: "section_id".into(),
        media_column: "media_id".into(),
        sort_column: "sort_order".into(),
    }
}

/// Storage path for a background upload.
fn background_path(key: &str, millis: i64, extension: &str) -> String {
    format!("{key}/{key}_bg_{millis}.{extension}")
}

/// `"installations"` becomes `"Installations background image"`.
fn alt_text(key: &str) -> String {
    let mut chars = key.chars();
    let title: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{title} background image")
}

pub struct SectionBackgroundStore {
    gateway: Arc<dyn Gateway>,
    key: String,
    state: StateCell<ImageLink>,
}

impl SectionBackgroundStore {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self::with_key(gateway, DEFAULT_KEY)
    }

    pub fn with_key(gateway: Arc<dyn Gateway>, key: impl Into<String>) -> Self {
        Self {
            gateway,
            key: key.into(),
            state: StateCell::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn snapshot(&self) -> StoreState<ImageLink> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> StateStream<ImageLink> {
        StateStream::new(self.state.subscribe())
    }

    /// The current background image, if any.
    pub fn image(&self) -> Option<Arc<ImageLink>> {
        self.state.items().first().cloned()
    }

    /// Load the section's first image. A missing section means no image.
    pub async fn fetch(&self) -> Result<(), CoreError> {
        let _loading = self.state.begin();
        let result: Result<Option<ImageLink>, CoreError> = async {
            let Some(section) = self.find_section().await? else {
                return Ok(None);
            };
            Ok(self.links(&section).await?.into_iter().next())
        }
        .await;

        match result {
            Ok(image) => {
                self.state.set_items(image.into_iter().collect());
                Ok(())
            }
            Err(e) => Err(self.record_error(e, "Failed to fetch background image")),
        }
    }

    /// Replace the background with `file`, creating the section if needed.
    pub async fn upload(&self, file: &FileUpload) -> Result<(), CoreError> {
        let _loading = self.state.begin();
        let result: Result<(), CoreError> = async {
            let gateway = self.gateway.as_ref();
            let tables = link_tables();
            let section = match self.find_section().await? {
                Some(id) => id,
                None => self.create_section().await?,
            };

            for existing in self.links(&section).await? {
                media::unlink(gateway, &tables, SHARED_IMAGE_TABLES, &existing.id).await?;
            }

            let path = background_path(&self.key, Utc::now().timestamp_millis(), file.extension());
            media::upload_object(gateway, &path, file).await?;
            let media_id = media::insert_asset(gateway, &path, &alt_text(&self.key)).await?;
            media::insert_link(gateway, &tables, false, &section, &media_id, 0).await?;
            info!(key = %self.key, path, "background image replaced");
            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                let _ = self.fetch().await;
                Ok(())
            }
            Err(e) => Err(self.record_error(e, "Failed to upload background image")),
        }
    }

    /// Remove the current background. `None` when there was nothing to remove.
    pub async fn delete(&self) -> Result<Option<UnlinkOutcome>, CoreError> {
        let _loading = self.state.begin();
        let result: Result<Option<UnlinkOutcome>, CoreError> = async {
            let Some(section) = self.find_section().await? else {
                return Ok(None);
            };
            let Some(existing) = self.links(&section).await?.into_iter().next() else {
                return Ok(None);
            };
            let outcome = media::unlink(
                self.gateway.as_ref(),
                &link_tables(),
                SHARED_IMAGE_TABLES,
                &existing.id,
            )
            .await?;
            Ok(Some(outcome))
        }
        .await;

        match result {
            Ok(outcome) => {
                let _ = self.fetch().await;
                Ok(outcome)
            }
            Err(e) => Err(self.record_error(e, "Failed to delete background image")),
        }
    }

    async fn links(&self, section: &RowId) -> Result<Vec<ImageLink>, CoreError> {
        media::fetch_links(
            self.gateway.as_ref(),
            &link_tables(),
            &LINK_SPEC,
            Some(section),
        )
        .await
    }

    async fn find_section(&self) -> Result<Option<RowId>, CoreError> {
        let query = Select::from(SECTION_TABLE)
            .filter(Filter::eq("key", self.key.as_str()))
            .limit(1);
        match self.gateway.select(&query).await {
            Ok(rows) => Ok(rows.first().and_then(|r| RowId::from_row(r, "id"))),
            Err(e) if e.is_no_rows() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_section(&self) -> Result<RowId, CoreError> {
        let row = media::json_row(json!({
            "key": self.key,
            "sort_order": 0,
            "is_enabled": true,
        }));
        let inserted = self.gateway.insert(SECTION_TABLE, vec![row]).await?;
        inserted
            .first()
            .and_then(|r| RowId::from_row(r, "id"))
            .ok_or_else(|| CoreError::OperationFailed {
                message: format!("Failed to create section {}", self.key),
            })
    }

    fn record_error(&self, err: CoreError, fallback: &str) -> CoreError {
        let message = err.user_message(fallback);
        error!(key = %self.key, error = %message, "background image operation failed");
        self.state.set_error(message);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_uses_key_folder() {
        assert_eq!(
            background_path("installations", 42, "webp"),
            "installations/installations_bg_42.webp"
        );
    }

    #[test]
    fn alt_capitalizes_key() {
        assert_eq!(alt_text("installations"), "Installations background image");
        assert_eq!(alt_text(""), " background image");
    }
}
