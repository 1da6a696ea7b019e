// ── Company profile and team members ──
//
// Not descriptor-driven: the profile is a single row and team portraits
// are stored by public URL on the member row rather than through the
// media catalog.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitedesk_api::{Filter, Gateway, Order, Row, RowId, Select, to_row};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::error::CoreError;
use crate::media::{self, BUCKET};
use crate::model::FileUpload;
use crate::store::{StateCell, StoreState};
use crate::stream::StateStream;

const PROFILE_TABLE: &str = "about_company";
const MEMBERS_TABLE: &str = "team_members";
const PORTRAIT_FOLDER: &str = "team-members";

// ── Records and inputs ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub id: RowId,
    pub title_en: String,
    #[serde(default)]
    pub title_ku: Option<String>,
    #[serde(default)]
    pub title_ar: Option<String>,
    pub description_en: String,
    #[serde(default)]
    pub description_ku: Option<String>,
    #[serde(default)]
    pub description_ar: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileInput {
    pub title_en: String,
    pub title_ku: Option<String>,
    pub title_ar: Option<String>,
    pub description_en: String,
    pub description_ku: Option<String>,
    pub description_ar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: RowId,
    pub name: String,
    pub position_en: String,
    #[serde(default)]
    pub position_ku: Option<String>,
    #[serde(default)]
    pub position_ar: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberDraft {
    pub name: String,
    pub position_en: String,
    pub position_ku: Option<String>,
    pub position_ar: Option<String>,
    pub image_url: Option<String>,
    pub order_index: i64,
    pub is_active: bool,
}

impl MemberDraft {
    pub fn new(name: impl Into<String>, position_en: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position_en: position_en.into(),
            position_ku: None,
            position_ar: None,
            image_url: None,
            order_index: 0,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MemberPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_ku: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_ar: Option<Option<String>>,
    /// Ignored when a new portrait file is supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Object path inside `bucket` for one of its public URLs.
///
/// Public URLs end in `.../public/{bucket}/{path}`.
pub fn object_path_from_url(url: &str) -> Option<String> {
    let segments: Vec<&str> = url.split('/').collect();
    let public = segments.iter().position(|s| *s == "public")?;
    let path = segments.get(public + 2..)?;
    if path.is_empty() {
        return None;
    }
    Some(path.join("/"))
}

// ── Store ────────────────────────────────────────────────────────────

pub struct TeamStore {
    gateway: Arc<dyn Gateway>,
    members: StateCell<TeamMember>,
    profile: watch::Sender<Option<Arc<CompanyProfile>>>,
}

impl TeamStore {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let (profile, _) = watch::channel(None);
        Self {
            gateway,
            members: StateCell::new(),
            profile,
        }
    }

    pub fn snapshot(&self) -> StoreState<TeamMember> {
        self.members.snapshot()
    }

    pub fn members(&self) -> Arc<Vec<Arc<TeamMember>>> {
        self.members.items()
    }

    pub fn subscribe(&self) -> StateStream<TeamMember> {
        StateStream::new(self.members.subscribe())
    }

    pub fn profile(&self) -> Option<Arc<CompanyProfile>> {
        self.profile.borrow().clone()
    }

    pub fn subscribe_profile(&self) -> watch::Receiver<Option<Arc<CompanyProfile>>> {
        self.profile.subscribe()
    }

    /// Active members by `order_index`.
    pub fn active_members(&self) -> Vec<Arc<TeamMember>> {
        let mut active: Vec<_> = self
            .members()
            .iter()
            .filter(|m| m.is_active)
            .cloned()
            .collect();
        active.sort_by_key(|m| m.order_index);
        active
    }

    // ── Fetch ────────────────────────────────────────────────────────

    /// Load the profile row. An absent row is not an error.
    pub async fn fetch_profile(&self) -> Result<(), CoreError> {
        let _loading = self.members.begin();
        let result = self
            .gateway
            .select(&Select::from(PROFILE_TABLE).limit(1))
            .await;
        let rows = match result {
            Ok(rows) => rows,
            Err(e) if e.is_no_rows() => Vec::new(),
            Err(e) => return Err(self.record_error(e.into(), "Failed to fetch about company")),
        };

        let profile = match rows.into_iter().next().map(decode::<CompanyProfile>) {
            Some(Ok(profile)) => Some(Arc::new(profile)),
            Some(Err(e)) => return Err(self.record_error(e, "Failed to fetch about company")),
            None => None,
        };
        self.profile.send_replace(profile);
        Ok(())
    }

    pub async fn fetch_members(&self) -> Result<(), CoreError> {
        let _loading = self.members.begin();
        let result: Result<Vec<TeamMember>, CoreError> = async {
            let query = Select::from(MEMBERS_TABLE).order(Order::asc("order_index"));
            let rows = self.gateway.select(&query).await?;
            rows.into_iter().map(decode).collect()
        }
        .await;

        match result {
            Ok(members) => {
                self.members.set_items(members);
                Ok(())
            }
            Err(e) => Err(self.record_error(e, "Failed to fetch team members")),
        }
    }

    /// Both reads concurrently; the first failure is returned.
    pub async fn fetch_all(&self) -> Result<(), CoreError> {
        let _loading = self.members.begin();
        let (profile, members) = tokio::join!(self.fetch_profile(), self.fetch_members());
        profile.and(members)
    }

    // ── Profile ──────────────────────────────────────────────────────

    /// Update the existing profile row, or insert one when none exists.
    pub async fn save_profile(&self, input: ProfileInput) -> Result<(), CoreError> {
        let _loading = self.members.begin();
        let result: Result<(), CoreError> = async {
            let mut row = to_row(&input)?;
            match self.profile() {
                Some(existing) => {
                    row.insert("updated_at".into(), Value::from(Utc::now().to_rfc3339()));
                    self.gateway
                        .update(PROFILE_TABLE, row, &[id_filter(&existing.id)])
                        .await?;
                }
                None => {
                    self.gateway.insert(PROFILE_TABLE, vec![row]).await?;
                }
            }
            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                let _ = self.fetch_profile().await;
                Ok(())
            }
            Err(e) => Err(self.record_error(e, "Failed to save about company")),
        }
    }

    // ── Members ──────────────────────────────────────────────────────

    pub async fn create_member(
        &self,
        mut draft: MemberDraft,
        portrait: Option<FileUpload>,
    ) -> Result<(), CoreError> {
        let _loading = self.members.begin();
        let result: Result<(), CoreError> = async {
            if let Some(file) = &portrait {
                let name = format!("team-member_{}", Utc::now().timestamp_millis());
                draft.image_url = Some(self.upload_portrait(&name, file).await?);
            }
            self.gateway
                .insert(MEMBERS_TABLE, vec![to_row(&draft)?])
                .await?;
            info!(name = %draft.name, "team member created");
            Ok(())
        }
        .await;
        self.finish_member_write(result, "Failed to create team member")
            .await
    }

    /// Sparse update. A new portrait replaces the old one, whose stored
    /// object is removed on a best-effort basis.
    pub async fn update_member(
        &self,
        id: &RowId,
        patch: MemberPatch,
        portrait: Option<FileUpload>,
    ) -> Result<(), CoreError> {
        let _loading = self.members.begin();
        let result: Result<(), CoreError> = async {
            let mut row = to_row(&patch)?;
            if let Some(file) = &portrait {
                self.remove_portrait(id).await;
                let name = format!("team-member_{id}_{}", Utc::now().timestamp_millis());
                let url = self.upload_portrait(&name, file).await?;
                row.insert("image_url".into(), Value::from(url));
            }
            row.insert("updated_at".into(), Value::from(Utc::now().to_rfc3339()));
            self.gateway
                .update(MEMBERS_TABLE, row, &[id_filter(id)])
                .await?;
            Ok(())
        }
        .await;
        self.finish_member_write(result, "Failed to update team member")
            .await
    }

    pub async fn delete_member(&self, id: &RowId) -> Result<(), CoreError> {
        let _loading = self.members.begin();
        let result: Result<(), CoreError> = async {
            self.remove_portrait(id).await;
            self.gateway.delete(MEMBERS_TABLE, &[id_filter(id)]).await?;
            Ok(())
        }
        .await;
        self.finish_member_write(result, "Failed to delete team member")
            .await
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn upload_portrait(&self, name: &str, file: &FileUpload) -> Result<String, CoreError> {
        let path = format!("{PORTRAIT_FOLDER}/{name}.{}", file.extension());
        media::upload_object(self.gateway.as_ref(), &path, file).await?;
        Ok(self.gateway.public_url(BUCKET, &path))
    }

    /// Best-effort removal of a member's current portrait object.
    async fn remove_portrait(&self, id: &RowId) {
        let url = self
            .members()
            .iter()
            .find(|m| &m.id == id)
            .and_then(|m| m.image_url.clone());
        let Some(path) = url.as_deref().and_then(object_path_from_url) else {
            return;
        };
        if let Err(e) = self.gateway.remove(BUCKET, &[path.clone()]).await {
            warn!(path, error = %e, "failed to remove old portrait");
        }
    }

    async fn finish_member_write(
        &self,
        result: Result<(), CoreError>,
        fallback: &str,
    ) -> Result<(), CoreError> {
        match result {
            Ok(()) => {
                let _ = self.fetch_members().await;
                Ok(())
            }
            Err(e) => Err(self.record_error(e, fallback)),
        }
    }

    fn record_error(&self, err: CoreError, fallback: &str) -> CoreError {
        let message = err.user_message(fallback);
        error!(error = %message, "team store operation failed");
        self.members.set_error(message);
        err
    }
}

fn id_filter(id: &RowId) -> Filter {
    Filter::eq("id", id.to_value())
}

fn decode<T: serde::de::DeserializeOwned>(row: Row) -> Result<T, CoreError> {
    serde_json::from_value(Value::Object(row)).map_err(CoreError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_follows_bucket_segment() {
        let url = "https://x.supabase.co/storage/v1/object/public/site-images/team-members/a.png";
        assert_eq!(
            object_path_from_url(url).as_deref(),
            Some("team-members/a.png")
        );
    }

    #[test]
    fn urls_without_public_segment_yield_nothing() {
        assert_eq!(object_path_from_url("https://cdn.example.com/a.png"), None);
        assert_eq!(
            object_path_from_url("https://x/storage/v1/object/public/site-images"),
            None
        );
    }

    #[test]
    fn new_member_defaults() {
        let draft = MemberDraft::new("Dana", "Engineer");
        assert_eq!(draft.order_index, 0);
        assert!(draft.is_active);
    }
}
