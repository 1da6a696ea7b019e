// Projects: the only kind whose image links carry a cover flag.

use serde::{Deserialize, Serialize};
use serde_json::json;
use sitedesk_api::{Filter, RowId, Select};
use tracing::info;

use crate::error::CoreError;
use crate::media::json_row;
use crate::model::Translation;
use crate::schema::{BaseOrder, EntityDescriptor, FixedTable, ImageSpec, LogicalEntity, Naming};
use crate::store::{ContentKind, EntityStore};

#[derive(Debug, Clone, Copy)]
pub struct Projects;

pub type ProjectStore = EntityStore<Projects>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: RowId,
    pub slug: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub duration_days: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectText {
    pub locale: String,
    #[serde(default)]
    pub badge: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub meta_items: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectDraft {
    pub slug: String,
    pub is_enabled: bool,
    pub duration_days: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<Option<i64>>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: LogicalEntity::Project,
    naming: Naming::Fixed {
        base: "projects",
        translations: Some(FixedTable {
            table: "project_translations",
            fk: "project_id",
        }),
        images: Some(FixedTable {
            table: "project_images",
            fk: "project_id",
        }),
    },
    base_order: BaseOrder::Ascending("sort_order"),
    images: Some(ImageSpec {
        cover: true,
        ..ImageSpec::new("gallery", "project_")
    }),
    singleton: false,
    label: "projects",
};

impl ContentKind for Projects {
    type Record = Project;
    type Translation = Translation<ProjectText>;
    type TranslationInput = ProjectText;
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(record: &Project) -> &RowId {
        &record.id
    }

    fn is_enabled(record: &Project) -> bool {
        record.is_enabled
    }

    fn sort_key(record: &Project) -> Option<i64> {
        Some(record.sort_order)
    }
}

impl EntityStore<Projects> {
    /// Make `image_id` the project's only cover image.
    ///
    /// `image_id` must be one of the project's own links; otherwise nothing
    /// is written and `NotFound` is returned. Two writes: clear every flag
    /// on the project, then set one.
    pub async fn set_cover_image(
        &self,
        project_id: &RowId,
        image_id: &RowId,
    ) -> Result<(), CoreError> {
        let _loading = self.loading();
        let result: Result<(), CoreError> = async {
            let tables = self.image_tables().await?;
            let owned = [
                Filter::eq("id", image_id.to_value()),
                Filter::eq(&tables.fk_column, project_id.to_value()),
            ];
            let matching = self
                .gateway()
                .select(&owned.iter().cloned().fold(Select::from(&tables.table), Select::filter))
                .await?;
            if matching.is_empty() {
                return Err(CoreError::NotFound {
                    entity_type: tables.table.clone(),
                    identifier: format!("{image_id} of project {project_id}"),
                });
            }

            self.gateway()
                .update(
                    &tables.table,
                    json_row(json!({ "is_cover": false })),
                    &[Filter::eq(&tables.fk_column, project_id.to_value())],
                )
                .await?;
            self.gateway()
                .update(
                    &tables.table,
                    json_row(json!({ "is_cover": true })),
                    &owned,
                )
                .await?;
            Ok(())
        }
        .await;

        match result {
            Ok(()) => {
                info!(project = %project_id, image = %image_id, "cover image set");
                self.refresh().await;
                Ok(())
            }
            Err(e) => Err(self.record_error(e, "set the cover of")),
        }
    }
}
