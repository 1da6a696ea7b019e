use serde::{Deserialize, Serialize};
use sitedesk_api::RowId;

use crate::model::Translation;
use crate::schema::{BaseOrder, EntityDescriptor, ImageSpec, LogicalEntity, Naming};
use crate::store::{ContentKind, EntityStore};

use super::SHARED_IMAGE_TABLES;

#[derive(Debug, Clone, Copy)]
pub struct Timeline;

pub type TimelineStore = EntityStore<Timeline>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: RowId,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub is_enabled: bool,
    pub year: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineText {
    pub locale: String,
    #[serde(default)]
    pub label: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineDraft {
    pub is_enabled: bool,
    pub year: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TimelinePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: LogicalEntity::Timeline,
    naming: Naming::Probed,
    base_order: BaseOrder::Ascending("sort_order"),
    images: Some(ImageSpec {
        optional: true,
        shared_with: SHARED_IMAGE_TABLES,
        ..ImageSpec::new("timeline", "")
    }),
    singleton: false,
    label: "timeline events",
};

impl ContentKind for Timeline {
    type Record = TimelineEvent;
    type Translation = Translation<TimelineText>;
    type TranslationInput = TimelineText;
    type Draft = TimelineDraft;
    type Patch = TimelinePatch;

    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(record: &TimelineEvent) -> &RowId {
        &record.id
    }

    fn is_enabled(record: &TimelineEvent) -> bool {
        record.is_enabled
    }

    fn sort_key(record: &TimelineEvent) -> Option<i64> {
        Some(record.sort_order)
    }
}
