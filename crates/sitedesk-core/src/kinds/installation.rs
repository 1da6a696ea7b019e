use serde::{Deserialize, Serialize};
use sitedesk_api::RowId;

use crate::model::Translation;
use crate::schema::{AssetJoin, BaseOrder, EntityDescriptor, ImageSpec, LogicalEntity, Naming};
use crate::store::{ContentKind, EntityStore};

#[derive(Debug, Clone, Copy)]
pub struct Installations;

pub type InstallationStore = EntityStore<Installations>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installation {
    pub id: RowId,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallationText {
    pub locale: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub overview_title: Option<String>,
    #[serde(default)]
    pub overview_description: Option<String>,
    #[serde(default)]
    pub meta_items: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstallationDraft {
    pub is_enabled: bool,
    pub location: Option<String>,
    pub completed_at: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: LogicalEntity::Installation,
    naming: Naming::Probed,
    base_order: BaseOrder::Ascending("sort_order"),
    images: Some(ImageSpec {
        optional: true,
        asset_join: AssetJoin::Lookup,
        ..ImageSpec::new("installations", "installation_")
    }),
    singleton: false,
    label: "installations",
};

impl ContentKind for Installations {
    type Record = Installation;
    type Translation = Translation<InstallationText>;
    type TranslationInput = InstallationText;
    type Draft = InstallationDraft;
    type Patch = InstallationPatch;

    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(record: &Installation) -> &RowId {
        &record.id
    }

    fn is_enabled(record: &Installation) -> bool {
        record.is_enabled
    }

    fn sort_key(record: &Installation) -> Option<i64> {
        Some(record.sort_order)
    }
}
