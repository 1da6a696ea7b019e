use serde::{Deserialize, Serialize};
use sitedesk_api::RowId;

use crate::model::Translation;
use crate::schema::{BaseOrder, EntityDescriptor, FixedTable, ImageSpec, LogicalEntity, Naming};
use crate::store::{ContentKind, EntityStore};

use super::SHARED_IMAGE_TABLES;

#[derive(Debug, Clone, Copy)]
pub struct SiteSections;

pub type SiteSectionStore = EntityStore<SiteSections>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSection {
    pub id: RowId,
    pub key: String,
    #[serde(default)]
    pub sort_order: Option<i64>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionText {
    pub locale: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cta_label: Option<String>,
    #[serde(default)]
    pub cta_href: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteSectionDraft {
    pub key: String,
    pub is_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteSectionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<Option<bool>>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: LogicalEntity::SiteSection,
    naming: Naming::Fixed {
        base: "site_section",
        translations: Some(FixedTable {
            table: "section_translations",
            fk: "section_id",
        }),
        images: Some(FixedTable {
            table: "site_section_images",
            fk: "section_id",
        }),
    },
    base_order: BaseOrder::Ascending("sort_order"),
    images: Some(ImageSpec {
        shared_with: SHARED_IMAGE_TABLES,
        ..ImageSpec::new("site-sections", "site-section_")
    }),
    singleton: false,
    label: "site sections",
};

impl ContentKind for SiteSections {
    type Record = SiteSection;
    type Translation = Translation<SectionText>;
    type TranslationInput = SectionText;
    type Draft = SiteSectionDraft;
    type Patch = SiteSectionPatch;

    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(record: &SiteSection) -> &RowId {
        &record.id
    }

    /// A null flag counts as disabled.
    fn is_enabled(record: &SiteSection) -> bool {
        record.is_enabled.unwrap_or_default()
    }

    fn sort_key(record: &SiteSection) -> Option<i64> {
        record.sort_order
    }
}
