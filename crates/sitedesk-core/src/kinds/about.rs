use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sitedesk_api::RowId;

use crate::model::Translation;
use crate::schema::{BaseOrder, EntityDescriptor, FixedTable, ImageSpec, LogicalEntity, Naming};
use crate::store::{ContentKind, EntityStore};

#[derive(Debug, Clone, Copy)]
pub struct About;

pub type AboutStore = EntityStore<About>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutSection {
    pub id: RowId,
    pub key: String,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AboutText {
    pub locale: String,
    #[serde(default)]
    pub eyebrow_text: Option<String>,
    #[serde(default)]
    pub section_title: Option<String>,
    #[serde(default)]
    pub section_subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub card_title: Option<String>,
    #[serde(default)]
    pub card_title_highlight: Option<String>,
    #[serde(default)]
    pub card_description: Option<String>,
    #[serde(default)]
    pub cta_label: Option<String>,
    #[serde(default)]
    pub cta_href: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AboutDraft {
    pub key: String,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AboutPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: LogicalEntity::About,
    naming: Naming::Fixed {
        base: "about_section",
        translations: Some(FixedTable {
            table: "about_section_translations",
            fk: "about_section_id",
        }),
        images: Some(FixedTable {
            table: "about_section_images",
            fk: "about_section_id",
        }),
    },
    base_order: BaseOrder::NewestFirst,
    images: Some(ImageSpec {
        media_column: "media_asset_id",
        ..ImageSpec::new("about", "")
    }),
    singleton: true,
    label: "about sections",
};

impl ContentKind for About {
    type Record = AboutSection;
    type Translation = Translation<AboutText>;
    type TranslationInput = AboutText;
    type Draft = AboutDraft;
    type Patch = AboutPatch;

    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(record: &AboutSection) -> &RowId {
        &record.id
    }

    fn is_enabled(record: &AboutSection) -> bool {
        record.is_enabled
    }

    /// Active sections keep fetch order.
    fn active_cmp(_a: &AboutSection, _b: &AboutSection) -> Ordering {
        Ordering::Equal
    }
}
