use serde::{Deserialize, Serialize};
use sitedesk_api::RowId;

use crate::model::Translation;
use crate::schema::{BaseOrder, EntityDescriptor, FixedTable, ImageSpec, LogicalEntity, Naming};
use crate::store::{ContentKind, EntityStore};

#[derive(Debug, Clone, Copy)]
pub struct Hero;

pub type HeroStore = EntityStore<Hero>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSlide {
    pub id: RowId,
    /// Server-generated.
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroSlideText {
    pub locale: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub sample_text: Option<String>,
    #[serde(default)]
    pub button_text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeroSlideDraft {
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HeroSlidePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: LogicalEntity::Hero,
    naming: Naming::Fixed {
        base: "hero_slides",
        translations: Some(FixedTable {
            table: "hero_slide_translations",
            fk: "hero_slide_id",
        }),
        images: Some(FixedTable {
            table: "hero_slide_images",
            fk: "hero_slide_id",
        }),
    },
    base_order: BaseOrder::Ascending("sort_order"),
    images: Some(ImageSpec::new("hero", "")),
    singleton: false,
    label: "hero slides",
};

impl ContentKind for Hero {
    type Record = HeroSlide;
    type Translation = Translation<HeroSlideText>;
    type TranslationInput = HeroSlideText;
    type Draft = HeroSlideDraft;
    type Patch = HeroSlidePatch;

    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(record: &HeroSlide) -> &RowId {
        &record.id
    }

    fn is_enabled(record: &HeroSlide) -> bool {
        record.is_enabled
    }

    fn sort_key(record: &HeroSlide) -> Option<i64> {
        Some(record.sort_order)
    }
}
