use serde::{Deserialize, Serialize};
use sitedesk_api::RowId;

use crate::model::Translation;
use crate::schema::{BaseOrder, EntityDescriptor, FixedTable, LogicalEntity, Naming};
use crate::store::{ContentKind, EntityStore};

#[derive(Debug, Clone, Copy)]
pub struct WhyDifferent;

pub type WhyDifferentStore = EntityStore<WhyDifferent>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Differentiator {
    pub id: RowId,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifferentiatorText {
    pub locale: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DifferentiatorDraft {
    pub icon: Option<String>,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DifferentiatorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: LogicalEntity::WhyDifferent,
    naming: Naming::Fixed {
        base: "why_we_different",
        translations: Some(FixedTable {
            table: "why_we_different_translations",
            fk: "why_we_different_id",
        }),
        images: None,
    },
    base_order: BaseOrder::Ascending("sort_order"),
    images: None,
    singleton: false,
    label: "why-we-different items",
};

impl ContentKind for WhyDifferent {
    type Record = Differentiator;
    type Translation = Translation<DifferentiatorText>;
    type TranslationInput = DifferentiatorText;
    type Draft = DifferentiatorDraft;
    type Patch = DifferentiatorPatch;

    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(record: &Differentiator) -> &RowId {
        &record.id
    }

    fn is_enabled(record: &Differentiator) -> bool {
        record.is_enabled
    }

    fn sort_key(record: &Differentiator) -> Option<i64> {
        Some(record.sort_order)
    }
}
