// Company statistics: per-language label columns instead of a
// translation table, and a caller-controlled `order_index`.

use serde::{Deserialize, Serialize};
use sitedesk_api::RowId;

use crate::model::Untranslated;
use crate::schema::{BaseOrder, EntityDescriptor, LogicalEntity, Naming};
use crate::store::{ContentKind, EntityStore};

#[derive(Debug, Clone, Copy)]
pub struct Statistics;

pub type StatisticStore = EntityStore<Statistics>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyStatistic {
    pub id: RowId,
    #[serde(default)]
    pub label_en: Option<String>,
    #[serde(default)]
    pub label_ku: Option<String>,
    #[serde(default)]
    pub label_ar: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order_index: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatisticDraft {
    pub label_en: Option<String>,
    pub label_ku: Option<String>,
    pub label_ar: Option<String>,
    pub value: Option<f64>,
    pub icon: Option<String>,
    pub order_index: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatisticPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_en: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_ku: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_ar: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<Option<i64>>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: LogicalEntity::Statistic,
    naming: Naming::Fixed {
        base: "company_statistics",
        translations: None,
        images: None,
    },
    base_order: BaseOrder::Ascending("order_index"),
    images: None,
    singleton: false,
    label: "company statistics",
};

impl ContentKind for Statistics {
    type Record = CompanyStatistic;
    type Translation = Untranslated;
    type TranslationInput = Untranslated;
    type Draft = StatisticDraft;
    type Patch = StatisticPatch;

    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(record: &CompanyStatistic) -> &RowId {
        &record.id
    }

    fn sort_key(record: &CompanyStatistic) -> Option<i64> {
        record.order_index
    }
}
