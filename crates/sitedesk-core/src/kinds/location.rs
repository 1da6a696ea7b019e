use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sitedesk_api::RowId;

use crate::model::Translation;
use crate::schema::{BaseOrder, EntityDescriptor, LogicalEntity, Naming};
use crate::store::{ContentKind, EntityStore};

#[derive(Debug, Clone, Copy)]
pub struct Locations;

pub type LocationStore = EntityStore<Locations>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: RowId,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub map_lat: Option<f64>,
    #[serde(default)]
    pub map_lng: Option<f64>,
    #[serde(default)]
    pub map_zoom: Option<i64>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationText {
    pub locale: String,
    #[serde(default)]
    pub section_title: Option<String>,
    #[serde(default)]
    pub section_subtitle: Option<String>,
    #[serde(default)]
    pub phone_label: Option<String>,
    #[serde(default)]
    pub email_label: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub address_label: Option<String>,
    #[serde(default)]
    pub working_hours: Option<String>,
    #[serde(default)]
    pub working_hours_label: Option<String>,
    #[serde(default)]
    pub marker_title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationDraft {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub map_lat: Option<f64>,
    pub map_lng: Option<f64>,
    pub map_zoom: Option<i64>,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_lat: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_lng: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_zoom: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: LogicalEntity::Location,
    naming: Naming::Probed,
    base_order: BaseOrder::NewestFirst,
    images: None,
    singleton: false,
    label: "locations",
};

impl ContentKind for Locations {
    type Record = Location;
    type Translation = Translation<LocationText>;
    type TranslationInput = LocationText;
    type Draft = LocationDraft;
    type Patch = LocationPatch;

    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(record: &Location) -> &RowId {
        &record.id
    }

    fn is_enabled(record: &Location) -> bool {
        record.is_enabled
    }

    /// Newest first; timestamps are RFC 3339 so they order lexically.
    fn active_cmp(a: &Location, b: &Location) -> Ordering {
        b.created_at.cmp(&a.created_at)
    }
}
