// Candidate table names for kinds whose naming drifts across deployments.
//
// Lists are probed in order; the first entry is the most common naming.

use super::LogicalEntity;

/// Dependent candidates chosen from the winning base table.
pub(super) struct Dependent {
    pub candidates: &'static [&'static str],
    pub fk: &'static str,
}

pub(super) fn base_candidates(entity: LogicalEntity) -> &'static [&'static str] {
    match entity {
        LogicalEntity::Timeline => &["timeline_items", "timeline_events", "timeline"],
        LogicalEntity::Installation => &[
            "installations",
            "installation_steps",
            "installation_items",
            "installation",
        ],
        LogicalEntity::Location => &["locations", "location"],
        _ => &[],
    }
}

pub(super) fn translation_candidates(entity: LogicalEntity, base: &str) -> Option<Dependent> {
    match entity {
        LogicalEntity::Timeline if base == "timeline_items" => Some(Dependent {
            candidates: &[
                "timeline_item_translations",
                "timeline_items_translations",
                "timeline_translations",
            ],
            fk: "timeline_item_id",
        }),
        LogicalEntity::Timeline => Some(Dependent {
            candidates: &[
                "timeline_event_translations",
                "timeline_events_translations",
                "timeline_translations",
            ],
            fk: "timeline_event_id",
        }),
        LogicalEntity::Installation if base == "installations" => Some(Dependent {
            candidates: &["installation_translations", "installations_translations"],
            fk: "installation_id",
        }),
        LogicalEntity::Installation if base == "installation_items" => Some(Dependent {
            candidates: &[
                "installation_item_translations",
                "installation_items_translations",
                "installation_translations",
            ],
            fk: "installation_item_id",
        }),
        LogicalEntity::Installation => Some(Dependent {
            candidates: &[
                "installation_step_translations",
                "installation_steps_translations",
                "installation_translations",
            ],
            fk: "installation_step_id",
        }),
        LogicalEntity::Location if base == "location" => Some(Dependent {
            candidates: &["location_translations", "location_translation"],
            fk: "location_id",
        }),
        LogicalEntity::Location => Some(Dependent {
            candidates: &[
                "location_translations",
                "locations_translations",
                "location_translation",
            ],
            fk: "location_id",
        }),
        _ => None,
    }
}

pub(super) fn image_candidates(entity: LogicalEntity, base: &str) -> Option<Dependent> {
    match entity {
        LogicalEntity::Timeline if base == "timeline_items" => Some(Dependent {
            candidates: &[
                "timeline_item_images",
                "timeline_items_images",
                "timeline_images",
            ],
            fk: "timeline_item_id",
        }),
        LogicalEntity::Timeline => Some(Dependent {
            candidates: &[
                "timeline_event_images",
                "timeline_events_images",
                "timeline_images",
            ],
            fk: "timeline_event_id",
        }),
        LogicalEntity::Installation => Some(Dependent {
            candidates: &[
                "installation_images",
                "installation_image_items",
                "installation_item_images",
                "installation_step_images",
                "installation_gallery",
            ],
            fk: "installation_id",
        }),
        _ => None,
    }
}
