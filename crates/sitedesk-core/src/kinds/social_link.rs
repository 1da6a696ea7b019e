use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitedesk_api::{Row, RowId};

use crate::model::Untranslated;
use crate::schema::{BaseOrder, EntityDescriptor, LogicalEntity, Naming};
use crate::store::{ContentKind, EntityStore};

/// Default icon classes by lowercase platform name.
pub const PLATFORM_ICONS: &[(&str, &str)] = &[
    ("facebook", "fab fa-facebook-f"),
    ("instagram", "fab fa-instagram"),
    ("twitter", "fab fa-twitter"),
    ("youtube", "fab fa-youtube"),
    ("linkedin", "fab fa-linkedin-in"),
    ("tiktok", "fab fa-tiktok"),
    ("pinterest", "fab fa-pinterest-p"),
    ("snapchat", "fab fa-snapchat-ghost"),
    ("whatsapp", "fab fa-whatsapp"),
    ("telegram", "fab fa-telegram-plane"),
];

pub fn platform_icon(platform: &str) -> Option<&'static str> {
    let platform = platform.to_lowercase();
    PLATFORM_ICONS
        .iter()
        .find(|(name, _)| *name == platform)
        .map(|(_, icon)| *icon)
}

#[derive(Debug, Clone, Copy)]
pub struct SocialLinks;

pub type SocialLinkStore = EntityStore<SocialLinks>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub id: RowId,
    pub platform: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialLinkDraft {
    pub platform: String,
    pub url: String,
    pub icon: Option<String>,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SocialLinkPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
    entity: LogicalEntity::SocialLink,
    naming: Naming::Fixed {
        base: "social_links",
        translations: None,
        images: None,
    },
    base_order: BaseOrder::Ascending("sort_order"),
    images: None,
    singleton: false,
    label: "social links",
};

impl ContentKind for SocialLinks {
    type Record = SocialLink;
    type Translation = Untranslated;
    type TranslationInput = Untranslated;
    type Draft = SocialLinkDraft;
    type Patch = SocialLinkPatch;

    fn descriptor() -> &'static EntityDescriptor {
        &DESCRIPTOR
    }

    fn id(record: &SocialLink) -> &RowId {
        &record.id
    }

    fn is_enabled(record: &SocialLink) -> bool {
        record.is_enabled
    }

    fn sort_key(record: &SocialLink) -> Option<i64> {
        Some(record.sort_order)
    }

    /// Fill a missing icon from the platform table.
    fn prepare_draft(row: &mut Row) {
        let has_icon = row
            .get("icon")
            .and_then(Value::as_str)
            .is_some_and(|icon| !icon.is_empty());
        if has_icon {
            return;
        }
        let icon = row
            .get("platform")
            .and_then(Value::as_str)
            .and_then(platform_icon);
        row.insert("icon".into(), icon.map_or(Value::Null, Value::from));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sitedesk_api::to_row;

    fn draft(platform: &str, icon: Option<&str>) -> Row {
        let mut row = to_row(&SocialLinkDraft {
            platform: platform.into(),
            url: "https://example.com".into(),
            icon: icon.map(str::to_owned),
            is_enabled: true,
        })
        .unwrap();
        SocialLinks::prepare_draft(&mut row);
        row
    }

    #[test]
    fn missing_icon_defaults_from_platform() {
        let row = draft("Instagram", None);
        assert_eq!(row["icon"], "fab fa-instagram");
    }

    #[test]
    fn explicit_icon_is_kept() {
        let row = draft("facebook", Some("custom"));
        assert_eq!(row["icon"], "custom");
    }

    #[test]
    fn unknown_platform_stays_null() {
        let row = draft("mastodon", None);
        assert!(row["icon"].is_null());
    }
}
