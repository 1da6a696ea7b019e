// ── Media catalog and image links ──

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sitedesk_api::{Row, RowId};

use crate::schema::ImageTables;

const FALLBACK_EXTENSION: &str = "jpg";

/// Catalog record for one stored binary object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: RowId,
    pub bucket: String,
    pub path: String,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A positioned link from a content item to a media asset.
///
/// Link tables name their parent and media columns differently per
/// deployment, so links are read out of raw rows using the resolved
/// [`ImageTables`] rather than through a fixed serde shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageLink {
    pub id: RowId,
    pub parent_id: Option<RowId>,
    pub media_id: Option<RowId>,
    pub sort_order: i64,
    /// Only meaningful for project images.
    pub is_cover: bool,
    pub media_asset: Option<MediaAsset>,
}

impl ImageLink {
    /// Read a link row, taking the asset from `embed_alias` when present.
    pub(crate) fn from_row(row: &Row, tables: &ImageTables, embed_alias: Option<&str>) -> Option<Self> {
        let id = RowId::from_row(row, "id")?;
        let media_asset = embed_alias
            .and_then(|alias| row.get(alias))
            .filter(|v| v.is_object())
            .and_then(|v| serde_json::from_value(v.clone()).ok());

        Some(Self {
            id,
            parent_id: RowId::from_row(row, &tables.fk_column),
            media_id: RowId::from_row(row, &tables.media_column),
            sort_order: row
                .get(&tables.sort_column)
                .and_then(Value::as_i64)
                .unwrap_or_default(),
            is_cover: row
                .get("is_cover")
                .and_then(Value::as_bool)
                .unwrap_or_default(),
            media_asset,
        })
    }
}

/// A raw file handed to a store for upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub data: Bytes,
    pub content_type: Option<String>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The original extension, or `jpg` when the name has none.
    pub fn extension(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext,
            _ => FALLBACK_EXTENSION,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tables() -> ImageTables {
        ImageTables {
            table: "timeline_item_images".into(),
            fk_column: "timeline_item_id".into(),
            media_column: "media_id".into(),
            sort_column: "sort_order".into(),
        }
    }

    #[test]
    fn extension_falls_back_to_jpg() {
        assert_eq!(FileUpload::new("photo.PNG", b"x".to_vec()).extension(), "PNG");
        assert_eq!(FileUpload::new("archive.tar.gz", b"x".to_vec()).extension(), "gz");
        assert_eq!(FileUpload::new("photo", b"x".to_vec()).extension(), "jpg");
        assert_eq!(FileUpload::new(".hidden", b"x".to_vec()).extension(), "jpg");
        assert_eq!(FileUpload::new("trailing.", b"x".to_vec()).extension(), "jpg");
    }

    #[test]
    fn link_reads_dynamic_columns() {
        let row = json!({
            "id": "l1",
            "timeline_item_id": "t1",
            "media_id": 5,
            "sort_order": 3,
            "media_asset": { "id": 5, "bucket": "site-images", "path": "timeline/a.jpg" }
        });
        let row = row.as_object().unwrap();
        let link = ImageLink::from_row(row, &tables(), Some("media_asset")).unwrap();
        assert_eq!(link.parent_id, Some(RowId::from("t1")));
        assert_eq!(link.media_id, Some(RowId::Int(5)));
        assert_eq!(link.sort_order, 3);
        assert!(!link.is_cover);
        assert_eq!(link.media_asset.unwrap().path, "timeline/a.jpg");
    }

    #[test]
    fn null_embed_means_no_asset() {
        let row = json!({ "id": 1, "timeline_item_id": "t1", "media_id": 9, "media_asset": null });
        let link = ImageLink::from_row(row.as_object().unwrap(), &tables(), Some("media_asset"))
            .unwrap();
        assert!(link.media_asset.is_none());
    }
}
