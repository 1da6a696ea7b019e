// ── Domain model ──
//
// Shapes shared by every content kind: the composed full entity, media
// catalog records, image links and upload inputs. Per-kind records live
// next to their descriptors in `kinds`.

mod media;

use serde::{Deserialize, Serialize};
use sitedesk_api::RowId;

pub use media::{FileUpload, ImageLink, MediaAsset};

/// A base record with its translations and ordered image links.
///
/// View-model only; never written back as a unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Full<R, T> {
    #[serde(flatten)]
    pub record: R,
    pub translations: Vec<T>,
    pub images: Vec<ImageLink>,
}

impl<R, T> Full<R, T> {
    /// The cover image, or the first image when none is flagged.
    pub fn cover(&self) -> Option<&ImageLink> {
        self.images
            .iter()
            .find(|img| img.is_cover)
            .or_else(|| self.images.first())
    }
}

/// A stored translation row: its id plus the kind's locale fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation<F> {
    pub id: RowId,
    #[serde(flatten)]
    pub fields: F,
}

/// Placeholder translation type for kinds stored without translations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Untranslated {}
