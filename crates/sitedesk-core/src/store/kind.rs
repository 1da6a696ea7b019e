// ── Content kind contract ──
//
// A kind binds a descriptor to its record, translation and form shapes.
// Concrete kinds are zero-sized markers in `crate::kinds`.

use std::cmp::Ordering;
use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;
use sitedesk_api::{Row, RowId};

use crate::model::FileUpload;
use crate::schema::EntityDescriptor;

pub trait ContentKind: Send + Sync + 'static {
    /// Base row as stored.
    type Record: DeserializeOwned + Serialize + Clone + Debug + Send + Sync + 'static;
    /// Translation row as stored.
    type Translation: DeserializeOwned + Serialize + Clone + Debug + Send + Sync + 'static;
    /// Locale-varying fields supplied on create and update.
    type TranslationInput: Serialize + Debug + Send + Sync;
    /// Scalar fields for a new base row. Server-generated columns are absent.
    type Draft: Serialize + Debug + Send + Sync;
    /// Sparse scalar patch: `None` leaves a column untouched.
    type Patch: Serialize + Default + Debug + Send + Sync;

    fn descriptor() -> &'static EntityDescriptor;

    fn id(record: &Self::Record) -> &RowId;

    fn is_enabled(_record: &Self::Record) -> bool {
        true
    }

    fn sort_key(_record: &Self::Record) -> Option<i64> {
        None
    }

    /// Ordering of the active view.
    fn active_cmp(a: &Self::Record, b: &Self::Record) -> Ordering {
        Self::sort_key(a)
            .unwrap_or_default()
            .cmp(&Self::sort_key(b).unwrap_or_default())
    }

    /// Last chance to fill defaults into a serialized draft before insert.
    fn prepare_draft(_row: &mut Row) {}
}

/// Form input for creating one entity.
#[derive(Debug)]
pub struct CreateInput<K: ContentKind> {
    pub draft: K::Draft,
    pub translations: Vec<K::TranslationInput>,
    pub files: Vec<FileUpload>,
}

impl<K: ContentKind> CreateInput<K> {
    pub fn new(draft: K::Draft) -> Self {
        Self {
            draft,
            translations: Vec::new(),
            files: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_translations(mut self, translations: Vec<K::TranslationInput>) -> Self {
        self.translations = translations;
        self
    }

    #[must_use]
    pub fn with_files(mut self, files: Vec<FileUpload>) -> Self {
        self.files = files;
        self
    }
}

/// Form input for updating one entity.
#[derive(Debug)]
pub struct UpdateInput<K: ContentKind> {
    pub patch: K::Patch,
    /// `None` leaves translations alone; `Some(vec![])` clears them.
    pub translations: Option<Vec<K::TranslationInput>>,
    pub files: Vec<FileUpload>,
    /// Number of images the caller already holds. Counted from the
    /// gateway when absent.
    pub existing_images: Option<usize>,
}

impl<K: ContentKind> Default for UpdateInput<K> {
    fn default() -> Self {
        Self::new(K::Patch::default())
    }
}

impl<K: ContentKind> UpdateInput<K> {
    pub fn new(patch: K::Patch) -> Self {
        Self {
            patch,
            translations: None,
            files: Vec::new(),
            existing_images: None,
        }
    }

    #[must_use]
    pub fn with_translations(mut self, translations: Vec<K::TranslationInput>) -> Self {
        self.translations = Some(translations);
        self
    }

    #[must_use]
    pub fn with_files(mut self, files: Vec<FileUpload>, existing_images: Option<usize>) -> Self {
        self.files = files;
        self.existing_images = existing_images;
        self
    }
}
