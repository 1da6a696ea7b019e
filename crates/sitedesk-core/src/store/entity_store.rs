// ── Generic content store ──
//
// One implementation of fetch/compose and the multi-step writes, driven
// by a kind's descriptor. Every write refetches afterwards instead of
// merging locally; nothing is rolled back when a later step fails.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use sitedesk_api::{Filter, Gateway, Order, Row, RowId, Select, to_row};
use tracing::{error, info, warn};

use super::compose::compose;
use super::kind::{ContentKind, CreateInput, UpdateInput};
use super::state::{LoadingGuard, StateCell, StoreState};
use crate::error::CoreError;
use crate::media::{self, UnlinkOutcome};
use crate::model::{FileUpload, Full, ImageLink};
use crate::schema::{BaseOrder, EntitySchema, ImageSpec, ImageTables, SchemaResolver};
use crate::stream::StateStream;

/// A kind's composed view.
pub type FullOf<K> = Full<<K as ContentKind>::Record, <K as ContentKind>::Translation>;

/// Image unlinks that failed while deleting an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub image_failures: Vec<(RowId, String)>,
}

impl DeleteReport {
    pub fn is_clean(&self) -> bool {
        self.image_failures.is_empty()
    }
}

pub struct EntityStore<K: ContentKind> {
    gateway: Arc<dyn Gateway>,
    resolver: Arc<SchemaResolver>,
    state: StateCell<FullOf<K>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ContentKind> EntityStore<K> {
    pub fn new(gateway: Arc<dyn Gateway>, resolver: Arc<SchemaResolver>) -> Self {
        Self {
            gateway,
            resolver,
            state: StateCell::new(),
            _kind: PhantomData,
        }
    }

    pub(crate) fn gateway(&self) -> &dyn Gateway {
        self.gateway.as_ref()
    }

    pub(crate) fn loading(&self) -> LoadingGuard<'_, FullOf<K>> {
        self.state.begin()
    }

    // ── State access ─────────────────────────────────────────────────

    pub fn snapshot(&self) -> StoreState<FullOf<K>> {
        self.state.snapshot()
    }

    pub fn items(&self) -> Arc<Vec<Arc<FullOf<K>>>> {
        self.state.items()
    }

    pub fn subscribe(&self) -> StateStream<FullOf<K>> {
        StateStream::new(self.state.subscribe())
    }

    /// Enabled items in display order.
    pub fn active(&self) -> Vec<Arc<FullOf<K>>> {
        let mut active: Vec<_> = self
            .items()
            .iter()
            .filter(|full| K::is_enabled(&full.record))
            .cloned()
            .collect();
        active.sort_by(|a, b| K::active_cmp(&a.record, &b.record));
        active
    }

    pub fn get(&self, id: &RowId) -> Option<Arc<FullOf<K>>> {
        self.items()
            .iter()
            .find(|full| K::id(&full.record) == id)
            .cloned()
    }

    // ── Fetch ────────────────────────────────────────────────────────

    /// Reload and recompose every item.
    ///
    /// On failure the previous items are kept and the error slot is set;
    /// the result may be ignored.
    pub async fn fetch(&self) -> Result<(), CoreError> {
        let _loading = self.state.begin();
        match self.load().await {
            Ok(items) => {
                self.state.set_items(items);
                Ok(())
            }
            Err(e) => Err(self.record_error(e, "fetch")),
        }
    }

    async fn load(&self) -> Result<Vec<FullOf<K>>, CoreError> {
        let schema = self.resolver.resolve(K::descriptor()).await?;
        let (records, translations, images) = tokio::try_join!(
            self.read_records(&schema),
            self.read_translations(&schema),
            self.read_images(),
        )?;
        Ok(compose(records, K::id, &translations, &images))
    }

    async fn read_records(&self, schema: &EntitySchema) -> Result<Vec<K::Record>, CoreError> {
        let mut query = Select::from(&schema.base_table);
        match K::descriptor().base_order {
            BaseOrder::Ascending(column) => query = query.order(Order::asc(column)),
            BaseOrder::NewestFirst => query = query.order(Order::desc("created_at")),
            BaseOrder::Unordered => {}
        }
        let rows = self.gateway.select(&query).await?;
        rows.into_iter().map(decode).collect()
    }

    async fn read_translations(
        &self,
        schema: &EntitySchema,
    ) -> Result<Vec<(RowId, K::Translation)>, CoreError> {
        let Some(tables) = &schema.translations else {
            return Ok(Vec::new());
        };
        let rows = self.gateway.select(&Select::from(&tables.table)).await?;
        rows.into_iter()
            .filter_map(|row| {
                let parent = RowId::from_row(&row, &tables.fk_column)?;
                Some(decode(row).map(|t| (parent, t)))
            })
            .collect()
    }

    async fn read_images(&self) -> Result<Vec<ImageLink>, CoreError> {
        let descriptor = K::descriptor();
        let Some(spec) = descriptor.images else {
            return Ok(Vec::new());
        };
        let links = match self.image_tables().await {
            Ok(tables) => media::fetch_links(self.gateway(), &tables, &spec, None).await,
            Err(e) => Err(e),
        };
        match links {
            Err(e) if spec.optional => {
                warn!(entity = %descriptor.entity, error = %e, "images unavailable, continuing without");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    /// Resolved image tables; an error for kinds that carry no images.
    pub(crate) async fn image_tables(&self) -> Result<ImageTables, CoreError> {
        self.resolver
            .resolve_images(K::descriptor())
            .await?
            .ok_or_else(no_images::<K>)
    }

    // ── Create ───────────────────────────────────────────────────────

    /// Insert the base row, its translations and images, then refetch.
    pub async fn create(&self, input: CreateInput<K>) -> Result<K::Record, CoreError> {
        let _loading = self.state.begin();
        match self.create_steps(input).await {
            Ok(record) => {
                self.refresh().await;
                Ok(record)
            }
            Err(e) => Err(self.record_error(e, "create")),
        }
    }

    async fn create_steps(&self, input: CreateInput<K>) -> Result<K::Record, CoreError> {
        let descriptor = K::descriptor();
        if descriptor.singleton && !self.items().is_empty() {
            return Err(CoreError::ValidationFailed {
                message: format!(
                    "Only one entry is allowed for {}; update the existing one instead.",
                    descriptor.label
                ),
            });
        }

        let schema = self.resolver.resolve(descriptor).await?;

        let mut row = to_row(&input.draft)?;
        K::prepare_draft(&mut row);
        let inserted = self.gateway.insert(&schema.base_table, vec![row]).await?;
        let record: K::Record = inserted
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::OperationFailed {
                message: format!("Failed to create {}", descriptor.label),
            })
            .and_then(decode)?;
        let id = K::id(&record).clone();

        self.insert_translations(&schema, &id, &input.translations)
            .await?;

        if !input.files.is_empty() {
            self.link_files(&id, &input.files, 0).await?;
        }

        info!(entity = %descriptor.entity, %id, "created");
        Ok(record)
    }

    // ── Update ───────────────────────────────────────────────────────

    /// Apply a sparse patch, optionally replace translations, append
    /// images after the existing ones, then refetch.
    pub async fn update(&self, id: &RowId, input: UpdateInput<K>) -> Result<(), CoreError> {
        let _loading = self.state.begin();
        match self.update_steps(id, input).await {
            Ok(()) => {
                self.refresh().await;
                Ok(())
            }
            Err(e) => Err(self.record_error(e, "update")),
        }
    }

    async fn update_steps(&self, id: &RowId, input: UpdateInput<K>) -> Result<(), CoreError> {
        let schema = self.resolver.resolve(K::descriptor()).await?;

        let patch = to_row(&input.patch)?;
        if !patch.is_empty() {
            self.gateway
                .update(&schema.base_table, patch, &[id_filter(id)])
                .await?;
        }

        if let Some(translations) = &input.translations {
            if let Some(tables) = &schema.translations {
                self.gateway
                    .delete(&tables.table, &[Filter::eq(&tables.fk_column, id.to_value())])
                    .await?;
            }
            self.insert_translations(&schema, id, translations).await?;
        }

        if !input.files.is_empty() {
            let start = match input.existing_images {
                Some(count) => count,
                None => {
                    let tables = self.image_tables().await?;
                    media::count_links(self.gateway(), &tables, id).await?
                }
            };
            self.link_files(id, &input.files, start).await?;
        }
        Ok(())
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Unlink every image, then delete translations and the base row.
    ///
    /// Image failures are collected rather than aborting the delete.
    pub async fn delete(&self, id: &RowId) -> Result<DeleteReport, CoreError> {
        let _loading = self.state.begin();
        match self.delete_steps(id).await {
            Ok(report) => {
                self.refresh().await;
                Ok(report)
            }
            Err(e) => Err(self.record_error(e, "delete")),
        }
    }

    async fn delete_steps(&self, id: &RowId) -> Result<DeleteReport, CoreError> {
        let descriptor = K::descriptor();
        let schema = self.resolver.resolve(descriptor).await?;
        let mut report = DeleteReport::default();

        if let Some(spec) = descriptor.images {
            let links = match self.image_tables().await {
                Ok(tables) => media::fetch_links(self.gateway(), &tables, &spec, Some(id))
                    .await
                    .map(|links| (tables, links)),
                Err(e) => Err(e),
            };
            match links {
                Ok((tables, links)) => {
                    for link in links {
                        if let Err(e) =
                            media::unlink(self.gateway(), &tables, spec.shared_with, &link.id).await
                        {
                            warn!(entity = %descriptor.entity, link = %link.id, error = %e, "failed to delete image");
                            report.image_failures.push((link.id, e.to_string()));
                        }
                    }
                }
                Err(e) if spec.optional => {
                    warn!(entity = %descriptor.entity, error = %e, "skipping image cleanup");
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(tables) = &schema.translations {
            self.gateway
                .delete(&tables.table, &[Filter::eq(&tables.fk_column, id.to_value())])
                .await?;
        }
        self.gateway
            .delete(&schema.base_table, &[id_filter(id)])
            .await?;

        info!(entity = %descriptor.entity, %id, failures = report.image_failures.len(), "deleted");
        Ok(report)
    }

    // ── Images ───────────────────────────────────────────────────────

    /// Upload `files` after the entity's existing images.
    pub async fn add_images(&self, id: &RowId, files: &[FileUpload]) -> Result<(), CoreError> {
        let _loading = self.state.begin();
        let result: Result<(), CoreError> = async {
            let tables = self.image_tables().await?;
            let start = media::count_links(self.gateway(), &tables, id).await?;
            self.link_files(id, files, start).await
        }
        .await;
        match result {
            Ok(()) => {
                self.refresh().await;
                Ok(())
            }
            Err(e) => Err(self.record_error(e, "upload images for")),
        }
    }

    /// Unlink a single image and refetch.
    pub async fn delete_image(&self, link_id: &RowId) -> Result<UnlinkOutcome, CoreError> {
        let _loading = self.state.begin();
        let result: Result<UnlinkOutcome, CoreError> = async {
            let spec = image_spec::<K>()?;
            let tables = self.image_tables().await?;
            media::unlink(self.gateway(), &tables, spec.shared_with, link_id).await
        }
        .await;
        match result {
            Ok(outcome) => {
                self.refresh().await;
                Ok(outcome)
            }
            Err(e) => Err(self.record_error(e, "delete image of")),
        }
    }

    async fn link_files(
        &self,
        id: &RowId,
        files: &[FileUpload],
        start: usize,
    ) -> Result<(), CoreError> {
        let spec = image_spec::<K>()?;
        let tables = self.image_tables().await?;
        media::upload_and_link(self.gateway(), &tables, &spec, id, files, start).await
    }

    // ── Helpers ──────────────────────────────────────────────────────

    async fn insert_translations(
        &self,
        schema: &EntitySchema,
        id: &RowId,
        translations: &[K::TranslationInput],
    ) -> Result<(), CoreError> {
        let Some(tables) = &schema.translations else {
            return Ok(());
        };
        if translations.is_empty() {
            return Ok(());
        }
        let rows = translations
            .iter()
            .map(|t| -> Result<Row, CoreError> {
                let mut row = to_row(t)?;
                row.insert(tables.fk_column.clone(), id.to_value());
                Ok(row)
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.gateway.insert(&tables.table, rows).await?;
        Ok(())
    }

    /// Refetch after a write; a failure lands in the error slot only.
    pub(crate) async fn refresh(&self) {
        let _ = self.fetch().await;
    }

    pub(crate) fn record_error(&self, err: CoreError, action: &str) -> CoreError {
        let label = K::descriptor().label;
        let message = err.user_message(&format!("Failed to {action} {label}"));
        error!(entity = %K::descriptor().entity, action, error = %message, "store operation failed");
        self.state.set_error(message);
        err
    }
}

fn image_spec<K: ContentKind>() -> Result<ImageSpec, CoreError> {
    K::descriptor().images.ok_or_else(no_images::<K>)
}

fn no_images<K: ContentKind>() -> CoreError {
    CoreError::ValidationFailed {
        message: format!("{} do not carry images", K::descriptor().label),
    }
}

fn id_filter(id: &RowId) -> Filter {
    Filter::eq("id", id.to_value())
}

fn decode<T: serde::de::DeserializeOwned>(row: Row) -> Result<T, CoreError> {
    serde_json::from_value(Value::Object(row)).map_err(CoreError::from)
}
