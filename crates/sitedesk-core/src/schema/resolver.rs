// ── Schema resolver ──
//
// Probes the gateway for which candidate table names exist and memoizes
// the winners per logical entity for the life of the process. Only
// successes are cached; a failed resolution is retried on the next call.

use std::sync::Arc;

use dashmap::DashMap;
use sitedesk_api::{Gateway, Select};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::descriptor::{EntityDescriptor, Naming};
use super::rules::{self, Dependent};
use super::{EntitySchema, ImageTables, LogicalEntity, TranslationTables};
use crate::error::CoreError;

const SORT_COLUMN: &str = "sort_order";

type Memo<T> = DashMap<LogicalEntity, Arc<OnceCell<T>>>;

pub struct SchemaResolver {
    gateway: Arc<dyn Gateway>,
    schemas: Memo<EntitySchema>,
    images: Memo<ImageTables>,
}

impl SchemaResolver {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            schemas: DashMap::new(),
            images: DashMap::new(),
        }
    }

    /// Base and translation tables for a kind.
    ///
    /// Fixed-name kinds return immediately without touching the gateway.
    pub async fn resolve(&self, descriptor: &EntityDescriptor) -> Result<EntitySchema, CoreError> {
        match descriptor.naming {
            Naming::Fixed {
                base, translations, ..
            } => Ok(EntitySchema {
                base_table: base.to_owned(),
                translations: translations.map(|t| TranslationTables {
                    table: t.table.to_owned(),
                    fk_column: t.fk.to_owned(),
                }),
            }),
            Naming::Probed => {
                let entity = descriptor.entity;
                let cell = cell(&self.schemas, entity);
                cell.get_or_try_init(|| self.probe_schema(entity))
                    .await
                    .cloned()
            }
        }
    }

    /// Image-link table for a kind, or `None` when the kind has no images.
    pub async fn resolve_images(
        &self,
        descriptor: &EntityDescriptor,
    ) -> Result<Option<ImageTables>, CoreError> {
        let Some(spec) = descriptor.images else {
            return Ok(None);
        };

        match descriptor.naming {
            Naming::Fixed { images, .. } => Ok(images.map(|t| ImageTables {
                table: t.table.to_owned(),
                fk_column: t.fk.to_owned(),
                media_column: spec.media_column.to_owned(),
                sort_column: SORT_COLUMN.to_owned(),
            })),
            Naming::Probed => {
                let schema = self.resolve(descriptor).await?;
                let entity = descriptor.entity;
                let cell = cell(&self.images, entity);
                cell.get_or_try_init(|| {
                    self.probe_images(entity, &schema.base_table, spec.media_column)
                })
                .await
                .cloned()
                .map(Some)
            }
        }
    }

    async fn probe_schema(&self, entity: LogicalEntity) -> Result<EntitySchema, CoreError> {
        let base_table = self
            .pick_first_existing(rules::base_candidates(entity))
            .await?;

        let translations = match rules::translation_candidates(entity, &base_table) {
            Some(Dependent { candidates, fk }) => Some(TranslationTables {
                table: self.pick_first_existing(candidates).await?,
                fk_column: fk.to_owned(),
            }),
            None => None,
        };

        info!(
            %entity,
            base = %base_table,
            translations = translations.as_ref().map(|t| t.table.as_str()),
            "resolved schema"
        );
        Ok(EntitySchema {
            base_table,
            translations,
        })
    }

    async fn probe_images(
        &self,
        entity: LogicalEntity,
        base_table: &str,
        media_column: &str,
    ) -> Result<ImageTables, CoreError> {
        let Some(Dependent { candidates, fk }) = rules::image_candidates(entity, base_table) else {
            return Err(unresolved(&[]));
        };
        let table = self.pick_first_existing(candidates).await?;
        info!(%entity, table = %table, "resolved image table");
        Ok(ImageTables {
            table,
            fk_column: fk.to_owned(),
            media_column: media_column.to_owned(),
            sort_column: SORT_COLUMN.to_owned(),
        })
    }

    /// The first candidate judged to exist, probing in order.
    pub async fn pick_first_existing(&self, candidates: &[&str]) -> Result<String, CoreError> {
        for name in candidates {
            if self.table_exists(name).await {
                return Ok((*name).to_owned());
            }
        }
        Err(unresolved(candidates))
    }

    /// Only the "table missing" signal means absent; any other outcome,
    /// including permission errors, counts as present.
    pub async fn table_exists(&self, table: &str) -> bool {
        debug!(table, "probing table");
        match self.gateway.select(&Select::from(table).limit(1)).await {
            Ok(_) => true,
            Err(e) if e.is_table_missing() => false,
            Err(e) => {
                debug!(table, error = %e, "probe failed, assuming table exists");
                true
            }
        }
    }
}

/// Clone the memo cell out so no map guard is held across an await.
fn cell<T>(memo: &Memo<T>, entity: LogicalEntity) -> Arc<OnceCell<T>> {
    memo.entry(entity).or_default().clone()
}

fn unresolved(candidates: &[&str]) -> CoreError {
    CoreError::SchemaUnresolved {
        candidates: candidates.iter().map(|c| (*c).to_owned()).collect(),
    }
}
