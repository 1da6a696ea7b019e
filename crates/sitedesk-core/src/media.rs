// ── Media upload and linking ──
//
// Turns raw files into stored objects, catalog rows and positioned link
// rows, and reverses that on unlink. Multi-step and not atomic: a failure
// part way leaves earlier objects and rows in place.

use chrono::Utc;
use serde_json::{Value, json};
use sitedesk_api::{Embed, Filter, Gateway, Order, Row, RowId, Select, UploadOptions};
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{FileUpload, ImageLink, MediaAsset};
use crate::schema::{AssetJoin, ImageSpec, ImageTables};

/// Bucket holding every site image.
pub const BUCKET: &str = "site-images";

pub(crate) const MEDIA_TABLE: &str = "media_assets";
pub(crate) const ASSET_ALIAS: &str = "media_asset";

/// Column on shared link tables referencing the catalog row.
const SHARED_MEDIA_COLUMN: &str = "media_id";

/// What an unlink actually removed beyond the link row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnlinkOutcome {
    pub storage_removed: bool,
    /// The catalog row and stored object were kept because another link
    /// still uses them.
    pub asset_retained: bool,
}

/// Storage path for the file landing at link position `index`.
pub(crate) fn storage_path(
    spec: &ImageSpec,
    parent: &RowId,
    millis: i64,
    index: usize,
    extension: &str,
) -> String {
    format!(
        "{}/{}{parent}_{millis}_{index}.{extension}",
        spec.folder, spec.file_prefix
    )
}

/// Last path segment, used as the catalog row's alt text.
fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Upload one object with no-overwrite semantics.
pub(crate) async fn upload_object(
    gateway: &dyn Gateway,
    path: &str,
    file: &FileUpload,
) -> Result<(), CoreError> {
    let options = UploadOptions {
        content_type: file.content_type.clone(),
        ..UploadOptions::default()
    };
    gateway
        .upload(BUCKET, path, file.data.clone(), &options)
        .await?;
    debug!(path, bytes = file.data.len(), "uploaded object");
    Ok(())
}

/// Insert a catalog row and return its id.
pub(crate) async fn insert_asset(
    gateway: &dyn Gateway,
    path: &str,
    alt: &str,
) -> Result<RowId, CoreError> {
    let row = json_row(json!({ "bucket": BUCKET, "path": path, "alt": alt }));
    let inserted = gateway.insert(MEDIA_TABLE, vec![row]).await?;
    inserted
        .first()
        .and_then(|r| RowId::from_row(r, "id"))
        .ok_or_else(|| CoreError::OperationFailed {
            message: "Failed to create media asset".into(),
        })
}

/// Insert a link row at `position`. With `cover`, the row is flagged as
/// cover exactly when it lands at position 0.
pub(crate) async fn insert_link(
    gateway: &dyn Gateway,
    tables: &ImageTables,
    cover: bool,
    parent: &RowId,
    media_id: &RowId,
    position: usize,
) -> Result<(), CoreError> {
    let mut row = Row::new();
    row.insert(tables.fk_column.clone(), parent.to_value());
    row.insert(tables.media_column.clone(), media_id.to_value());
    row.insert(tables.sort_column.clone(), Value::from(position));
    if cover {
        row.insert("is_cover".into(), Value::Bool(position == 0));
    }
    gateway.insert(&tables.table, vec![row]).await?;
    Ok(())
}

/// Upload `files` and link them to `parent` from `start` onwards.
///
/// Stops at the first failing file.
pub(crate) async fn upload_and_link(
    gateway: &dyn Gateway,
    tables: &ImageTables,
    spec: &ImageSpec,
    parent: &RowId,
    files: &[FileUpload],
    start: usize,
) -> Result<(), CoreError> {
    for (offset, file) in files.iter().enumerate() {
        let position = start + offset;
        let millis = Utc::now().timestamp_millis();
        let path = storage_path(spec, parent, millis, position, file.extension());

        upload_object(gateway, &path, file).await?;
        let media_id = insert_asset(gateway, &path, file_name(&path)).await?;
        insert_link(gateway, tables, spec.cover, parent, &media_id, position).await?;
    }
    if !files.is_empty() {
        info!(table = %tables.table, %parent, count = files.len(), "linked images");
    }
    Ok(())
}

// ── Reads ────────────────────────────────────────────────────────────

/// Link rows, optionally for one parent, with assets hydrated.
pub(crate) async fn fetch_links(
    gateway: &dyn Gateway,
    tables: &ImageTables,
    spec: &ImageSpec,
    parent: Option<&RowId>,
) -> Result<Vec<ImageLink>, CoreError> {
    let mut query = Select::from(&tables.table).order(Order::asc(&tables.sort_column));
    if let Some(parent) = parent {
        query = query.filter(Filter::eq(&tables.fk_column, parent.to_value()));
    }

    match spec.asset_join {
        AssetJoin::Embed => {
            let query = query.embed(Embed::new(
                ASSET_ALIAS,
                MEDIA_TABLE,
                &tables.table,
                &tables.media_column,
            ));
            let rows = gateway.select(&query).await?;
            Ok(rows
                .iter()
                .filter_map(|row| ImageLink::from_row(row, tables, Some(ASSET_ALIAS)))
                .collect())
        }
        AssetJoin::Lookup => {
            let rows = gateway.select(&query).await?;
            let mut links: Vec<ImageLink> = rows
                .iter()
                .filter_map(|row| ImageLink::from_row(row, tables, None))
                .collect();
            let ids: Vec<RowId> = links.iter().filter_map(|l| l.media_id.clone()).collect();
            if ids.is_empty() {
                return Ok(links);
            }

            let assets = fetch_assets(gateway, Filter::in_ids("id", &ids)).await?;
            for link in &mut links {
                link.media_asset = link
                    .media_id
                    .as_ref()
                    .and_then(|id| assets.iter().find(|a| &a.id == id))
                    .cloned();
            }
            Ok(links)
        }
    }
}

pub(crate) async fn fetch_assets(
    gateway: &dyn Gateway,
    filter: Filter,
) -> Result<Vec<MediaAsset>, CoreError> {
    let rows = gateway.select(&Select::from(MEDIA_TABLE).filter(filter)).await?;
    rows.into_iter()
        .map(|row| serde_json::from_value(Value::Object(row)).map_err(CoreError::from))
        .collect()
}

pub(crate) async fn count_links(
    gateway: &dyn Gateway,
    tables: &ImageTables,
    parent: &RowId,
) -> Result<usize, CoreError> {
    let rows = gateway
        .select(&Select::from(&tables.table).filter(Filter::eq(&tables.fk_column, parent.to_value())))
        .await?;
    Ok(rows.len())
}

// ── Unlink ───────────────────────────────────────────────────────────

/// Remove one link row, then its stored object and catalog row.
///
/// The object removal is best-effort. When `shared_with` is non-empty the
/// catalog row is kept while any of those tables still references it.
pub(crate) async fn unlink(
    gateway: &dyn Gateway,
    tables: &ImageTables,
    shared_with: &[&str],
    link_id: &RowId,
) -> Result<UnlinkOutcome, CoreError> {
    let rows = gateway
        .select(&Select::from(&tables.table).filter(Filter::eq("id", link_id.to_value())))
        .await?;
    let link = rows
        .first()
        .and_then(|row| ImageLink::from_row(row, tables, None))
        .ok_or_else(|| CoreError::NotFound {
            entity_type: tables.table.clone(),
            identifier: link_id.to_string(),
        })?;

    let asset = match &link.media_id {
        Some(id) => fetch_assets(gateway, Filter::eq("id", id.to_value()))
            .await?
            .into_iter()
            .next(),
        None => None,
    };

    gateway
        .delete(&tables.table, &[Filter::eq("id", link_id.to_value())])
        .await?;

    let Some(asset) = asset else {
        return Ok(UnlinkOutcome::default());
    };
    release_asset(gateway, &asset, shared_with).await
}

/// Release an asset whose link row is gone.
///
/// An asset still referenced from one of `shared_with` is left alone,
/// stored object included. Otherwise the object is removed best-effort and
/// the catalog row deleted.
async fn release_asset(
    gateway: &dyn Gateway,
    asset: &MediaAsset,
    shared_with: &[&str],
) -> Result<UnlinkOutcome, CoreError> {
    if !shared_with.is_empty() && is_referenced(gateway, &asset.id, shared_with).await {
        info!(media_id = %asset.id, "media asset still referenced, keeping object and catalog row");
        return Ok(UnlinkOutcome {
            storage_removed: false,
            asset_retained: true,
        });
    }

    let storage_removed = match gateway
        .remove(&asset.bucket, std::slice::from_ref(&asset.path))
        .await
    {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %asset.path, error = %e, "failed to remove stored object");
            false
        }
    };

    if shared_with.is_empty() {
        gateway
            .delete(MEDIA_TABLE, &[Filter::eq("id", asset.id.to_value())])
            .await?;
        return Ok(UnlinkOutcome {
            storage_removed,
            asset_retained: false,
        });
    }

    if let Err(e) = gateway
        .delete(MEDIA_TABLE, &[Filter::eq("id", asset.id.to_value())])
        .await
    {
        warn!(media_id = %asset.id, error = %e, "failed to delete media asset");
    }
    Ok(UnlinkOutcome {
        storage_removed,
        asset_retained: false,
    })
}

/// A failed check counts as "not referenced".
async fn is_referenced(gateway: &dyn Gateway, media_id: &RowId, tables: &[&str]) -> bool {
    for table in tables {
        let query = Select::from(*table)
            .filter(Filter::eq(SHARED_MEDIA_COLUMN, media_id.to_value()))
            .limit(1);
        match gateway.select(&query).await {
            Ok(rows) if !rows.is_empty() => return true,
            Ok(_) => {}
            Err(e) => warn!(table, error = %e, "could not check media references"),
        }
    }
    false
}

pub(crate) fn json_row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}
