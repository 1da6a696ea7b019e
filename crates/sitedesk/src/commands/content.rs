use std::path::{Path, PathBuf};

use tabled::Tabled;
use tracing::warn;

use sitedesk_api::RowId;
use sitedesk_core::{FileUpload, Hub, ItemSummary, LogicalEntity};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output::{print_output, render_list, yes_no};

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Enabled")]
    enabled: &'static str,
    #[tabled(rename = "Sort")]
    sort: String,
    #[tabled(rename = "Translations")]
    translations: usize,
    #[tabled(rename = "Images")]
    images: usize,
}

fn item_row(s: &ItemSummary) -> ItemRow {
    ItemRow {
        id: s.id.to_string(),
        enabled: yes_no(s.enabled),
        sort: s.sort_key.map_or_else(|| "-".into(), |k| k.to_string()),
        translations: s.translations,
        images: s.images,
    }
}

pub async fn list(hub: &Hub, kind: LogicalEntity, global: &GlobalOpts) -> Result<(), CliError> {
    let items = hub.list(kind).await?;
    let out = render_list(global.output, &items, item_row)?;
    print_output(&out);
    Ok(())
}

pub async fn delete(hub: &Hub, kind: LogicalEntity, id: &RowId) -> Result<(), CliError> {
    let report = hub.delete(kind, id).await?;
    for (link, reason) in &report.image_failures {
        warn!(%link, reason, "image was not unlinked");
        eprintln!("image link {link}: {reason}");
    }
    if report.is_clean() {
        print_output(&format!("Deleted {kind} {id}"));
    } else {
        print_output(&format!(
            "Deleted {kind} {id} ({} image(s) could not be unlinked)",
            report.image_failures.len()
        ));
    }
    Ok(())
}

pub async fn add_images(
    hub: &Hub,
    kind: LogicalEntity,
    id: &RowId,
    files: &[PathBuf],
) -> Result<(), CliError> {
    let mut uploads = Vec::with_capacity(files.len());
    for path in files {
        uploads.push(read_upload(path).await?);
    }
    hub.add_images(kind, id, &uploads).await?;
    print_output(&format!("Linked {} image(s) to {kind} {id}", uploads.len()));
    Ok(())
}

pub async fn remove_image(hub: &Hub, kind: LogicalEntity, link_id: &RowId) -> Result<(), CliError> {
    let outcome = hub.remove_image(kind, link_id).await?;
    if outcome.asset_retained {
        print_output(&format!("Unlinked image {link_id}; the asset is still used elsewhere"));
    } else if outcome.storage_removed {
        print_output(&format!("Removed image {link_id}"));
    } else {
        print_output(&format!("Removed image {link_id}; the stored object could not be removed"));
    }
    Ok(())
}

pub async fn set_cover(hub: &Hub, project_id: &RowId, image_id: &RowId) -> Result<(), CliError> {
    hub.projects().set_cover_image(project_id, image_id).await?;
    print_output(&format!("Image {image_id} is now the cover of project {project_id}"));
    Ok(())
}

async fn read_upload(path: &Path) -> Result<FileUpload, CliError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|source| CliError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(FileUpload::new(name, data))
}
