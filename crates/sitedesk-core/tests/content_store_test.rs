// Generic content store behavior against the in-memory gateway.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use sitedesk_api::memory::{IdKind, Operation};
use sitedesk_api::{Gateway, MemoryGateway, Row, RowId};
use sitedesk_core::kinds::{
    AboutDraft, AboutStore, ProjectDraft, ProjectPatch, ProjectStore, ProjectText,
};
use sitedesk_core::{
    BUCKET, CoreError, CreateInput, EntityStore, FileUpload, SchemaResolver, UpdateInput,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn row(value: Value) -> Row {
    value.as_object().unwrap().clone()
}

fn project_gateway() -> Arc<MemoryGateway> {
    Arc::new(
        MemoryGateway::new()
            .with_table("projects", IdKind::Serial)
            .with_table("project_translations", IdKind::Serial)
            .with_table("project_images", IdKind::Serial)
            .with_table("media_assets", IdKind::Serial),
    )
}

fn store<K: sitedesk_core::ContentKind>(gw: &Arc<MemoryGateway>) -> EntityStore<K> {
    let gateway: Arc<dyn Gateway> = gw.clone();
    EntityStore::new(Arc::clone(&gateway), Arc::new(SchemaResolver::new(gateway)))
}

fn text(locale: &str, title: &str) -> ProjectText {
    ProjectText {
        locale: locale.into(),
        badge: String::new(),
        title: title.into(),
        subtitle: None,
        description: None,
        meta_items: None,
    }
}

fn draft(slug: &str) -> ProjectDraft {
    ProjectDraft {
        slug: slug.into(),
        is_enabled: true,
        duration_days: Some(30),
    }
}

fn file(name: &str) -> FileUpload {
    FileUpload::new(name, b"image-bytes".to_vec()).with_content_type("image/jpeg")
}

/// A project with `images` links at positions 0.. and their assets.
fn seed_project(gw: &MemoryGateway, slug: &str, images: usize) -> RowId {
    let project = gw
        .seed(
            "projects",
            vec![row(json!({ "slug": slug, "sort_order": 0, "is_enabled": true }))],
        )
        .unwrap();
    let id = RowId::from_row(&project[0], "id").unwrap();
    for position in 0..images {
        let asset = gw
            .seed(
                "media_assets",
                vec![row(json!({
                    "bucket": BUCKET,
                    "path": format!("gallery/{slug}_{position}.jpg"),
                    "alt": format!("{slug}_{position}.jpg"),
                }))],
            )
            .unwrap();
        gw.seed(
            "project_images",
            vec![row(json!({
                "project_id": id.to_value(),
                "media_id": asset[0]["id"],
                "sort_order": position,
                "is_cover": position == 0,
            }))],
        )
        .unwrap();
    }
    id
}

/// `(position, path)` of every image linked to `project`, by position.
fn linked_paths(gw: &MemoryGateway, project: &RowId) -> Vec<(i64, String)> {
    let assets = gw.rows("media_assets");
    let mut linked: Vec<(i64, String)> = gw
        .rows("project_images")
        .iter()
        .filter(|link| link["project_id"] == project.to_value())
        .map(|link| {
            let asset = assets.iter().find(|a| a["id"] == link["media_id"]).unwrap();
            (
                link["sort_order"].as_i64().unwrap(),
                asset["path"].as_str().unwrap().to_owned(),
            )
        })
        .collect();
    linked.sort();
    linked
}

// ── Read path ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_composes_translations_and_ordered_images() {
    let gw = project_gateway();
    let first = seed_project(&gw, "first", 0);
    let second = seed_project(&gw, "second", 0);
    gw.seed(
        "project_translations",
        vec![
            row(json!({ "project_id": first.to_value(), "locale": "en", "title": "One" })),
            row(json!({ "project_id": first.to_value(), "locale": "ar", "title": "Wahid" })),
            row(json!({ "project_id": second.to_value(), "locale": "en", "title": "Two" })),
        ],
    )
    .unwrap();
    let assets = gw
        .seed(
            "media_assets",
            vec![
                row(json!({ "bucket": BUCKET, "path": "gallery/late.jpg" })),
                row(json!({ "bucket": BUCKET, "path": "gallery/early.jpg" })),
            ],
        )
        .unwrap();
    gw.seed(
        "project_images",
        vec![
            row(json!({ "project_id": first.to_value(), "media_id": assets[0]["id"], "sort_order": 1 })),
            row(json!({ "project_id": first.to_value(), "media_id": assets[1]["id"], "sort_order": 0 })),
        ],
    )
    .unwrap();

    let projects: ProjectStore = store(&gw);
    projects.fetch().await.unwrap();

    let items = projects.items();
    assert_eq!(items.len(), 2);

    let one = projects.get(&first).unwrap();
    let locales: Vec<&str> = one
        .translations
        .iter()
        .map(|t| t.fields.locale.as_str())
        .collect();
    assert_eq!(locales, vec!["en", "ar"]);
    let paths: Vec<&str> = one
        .images
        .iter()
        .map(|i| i.media_asset.as_ref().unwrap().path.as_str())
        .collect();
    assert_eq!(paths, vec!["gallery/early.jpg", "gallery/late.jpg"]);

    let two = projects.get(&second).unwrap();
    assert_eq!(two.translations.len(), 1);
    assert!(two.images.is_empty());
}

#[tokio::test]
async fn test_failed_fetch_keeps_items_and_sets_error() {
    let gw = project_gateway();
    seed_project(&gw, "kept", 0);
    let projects: ProjectStore = store(&gw);
    projects.fetch().await.unwrap();

    gw.fail(Operation::Select, Some("projects"), "connection reset");
    assert!(projects.fetch().await.is_err());

    let state = projects.snapshot();
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.error.as_deref(), Some("connection reset"));
    assert!(!state.loading);
}

// ── Write path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_then_fetch_round_trips_translations_and_image() {
    let gw = project_gateway();
    let projects: ProjectStore = store(&gw);

    let input = CreateInput::new(draft("villa"))
        .with_translations(vec![text("en", "Villa"), text("ku", "Vîla")])
        .with_files(vec![file("front.png")]);
    let created = projects.create(input).await.unwrap();

    let items = projects.items();
    assert_eq!(items.len(), 1);
    let full = &items[0];
    assert_eq!(full.record.id, created.id);
    assert_eq!(full.translations.len(), 2);
    assert_eq!(full.images.len(), 1);

    let image = &full.images[0];
    assert_eq!(image.sort_order, 0);
    assert!(image.is_cover);
    let asset = image.media_asset.as_ref().unwrap();
    assert_eq!(asset.bucket, BUCKET);
    assert!(asset.path.starts_with(&format!("gallery/project_{}_", created.id)));
    assert!(asset.path.ends_with("_0.png"));
    assert!(gw.object(BUCKET, &asset.path).is_some());
}

#[tokio::test]
async fn test_sparse_update_leaves_untouched_columns_and_translations() {
    let gw = project_gateway();
    let projects: ProjectStore = store(&gw);
    let created = projects
        .create(CreateInput::new(draft("old")).with_translations(vec![text("en", "Old")]))
        .await
        .unwrap();
    gw.clear_calls();

    let patch = ProjectPatch {
        slug: Some("new".into()),
        ..ProjectPatch::default()
    };
    projects
        .update(&created.id, UpdateInput::new(patch))
        .await
        .unwrap();

    let stored = &gw.rows("projects")[0];
    assert_eq!(stored["slug"], "new");
    assert_eq!(stored["duration_days"], 30);
    assert_eq!(stored["is_enabled"], true);
    assert_eq!(gw.call_count(Operation::Delete, "project_translations"), 0);
    assert_eq!(gw.rows("project_translations").len(), 1);
}

#[tokio::test]
async fn test_empty_translation_list_clears_translations() {
    let gw = project_gateway();
    let projects: ProjectStore = store(&gw);
    let created = projects
        .create(CreateInput::new(draft("p")).with_translations(vec![text("en", "P")]))
        .await
        .unwrap();

    projects
        .update(
            &created.id,
            UpdateInput::default().with_translations(Vec::new()),
        )
        .await
        .unwrap();

    assert!(gw.rows("project_translations").is_empty());
    assert!(projects.get(&created.id).unwrap().translations.is_empty());
}

#[tokio::test]
async fn test_added_images_continue_after_existing_positions() {
    let gw = project_gateway();
    let id = seed_project(&gw, "p", 2);
    let projects: ProjectStore = store(&gw);

    projects
        .add_images(&id, &[file("a.jpg"), file("b.jpg"), file("c.jpg")])
        .await
        .unwrap();

    let mut positions: Vec<i64> = gw
        .rows("project_images")
        .iter()
        .map(|r| r["sort_order"].as_i64().unwrap())
        .collect();
    positions.sort_unstable();
    assert_eq!(positions, vec![0, 1, 2, 3, 4]);

    let covers = gw
        .rows("project_images")
        .iter()
        .filter(|r| r["is_cover"] == true)
        .count();
    assert_eq!(covers, 1);
}

#[tokio::test]
async fn test_update_links_new_files_in_input_order() {
    let gw = project_gateway();
    let id = seed_project(&gw, "p", 2);
    let projects: ProjectStore = store(&gw);

    projects
        .update(
            &id,
            UpdateInput::default()
                .with_files(vec![file("a.jpg"), file("b.png"), file("c.gif")], None),
        )
        .await
        .unwrap();

    let fresh: Vec<(i64, String)> = linked_paths(&gw, &id)
        .into_iter()
        .skip(2)
        .map(|(position, path)| (position, path.rsplit_once('_').unwrap().1.to_owned()))
        .collect();
    assert_eq!(
        fresh,
        vec![
            (2, "2.jpg".to_owned()),
            (3, "3.png".to_owned()),
            (4, "4.gif".to_owned()),
        ]
    );
    assert_eq!(projects.get(&id).unwrap().images.len(), 5);
}

#[tokio::test]
async fn test_update_trusts_caller_image_count() {
    let gw = project_gateway();
    let id = seed_project(&gw, "p", 1);
    let projects: ProjectStore = store(&gw);

    projects
        .update(&id, UpdateInput::default().with_files(vec![file("d.jpg")], Some(7)))
        .await
        .unwrap();

    let positions: Vec<i64> = linked_paths(&gw, &id).into_iter().map(|(p, _)| p).collect();
    assert_eq!(positions, vec![0, 7]);
}

#[tokio::test]
async fn test_failed_file_stops_batch_without_rollback() {
    let gw = project_gateway();
    let id = seed_project(&gw, "p", 1);
    let projects: ProjectStore = store(&gw);
    gw.fail_after(1, Operation::Insert, Some("media_assets"), "disk full");

    let err = projects
        .update(
            &id,
            UpdateInput::default()
                .with_files(vec![file("a.jpg"), file("b.jpg"), file("c.jpg")], None),
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "disk full");
    // First file fully linked, second uploaded but never cataloged, third untouched.
    assert_eq!(gw.call_count(Operation::Upload, BUCKET), 2);
    assert_eq!(gw.object_paths(BUCKET).len(), 2);
    assert_eq!(gw.rows("media_assets").len(), 2);
    let positions: Vec<i64> = linked_paths(&gw, &id).into_iter().map(|(p, _)| p).collect();
    assert_eq!(positions, vec![0, 1]);
    assert_eq!(projects.snapshot().error.as_deref(), Some("disk full"));
}

#[tokio::test]
async fn test_set_cover_image_is_exclusive() {
    let gw = project_gateway();
    let id = seed_project(&gw, "p", 3);
    let projects: ProjectStore = store(&gw);
    let target = RowId::from_row(&gw.rows("project_images")[2], "id").unwrap();

    projects.set_cover_image(&id, &target).await.unwrap();

    let covers: Vec<RowId> = gw
        .rows("project_images")
        .iter()
        .filter(|r| r["is_cover"] == true)
        .filter_map(|r| RowId::from_row(r, "id"))
        .collect();
    assert_eq!(covers, vec![target.clone()]);
    assert_eq!(projects.get(&id).unwrap().cover().unwrap().id, target);
}

#[tokio::test]
async fn test_cover_from_another_project_is_rejected() {
    let gw = project_gateway();
    let mine = seed_project(&gw, "mine", 1);
    let theirs = seed_project(&gw, "theirs", 1);
    let projects: ProjectStore = store(&gw);
    let foreign = gw
        .rows("project_images")
        .iter()
        .find(|r| r["project_id"] == theirs.to_value())
        .and_then(|r| RowId::from_row(r, "id"))
        .unwrap();
    gw.clear_calls();

    let err = projects.set_cover_image(&mine, &foreign).await.unwrap_err();

    assert!(matches!(err, CoreError::NotFound { .. }));
    assert_eq!(gw.call_count(Operation::Update, "project_images"), 0);
    for project in [&mine, &theirs] {
        let covers = gw
            .rows("project_images")
            .iter()
            .filter(|r| r["project_id"] == project.to_value() && r["is_cover"] == true)
            .count();
        assert_eq!(covers, 1, "project {project}");
    }
}

// ── Delete path ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_survives_storage_removal_failure() {
    let gw = project_gateway();
    let projects: ProjectStore = store(&gw);
    let created = projects
        .create(
            CreateInput::new(draft("gone"))
                .with_translations(vec![text("en", "Gone")])
                .with_files(vec![file("a.jpg"), file("b.jpg")]),
        )
        .await
        .unwrap();
    gw.fail(Operation::Remove, None, "storage unavailable");

    let report = projects.delete(&created.id).await.unwrap();

    assert!(report.is_clean());
    assert!(gw.rows("projects").is_empty());
    assert!(gw.rows("project_translations").is_empty());
    assert!(gw.rows("project_images").is_empty());
    assert!(gw.rows("media_assets").is_empty());
    assert_eq!(gw.object_paths(BUCKET).len(), 2);
    assert!(projects.items().is_empty());
}

#[tokio::test]
async fn test_delete_collects_image_failures_and_continues() {
    let gw = project_gateway();
    let id = seed_project(&gw, "p", 2);
    let projects: ProjectStore = store(&gw);
    gw.fail_once(Operation::Delete, Some("project_images"), "row locked");

    let report = projects.delete(&id).await.unwrap();

    assert_eq!(report.image_failures.len(), 1);
    assert_eq!(report.image_failures[0].1, "row locked");
    assert!(gw.rows("projects").is_empty());
    assert_eq!(gw.rows("project_images").len(), 1);
}

#[tokio::test]
async fn test_single_image_unlink_removes_object_and_asset() {
    let gw = project_gateway();
    let projects: ProjectStore = store(&gw);
    let created = projects
        .create(CreateInput::new(draft("p")).with_files(vec![file("a.jpg")]))
        .await
        .unwrap();
    let link = projects.get(&created.id).unwrap().images[0].id.clone();

    let outcome = projects.delete_image(&link).await.unwrap();

    assert!(outcome.storage_removed);
    assert!(!outcome.asset_retained);
    assert!(gw.object_paths(BUCKET).is_empty());
    assert!(gw.rows("media_assets").is_empty());
    assert!(projects.get(&created.id).unwrap().images.is_empty());
}

#[tokio::test]
async fn test_unknown_link_is_not_found() {
    let gw = project_gateway();
    let projects: ProjectStore = store(&gw);

    let err = projects.delete_image(&RowId::Int(99)).await.unwrap_err();

    assert!(matches!(err, CoreError::NotFound { .. }));
    assert!(projects.snapshot().error.is_some());
}

// ── Singleton ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_second_about_section_is_rejected_before_any_write() {
    let gw = Arc::new(
        MemoryGateway::new()
            .with_table("about_section", IdKind::Serial)
            .with_table("about_section_translations", IdKind::Serial)
            .with_table("about_section_images", IdKind::Serial)
            .with_table("media_assets", IdKind::Serial),
    );
    gw.seed("about_section", vec![row(json!({ "key": "about", "is_enabled": true }))])
        .unwrap();
    let about: AboutStore = store(&gw);
    about.fetch().await.unwrap();
    gw.clear_calls();

    let err = about
        .create(CreateInput::new(AboutDraft {
            key: "second".into(),
            is_enabled: true,
        }))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::ValidationFailed { .. }));
    assert_eq!(gw.call_count(Operation::Insert, "about_section"), 0);
    assert_eq!(gw.rows("about_section").len(), 1);
}
