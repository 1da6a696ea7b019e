// Background image and team stores against the in-memory gateway.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use sitedesk_api::memory::{IdKind, Operation};
use sitedesk_api::{MemoryGateway, Row, RowId};
use sitedesk_core::{
    BUCKET, FileUpload, MemberDraft, MemberPatch, ProfileInput, SectionBackgroundStore, TeamStore,
};

fn row(value: Value) -> Row {
    value.as_object().unwrap().clone()
}

fn png(name: &str) -> FileUpload {
    FileUpload::new(name, b"png".to_vec()).with_content_type("image/png")
}

// ── Background image ────────────────────────────────────────────────

fn background_gateway() -> Arc<MemoryGateway> {
    Arc::new(
        MemoryGateway::new()
            .with_table("site_section", IdKind::Serial)
            .with_table("site_section_images", IdKind::Serial)
            .with_table("timeline_item_images", IdKind::Serial)
            .with_table("media_assets", IdKind::Serial),
    )
}

#[tokio::test]
async fn test_missing_section_means_no_background() {
    let gw = background_gateway();
    let background = SectionBackgroundStore::new(gw);

    background.fetch().await.unwrap();

    assert!(background.image().is_none());
    assert!(background.snapshot().error.is_none());
}

#[tokio::test]
async fn test_first_upload_creates_section_and_links_at_front() {
    let gw = background_gateway();
    let background = SectionBackgroundStore::new(gw.clone());

    background.upload(&png("bg.png")).await.unwrap();

    let sections = gw.rows("site_section");
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0]["key"], "installations");
    assert_eq!(sections[0]["is_enabled"], true);

    let image = background.image().unwrap();
    assert_eq!(image.sort_order, 0);
    let asset = image.media_asset.as_ref().unwrap();
    assert!(asset.path.starts_with("installations/installations_bg_"));
    assert!(asset.path.ends_with(".png"));
    assert_eq!(asset.alt.as_deref(), Some("Installations background image"));
}

#[tokio::test]
async fn test_replacing_background_unlinks_previous_image() {
    let gw = background_gateway();
    let section = gw
        .seed("site_section", vec![row(json!({ "key": "installations" }))])
        .unwrap();
    let asset = gw
        .seed(
            "media_assets",
            vec![row(json!({ "bucket": BUCKET, "path": "installations/old.jpg" }))],
        )
        .unwrap();
    gw.seed(
        "site_section_images",
        vec![row(json!({
            "section_id": section[0]["id"],
            "media_id": asset[0]["id"],
            "sort_order": 0,
        }))],
    )
    .unwrap();
    let background = SectionBackgroundStore::new(gw.clone());

    background.upload(&png("new.png")).await.unwrap();

    assert_eq!(gw.rows("site_section").len(), 1);
    assert_eq!(gw.rows("site_section_images").len(), 1);
    assert_eq!(gw.rows("media_assets").len(), 1);
    let current = background.image().unwrap();
    assert_ne!(
        current.media_asset.as_ref().unwrap().path,
        "installations/old.jpg"
    );
}

#[tokio::test]
async fn test_shared_background_asset_keeps_catalog_row_and_object() {
    let gw = background_gateway();
    let background = SectionBackgroundStore::new(gw.clone());
    background.upload(&png("shared.png")).await.unwrap();
    let media_id = background.image().unwrap().media_id.clone().unwrap();
    gw.seed(
        "timeline_item_images",
        vec![row(json!({
            "timeline_item_id": 1,
            "media_id": media_id.to_value(),
            "sort_order": 0,
        }))],
    )
    .unwrap();

    let outcome = background.delete().await.unwrap().unwrap();

    assert!(outcome.asset_retained);
    assert!(!outcome.storage_removed);
    assert_eq!(gw.rows("media_assets").len(), 1);
    assert_eq!(gw.object_paths(BUCKET).len(), 1);
    assert!(gw.rows("site_section_images").is_empty());
    assert!(background.image().is_none());
}

#[tokio::test]
async fn test_deleting_without_background_is_a_no_op() {
    let gw = background_gateway();
    let background = SectionBackgroundStore::new(gw.clone());

    assert_eq!(background.delete().await.unwrap(), None);
    assert_eq!(gw.call_count(Operation::Delete, "site_section_images"), 0);
}

// ── Team ────────────────────────────────────────────────────────────

fn team_gateway() -> Arc<MemoryGateway> {
    Arc::new(
        MemoryGateway::new()
            .with_table("about_company", IdKind::Serial)
            .with_table("team_members", IdKind::Serial),
    )
}

fn profile(title: &str) -> ProfileInput {
    ProfileInput {
        title_en: title.into(),
        description_en: "We build things".into(),
        ..ProfileInput::default()
    }
}

#[tokio::test]
async fn test_missing_profile_is_not_an_error() {
    let gw = team_gateway();
    let team = TeamStore::new(gw);

    team.fetch_all().await.unwrap();

    assert!(team.profile().is_none());
    assert!(team.members().is_empty());
}

#[tokio::test]
async fn test_save_profile_inserts_then_updates() {
    let gw = team_gateway();
    let team = TeamStore::new(gw.clone());

    team.save_profile(profile("First")).await.unwrap();
    assert_eq!(gw.call_count(Operation::Insert, "about_company"), 1);
    assert!(team.profile().unwrap().updated_at.is_none());

    team.save_profile(profile("Second")).await.unwrap();
    let rows = gw.rows("about_company");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title_en"], "Second");
    assert!(team.profile().unwrap().updated_at.is_some());
}

#[tokio::test]
async fn test_member_portrait_is_stored_as_public_url() {
    let gw = team_gateway();
    let team = TeamStore::new(gw.clone());

    team.create_member(MemberDraft::new("Dana", "Engineer"), Some(png("dana.png")))
        .await
        .unwrap();

    let member = team.members()[0].clone();
    let url = member.image_url.as_deref().unwrap();
    assert!(url.starts_with(&format!("http://memory.local/storage/v1/object/public/{BUCKET}/team-members/team-member_")));
    assert_eq!(gw.object_paths(BUCKET).len(), 1);
}

#[tokio::test]
async fn test_replacing_portrait_removes_previous_object() {
    let gw = team_gateway();
    let team = TeamStore::new(gw.clone());
    team.create_member(MemberDraft::new("Dana", "Engineer"), Some(png("a.png")))
        .await
        .unwrap();
    let id: RowId = team.members()[0].id.clone();
    let old = gw.object_paths(BUCKET);

    team.update_member(&id, MemberPatch::default(), Some(png("b.png")))
        .await
        .unwrap();

    let now = gw.object_paths(BUCKET);
    assert_eq!(now.len(), 1);
    assert_ne!(now, old);
    assert!(now[0].starts_with(&format!("team-members/team-member_{id}_")));
    assert!(team.members()[0].updated_at.is_some());
}

#[tokio::test]
async fn test_active_members_follow_order_index() {
    let gw = team_gateway();
    gw.seed(
        "team_members",
        vec![
            row(json!({ "name": "C", "position_en": "x", "order_index": 3, "is_active": true })),
            row(json!({ "name": "A", "position_en": "x", "order_index": 1, "is_active": true })),
            row(json!({ "name": "B", "position_en": "x", "order_index": 2, "is_active": false })),
        ],
    )
    .unwrap();
    let team = TeamStore::new(gw);
    team.fetch_members().await.unwrap();

    let names: Vec<String> = team
        .active_members()
        .iter()
        .map(|m| m.name.clone())
        .collect();
    assert_eq!(names, vec!["A", "C"]);
}
