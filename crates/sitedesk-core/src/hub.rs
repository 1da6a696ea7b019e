// ── Hub ──
//
// One cheaply cloneable handle owning the gateway, the shared schema
// resolver and every store. Callers that only know a `LogicalEntity` at
// runtime go through the dispatching helpers at the bottom.

use std::sync::Arc;

use serde::Serialize;
use sitedesk_api::{Gateway, RowId};
use tracing::info;

use crate::auth::AuthStore;
use crate::background::SectionBackgroundStore;
use crate::config::GatewayConfig;
use crate::error::CoreError;
use crate::kinds::{
    AboutStore, HeroStore, InstallationStore, Installations, LocationStore, Locations,
    ProjectStore, SiteSectionStore, SocialLinkStore, StatisticStore, Timeline, TimelineStore,
    WhyDifferentStore,
};
use crate::media::UnlinkOutcome;
use crate::model::FileUpload;
use crate::router::RouteGuard;
use crate::schema::{EntitySchema, ImageTables, LogicalEntity, SchemaResolver};
use crate::store::{ContentKind, DeleteReport, EntityStore};
use crate::team::TeamStore;

/// Kind-independent view of one composed item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub id: RowId,
    pub enabled: bool,
    pub sort_key: Option<i64>,
    pub translations: usize,
    pub images: usize,
}

/// Resolved tables of one probed kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSchema {
    pub entity: LogicalEntity,
    pub schema: EntitySchema,
    pub images: Option<ImageTables>,
}

#[derive(Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

struct HubInner {
    resolver: Arc<SchemaResolver>,
    auth: Arc<AuthStore>,
    guard: RouteGuard,
    hero: HeroStore,
    projects: ProjectStore,
    locations: LocationStore,
    installations: InstallationStore,
    timeline: TimelineStore,
    about: AboutStore,
    site_sections: SiteSectionStore,
    why_different: WhyDifferentStore,
    statistics: StatisticStore,
    social_links: SocialLinkStore,
    team: TeamStore,
    background: SectionBackgroundStore,
}

/// Run `$body` with `$store` bound to the store for `$entity`.
macro_rules! with_store {
    ($hub:expr, $entity:expr, |$store:ident| $body:expr) => {{
        let inner = &$hub.inner;
        match $entity {
            LogicalEntity::Hero => { let $store = &inner.hero; $body }
            LogicalEntity::Project => { let $store = &inner.projects; $body }
            LogicalEntity::Location => { let $store = &inner.locations; $body }
            LogicalEntity::Installation => { let $store = &inner.installations; $body }
            LogicalEntity::Timeline => { let $store = &inner.timeline; $body }
            LogicalEntity::About => { let $store = &inner.about; $body }
            LogicalEntity::SiteSection => { let $store = &inner.site_sections; $body }
            LogicalEntity::WhyDifferent => { let $store = &inner.why_different; $body }
            LogicalEntity::Statistic => { let $store = &inner.statistics; $body }
            LogicalEntity::SocialLink => { let $store = &inner.social_links; $body }
        }
    }};
}

impl Hub {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let resolver = Arc::new(SchemaResolver::new(Arc::clone(&gateway)));
        let auth = Arc::new(AuthStore::new(Arc::clone(&gateway)));

        Self {
            inner: Arc::new(HubInner {
                guard: RouteGuard::new(Arc::clone(&auth)),
                hero: EntityStore::new(Arc::clone(&gateway), Arc::clone(&resolver)),
                projects: EntityStore::new(Arc::clone(&gateway), Arc::clone(&resolver)),
                locations: EntityStore::new(Arc::clone(&gateway), Arc::clone(&resolver)),
                installations: EntityStore::new(Arc::clone(&gateway), Arc::clone(&resolver)),
                timeline: EntityStore::new(Arc::clone(&gateway), Arc::clone(&resolver)),
                about: EntityStore::new(Arc::clone(&gateway), Arc::clone(&resolver)),
                site_sections: EntityStore::new(Arc::clone(&gateway), Arc::clone(&resolver)),
                why_different: EntityStore::new(Arc::clone(&gateway), Arc::clone(&resolver)),
                statistics: EntityStore::new(Arc::clone(&gateway), Arc::clone(&resolver)),
                social_links: EntityStore::new(Arc::clone(&gateway), Arc::clone(&resolver)),
                team: TeamStore::new(Arc::clone(&gateway)),
                background: SectionBackgroundStore::new(Arc::clone(&gateway)),
                auth,
                resolver,
            }),
        }
    }

    /// Build the HTTP gateway from `config` and wire every store to it.
    pub fn connect(config: &GatewayConfig) -> Result<Self, CoreError> {
        let gateway = config.connect()?;
        info!(url = %config.url, "gateway ready");
        Ok(Self::new(gateway))
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn resolver(&self) -> &Arc<SchemaResolver> {
        &self.inner.resolver
    }

    pub fn auth(&self) -> &Arc<AuthStore> {
        &self.inner.auth
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.inner.guard
    }

    pub fn hero(&self) -> &HeroStore {
        &self.inner.hero
    }

    pub fn projects(&self) -> &ProjectStore {
        &self.inner.projects
    }

    pub fn locations(&self) -> &LocationStore {
        &self.inner.locations
    }

    pub fn installations(&self) -> &InstallationStore {
        &self.inner.installations
    }

    pub fn timeline(&self) -> &TimelineStore {
        &self.inner.timeline
    }

    pub fn about(&self) -> &AboutStore {
        &self.inner.about
    }

    pub fn site_sections(&self) -> &SiteSectionStore {
        &self.inner.site_sections
    }

    pub fn why_different(&self) -> &WhyDifferentStore {
        &self.inner.why_different
    }

    pub fn statistics(&self) -> &StatisticStore {
        &self.inner.statistics
    }

    pub fn social_links(&self) -> &SocialLinkStore {
        &self.inner.social_links
    }

    pub fn team(&self) -> &TeamStore {
        &self.inner.team
    }

    pub fn background(&self) -> &SectionBackgroundStore {
        &self.inner.background
    }

    /// Stop background work owned by the hub.
    pub async fn shutdown(&self) {
        self.inner.auth.shutdown().await;
    }

    // ── Schema ───────────────────────────────────────────────────────

    /// Resolve the tables of every kind whose names are probed at runtime.
    pub async fn probed_schemas(&self) -> Result<Vec<ResolvedSchema>, CoreError> {
        let resolver = &self.inner.resolver;
        let mut resolved = Vec::new();
        for descriptor in [
            Locations::descriptor(),
            Installations::descriptor(),
            Timeline::descriptor(),
        ] {
            resolved.push(ResolvedSchema {
                entity: descriptor.entity,
                schema: resolver.resolve(descriptor).await?,
                images: resolver.resolve_images(descriptor).await?,
            });
        }
        Ok(resolved)
    }

    // ── Dispatch by kind ─────────────────────────────────────────────

    /// Fetch `entity` and summarize its items.
    pub async fn list(&self, entity: LogicalEntity) -> Result<Vec<ItemSummary>, CoreError> {
        with_store!(self, entity, |store| {
            store.fetch().await?;
            Ok(summarize(store))
        })
    }

    pub async fn delete(&self, entity: LogicalEntity, id: &RowId) -> Result<DeleteReport, CoreError> {
        with_store!(self, entity, |store| store.delete(id).await)
    }

    pub async fn add_images(
        &self,
        entity: LogicalEntity,
        id: &RowId,
        files: &[FileUpload],
    ) -> Result<(), CoreError> {
        with_store!(self, entity, |store| store.add_images(id, files).await)
    }

    pub async fn remove_image(
        &self,
        entity: LogicalEntity,
        link_id: &RowId,
    ) -> Result<UnlinkOutcome, CoreError> {
        with_store!(self, entity, |store| store.delete_image(link_id).await)
    }
}

fn summarize<K: ContentKind>(store: &EntityStore<K>) -> Vec<ItemSummary> {
    store
        .items()
        .iter()
        .map(|full| ItemSummary {
            id: K::id(&full.record).clone(),
            enabled: K::is_enabled(&full.record),
            sort_key: K::sort_key(&full.record),
            translations: full.translations.len(),
            images: full.images.len(),
        })
        .collect()
}
