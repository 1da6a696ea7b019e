//! Content stores between `sitedesk-api` and the admin surfaces.
//!
//! - **[`Hub`]**: cloneable facade owning the gateway, the shared
//!   [`SchemaResolver`] and one store per content kind.
//!
//! - **[`EntityStore<K>`]**: generic fetch/compose and multi-step writes
//!   for every descriptor-driven kind in [`kinds`]. State is published on
//!   a `watch` channel as a [`StoreState`] snapshot and vended as a
//!   [`StateStream`].
//!
//! - **[`SchemaResolver`]**: maps logical kinds to physical tables,
//!   probing candidate names once per kind where deployments differ.
//!
//! - **[`TeamStore`]** and **[`SectionBackgroundStore`]**: the company
//!   profile with team members, and a section's single background image.
//!
//! - **[`AuthStore`]** and **[`RouteGuard`]**: session state and the
//!   navigation gate in front of every view.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod hub;
pub mod kinds;
pub mod media;
pub mod model;
pub mod router;
pub mod schema;
pub mod store;
pub mod stream;
pub mod team;

// ── Primary re-exports ──────────────────────────────────────────────
pub use auth::{AuthPhase, AuthStore};
pub use background::SectionBackgroundStore;
pub use config::{GatewayConfig, TlsVerification};
pub use error::CoreError;
pub use hub::{Hub, ItemSummary, ResolvedSchema};
pub use media::{BUCKET, UnlinkOutcome};
pub use model::{FileUpload, Full, ImageLink, MediaAsset, Translation, Untranslated};
pub use router::{Navigation, ROUTES, Route, RouteGuard, View};
pub use schema::{EntityDescriptor, EntitySchema, ImageTables, LogicalEntity, SchemaResolver};
pub use store::{
    ContentKind, CreateInput, DeleteReport, EntityStore, FullOf, StoreState, UpdateInput,
};
pub use stream::StateStream;
pub use team::{CompanyProfile, MemberDraft, MemberPatch, ProfileInput, TeamMember, TeamStore};
