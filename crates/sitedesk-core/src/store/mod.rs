// ── Content stores ──
//
// The generic descriptor-driven store, its observable state and the
// in-memory composition of fetched rows.

mod compose;
mod entity_store;
mod kind;
mod state;

pub use entity_store::{DeleteReport, EntityStore, FullOf};
pub use kind::{ContentKind, CreateInput, UpdateInput};
pub use state::StoreState;
pub(crate) use state::StateCell;
