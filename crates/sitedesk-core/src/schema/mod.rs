// ── Schema description and resolution ──
//
// Each content kind is described once by an `EntityDescriptor`. Kinds
// whose tables are named differently across deployments are resolved
// at runtime by probing candidates; the rest carry fixed names.

mod descriptor;
mod resolver;
mod rules;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

pub use descriptor::{AssetJoin, BaseOrder, EntityDescriptor, FixedTable, ImageSpec, Naming};
pub use resolver::SchemaResolver;

/// Logical content kinds, independent of physical table names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr, Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum LogicalEntity {
    Hero,
    Project,
    Location,
    Installation,
    Timeline,
    About,
    SiteSection,
    WhyDifferent,
    Statistic,
    SocialLink,
}

/// Resolved translation table and the column referencing the base row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationTables {
    pub table: String,
    pub fk_column: String,
}

/// Resolved base and translation tables for one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySchema {
    pub base_table: String,
    pub translations: Option<TranslationTables>,
}

/// Resolved image-link table and its column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageTables {
    pub table: String,
    pub fk_column: String,
    pub media_column: String,
    pub sort_column: String,
}
