// Static per-kind configuration driving the generic store.

use super::LogicalEntity;

/// A fixed table name together with its foreign-key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTable {
    pub table: &'static str,
    pub fk: &'static str,
}

/// How a kind's physical table names are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Naming {
    /// Names are known ahead of time; no probing.
    Fixed {
        base: &'static str,
        translations: Option<FixedTable>,
        images: Option<FixedTable>,
    },
    /// Names are discovered by the resolver's candidate rules.
    Probed,
}

/// Ordering of base rows on fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseOrder {
    Ascending(&'static str),
    NewestFirst,
    Unordered,
}

/// How a link row gets its media asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetJoin {
    /// Gateway-side embed through the link table's foreign-key constraint.
    Embed,
    /// Second read of `media_assets` by the collected ids.
    Lookup,
}

/// Image behavior for kinds that carry linked images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSpec {
    /// Column holding the media asset id on fixed-name link tables.
    pub media_column: &'static str,
    /// Storage folder inside the bucket.
    pub folder: &'static str,
    /// Prefix of the generated file name, before the parent id.
    pub file_prefix: &'static str,
    /// Link rows carry an `is_cover` flag set on position 0.
    pub cover: bool,
    /// Failures loading the images degrade to "no images".
    pub optional: bool,
    pub asset_join: AssetJoin,
    /// Link tables, keyed on `media_id`, that may reference the same
    /// asset. The catalog row is kept while any of them does.
    pub shared_with: &'static [&'static str],
}

impl ImageSpec {
    pub const fn new(folder: &'static str, file_prefix: &'static str) -> Self {
        Self {
            media_column: "media_id",
            folder,
            file_prefix,
            cover: false,
            optional: false,
            asset_join: AssetJoin::Embed,
            shared_with: &[],
        }
    }
}

/// Everything the generic store needs to know about one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub entity: LogicalEntity,
    pub naming: Naming,
    pub base_order: BaseOrder,
    pub images: Option<ImageSpec>,
    /// At most one base row may exist.
    pub singleton: bool,
    /// Human label used in fallback error messages.
    pub label: &'static str,
}
