// ── Query descriptions ──
//
// A backend-neutral description of the reads and filtered writes the
// stores issue. The REST gateway renders these into PostgREST query
// parameters; the in-memory gateway evaluates them directly.

use serde_json::Value;

use crate::row::{Row, RowId};

// ── Filter ──────────────────────────────────────────────────────────

/// A row predicate on a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// `column = value`
    Eq { column: String, value: Value },
    /// `column IN (values...)`
    In { column: String, values: Vec<Value> },
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Membership filter over a set of row ids.
    pub fn in_ids<'a>(column: impl Into<String>, ids: impl IntoIterator<Item = &'a RowId>) -> Self {
        Self::In {
            column: column.into(),
            values: ids.into_iter().map(RowId::to_value).collect(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Self::Eq { column, .. } | Self::In { column, .. } => column,
        }
    }

    /// Render as a PostgREST `(column, "op.value")` query pair.
    pub fn to_query_pair(&self) -> (String, String) {
        match self {
            Self::Eq { column, value } => (column.clone(), format!("eq.{}", render_scalar(value))),
            Self::In { column, values } => {
                let list = values
                    .iter()
                    .map(render_list_item)
                    .collect::<Vec<_>>()
                    .join(",");
                (column.clone(), format!("in.({list})"))
            }
        }
    }

    /// Evaluate against a row. A missing column never matches.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Self::Eq { column, value } => row.get(column).is_some_and(|v| v == value),
            Self::In { column, values } => row.get(column).is_some_and(|v| values.contains(v)),
        }
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_list_item(value: &Value) -> String {
    match value {
        Value::String(s) if s.contains([',', '(', ')', '"']) => {
            format!("\"{}\"", s.replace('"', "\\\""))
        }
        other => render_scalar(other),
    }
}

// ── Order ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: true,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            ascending: false,
        }
    }

    fn render(&self) -> String {
        let dir = if self.ascending { "asc" } else { "desc" };
        format!("{}.{dir}", self.column)
    }
}

// ── Embed ───────────────────────────────────────────────────────────

/// A to-one embed of the row referenced by a foreign key column.
///
/// Rendered as `alias:table!{link_table}_{column}_fkey(*)`. The embedded
/// value is the referenced row, or `null` when the reference is dangling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub alias: String,
    pub table: String,
    pub link_table: String,
    pub column: String,
}

impl Embed {
    pub fn new(
        alias: impl Into<String>,
        table: impl Into<String>,
        link_table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            alias: alias.into(),
            table: table.into(),
            link_table: link_table.into(),
            column: column.into(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{}:{}!{}_{}_fkey(*)",
            self.alias, self.table, self.link_table, self.column
        )
    }
}

// ── Select ──────────────────────────────────────────────────────────

/// A read against one table: all columns plus optional embeds.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,
    pub embeds: Vec<Embed>,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub limit: Option<usize>,
}

impl Select {
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            embeds: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn embed(mut self, embed: Embed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order(mut self, order: Order) -> Self {
        self.order.push(order);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The `select=` column list.
    pub fn columns(&self) -> String {
        std::iter::once("*".to_owned())
            .chain(self.embeds.iter().map(Embed::render))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// All query pairs for this read, in a stable order.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_owned(), self.columns())];
        pairs.extend(self.filters.iter().map(Filter::to_query_pair));
        if !self.order.is_empty() {
            let order = self.order.iter().map(Order::render).collect::<Vec<_>>();
            pairs.push(("order".to_owned(), order.join(",")));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_owned(), limit.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn embed_uses_constraint_hint() {
        let embed = Embed::new("media_asset", "media_assets", "hero_images", "media_id");
        assert_eq!(
            embed.render(),
            "media_asset:media_assets!hero_images_media_id_fkey(*)"
        );
    }

    #[test]
    fn select_renders_postgrest_pairs() {
        let ids = [RowId::from("a"), RowId::from("b,c")];
        let select = Select::from("hero_images")
            .embed(Embed::new(
                "media_asset",
                "media_assets",
                "hero_images",
                "media_id",
            ))
            .filter(Filter::in_ids("hero_id", &ids))
            .order(Order::asc("position"))
            .limit(1);

        assert_eq!(
            select.to_query_pairs(),
            vec![
                (
                    "select".to_owned(),
                    "*,media_asset:media_assets!hero_images_media_id_fkey(*)".to_owned()
                ),
                ("hero_id".to_owned(), "in.(a,\"b,c\")".to_owned()),
                ("order".to_owned(), "position.asc".to_owned()),
                ("limit".to_owned(), "1".to_owned()),
            ]
        );
    }

    #[test]
    fn filters_evaluate_against_rows() {
        let row: Row = serde_json::from_value(json!({"id": 3, "hero_id": "h1"})).unwrap();
        assert!(Filter::eq("id", 3).matches(&row));
        assert!(!Filter::eq("id", "3").matches(&row));
        assert!(Filter::in_ids("hero_id", &[RowId::from("h1")]).matches(&row));
        assert!(!Filter::eq("missing", 3).matches(&row));
    }

    #[test]
    fn eq_renders_strings_bare() {
        assert_eq!(
            Filter::eq("key", "about").to_query_pair(),
            ("key".to_owned(), "eq.about".to_owned())
        );
        assert_eq!(
            Filter::eq("id", 12).to_query_pair(),
            ("id".to_owned(), "eq.12".to_owned())
        );
    }
}
