// ── Row identity and shape ──
//
// Rows cross the gateway as JSON objects. Identifiers are integers on
// some tables (media assets, site sections) and UUID strings on others;
// `RowId` hides the difference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single table row as returned by the gateway.
pub type Row = serde_json::Map<String, Value>;

// ── RowId ───────────────────────────────────────────────────────────

/// Canonical identifier for any stored row.
///
/// Wraps either an integer key (`bigserial` columns) or a text key
/// (UUID columns). Equality is structural: `RowId::Int(7)` and
/// `RowId::Text("7")` are different identifiers, matching how the
/// backend compares a typed column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl RowId {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// The JSON value used when this id appears in a filter or a row.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(n) => Value::from(*n),
            Self::Text(s) => Value::from(s.as_str()),
        }
    }

    /// Read an identifier out of a JSON value, if it has a usable shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Int),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// Read the `column` of a row as an identifier.
    pub fn from_row(row: &Row, column: &str) -> Option<Self> {
        row.get(column).and_then(Self::from_value)
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for RowId {
    type Err = std::convert::Infallible;

    /// Digits parse as an integer key, anything else as a text key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map_or_else(|_| Self::Text(s.to_owned()), Self::Int))
    }
}

impl From<i64> for RowId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<String> for RowId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for RowId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<RowId> for Value {
    fn from(id: RowId) -> Self {
        id.to_value()
    }
}

/// Serialize any `Serialize` value into a row object.
///
/// Non-object values produce an empty row; callers only pass structs.
pub fn to_row<T: Serialize>(value: &T) -> Result<Row, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Row::new()),
    }
}
