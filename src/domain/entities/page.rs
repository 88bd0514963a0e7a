use std::fmt;
use std::num::IntErrorKind;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::entities::column::Row;
use crate::domain::entities::sort::SortClause;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId(value)
    }
}

impl From<EntityId> for i64 {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchTerm {
    pub value: String,
    pub regex: bool,
}

impl SearchTerm {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            regex: false,
        }
    }
}

/// Per-column block of a page request, in column descriptor order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRequest {
    pub data: String,
    pub name: String,
    pub searchable: bool,
    pub orderable: bool,
    pub search: SearchTerm,
}

impl Default for ColumnRequest {
    fn default() -> Self {
        Self {
            data: String::new(),
            name: String::new(),
            searchable: true,
            orderable: true,
            search: SearchTerm::default(),
        }
    }
}

/// Paging/sort/filter parameters the grid sends for one draw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRequest {
    #[serde(deserialize_with = "deserialize_draw")]
    pub draw: i64,
    pub start: u64,
    /// Page size; the grid uses `-1` for "all rows".
    pub length: i64,
    pub order: Vec<SortClause>,
    pub search: SearchTerm,
    pub columns: Vec<ColumnRequest>,
}

impl PageRequest {
    pub fn new(draw: i64, start: u64, length: i64) -> Self {
        Self {
            draw,
            start,
            length,
            ..Self::default()
        }
    }
}

/// Parses a draw counter the same way regardless of whether the grid sent
/// it as a number or a numeric string. Anything unparseable is draw 0 and
/// out-of-range values saturate at the `i64` bounds.
pub fn parse_draw(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|(idx, ch)| !(ch.is_ascii_digit() || (*idx == 0 && (*ch == '-' || *ch == '+'))))
        .map(|(idx, _)| idx)
        .unwrap_or(trimmed.len());
    match trimmed[..digits_end].parse::<i64>() {
        Ok(draw) => draw,
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => 0,
        },
    }
}

fn deserialize_draw<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDraw {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match RawDraw::deserialize(deserializer)? {
        RawDraw::Int(value) => value,
        RawDraw::Float(value) => value.trunc() as i64,
        RawDraw::Text(text) => parse_draw(&text),
    })
}

/// Body returned by the id-listing endpoint: the ids on the requested page,
/// already filtered, sorted and sliced by the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdPage {
    pub list: Vec<EntityId>,
    #[serde(rename = "fullListSize")]
    pub full_list_size: u64,
}

/// What the grid receives back for one draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub draw: i64,
    pub records_total: u64,
    pub records_filtered: u64,
    pub data: Vec<Row>,
}

impl PageResponse {
    pub fn empty(draw: i64) -> Self {
        Self {
            draw,
            records_total: 0,
            records_filtered: 0,
            data: Vec::new(),
        }
    }

    /// Filtering happens entirely on the server, so total and filtered
    /// counts are both the server's full count.
    pub fn from_rows(draw: i64, full_count: u64, data: Vec<Row>) -> Self {
        Self {
            draw,
            records_total: full_count,
            records_filtered: full_count,
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    FetchingIds,
    FetchingRecords,
}
