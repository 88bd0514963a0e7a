use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::entities::page::{PageRequest, SearchTerm};
use crate::domain::entities::sort::SortClause;

/// Search block in the shape the grid persists it. Only the search string
/// is modelled; `smart`, `regex`, `caseInsensitive` and whatever else the
/// grid writes are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedSearch {
    pub search: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<&SearchTerm> for SavedSearch {
    fn from(term: &SearchTerm) -> Self {
        let mut extra = Map::new();
        extra.insert("regex".to_string(), Value::Bool(term.regex));
        Self {
            search: term.value.clone(),
            extra,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnState {
    pub visible: bool,
    pub search: SavedSearch,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ColumnState {
    fn default() -> Self {
        Self {
            visible: true,
            search: SavedSearch::default(),
            extra: Map::new(),
        }
    }
}

/// Display state remembered per page path between sessions. Fields the
/// grid adds that are not modelled here survive a load/save cycle via
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridState {
    /// Milliseconds since the epoch at the last save.
    pub time: i64,
    pub start: u64,
    pub length: i64,
    pub order: Vec<SortClause>,
    pub search: SavedSearch,
    pub columns: Vec<ColumnState>,
    pub column_sorting_order: Vec<SortClause>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GridState {
    /// Display state implied by the request the grid just issued.
    pub fn capture(request: &PageRequest) -> Self {
        Self {
            start: request.start,
            length: request.length,
            order: request.order.clone(),
            search: SavedSearch::from(&request.search),
            columns: request
                .columns
                .iter()
                .map(|column| ColumnState {
                    search: SavedSearch::from(&column.search),
                    ..ColumnState::default()
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Readies the state for persistence: column searches are never
    /// remembered and the sort history rides along with the display state.
    pub fn prepare_for_save(&mut self, sort_history: &[SortClause], saved_at_ms: i64) {
        for column in &mut self.columns {
            column.search.search.clear();
        }
        self.column_sorting_order = sort_history.to_vec();
        self.time = saved_at_ms;
    }
}
