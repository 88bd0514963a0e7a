use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::entities::grid_state::GridState;
use crate::domain::entities::sort::SortClause;
use crate::usecase::ports::state_store::StateStore;

/// Remembers grid display state for one page path. Every failure here is
/// logged and swallowed: losing the state only costs the user their
/// column layout and sort order.
pub struct StateService {
    store: Arc<dyn StateStore>,
    page_path: String,
}

impl StateService {
    pub fn new(store: Arc<dyn StateStore>, page_path: impl Into<String>) -> Self {
        Self {
            store,
            page_path: page_path.into(),
        }
    }

    pub fn page_path(&self) -> &str {
        &self.page_path
    }

    pub fn load(&self) -> Option<GridState> {
        let blob = match self.store.load(&self.page_path) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!(page_path = %self.page_path, "no saved grid state");
                return None;
            }
            Err(err) => {
                warn!(page_path = %self.page_path, error = %err, "failed to load grid state");
                return None;
            }
        };

        match serde_json::from_str::<GridState>(&blob) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!(page_path = %self.page_path, error = %err, "ignoring malformed grid state");
                None
            }
        }
    }

    pub fn save(&self, mut state: GridState, sort_history: &[SortClause]) {
        state.prepare_for_save(sort_history, Utc::now().timestamp_millis());
        let blob = match serde_json::to_string(&state) {
            Ok(blob) => blob,
            Err(err) => {
                warn!(page_path = %self.page_path, error = %err, "failed to encode grid state");
                return;
            }
        };
        if let Err(err) = self.store.save(&self.page_path, &blob) {
            warn!(page_path = %self.page_path, error = %err, "failed to save grid state");
        }
    }
}
