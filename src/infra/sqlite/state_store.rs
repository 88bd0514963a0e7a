use std::path::PathBuf;

use crate::infra::sqlite::queries::{delete_grid_state, load_grid_state, upsert_grid_state};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::state_store::{StateStore, StoreError};

pub struct SqliteStateStore {
    pub db_path: PathBuf,
}

impl SqliteStateStore {
    /// Opens (and if needed creates) the state database.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self {
            db_path: db_path.into(),
        };
        init_db(&store.db_path).map_err(|err| StoreError::Message(format!("{err:#}")))?;
        Ok(store)
    }

    pub fn clear(&self, page_path: &str) -> Result<(), StoreError> {
        delete_grid_state(&self.db_path, page_path)
            .map_err(|err| StoreError::Message(format!("{err:#}")))
    }
}

impl StateStore for SqliteStateStore {
    fn load(&self, page_path: &str) -> Result<Option<String>, StoreError> {
        load_grid_state(&self.db_path, page_path)
            .map_err(|err| StoreError::Message(format!("{err:#}")))
    }

    fn save(&self, page_path: &str, blob: &str) -> Result<(), StoreError> {
        upsert_grid_state(&self.db_path, page_path, blob)
            .map_err(|err| StoreError::Message(format!("{err:#}")))
    }
}
