pub mod config;

pub mod domain {
    pub mod entities {
        pub mod column;
        pub mod grid_state;
        pub mod page;
        pub mod sort;
    }
}

pub mod usecase {
    pub mod ports {
        pub mod cache;
        pub mod grid;
        pub mod state_store;
        pub mod transport;
    }

    pub mod services {
        pub mod page_controller;
        pub mod state_service;
        pub mod translate;
    }
}

pub mod infra {
    pub mod http {
        pub mod records;
        pub mod transport;
    }

    pub mod memory {
        pub mod record_cache;
        pub mod state_store;
    }

    pub mod sqlite {
        pub mod queries;
        pub mod schema;
        pub mod state_store;
    }
}

pub use domain::entities::column::{ColumnDescriptor, ColumnOptions, Record, Row};
pub use domain::entities::grid_state::{ColumnState, GridState, SavedSearch};
pub use domain::entities::page::{
    ColumnRequest, EntityId, FetchState, IdPage, PageRequest, PageResponse, SearchTerm,
};
pub use domain::entities::sort::{SortClause, SortDirection, SortHistory};
pub use usecase::services::page_controller::{GridHooks, Lifecycle, PageController};
