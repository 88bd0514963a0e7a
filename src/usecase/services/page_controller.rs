use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::domain::entities::column::ColumnDescriptor;
use crate::domain::entities::grid_state::GridState;
use crate::domain::entities::page::{ColumnRequest, FetchState, IdPage, PageRequest, PageResponse};
use crate::domain::entities::sort::{SortClause, SortHistory};
use crate::usecase::ports::cache::RecordCache;
use crate::usecase::ports::grid::{ColumnSearchHandler, GridDriver};
use crate::usecase::ports::transport::IdListTransport;
use crate::usecase::services::state_service::StateService;
use crate::usecase::services::translate::translate;

type Hook = Box<dyn Fn() + Send + Sync>;
type ColumnInit = Box<dyn Fn() -> Vec<ColumnDescriptor> + Send + Sync>;
type CriteriaHook = Box<dyn Fn() -> Map<String, Value> + Send + Sync>;
type SearchCriteriaHook = Box<dyn Fn(&PageRequest) -> Map<String, Value> + Send + Sync>;

/// Host callbacks. Every one is optional and absent means "do nothing".
#[derive(Default)]
pub struct GridHooks {
    column_init: Option<ColumnInit>,
    on_retrieval_succeeded: Option<Hook>,
    on_retrieval_failed: Option<Hook>,
    on_update_complete: Option<Hook>,
    additional_search_criteria: Option<CriteriaHook>,
    search_criteria: Option<SearchCriteriaHook>,
}

impl GridHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies the column descriptors. Their order is the column index the
    /// server sees in sort clauses.
    pub fn column_init<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Vec<ColumnDescriptor> + Send + Sync + 'static,
    {
        self.column_init = Some(Box::new(f));
        self
    }

    pub fn on_retrieval_succeeded<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_retrieval_succeeded = Some(Box::new(f));
        self
    }

    pub fn on_retrieval_failed<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_retrieval_failed = Some(Box::new(f));
        self
    }

    pub fn on_update_complete<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_update_complete = Some(Box::new(f));
        self
    }

    /// Extra criteria sent with every request. Keys also present in the page
    /// request lose.
    pub fn additional_search_criteria<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Map<String, Value> + Send + Sync + 'static,
    {
        self.additional_search_criteria = Some(Box::new(f));
        self
    }

    /// Replaces the default criteria merge entirely.
    pub fn search_criteria<F>(mut self, f: F) -> Self
    where
        F: Fn(&PageRequest) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.search_criteria = Some(Box::new(f));
        self
    }

    fn fire(hook: &Option<Hook>) {
        if let Some(hook) = hook {
            hook();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Unattached,
    Attached { first_render_pending: bool },
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the fetch state for one request cycle and puts it back to idle
/// when the cycle ends, however it ends.
struct FetchCycle<'a> {
    state: &'a Mutex<FetchState>,
}

impl<'a> FetchCycle<'a> {
    fn begin(state: &'a Mutex<FetchState>) -> Self {
        *lock(state) = FetchState::FetchingIds;
        Self { state }
    }

    fn advance(&self, next: FetchState) {
        *lock(self.state) = next;
    }
}

impl Drop for FetchCycle<'_> {
    fn drop(&mut self) {
        *lock(self.state) = FetchState::Idle;
    }
}

/// Serves the grid's page requests: merges sort history, asks the server
/// for the ids on the page, makes sure the cache holds those records and
/// turns them into rows.
pub struct PageController {
    transport: Arc<dyn IdListTransport>,
    cache: Weak<dyn RecordCache>,
    hooks: GridHooks,
    driver: Option<Arc<dyn GridDriver>>,
    state: Option<StateService>,
    columns: OnceLock<Vec<ColumnDescriptor>>,
    sort_history: Mutex<SortHistory>,
    fetch_state: Mutex<FetchState>,
    last_page: Mutex<Option<IdPage>>,
    column_searches: Arc<Mutex<BTreeMap<usize, String>>>,
    lifecycle: Mutex<Lifecycle>,
    constructed: Mutex<bool>,
}

impl PageController {
    pub fn new(
        transport: Arc<dyn IdListTransport>,
        cache: &Arc<dyn RecordCache>,
        hooks: GridHooks,
    ) -> Self {
        Self {
            transport,
            cache: Arc::downgrade(cache),
            hooks,
            driver: None,
            state: None,
            columns: OnceLock::new(),
            sort_history: Mutex::new(SortHistory::new()),
            fetch_state: Mutex::new(FetchState::Idle),
            last_page: Mutex::new(None),
            column_searches: Arc::new(Mutex::new(BTreeMap::new())),
            lifecycle: Mutex::new(Lifecycle::Unattached),
            constructed: Mutex::new(false),
        }
    }

    pub fn with_driver(mut self, driver: Arc<dyn GridDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    pub fn with_state(mut self, state: StateService) -> Self {
        self.state = Some(state);
        self
    }

    /// Column descriptors, built from the host's `column_init` on first use.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        self.columns.get_or_init(|| {
            self.hooks
                .column_init
                .as_ref()
                .map(|init| init())
                .unwrap_or_default()
        })
    }

    pub fn fetch_state(&self) -> FetchState {
        *lock(&self.fetch_state)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        *lock(&self.lifecycle)
    }

    pub fn sort_history(&self) -> Vec<SortClause> {
        lock(&self.sort_history).clauses().to_vec()
    }

    /// Attaches the controller to its grid. The first attach builds the
    /// widget and restores persisted state; later ones only reinstall the
    /// per-attach helpers and reload.
    pub fn start(&self) {
        {
            let mut lifecycle = lock(&self.lifecycle);
            if matches!(*lifecycle, Lifecycle::Attached { .. }) {
                return;
            }
            *lifecycle = Lifecycle::Attached {
                first_render_pending: true,
            };
        }

        let first_attach = {
            let mut constructed = lock(&self.constructed);
            let first = !*constructed;
            *constructed = true;
            first
        };

        if first_attach {
            self.restore_state();
        }

        let Some(driver) = self.driver.as_ref() else {
            return;
        };

        if first_attach {
            driver.render_static();
            driver.construct(self.columns());
        }
        driver.on_column_search(self.column_search_handler(driver));
        if !first_attach {
            driver.reload();
        }
    }

    /// Detaches from the grid, tearing down every helper the driver
    /// installed on attach.
    pub fn stop(&self) {
        {
            let mut lifecycle = lock(&self.lifecycle);
            if *lifecycle == Lifecycle::Unattached {
                return;
            }
            *lifecycle = Lifecycle::Unattached;
        }
        lock(&self.column_searches).clear();
        if let Some(driver) = self.driver.as_ref() {
            driver.destroy();
        }
    }

    /// Persists the grid's display state with the current sort history
    /// embedded. No-op without a state service.
    pub fn save_state(&self, state: GridState) {
        if let Some(service) = self.state.as_ref() {
            service.save(state, &self.sort_history());
        }
    }

    /// Runs one request cycle and returns the response for the grid.
    pub fn handle_page_request(&self, params: PageRequest) -> PageResponse {
        let draw = params.draw;
        let mut delivered = None;
        self.handle_page_request_with(params, |response| delivered = Some(response));
        delivered.unwrap_or_else(|| PageResponse::empty(draw))
    }

    /// Runs one request cycle and hands the response to `deliver`. Success
    /// and failure hooks fire after delivery, so observers see materialized
    /// rows.
    pub fn handle_page_request_with<F>(&self, mut params: PageRequest, deliver: F)
    where
        F: FnOnce(PageResponse),
    {
        let draw = params.draw;
        params.order = lock(&self.sort_history).update(&params.order);
        self.apply_column_searches(&mut params);
        let criteria = self.search_criteria(&params);

        debug!(
            draw,
            start = params.start,
            length = params.length,
            order = params.order.len(),
            "requesting id page"
        );

        let outcome = {
            let cycle = FetchCycle::begin(&self.fetch_state);
            match self.transport.fetch_ids(&criteria) {
                Ok(page) => {
                    cycle.advance(FetchState::FetchingRecords);
                    let response = self.resolve_page(draw, &page);
                    *lock(&self.last_page) = Some(page);
                    Ok(response)
                }
                Err(err) => {
                    warn!(draw, error = %err, "id page retrieval failed");
                    Err(PageResponse::empty(draw))
                }
            }
        };

        match outcome {
            Ok(response) => {
                info!(
                    draw,
                    rows = response.data.len(),
                    total = response.records_total,
                    "page delivered"
                );
                deliver(response);
                GridHooks::fire(&self.hooks.on_retrieval_succeeded);
            }
            Err(response) => {
                deliver(response);
                GridHooks::fire(&self.hooks.on_retrieval_failed);
            }
        }
        self.update_complete();
    }

    /// Re-translates the last fetched id list without asking the server
    /// again, for when cached records changed but the page did not.
    pub fn redraw(&self, draw: i64) -> PageResponse {
        let last_page = lock(&self.last_page).clone();
        let response = match last_page {
            Some(page) => {
                let cache = self.cache.upgrade();
                let rows = translate(&page.list, self.columns(), cache.as_deref());
                PageResponse::from_rows(draw, page.full_list_size, rows)
            }
            None => PageResponse::empty(draw),
        };
        debug!(draw, rows = response.data.len(), "page redrawn from known ids");
        self.update_complete();
        response
    }

    fn resolve_page(&self, draw: i64, page: &IdPage) -> PageResponse {
        let cache = self.cache.upgrade();
        match cache.as_deref() {
            Some(cache) => {
                if let Err(err) = cache.ensure_resolved(&page.list) {
                    warn!(draw, ids = page.list.len(), error = %err, "record resolution incomplete");
                }
            }
            None => warn!(draw, "record cache is gone, page will be empty"),
        }
        let rows = translate(&page.list, self.columns(), cache.as_deref());
        PageResponse::from_rows(draw, page.full_list_size, rows)
    }

    fn search_criteria(&self, params: &PageRequest) -> Map<String, Value> {
        if let Some(custom) = self.hooks.search_criteria.as_ref() {
            return custom(params);
        }
        let mut criteria = self
            .hooks
            .additional_search_criteria
            .as_ref()
            .map(|additional| additional())
            .unwrap_or_default();
        if let Ok(Value::Object(request)) = serde_json::to_value(params) {
            criteria.extend(request);
        }
        criteria
    }

    fn apply_column_searches(&self, params: &mut PageRequest) {
        if params.columns.is_empty() {
            params.columns = self
                .columns()
                .iter()
                .map(|column| ColumnRequest {
                    data: column.options.data.clone(),
                    name: column.options.name.clone(),
                    ..ColumnRequest::default()
                })
                .collect();
        }
        for (idx, term) in lock(&self.column_searches).iter() {
            if let Some(column) = params.columns.get_mut(*idx) {
                column.search.value = term.clone();
            }
        }
    }

    fn column_search_handler(&self, driver: &Arc<dyn GridDriver>) -> ColumnSearchHandler {
        let searches = Arc::clone(&self.column_searches);
        let driver = Arc::downgrade(driver);
        Arc::new(move |column: usize, term: &str| {
            {
                let mut searches = lock(&searches);
                if term.is_empty() {
                    searches.remove(&column);
                } else {
                    searches.insert(column, term.to_string());
                }
            }
            if let Some(driver) = driver.upgrade() {
                driver.reload();
            }
        })
    }

    fn restore_state(&self) {
        let Some(service) = self.state.as_ref() else {
            return;
        };
        if let Some(state) = service.load() {
            debug!(
                page_path = service.page_path(),
                clauses = state.column_sorting_order.len(),
                "restored sort history"
            );
            let mut history = lock(&self.sort_history);
            // clicks made before the first attach are newer than anything saved
            let restored = if history.is_empty() {
                state.column_sorting_order
            } else {
                history
                    .clauses()
                    .iter()
                    .copied()
                    .chain(state.column_sorting_order)
                    .collect()
            };
            *history = SortHistory::from_clauses(restored);
        }
    }

    fn update_complete(&self) {
        let attached = {
            let mut lifecycle = lock(&self.lifecycle);
            match *lifecycle {
                Lifecycle::Attached { .. } => {
                    *lifecycle = Lifecycle::Attached {
                        first_render_pending: false,
                    };
                    true
                }
                Lifecycle::Unattached => false,
            }
        };
        if attached {
            if let Some(driver) = self.driver.as_ref() {
                driver.reposition_overlay();
            }
        }
        GridHooks::fire(&self.hooks.on_update_complete);
    }
}
