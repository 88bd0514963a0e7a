use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use grid_pager::config::{default_config_path, load_config};
use grid_pager::infra::http::records::HttpRecordSource;
use grid_pager::infra::http::transport::{build_client, HttpTransport};
use grid_pager::infra::memory::record_cache::InMemoryRecordCache;
use grid_pager::infra::sqlite::state_store::SqliteStateStore;
use grid_pager::usecase::ports::cache::RecordCache;
use grid_pager::usecase::services::state_service::StateService;
use grid_pager::{GridHooks, GridState, PageController, PageRequest, SearchTerm, SortClause};

#[derive(Parser, Debug)]
#[command(
    name = "grid-pager",
    version,
    about = "Fetch one page of a server-paged grid and print it as grid JSON"
)]
struct Args {
    /// Config file (defaults to the per-user config location)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Id-list endpoint, overrides `url` from the config
    #[arg(long)]
    url: Option<String>,

    /// Batch record endpoint, overrides `records_url` from the config
    #[arg(long)]
    records_url: Option<String>,

    #[arg(long, default_value_t = 1)]
    draw: i64,

    #[arg(long, default_value_t = 0)]
    start: u64,

    #[arg(long)]
    length: Option<i64>,

    /// Sort click as `column[:asc|desc]`; repeat for several
    #[arg(long = "order")]
    order: Vec<SortClause>,

    /// Global search term
    #[arg(long, default_value = "")]
    search: String,

    /// Key the persisted grid state is stored under
    #[arg(long)]
    page_path: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<bool> {
    let mut config = match args.config.as_ref() {
        Some(path) => load_config(path, false)?,
        None => load_config(&default_config_path()?, true)?,
    };
    if args.url.is_some() {
        config.url = args.url;
    }
    if args.records_url.is_some() {
        config.records_url = args.records_url;
    }
    if args.length.is_some() {
        config.page_length = args.length;
    }
    if args.page_path.is_some() {
        config.page_path = args.page_path;
    }
    let settings = config.resolve()?;

    let client = build_client(settings.timeout).context("failed to build http client")?;
    let transport = Arc::new(HttpTransport::new(client.clone(), settings.url.clone()));
    info!(url = transport.url(), page_path = %settings.page_path, "paging from id endpoint");
    let cache: Arc<dyn RecordCache> = match settings.records_url.as_ref() {
        Some(url) => Arc::new(InMemoryRecordCache::with_source(Arc::new(
            HttpRecordSource::new(client, url.clone()),
        ))),
        None => Arc::new(InMemoryRecordCache::new()),
    };

    let failed = Arc::new(AtomicBool::new(false));
    let failed_flag = Arc::clone(&failed);
    let columns = settings.columns.clone();
    let additional = settings.additional_criteria.clone();
    let hooks = GridHooks::new()
        .column_init(move || columns.clone())
        .additional_search_criteria(move || additional.clone())
        .on_retrieval_failed(move || failed_flag.store(true, Ordering::SeqCst));

    let mut controller = PageController::new(transport, &cache, hooks);
    if let Some(db_path) = settings.state_db.as_ref() {
        match SqliteStateStore::open(db_path) {
            Ok(store) => {
                controller = controller
                    .with_state(StateService::new(Arc::new(store), settings.page_path.clone()));
            }
            Err(err) => error!(error = %err, "grid state unavailable, continuing without it"),
        }
    }
    controller.start();

    let mut request = PageRequest::new(args.draw, args.start, settings.page_length);
    request.order = args.order;
    request.search = SearchTerm::plain(args.search);

    let response = controller.handle_page_request(request.clone());
    controller.save_state(GridState::capture(&request));
    controller.stop();

    let body = serde_json::to_string_pretty(&response).context("failed to encode response")?;
    println!("{body}");
    info!(
        draw = response.draw,
        rows = response.data.len(),
        total = response.records_total,
        "done"
    );

    Ok(!failed.load(Ordering::SeqCst))
}

fn main() -> ExitCode {
    init_tracing();
    match run(Args::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
