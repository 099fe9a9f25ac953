use axum::{
    http::Method,
    middleware::from_fn,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod database;
mod error;
mod handlers;
mod invoicing;
mod middleware;
mod repository;
mod validation;

use config::{Config, StorageBackend};
use repository::{MemoryStore, PgStore, Store};


pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: impl Store + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Full HTTP surface, shared by `main` and the router tests
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api = Router::new()
        .nest("/clients", handlers::client_routes())
        .nest("/team-members", handlers::team_member_routes())
        .nest("/projects", handlers::project_routes())
        .nest("/project-assignments", handlers::project_assignment_routes())
        .nest("/time-entries", handlers::time_entry_routes())
        .nest("/invoices", handlers::invoice_routes());

    Router::new()
        .route("/", get(|| async { "Billable API" }))
        .route("/health", get(handlers::health_check))
        .route("/health/detailed", get(middleware::detailed_health_check))
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn(middleware::request_logging))
                .layer(cors),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = match config.storage {
        StorageBackend::Postgres => {
            let pool_config = database::PoolConfig::from_env();
            let pool = database::create_pool(&config.database_url, &pool_config).await?;
            database::migrate(&pool).await?;
            AppState::new(PgStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            AppState::new(MemoryStore::new())
        }
    };
    tracing::info!(backend = state.store.backend_name(), "Storage ready");

    let app = app(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;
    tracing::info!("Server running on {}", config.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
