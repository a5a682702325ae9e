// src/lib.rs

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::Database;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::error::Result;
use crate::services::store::{MemoryStore, SqlStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub registry_key: String,
    /// Serializes registry read-modify-write cycles within this process
    pub write_gate: Arc<tokio::sync::Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, registry_key: impl Into<String>) -> Self {
        Self {
            store,
            registry_key: registry_key.into(),
            write_gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Open the configured store, running migrations for SQL backends
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let store: Arc<dyn Store> = if config.uses_memory_store() {
            tracing::warn!("Using in-memory store, earnings will not survive a restart");
            Arc::new(MemoryStore::new())
        } else {
            tracing::info!("Connecting to database...");
            let db = Database::connect(&config.database_url).await?;

            tracing::info!("Running migrations...");
            migration::Migrator::up(&db, None).await?;

            Arc::new(SqlStore::new(db))
        };

        Ok(Self::new(store, config.registry_key.clone()))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::platforms::hello))
        .route("/api/catalog", get(handlers::platforms::get_catalog))
        .route("/api/platforms", get(handlers::platforms::get_platforms))
        .route("/api/platforms/select", post(handlers::platforms::select_platforms))
        .route("/api/platforms/{id}", get(handlers::earnings::get_platform_detail))
        .route("/api/platforms/{id}/earnings", post(handlers::earnings::add_earning))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub mod entities {
    pub mod prelude;
    pub mod kv_store;
}

pub mod services {
    pub mod store;
    pub mod registry;
    pub mod ledger;
    pub mod rollups;
}

pub mod models {
    pub mod catalog;
    pub mod registry;
    pub mod earnings;
}

pub mod handlers {
    pub mod api_error;
    pub mod platforms;
    pub mod earnings;
}

pub mod config;
pub mod error;
