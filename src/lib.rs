// ============================================================================
// Superhero Registry Library
// ============================================================================

pub mod client;
pub mod config;
pub mod core;
pub mod service;
pub mod storage;
pub mod web;

// Re-export main types for convenience
pub use client::{ClientCache, ClientError, RecordsClient};
pub use config::AppConfig;
pub use self::core::{
    ImageUpload, NewSuperhero, Page, Pagination, RegistryError, Result, Superhero, SuperheroPatch,
};
pub use service::{PageRequest, SuperheroService};
pub use storage::{ImageStore, InMemoryStore, JsonFileStore, RecordStore, StoreDocument};
pub use web::{AppState, build_router};

use std::sync::Arc;

/// Wire a file-backed service and router from configuration.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use superhero_registry::{AppConfig, app_from_config};
///
/// let config = AppConfig::parse();
/// let router = app_from_config(&config);
/// # let _ = router;
/// ```
pub fn app_from_config(config: &AppConfig) -> axum::Router {
    let store = Arc::new(JsonFileStore::new(&config.data_file));
    let service = SuperheroService::new(store, ImageStore::new(&config.uploads_dir));
    build_router(AppState::new(service).max_upload_bytes(config.max_upload_bytes))
}
