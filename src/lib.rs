//! Interview prep API
//!
//! A flashcard question service with:
//! - PostgreSQL (or in-memory) storage as the source of truth
//! - A cache-aside layer over Redis, moka, or nothing at all
//! - A small JSON API under `/api/v1/questions`

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    cache::{snapshot_ttl, CacheConfig, CacheFactory},
    services::QuestionService,
    storage::{StorageConfig, StorageFactory},
};
use tracing::info;

/// Create the application state with custom configuration
///
/// Configuration is validated before any connection is opened. The store
/// must be reachable; an unreachable cache degrades to no caching.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = StorageConfig::from_settings(&config.storage, &config.database)?;
    let cache_config = CacheConfig::from_settings(&config.cache)?;

    let repository = StorageFactory::create(&storage_config).await?;
    info!(backend = %storage_config.storage_type(), "Question store ready");

    let cache = CacheFactory::new().create_or_noop(&cache_config).await;

    let service =
        QuestionService::new(repository, cache).with_ttl(snapshot_ttl(&config.cache));

    Ok(AppState::new(Arc::new(service)))
}
