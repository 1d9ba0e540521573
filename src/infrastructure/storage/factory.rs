//! Storage factory for runtime storage selection

use std::sync::Arc;

use crate::config::{DatabaseSettings, StorageSettings};
use crate::domain::question::QuestionRepository;
use crate::domain::DomainError;

use super::in_memory::InMemoryQuestionRepository;
use super::postgres::{PostgresConfig, PostgresQuestionRepository};

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::InMemory => write!(f, "in_memory"),
            StorageType::Postgres => write!(f, "postgres"),
        }
    }
}

impl std::str::FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(DomainError::configuration(format!(
                "Unknown storage backend: {}. Valid backends: postgres, in_memory",
                s
            ))),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Creates an in-memory storage configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Creates a PostgreSQL storage configuration
    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    /// Builds storage config from the application settings
    pub fn from_settings(
        storage: &StorageSettings,
        database: &DatabaseSettings,
    ) -> Result<Self, DomainError> {
        match storage.backend.parse::<StorageType>()? {
            StorageType::InMemory => Ok(Self::InMemory),
            StorageType::Postgres => Ok(Self::Postgres(PostgresConfig::from_settings(database)?)),
        }
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Factory for creating question stores
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a question store based on the configuration
    ///
    /// PostgreSQL connects with bounded retries and bootstraps the schema.
    pub async fn create(
        config: &StorageConfig,
    ) -> Result<Arc<dyn QuestionRepository>, DomainError> {
        match config {
            StorageConfig::InMemory => Ok(Self::create_in_memory()),
            StorageConfig::Postgres(pg_config) => {
                let repository = PostgresQuestionRepository::connect(pg_config).await?;
                Ok(Arc::new(repository))
            }
        }
    }

    /// Creates an in-memory question store
    pub fn create_in_memory() -> Arc<dyn QuestionRepository> {
        Arc::new(InMemoryQuestionRepository::new())
    }
}
