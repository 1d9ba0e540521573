//! Storage infrastructure - Question store implementations

mod factory;
mod in_memory;
mod postgres;
mod tags;

pub use factory::{StorageConfig, StorageFactory, StorageType};
pub use in_memory::InMemoryQuestionRepository;
pub use postgres::{ConnectRetryPolicy, PostgresConfig, PostgresQuestionRepository, TagColumn};
pub use tags::{decode_tags, encode_tags};
