use serde::Deserialize;

/// Legacy variable names read by existing deployments, mapped onto config keys
const LEGACY_ENV_VARS: &[(&str, &str)] = &[
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASS", "database.password"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("DB_SSLMODE", "database.ssl_mode"),
    ("REDIS_URL", "cache.url"),
    ("REDIS_HOST", "cache.host"),
    ("REDIS_PORT", "cache.port"),
];

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub database: DatabaseSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which relational store backs the service
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `postgres` or `in_memory`
    pub backend: String,
}

/// PostgreSQL connection parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
    pub max_connections: u32,
    /// Startup connection attempts before giving up
    pub connect_attempts: u32,
    /// Fixed delay between startup connection attempts
    pub connect_retry_delay_secs: u64,
    /// `array` for a native `TEXT[]` tags column, `text` for a delimited one
    pub tag_column: String,
}

/// Cache connection parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// `redis`, `in_memory` or `disabled`
    pub backend: String,
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub key_prefix: Option<String>,
    /// Lifetime of every cached snapshot
    pub ttl_secs: u64,
    pub max_capacity: Option<u64>,
    /// Per-command Redis deadline before a call counts as a cache failure
    pub response_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "postgres".to_string(),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "interview_prep".to_string(),
            ssl_mode: "disable".to_string(),
            max_connections: 10,
            connect_attempts: 10,
            connect_retry_delay_secs: 2,
            tag_column: "array".to_string(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: "redis".to_string(),
            url: None,
            host: Some("localhost".to_string()),
            port: Some(6379),
            key_prefix: None,
            ttl_secs: 600,
            max_capacity: None,
            response_timeout_ms: 3000,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Load configuration, resolving legacy variables through `lookup`
    pub fn load_with<F>(lookup: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV_VARS {
            builder = builder.set_override_option(*key, lookup(*var))?;
        }

        builder.build()?.try_deserialize()
    }
}
