//! PostgreSQL question store with connection pooling

use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgConnectOptions, PgPool, PgPoolOptions, PgRow, PgSslMode};
use sqlx::query::Query;
use sqlx::{Postgres, Row};
use tracing::{debug, info, warn};

use crate::config::DatabaseSettings;
use crate::domain::question::{Question, QuestionDraft, QuestionId, QuestionRepository};
use crate::domain::DomainError;

use super::tags::{decode_tags, encode_tags};

const QUESTION_COLUMNS: &str = "id::BIGINT AS id, title, answer, tags, created_at, updated_at";

/// Physical type of the `tags` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagColumn {
    /// Native `TEXT[]`
    #[default]
    Array,
    /// Plain text holding `{a,b,c}`
    Text,
}

impl TagColumn {
    fn sql_type(&self) -> &'static str {
        match self {
            TagColumn::Array => "TEXT[]",
            TagColumn::Text => "TEXT",
        }
    }
}

impl std::str::FromStr for TagColumn {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "array" | "text[]" => Ok(TagColumn::Array),
            "text" => Ok(TagColumn::Text),
            _ => Err(DomainError::configuration(format!(
                "Unknown tag column type: {}. Valid types: array, text",
                s
            ))),
        }
    }
}

/// Fixed-delay retry bound for the startup connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectRetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for ConnectRetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(2),
        }
    }
}

impl ConnectRetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Runs `op` until it succeeds or the attempts are exhausted
    ///
    /// Exhaustion yields `DomainError::Connection` carrying the last failure.
    pub async fn run<T, E, F, Fut>(&self, target: &str, mut op: F) -> Result<T, DomainError>
    where
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => {
                    return Err(DomainError::connection(format!(
                        "Failed to connect to {} after {} attempts: {}",
                        target, attempt, e
                    )));
                }
                Err(e) => {
                    warn!(
                        target_name = target,
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %e,
                        "Connection attempt failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// PostgreSQL store configuration
#[derive(Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub ssl_mode: PgSslMode,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    pub retry: ConnectRetryPolicy,
    pub tag_column: TagColumn,
}

impl Debug for PostgresConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .field("retry", &self.retry)
            .field("tag_column", &self.tag_column)
            .finish()
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self::from_settings(&DatabaseSettings::default()).unwrap_or_else(|_| Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "interview_prep".to_string(),
            ssl_mode: PgSslMode::Disable,
            max_connections: 10,
            retry: ConnectRetryPolicy::default(),
            tag_column: TagColumn::default(),
        })
    }
}

impl PostgresConfig {
    /// Builds store config from the application settings
    pub fn from_settings(settings: &DatabaseSettings) -> Result<Self, DomainError> {
        let ssl_mode = settings.ssl_mode.parse::<PgSslMode>().map_err(|e| {
            DomainError::configuration(format!(
                "Invalid ssl_mode '{}': {}",
                settings.ssl_mode, e
            ))
        })?;

        Ok(Self {
            host: settings.host.clone(),
            port: settings.port,
            user: settings.user.clone(),
            password: settings.password.clone(),
            database: settings.name.clone(),
            ssl_mode,
            max_connections: settings.max_connections,
            retry: ConnectRetryPolicy::new(
                settings.connect_attempts,
                Duration::from_secs(settings.connect_retry_delay_secs),
            ),
            tag_column: settings.tag_column.parse()?,
        })
    }

    pub fn with_retry(mut self, retry: ConnectRetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_tag_column(mut self, tag_column: TagColumn) -> Self {
        self.tag_column = tag_column;
        self
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.database)
            .ssl_mode(self.ssl_mode);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }
}

/// PostgreSQL implementation of the question store
///
/// Title uniqueness is checked with an existence query before the insert. A
/// unique index, when one exists, is also reported as a duplicate title.
pub struct PostgresQuestionRepository {
    pool: PgPool,
    tag_column: TagColumn,
}

impl Debug for PostgresQuestionRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresQuestionRepository")
            .field("tag_column", &self.tag_column)
            .field("closed", &self.pool.is_closed())
            .finish()
    }
}

impl PostgresQuestionRepository {
    pub fn new(pool: PgPool, tag_column: TagColumn) -> Self {
        Self { pool, tag_column }
    }

    /// Connects with bounded retries, then makes sure the table exists
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let options = config.connect_options();
        let target = format!("PostgreSQL at {}:{}", config.host, config.port);

        let pool = config
            .retry
            .run(&target, || {
                PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect_with(options.clone())
            })
            .await?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            "Connected to PostgreSQL"
        );

        let repository = Self::new(pool, config.tag_column);

        if let Err(e) = repository.ensure_schema().await {
            repository.pool.close().await;
            return Err(e);
        }

        Ok(repository)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the questions table if it does not exist
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS questions (
                id BIGSERIAL PRIMARY KEY,
                title TEXT NOT NULL,
                answer TEXT NOT NULL,
                tags {},
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.tag_column.sql_type()
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        info!("Questions schema ready");
        Ok(())
    }

    async fn title_exists(&self, title: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM questions WHERE title = $1) AS exists")
            .bind(title)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check title: {}", e)))?;

        row.try_get("exists")
            .map_err(|e| DomainError::storage(format!("Failed to read title check: {}", e)))
    }

    fn bind_tags<'q>(
        &self,
        query: Query<'q, Postgres, PgArguments>,
        tags: Vec<String>,
    ) -> Query<'q, Postgres, PgArguments> {
        match self.tag_column {
            TagColumn::Array => query.bind(tags),
            TagColumn::Text => query.bind(encode_tags(&tags)),
        }
    }

    fn row_to_question(&self, row: &PgRow) -> Result<Question, DomainError> {
        let read_err = |e: sqlx::Error| DomainError::storage(format!("Failed to read row: {}", e));

        let tags = match self.tag_column {
            TagColumn::Array => row
                .try_get::<Option<Vec<String>>, _>("tags")
                .map_err(read_err)?
                .unwrap_or_default(),
            TagColumn::Text => row
                .try_get::<Option<String>, _>("tags")
                .map_err(read_err)?
                .map(|raw| decode_tags(&raw))
                .unwrap_or_default(),
        };

        let id: i64 = row.try_get("id").map_err(read_err)?;
        let title: String = row.try_get("title").map_err(read_err)?;
        let answer: String = row.try_get("answer").map_err(read_err)?;
        let created_at: DateTime<Utc> = row.try_get("created_at").map_err(read_err)?;
        let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(read_err)?;

        Ok(Question::new(
            QuestionId::new(id),
            title,
            answer,
            tags,
            created_at,
            updated_at,
        ))
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => e.to_string().contains("duplicate key"),
    }
}

#[async_trait]
impl QuestionRepository for PostgresQuestionRepository {
    async fn create(&self, draft: QuestionDraft) -> Result<Question, DomainError> {
        if self.title_exists(&draft.title).await? {
            return Err(DomainError::duplicate_title(draft.title));
        }

        let query = format!(
            r#"
            INSERT INTO questions (title, answer, tags)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            QUESTION_COLUMNS
        );

        let title = draft.title;
        let insert = sqlx::query(&query).bind(title.clone()).bind(draft.answer);

        let row = self
            .bind_tags(insert, draft.tags)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::duplicate_title(title.clone())
                } else {
                    DomainError::storage(format!("Failed to create question: {}", e))
                }
            })?;

        let question = self.row_to_question(&row)?;
        debug!(question_id = %question.id(), "Question inserted");
        Ok(question)
    }

    async fn update(&self, id: QuestionId, draft: QuestionDraft) -> Result<(), DomainError> {
        let title = draft.title;
        let update = sqlx::query(
            r#"
            UPDATE questions
            SET title = $2, answer = $3, tags = $4, updated_at = GREATEST(NOW(), created_at)
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .bind(title.clone())
        .bind(draft.answer);

        let result = self
            .bind_tags(update, draft.tags)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::duplicate_title(title.clone())
                } else {
                    DomainError::storage(format!("Failed to update question: {}", e))
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Question with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: QuestionId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete question: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Question with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn get_by_id(&self, id: QuestionId) -> Result<Question, DomainError> {
        let query = format!("SELECT {} FROM questions WHERE id = $1", QUESTION_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get question: {}", e)))?;

        match row {
            Some(row) => self.row_to_question(&row),
            None => Err(DomainError::not_found(format!(
                "Question with id '{}' not found",
                id
            ))),
        }
    }

    async fn list(&self) -> Result<Vec<Question>, DomainError> {
        let query = format!(
            "SELECT {} FROM questions ORDER BY created_at DESC, id DESC",
            QUESTION_COLUMNS
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list questions: {}", e)))?;

        rows.iter().map(|row| self.row_to_question(row)).collect()
    }

    async fn close(&self) -> Result<(), DomainError> {
        if !self.pool.is_closed() {
            self.pool.close().await;
            info!("PostgreSQL connection pool closed");
        }

        Ok(())
    }
}
