use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tokio::sync::RwLock;

pub type DbPool = SqlitePool;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Stored value is not valid JSON: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Failed to prepare data directory: {0}")]
  Io(#[from] std::io::Error),
}

/// ---------------------------------------------------------------------------
/// Repository Interface
/// ---------------------------------------------------------------------------

/// Key-value store of JSON documents
#[async_trait]
pub trait KvRepository: Send + Sync {
  async fn get(&self, key: &str) -> Result<Option<Value>, RepositoryError>;

  async fn put(&self, key: &str, value: &Value) -> Result<(), RepositoryError>;

  /// Returns whether the key existed
  async fn delete(&self, key: &str) -> Result<bool, RepositoryError>;
}

/// ---------------------------------------------------------------------------
/// SQLite
/// ---------------------------------------------------------------------------

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(db_path: &Path) -> Result<DbPool, RepositoryError> {
  if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    fs::create_dir_all(parent)?;
  }
  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

  tracing::info!(path = %db_path.display(), "initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  tracing::info!("database initialized");

  Ok(pool)
}

#[derive(Debug, Clone)]
pub struct SqliteRepository {
  pool: DbPool,
}

impl SqliteRepository {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }
}

#[async_trait]
impl KvRepository for SqliteRepository {
  async fn get(&self, key: &str) -> Result<Option<Value>, RepositoryError> {
    let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
      .bind(key)
      .fetch_optional(&self.pool)
      .await?;

    match row {
      Some(row) => {
        let raw: String = row.try_get("value")?;
        Ok(Some(serde_json::from_str(&raw)?))
      }
      None => Ok(None),
    }
  }

  async fn put(&self, key: &str, value: &Value) -> Result<(), RepositoryError> {
    let raw = serde_json::to_string(value)?;
    sqlx::query(
      r#"
      INSERT INTO kv_store (key, value, updated_at)
      VALUES (?1, ?2, CURRENT_TIMESTAMP)
      ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(key)
    .bind(raw)
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<bool, RepositoryError> {
    let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
      .bind(key)
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected() > 0)
  }
}

/// ---------------------------------------------------------------------------
/// In-Memory
/// ---------------------------------------------------------------------------

/// Repository for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryRepository {
  entries: RwLock<HashMap<String, Value>>,
}

impl MemoryRepository {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl KvRepository for MemoryRepository {
  async fn get(&self, key: &str) -> Result<Option<Value>, RepositoryError> {
    Ok(self.entries.read().await.get(key).cloned())
  }

  async fn put(&self, key: &str, value: &Value) -> Result<(), RepositoryError> {
    self.entries.write().await.insert(key.to_string(), value.clone());
    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<bool, RepositoryError> {
    Ok(self.entries.write().await.remove(key).is_some())
  }
}
