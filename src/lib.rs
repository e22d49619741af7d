pub mod catalog;
pub mod config;
pub mod db;
pub mod intensity;
pub mod load;
pub mod models;
pub mod prescription;
pub mod store;

#[cfg(test)]
mod test_utils;

use catalog::ExerciseCatalog;
use config::AppConfig;
use db::SqliteRepository;
use store::{StoreError, TeamStore};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber. Later calls are no-ops.
pub fn init_tracing(filter: &str) {
  let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Open the SQLite-backed store described by `config` with the standard
/// exercise catalog
pub async fn open_store(config: &AppConfig) -> Result<TeamStore<SqliteRepository>, StoreError> {
  let pool = db::initialize_db(&config.database_path).await?;
  Ok(TeamStore::new(
    SqliteRepository::new(pool),
    ExerciseCatalog::standard(),
    config.prescription,
  ))
}
