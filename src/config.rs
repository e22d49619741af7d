use std::env;
use std::path::PathBuf;

use crate::prescription::{PrescriptionSettings, DEFAULT_HEURISTIC_COEFFICIENT, DEFAULT_WEIGHT_INCREMENT};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const DB_PATH_VAR: &str = "COURTSIDE_DB_PATH";
const WEIGHT_INCREMENT_VAR: &str = "COURTSIDE_WEIGHT_INCREMENT";
const HEURISTIC_COEFFICIENT_VAR: &str = "COURTSIDE_HEURISTIC_COEFFICIENT";
const LOG_VAR: &str = "COURTSIDE_LOG";

const DEFAULT_DB_PATH: &str = "courtside.db";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Invalid value for {var}: {value}")]
  Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
  pub database_path: PathBuf,
  pub prescription: PrescriptionSettings,
  pub log_filter: String,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database_path: PathBuf::from(DEFAULT_DB_PATH),
      prescription: PrescriptionSettings::default(),
      log_filter: DEFAULT_LOG_FILTER.to_string(),
    }
  }
}

impl AppConfig {
  /// Read configuration from the environment (and `.env` if present)
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();

    let increment = parse_f64(WEIGHT_INCREMENT_VAR, DEFAULT_WEIGHT_INCREMENT, |v| v > 0.0)?;
    let heuristic_coefficient =
      parse_f64(HEURISTIC_COEFFICIENT_VAR, DEFAULT_HEURISTIC_COEFFICIENT, |v| v > 0.0 && v <= 1.0)?;

    Ok(Self {
      database_path: env::var(DB_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH)),
      prescription: PrescriptionSettings {
        increment,
        heuristic_coefficient,
      },
      log_filter: env::var(LOG_VAR).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
    })
  }
}

fn parse_f64(var: &'static str, default: f64, valid: impl Fn(f64) -> bool) -> Result<f64, ConfigError> {
  match env::var(var) {
    Ok(raw) => raw
      .trim()
      .parse::<f64>()
      .ok()
      .filter(|v| v.is_finite() && valid(*v))
      .ok_or(ConfigError::Invalid { var, value: raw }),
    Err(_) => Ok(default),
  }
}
