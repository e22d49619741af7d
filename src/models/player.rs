use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Base Lifts
/// ---------------------------------------------------------------------------

/// The three tested lifts every prescription is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BaseLift {
  BenchPress,
  Squat,
  Deadlift,
}

impl BaseLift {
  pub const ALL: [BaseLift; 3] = [BaseLift::BenchPress, BaseLift::Squat, BaseLift::Deadlift];

  /// Exercise id of the lift itself in the catalog
  pub fn exercise_id(&self) -> &'static str {
    match self {
      BaseLift::BenchPress => "bench-press",
      BaseLift::Squat => "back-squat",
      BaseLift::Deadlift => "deadlift",
    }
  }

  pub fn from_exercise_id(id: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|lift| lift.exercise_id() == id)
  }
}

impl std::fmt::Display for BaseLift {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::BenchPress => write!(f, "bench press"),
      Self::Squat => write!(f, "squat"),
      Self::Deadlift => write!(f, "deadlift"),
    }
  }
}

/// ---------------------------------------------------------------------------
/// One-Rep-Max Profile
/// ---------------------------------------------------------------------------

/// Recorded one-rep maxes in kg. A lift is either a positive number or absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RmProfile {
  pub bench_press: Option<f64>,
  pub squat: Option<f64>,
  pub deadlift: Option<f64>,
}

impl RmProfile {
  pub fn new(bench_press: Option<f64>, squat: Option<f64>, deadlift: Option<f64>) -> Self {
    Self {
      bench_press: bench_press.and_then(sanitize_rm),
      squat: squat.and_then(sanitize_rm),
      deadlift: deadlift.and_then(sanitize_rm),
    }
  }

  /// RM for a lift, treating stored zero/negative values as missing
  pub fn get(&self, lift: BaseLift) -> Option<f64> {
    let value = match lift {
      BaseLift::BenchPress => self.bench_press,
      BaseLift::Squat => self.squat,
      BaseLift::Deadlift => self.deadlift,
    };
    value.and_then(sanitize_rm)
  }

  /// Overwrite one lift with a new test result
  pub fn record(&mut self, lift: BaseLift, value: f64) {
    let value = sanitize_rm(value);
    match lift {
      BaseLift::BenchPress => self.bench_press = value,
      BaseLift::Squat => self.squat = value,
      BaseLift::Deadlift => self.deadlift = value,
    }
  }

  pub fn is_empty(&self) -> bool {
    BaseLift::ALL.iter().all(|lift| self.get(*lift).is_none())
  }
}

fn sanitize_rm(value: f64) -> Option<f64> {
  if value.is_finite() && value > 0.0 {
    Some(value)
  } else {
    None
  }
}

/// ---------------------------------------------------------------------------
/// Physical Data
/// ---------------------------------------------------------------------------

pub const HEIGHT_RANGE_CM: (f64, f64) = (120.0, 250.0);
pub const WEIGHT_RANGE_KG: (f64, f64) = (35.0, 200.0);
pub const BODY_FAT_RANGE_PCT: (f64, f64) = (3.0, 50.0);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
  #[error("{field} must be between {min} and {max}, got {value}")]
  OutOfRange {
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
  },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalData {
  pub height_cm: f64,
  pub weight_kg: f64,
  pub body_fat_pct: Option<f64>,
}

impl PhysicalData {
  pub fn validate(&self) -> Result<(), ValidationError> {
    check_range("height_cm", self.height_cm, HEIGHT_RANGE_CM)?;
    check_range("weight_kg", self.weight_kg, WEIGHT_RANGE_KG)?;
    if let Some(body_fat) = self.body_fat_pct {
      check_range("body_fat_pct", body_fat, BODY_FAT_RANGE_PCT)?;
    }
    Ok(())
  }
}

fn check_range(field: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), ValidationError> {
  // NaN fails both comparisons, so it is rejected too
  if value >= min && value <= max {
    Ok(())
  } else {
    Err(ValidationError::OutOfRange { field, value, min, max })
  }
}

/// ---------------------------------------------------------------------------
/// Player
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
  pub id: String,
  pub name: String,
  pub position: Option<String>,
  pub jersey_number: Option<u8>,
  pub physical: Option<PhysicalData>,
  #[serde(default)]
  pub rm_profile: RmProfile,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Player {
  /// New player with no physical data and an empty RM profile
  pub fn new(name: impl Into<String>) -> Self {
    let now = Utc::now();
    Self {
      id: uuid::Uuid::new_v4().to_string(),
      name: name.into(),
      position: None,
      jersey_number: None,
      physical: None,
      rm_profile: RmProfile::default(),
      created_at: now,
      updated_at: now,
    }
  }
}
