//! Load aggregation
//!
//! Rolling workload metrics over recorded performances. Loads are averaged
//! per calendar day, not per session: a week with fewer sessions shows a
//! lower acute load because rest days dilute it.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::workout::volume_factor;
use crate::models::{ActualPerformance, WorkoutPlan};

pub const ACUTE_WINDOW_DAYS: i64 = 7;
pub const CHRONIC_WINDOW_DAYS: i64 = 28;

/// ---------------------------------------------------------------------------
/// Samples and Rolling Windows
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadSample {
  pub date: NaiveDate,
  pub volume: f64,
}

/// One sample per performance, sorted by date
pub fn load_samples(history: &[ActualPerformance]) -> Vec<LoadSample> {
  let mut samples: Vec<_> = history
    .iter()
    .map(|p| LoadSample {
      date: p.date,
      volume: p.volume(),
    })
    .collect();
  samples.sort_by_key(|s| s.date);
  samples
}

/// Total volume of sessions in the `days`-day window ending at `as_of`.
/// Sessions after `as_of` are ignored.
fn window_volume(history: &[ActualPerformance], as_of: NaiveDate, days: i64) -> f64 {
  history
    .iter()
    .filter(|p| {
      let days_ago = (as_of - p.date).num_days();
      (0..days).contains(&days_ago)
    })
    .map(ActualPerformance::volume)
    .sum()
}

/// Average daily volume over the 7 days ending at `as_of`
pub fn acute_load(history: &[ActualPerformance], as_of: NaiveDate) -> f64 {
  window_volume(history, as_of, ACUTE_WINDOW_DAYS) / ACUTE_WINDOW_DAYS as f64
}

/// Average daily volume over the 28 days ending at `as_of`
pub fn chronic_load(history: &[ActualPerformance], as_of: NaiveDate) -> f64 {
  window_volume(history, as_of, CHRONIC_WINDOW_DAYS) / CHRONIC_WINDOW_DAYS as f64
}

/// Acute:chronic workload ratio. Zero means there is no chronic base yet,
/// not that the player is at zero risk.
pub fn acwr(history: &[ActualPerformance], as_of: NaiveDate) -> f64 {
  ratio(acute_load(history, as_of), chronic_load(history, as_of))
}

fn ratio(acute: f64, chronic: f64) -> f64 {
  if chronic > 0.0 {
    acute / chronic
  } else {
    0.0
  }
}

/// ---------------------------------------------------------------------------
/// ACWR Bands
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcwrBand {
  /// Ratio is 0: no chronic history to compare against
  NoData,
  /// (0, 0.8)
  Undertraining,
  /// [0.8, 1.3)
  Optimal,
  /// [1.3, 1.5)
  ModerateRisk,
  /// >= 1.5
  HighRisk,
}

impl AcwrBand {
  pub fn classify(ratio: f64) -> Self {
    match ratio {
      r if r.is_nan() || r <= 0.0 => AcwrBand::NoData,
      r if r < 0.8 => AcwrBand::Undertraining,
      r if r < 1.3 => AcwrBand::Optimal,
      r if r < 1.5 => AcwrBand::ModerateRisk,
      _ => AcwrBand::HighRisk,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      AcwrBand::NoData => "no_data",
      AcwrBand::Undertraining => "undertraining",
      AcwrBand::Optimal => "optimal",
      AcwrBand::ModerateRisk => "moderate_risk",
      AcwrBand::HighRisk => "high_risk",
    }
  }

  pub fn recommendation(&self) -> &'static str {
    match self {
      AcwrBand::NoData => "Not enough training history to judge workload yet.",
      AcwrBand::Undertraining => "Workload is below the player's base. Build volume gradually.",
      AcwrBand::Optimal => "Workload is in the optimal range.",
      AcwrBand::ModerateRisk => "Workload is climbing. Watch for fatigue and hold volume steady.",
      AcwrBand::HighRisk => "Workload spike. Injury risk is high, reduce volume this week.",
    }
  }
}

/// Acute, chronic and ratio for one point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkloadSnapshot {
  pub as_of: NaiveDate,
  pub acute: f64,
  pub chronic: f64,
  pub acwr: f64,
  pub band: AcwrBand,
}

impl WorkloadSnapshot {
  pub fn compute(history: &[ActualPerformance], as_of: NaiveDate) -> Self {
    let acute = acute_load(history, as_of);
    let chronic = chronic_load(history, as_of);
    let acwr = ratio(acute, chronic);

    Self {
      as_of,
      acute,
      chronic,
      acwr,
      band: AcwrBand::classify(acwr),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Weekly Rollups
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRollup {
  /// e.g. "Mar 10"
  pub week_label: String,
  pub week_start: NaiveDate,
  pub workout_count: u32,
  #[serde(rename = "avgRPE")]
  pub avg_rpe: f64,
  pub total_duration: f64,
  /// Sum of RPE x duration
  pub total_load: f64,
  /// Sum of sets x reps x weight
  pub total_volume: f64,
}

impl WeeklyRollup {
  fn empty(week_start: NaiveDate) -> Self {
    Self {
      week_label: week_start.format("%b %-d").to_string(),
      week_start,
      workout_count: 0,
      avg_rpe: 0.0,
      total_duration: 0.0,
      total_load: 0.0,
      total_volume: 0.0,
    }
  }
}

/// Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
  date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Calendar-week buckets for the `week_count` weeks ending with the week
/// containing `as_of`, oldest first. Weeks without sessions are included
/// with zero totals.
pub fn weekly_rollup(history: &[ActualPerformance], week_count: usize, as_of: NaiveDate) -> Vec<WeeklyRollup> {
  let current_week = week_start(as_of);

  let mut weeks: Vec<WeeklyRollup> = (0..week_count)
    .map(|i| {
      let start = current_week - Duration::weeks(i as i64);
      let end = start + Duration::days(6);

      let sessions: Vec<_> = history
        .iter()
        .filter(|p| p.date >= start && p.date <= end)
        .collect();

      let mut rollup = WeeklyRollup::empty(start);
      if sessions.is_empty() {
        return rollup;
      }

      let rpe_sum: f64 = sessions.iter().map(|p| volume_factor(p.rpe)).sum();
      rollup.workout_count = sessions.len() as u32;
      rollup.avg_rpe = rpe_sum / sessions.len() as f64;
      rollup.total_duration = sessions.iter().map(|p| volume_factor(p.duration_minutes)).sum();
      rollup.total_load = sessions.iter().map(|p| p.session_load()).sum();
      rollup.total_volume = sessions.iter().map(|p| p.volume()).sum();
      rollup
    })
    .collect();

  // Built newest-first
  weeks.reverse();
  weeks
}

/// ---------------------------------------------------------------------------
/// Planned vs Actual
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanComparison {
  pub planned_volume: f64,
  pub actual_volume: f64,
  /// Actual as a percentage of planned, None when nothing was planned
  pub completion_pct: Option<f64>,
}

pub fn compare_plan(plan: &WorkoutPlan) -> PlanComparison {
  let planned_volume = plan.planned_volume();
  let actual_volume = plan.actual.as_ref().map(ActualPerformance::volume).unwrap_or(0.0);

  let completion_pct = if planned_volume > 0.0 {
    Some(actual_volume / planned_volume * 100.0)
  } else {
    None
  };

  PlanComparison {
    planned_volume,
    actual_volume,
    completion_pct,
  }
}
