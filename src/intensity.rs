//! Intensity mapping
//!
//! Turns a coach-facing intensity level (1-10) into a %1RM, rep range and
//! set count. Levels 1-7 use basketball tuning (lighter loads, more reps for
//! conditioning work). Levels 8-10 use strength tuning (heavy, low reps).
//! The two tables are looked up directly and never blended.

use serde::{Deserialize, Serialize};

pub const MIN_LEVEL: i32 = 1;
pub const MAX_LEVEL: i32 = 10;

/// Highest level served by the basketball table
pub const BASKETBALL_MAX_LEVEL: i32 = 7;

/// Level used when the input is below range
pub const LOW_FALLBACK_LEVEL: i32 = 4;
/// Level used when the input is above range
pub const HIGH_FALLBACK_LEVEL: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
  #[serde(rename = "percentOf1RM")]
  pub percent_of_1rm: f64,
  pub reps_low: u32,
  pub reps_high: u32,
  pub sets: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tuning {
  Basketball,
  Strength,
}

const fn rx(percent_of_1rm: f64, reps_low: u32, reps_high: u32, sets: u32) -> Prescription {
  Prescription {
    percent_of_1rm,
    reps_low,
    reps_high,
    sets,
  }
}

/// Levels 1-7
const BASKETBALL_TABLE: [Prescription; 7] = [
  rx(0.40, 12, 15, 1),
  rx(0.45, 10, 12, 2),
  rx(0.50, 8, 10, 2),
  rx(0.55, 6, 8, 3),
  rx(0.60, 5, 7, 3),
  rx(0.65, 4, 6, 3),
  rx(0.70, 3, 5, 3),
];

/// Levels 8-10
const STRENGTH_TABLE: [Prescription; 3] = [
  rx(0.80, 4, 6, 4),
  rx(0.85, 3, 5, 5),
  rx(0.90, 2, 3, 5),
];

/// Level actually used for a given input after fallback
pub fn effective_level(level: i32) -> i32 {
  if level < MIN_LEVEL {
    LOW_FALLBACK_LEVEL
  } else if level > MAX_LEVEL {
    HIGH_FALLBACK_LEVEL
  } else {
    level
  }
}

pub fn tuning_for(level: i32) -> Tuning {
  if effective_level(level) <= BASKETBALL_MAX_LEVEL {
    Tuning::Basketball
  } else {
    Tuning::Strength
  }
}

/// Map an intensity level to its prescription.
///
/// Never fails: levels below 1 fall back to level 4 and levels above 10 to
/// level 8, so a stale or hand-edited plan still gets a sensible target.
pub fn map_intensity(level: i32) -> Prescription {
  let effective = effective_level(level);
  if effective != level {
    tracing::debug!(level, effective, "intensity level out of range, using fallback");
  }

  match tuning_for(effective) {
    Tuning::Basketball => BASKETBALL_TABLE[(effective - MIN_LEVEL) as usize],
    Tuning::Strength => STRENGTH_TABLE[(effective - BASKETBALL_MAX_LEVEL - 1) as usize],
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_basketball_levels_stay_in_band() {
    for level in 1..=7 {
      let p = map_intensity(level);
      assert!(
        (0.40..=0.70).contains(&p.percent_of_1rm),
        "level {} gave {}",
        level,
        p.percent_of_1rm
      );
      assert!(p.sets >= 1 && p.sets <= 3);
      assert_eq!(tuning_for(level), Tuning::Basketball);
    }
  }

  #[test]
  fn test_strength_levels_stay_in_band() {
    for level in 8..=10 {
      let p = map_intensity(level);
      assert!((0.80..=0.90).contains(&p.percent_of_1rm));
      assert!(p.sets >= 4 && p.sets <= 5);
      assert_eq!(tuning_for(level), Tuning::Strength);
    }
  }

  #[test]
  fn test_level_five() {
    let p = map_intensity(5);
    assert_eq!(p.percent_of_1rm, 0.60);
    assert_eq!((p.reps_low, p.reps_high), (5, 7));
    assert_eq!(p.sets, 3);
  }

  #[test]
  fn test_tables_are_not_interpolated() {
    // Jump from 0.70 straight to 0.80 at the table boundary
    assert_eq!(map_intensity(7).percent_of_1rm, 0.70);
    assert_eq!(map_intensity(8).percent_of_1rm, 0.80);
  }

  #[test]
  fn test_out_of_range_fallbacks() {
    assert_eq!(map_intensity(0), map_intensity(4));
    assert_eq!(map_intensity(-3), map_intensity(4));
    assert_eq!(map_intensity(11), map_intensity(8));
    assert_eq!(map_intensity(i32::MAX), map_intensity(8));
    assert_eq!(tuning_for(0), Tuning::Basketball);
    assert_eq!(tuning_for(42), Tuning::Strength);
  }

  #[test]
  fn test_rep_ranges_are_ordered() {
    for level in MIN_LEVEL..=MAX_LEVEL {
      let p = map_intensity(level);
      assert!(p.reps_low <= p.reps_high);
      assert!(p.percent_of_1rm > 0.0 && p.percent_of_1rm <= 1.0);
    }
  }
}
