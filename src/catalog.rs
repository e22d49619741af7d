//! Exercise library and load relationships
//!
//! Each exercise carries a typed category and target muscle group. Weighted
//! accessories with a known relationship to a base lift are listed
//! explicitly in `ACCESSORY_LIFTS`. Everything else is classified from the
//! catalog entry, never from the shape of the id.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::BaseLift;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
  Strength,
  Power,
  Plyometric,
  Conditioning,
  Mobility,
  Skill,
}

impl ExerciseCategory {
  /// Categories that are prescribed as a percentage of a 1RM
  pub fn is_loaded(&self) -> bool {
    matches!(self, ExerciseCategory::Strength | ExerciseCategory::Power)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
  Chest,
  Shoulders,
  Triceps,
  Biceps,
  Quadriceps,
  Legs,
  Calves,
  Back,
  Hamstrings,
  Glutes,
  Core,
  FullBody,
}

impl MuscleGroup {
  /// Base lift a muscle group borrows its load from
  pub fn base_lift(&self) -> Option<BaseLift> {
    match self {
      MuscleGroup::Chest | MuscleGroup::Shoulders | MuscleGroup::Triceps => Some(BaseLift::BenchPress),
      MuscleGroup::Quadriceps | MuscleGroup::Legs | MuscleGroup::Calves => Some(BaseLift::Squat),
      MuscleGroup::Back | MuscleGroup::Hamstrings | MuscleGroup::Glutes => Some(BaseLift::Deadlift),
      MuscleGroup::Biceps | MuscleGroup::Core | MuscleGroup::FullBody => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
  pub id: String,
  pub name: String,
  pub category: ExerciseCategory,
  pub target_muscle_group: MuscleGroup,
}

impl Exercise {
  pub fn new(
    id: impl Into<String>,
    name: impl Into<String>,
    category: ExerciseCategory,
    target_muscle_group: MuscleGroup,
  ) -> Self {
    Self {
      id: id.into(),
      name: name.into(),
      category,
      target_muscle_group,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Accessory Relationships
/// ---------------------------------------------------------------------------

/// (exercise id, base lift, transfer coefficient)
pub const ACCESSORY_LIFTS: &[(&str, BaseLift, f64)] = &[
  // Squat family
  ("front-squat", BaseLift::Squat, 0.85),
  ("leg-press", BaseLift::Squat, 0.9),
  ("goblet-squat", BaseLift::Squat, 0.4),
  ("bulgarian-split-squat", BaseLift::Squat, 0.4),
  ("walking-lunge", BaseLift::Squat, 0.35),
  ("step-up", BaseLift::Squat, 0.3),
  // Bench family
  ("incline-bench-press", BaseLift::BenchPress, 0.8),
  ("close-grip-bench-press", BaseLift::BenchPress, 0.85),
  ("dumbbell-bench-press", BaseLift::BenchPress, 0.35),
  ("overhead-press", BaseLift::BenchPress, 0.6),
  ("push-press", BaseLift::BenchPress, 0.7),
  // Deadlift family
  ("romanian-deadlift", BaseLift::Deadlift, 0.7),
  ("trap-bar-deadlift", BaseLift::Deadlift, 1.0),
  ("hip-thrust", BaseLift::Deadlift, 0.8),
  ("power-clean", BaseLift::Deadlift, 0.55),
  ("hang-clean", BaseLift::Deadlift, 0.5),
  ("bent-over-row", BaseLift::Deadlift, 0.5),
  ("good-morning", BaseLift::Deadlift, 0.35),
];

pub fn accessory_lift(exercise_id: &str) -> Option<(BaseLift, f64)> {
  ACCESSORY_LIFTS
    .iter()
    .find(|(id, _, _)| *id == exercise_id)
    .map(|(_, lift, coefficient)| (*lift, *coefficient))
}

/// ---------------------------------------------------------------------------
/// Catalog
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ExerciseCatalog {
  exercises: HashMap<String, Exercise>,
}

impl ExerciseCatalog {
  pub fn new(exercises: impl IntoIterator<Item = Exercise>) -> Self {
    Self {
      exercises: exercises.into_iter().map(|e| (e.id.clone(), e)).collect(),
    }
  }

  /// Built-in library used by the planner
  pub fn standard() -> Self {
    use ExerciseCategory::*;
    use MuscleGroup::*;

    Self::new([
      // Base lifts
      Exercise::new("bench-press", "Bench Press", Strength, Chest),
      Exercise::new("back-squat", "Back Squat", Strength, Quadriceps),
      Exercise::new("deadlift", "Deadlift", Strength, Back),
      // Accessories with explicit relationships
      Exercise::new("front-squat", "Front Squat", Strength, Quadriceps),
      Exercise::new("leg-press", "Leg Press", Strength, Legs),
      Exercise::new("goblet-squat", "Goblet Squat", Strength, Quadriceps),
      Exercise::new("bulgarian-split-squat", "Bulgarian Split Squat", Strength, Legs),
      Exercise::new("walking-lunge", "Walking Lunge", Strength, Legs),
      Exercise::new("step-up", "Step-Up", Strength, Legs),
      Exercise::new("incline-bench-press", "Incline Bench Press", Strength, Chest),
      Exercise::new("close-grip-bench-press", "Close-Grip Bench Press", Strength, Triceps),
      Exercise::new("dumbbell-bench-press", "Dumbbell Bench Press", Strength, Chest),
      Exercise::new("overhead-press", "Overhead Press", Strength, Shoulders),
      Exercise::new("push-press", "Push Press", Power, Shoulders),
      Exercise::new("romanian-deadlift", "Romanian Deadlift", Strength, Hamstrings),
      Exercise::new("trap-bar-deadlift", "Trap Bar Deadlift", Strength, Back),
      Exercise::new("hip-thrust", "Hip Thrust", Strength, Glutes),
      Exercise::new("power-clean", "Power Clean", Power, FullBody),
      Exercise::new("hang-clean", "Hang Clean", Power, FullBody),
      Exercise::new("bent-over-row", "Bent-Over Row", Strength, Back),
      Exercise::new("good-morning", "Good Morning", Strength, Hamstrings),
      // Loaded by muscle group
      Exercise::new("dumbbell-fly", "Dumbbell Fly", Strength, Chest),
      Exercise::new("tricep-extension", "Tricep Extension", Strength, Triceps),
      Exercise::new("lateral-raise", "Lateral Raise", Strength, Shoulders),
      Exercise::new("leg-extension", "Leg Extension", Strength, Quadriceps),
      Exercise::new("calf-raise", "Calf Raise", Strength, Calves),
      Exercise::new("hamstring-curl", "Hamstring Curl", Strength, Hamstrings),
      Exercise::new("glute-bridge", "Glute Bridge", Strength, Glutes),
      Exercise::new("lat-pulldown", "Lat Pulldown", Strength, Back),
      // Unloaded
      Exercise::new("bicep-curl", "Bicep Curl", Strength, Biceps),
      Exercise::new("plank", "Plank", Strength, Core),
      Exercise::new("box-jump", "Box Jump", Plyometric, Legs),
      Exercise::new("depth-jump", "Depth Jump", Plyometric, Legs),
      Exercise::new("lane-agility", "Lane Agility Drill", Conditioning, Legs),
      Exercise::new("suicides", "Suicides", Conditioning, FullBody),
      Exercise::new("defensive-slides", "Defensive Slides", Skill, Legs),
      Exercise::new("hip-mobility-flow", "Hip Mobility Flow", Mobility, Glutes),
    ])
  }

  pub fn get(&self, id: &str) -> Option<&Exercise> {
    self.exercises.get(id)
  }

  /// Display name, falling back to the raw id for exercises no longer in the library
  pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
    self.get(id).map(|e| e.name.as_str()).unwrap_or(id)
  }

  pub fn insert(&mut self, exercise: Exercise) {
    self.exercises.insert(exercise.id.clone(), exercise);
  }

  pub fn len(&self) -> usize {
    self.exercises.len()
  }

  pub fn is_empty(&self) -> bool {
    self.exercises.is_empty()
  }

  /// Exercises sorted by name
  pub fn list(&self) -> Vec<&Exercise> {
    let mut list: Vec<_> = self.exercises.values().collect();
    list.sort_by(|a, b| a.name.cmp(&b.name));
    list
  }
}
