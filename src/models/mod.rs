pub mod player;
pub mod workout;

pub use player::{BaseLift, PhysicalData, Player, RmProfile, ValidationError};
pub use workout::{
  ActualPerformance, PerformedBlock, PerformedExercise, PlannedExercise, WorkoutBlock, WorkoutPlan,
};
