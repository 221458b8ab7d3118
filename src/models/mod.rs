// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod goal;
pub mod nutrition;
pub mod patch;
pub mod stats;
pub mod workout;

pub use goal::{CreateGoalRequest, Goal, GoalStatus, GoalType, UpdateGoalRequest};
pub use nutrition::{FoodItem, Meal, MealType, NutritionLog};
pub use patch::Patch;
pub use stats::NutritionStats;
pub use workout::{ScheduledWorkout, UpcomingWorkout, WorkoutTemplate};
