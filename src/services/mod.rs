// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod goals;
pub mod nutrition;
pub mod workouts;

pub use goals::GoalService;
pub use nutrition::NutritionService;
pub use workouts::WorkoutService;
