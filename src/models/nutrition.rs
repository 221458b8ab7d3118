// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nutrition log, meal and food models for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Patch;
use crate::time_utils::format_day;

#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Kind of eating occasion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Other,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
            MealType::Other => "other",
        }
    }
}

/// One food entry within a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub calories: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub protein: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub carbs: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<String>,
}

/// A meal stored inside its parent nutrition log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    /// Unique within the owning log
    pub id: String,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub time: DateTime<Utc>,
    pub foods: Vec<FoodItem>,
    #[serde(default)]
    pub notes: String,
}

impl Meal {
    /// Build a meal with a fresh id; `time` defaults to `now`.
    pub fn new(
        meal_type: MealType,
        time: Option<DateTime<Utc>>,
        foods: Vec<FoodItem>,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            meal_type,
            time: time.unwrap_or(now),
            foods,
            notes: notes.unwrap_or_default(),
        }
    }

    /// Sum of the calories of every food in this meal.
    pub fn calories(&self) -> f64 {
        self.foods.iter().map(|f| f.calories).sum()
    }
}

/// One user's nutrition record for one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct NutritionLog {
    /// Document ID
    pub id: String,
    /// Owner
    pub user_id: String,
    /// Midnight of the logged day (UTC for logs created through `create`)
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub meals: Vec<Meal>,
    #[serde(default)]
    pub water_intake: f64,
    #[serde(default)]
    pub notes: String,

    // ─── Derived totals (recomputed before every write) ──────────
    #[serde(default)]
    pub total_calories: f64,
    #[serde(default)]
    pub total_protein: f64,
    #[serde(default)]
    pub total_carbs: f64,
    #[serde(default)]
    pub total_fat: f64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NutritionLog {
    pub fn new(user_id: &str, date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            date,
            meals: Vec::new(),
            water_intake: 0.0,
            notes: String::new(),
            total_calories: 0.0,
            total_protein: 0.0,
            total_carbs: 0.0,
            total_fat: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Key of the uniqueness constraint: the UTC calendar day of `date`.
    pub fn day_key(&self) -> String {
        format_day(self.date)
    }

    /// Recompute the derived totals from the meal list.
    pub fn recompute_totals(&mut self) {
        let foods = self.meals.iter().flat_map(|m| m.foods.iter());

        let (mut calories, mut protein, mut carbs, mut fat) = (0.0, 0.0, 0.0, 0.0);
        for food in foods {
            calories += food.calories;
            protein += food.protein;
            carbs += food.carbs;
            fat += food.fat;
        }

        self.total_calories = calories;
        self.total_protein = protein;
        self.total_carbs = carbs;
        self.total_fat = fat;
    }

    /// Stamp `updated_at` and refresh totals ahead of a write.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.recompute_totals();
        self.updated_at = now;
    }

    pub fn meal_index(&self, meal_id: &str) -> Option<usize> {
        self.meals.iter().position(|m| m.id == meal_id)
    }
}

// ─── Request payloads ────────────────────────────────────────

/// Meal as supplied by a client (no id yet).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MealInput {
    #[serde(rename = "type")]
    pub meal_type: Option<MealType>,
    pub time: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub foods: Option<Vec<FoodItem>>,
    pub notes: Option<String>,
}

impl MealInput {
    /// Require a type and at least one food, then build the meal.
    pub fn into_meal(self, now: DateTime<Utc>) -> Option<Meal> {
        let meal_type = self.meal_type?;
        let foods = self.foods.filter(|f| !f.is_empty())?;
        Some(Meal::new(meal_type, self.time, foods, self.notes, now))
    }
}

/// Body of `POST /api/nutrition/logs`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogRequest {
    pub date: Option<String>,
    #[validate(nested)]
    pub meals: Option<Vec<MealInput>>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub water_intake: Option<f64>,
    pub notes: Option<String>,
}

/// Body of `PUT /api/nutrition/logs/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLogRequest {
    #[serde(default)]
    pub date: Patch<String>,
    #[serde(default)]
    pub meals: Patch<Vec<MealInput>>,
    #[serde(default)]
    pub water_intake: Patch<f64>,
    #[serde(default)]
    pub notes: Patch<String>,
}

/// Body of `PUT /api/nutrition/logs/:id/meals/:mealId`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealRequest {
    #[serde(default, rename = "type")]
    pub meal_type: Patch<MealType>,
    #[serde(default)]
    pub time: Patch<DateTime<Utc>>,
    #[serde(default)]
    pub foods: Patch<Vec<FoodItem>>,
    #[serde(default)]
    pub notes: Patch<String>,
}

/// Body of `PATCH /api/nutrition/water`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterIntakeRequest {
    pub date: Option<String>,
    pub amount: Option<f64>,
}
