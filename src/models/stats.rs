//! Nutrition statistics computed over a filtered set of logs.
//!
//! Four independent views are produced from one pass over the logs:
//! daily averages, a calorie trend, macro totals and a meal-type breakdown.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{MealType, NutritionLog};
use crate::time_utils::format_day;

#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Means across all matched logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DailyAverages {
    pub avg_calories: f64,
    pub avg_protein: f64,
    pub avg_carbs: f64,
    pub avg_fat: f64,
    pub avg_water_intake: f64,
}

/// Calories logged on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
pub struct CalorieTrendPoint {
    /// "YYYY-MM-DD"
    pub date: String,
    pub calories: f64,
}

/// Macro totals across all matched logs (grams).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
pub struct MacroDistribution {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct MealTypeBucket {
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub count: u32,
    /// Mean calories per meal of this type
    pub avg_calories: f64,
}

/// Response body of `GET /api/nutrition/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct NutritionStats {
    pub daily_averages: Option<DailyAverages>,
    pub calories_trend: Vec<CalorieTrendPoint>,
    pub macro_distribution: Option<MacroDistribution>,
    pub meal_type_distribution: Vec<MealTypeBucket>,
}

#[derive(Default)]
struct MealTypeTally {
    count: u32,
    calories: f64,
}

impl NutritionStats {
    /// Aggregate over `logs`. An empty slice yields nulls and empty lists.
    pub fn from_logs(logs: &[NutritionLog]) -> Self {
        if logs.is_empty() {
            return Self {
                daily_averages: None,
                calories_trend: Vec::new(),
                macro_distribution: None,
                meal_type_distribution: Vec::new(),
            };
        }

        let n = logs.len() as f64;

        let (mut calories, mut protein, mut carbs, mut fat, mut water) = (0.0, 0.0, 0.0, 0.0, 0.0);
        let mut by_type: BTreeMap<MealType, MealTypeTally> = BTreeMap::new();

        for log in logs {
            calories += log.total_calories;
            protein += log.total_protein;
            carbs += log.total_carbs;
            fat += log.total_fat;
            water += log.water_intake;

            for meal in &log.meals {
                let tally = by_type.entry(meal.meal_type).or_default();
                tally.count += 1;
                tally.calories += meal.calories();
            }
        }

        let mut sorted: Vec<&NutritionLog> = logs.iter().collect();
        sorted.sort_by_key(|log| log.date);
        let calories_trend = sorted
            .into_iter()
            .map(|log| CalorieTrendPoint {
                date: format_day(log.date),
                calories: log.total_calories,
            })
            .collect();

        let mut meal_type_distribution: Vec<MealTypeBucket> = by_type
            .into_iter()
            .map(|(meal_type, tally)| MealTypeBucket {
                meal_type,
                count: tally.count,
                avg_calories: tally.calories / tally.count as f64,
            })
            .collect();
        meal_type_distribution.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.meal_type.as_str().cmp(b.meal_type.as_str()))
        });

        Self {
            daily_averages: Some(DailyAverages {
                avg_calories: calories / n,
                avg_protein: protein / n,
                avg_carbs: carbs / n,
                avg_fat: fat / n,
                avg_water_intake: water / n,
            }),
            calories_trend,
            macro_distribution: Some(MacroDistribution {
                protein,
                carbs,
                fat,
            }),
            meal_type_distribution,
        }
    }
}
