// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness goal model for storage and API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Patch;

#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// What a goal measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Weight,
    Strength,
    Endurance,
    Habit,
    Nutrition,
    Custom,
}

impl GoalType {
    /// Unit suggested when this type is picked.
    pub fn default_unit(&self) -> &'static str {
        match self {
            GoalType::Weight => "kg",
            GoalType::Strength => "lbs",
            GoalType::Endurance => "min",
            GoalType::Habit => "sessions",
            GoalType::Nutrition => "calories",
            GoalType::Custom => "",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GoalType::Weight => "weight",
            GoalType::Strength => "strength",
            GoalType::Endurance => "endurance",
            GoalType::Habit => "habit",
            GoalType::Nutrition => "nutrition",
            GoalType::Custom => "custom",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Achieved,
    Abandoned,
}

impl GoalStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GoalStatus::Achieved | GoalStatus::Abandoned)
    }
}

/// Stored goal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub target_value: f64,
    #[serde(default)]
    pub current_value: f64,
    pub unit: String,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    /// Record progress; reaching the target marks the goal achieved.
    pub fn set_progress(&mut self, value: f64) {
        self.current_value = value;
        if self.current_value >= self.target_value {
            self.status = GoalStatus::Achieved;
        }
    }
}

/// Body of `POST /api/goals` (also what the wizard submits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    #[serde(rename = "type")]
    pub goal_type: GoalType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub target_value: f64,
    #[serde(default)]
    pub current_value: f64,
    pub unit: String,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub status: GoalStatus,
}

/// Body of `PUT /api/goals/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGoalRequest {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub target_value: Patch<f64>,
    #[serde(default)]
    pub current_value: Patch<f64>,
    #[serde(default)]
    pub unit: Patch<String>,
    #[serde(default)]
    pub target_date: Patch<NaiveDate>,
    #[serde(default)]
    pub status: Patch<GoalStatus>,
}
