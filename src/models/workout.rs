// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout template and scheduled workout models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Reusable workout definition owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTemplate {
    pub id: String,
    pub user_id: String,
    pub name: String,
}

/// A workout placed on the user's calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledWorkout {
    pub id: String,
    pub user_id: String,
    /// Overrides the template name when set
    #[serde(default)]
    pub name: Option<String>,
    pub scheduled_for: DateTime<Utc>,
    /// Referenced workout template
    #[serde(default)]
    pub workout_id: Option<String>,
}

/// Scheduled workout as shown on the dashboard, with its display name resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "client/src/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingWorkout {
    pub id: String,
    pub name: String,
    pub scheduled_for: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_id: Option<String>,
}
