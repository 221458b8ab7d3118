//! Database layer (document store).
//!
//! `DocumentStore` fronts either Firestore or an in-process store with the
//! same typed operations. Both backends enforce "at most one nutrition log
//! per user per UTC day" through a day-claim record written atomically with
//! the log.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{Goal, NutritionLog, ScheduledWorkout, WorkoutTemplate};

/// Collection names as constants.
pub mod collections {
    pub const NUTRITION_LOGS: &str = "nutrition_logs";
    /// One document per (user, UTC day) holding the id of that day's log
    pub const NUTRITION_LOG_DAYS: &str = "nutrition_log_days";
    pub const GOALS: &str = "goals";
    pub const SCHEDULED_WORKOUTS: &str = "scheduled_workouts";
    pub const WORKOUTS: &str = "workouts";
}

/// Uniqueness claim for a user's calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogDayClaim {
    pub user_id: String,
    /// "YYYY-MM-DD"
    pub day: String,
    pub log_id: String,
}

/// Document ID of the claim for `user_id` on `day`.
pub fn day_claim_id(user_id: &str, day: &str) -> String {
    format!("{}_{}", urlencoding::encode(user_id), day)
}

/// Inclusive bounds on a log's stored date.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Document store handle shared by all services.
#[derive(Clone)]
pub enum DocumentStore {
    Firestore(FirestoreDb),
    Memory(MemoryStore),
}

impl DocumentStore {
    /// Connect to Firestore (or the emulator if FIRESTORE_EMULATOR_HOST is set).
    pub async fn connect(project_id: &str) -> Result<Self, AppError> {
        Ok(Self::Firestore(FirestoreDb::new(project_id).await?))
    }

    pub fn in_memory() -> Self {
        Self::Memory(MemoryStore::default())
    }

    // ─── Nutrition Logs ──────────────────────────────────────────

    /// All of a user's logs within `range`, newest first.
    pub async fn query_logs(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<NutritionLog>, AppError> {
        match self {
            Self::Firestore(db) => db.query_logs(user_id, range).await,
            Self::Memory(db) => Ok(db.query_logs(user_id, range)),
        }
    }

    pub async fn get_log(&self, log_id: &str) -> Result<Option<NutritionLog>, AppError> {
        match self {
            Self::Firestore(db) => db.get_log(log_id).await,
            Self::Memory(db) => Ok(db.get_log(log_id)),
        }
    }

    /// The user's log dated within `[from, to)`, if any.
    pub async fn find_log_between(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Option<NutritionLog>, AppError> {
        match self {
            Self::Firestore(db) => db.find_log_between(user_id, from, to).await,
            Self::Memory(db) => Ok(db.find_log_between(user_id, from, to)),
        }
    }

    /// Store a new log and claim its day.
    ///
    /// Fails with `AppError::LogExists` if the day is already claimed.
    pub async fn insert_log(&self, log: &NutritionLog) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.insert_log(log).await,
            Self::Memory(db) => db.insert_log(log),
        }
    }

    /// Overwrite an existing log. When its day changed from `previous_day`
    /// the claim moves with it (or `AppError::LogExists` if taken).
    pub async fn update_log(&self, log: &NutritionLog, previous_day: &str) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.update_log(log, previous_day).await,
            Self::Memory(db) => db.update_log(log, previous_day),
        }
    }

    /// Delete a log and release its day claim.
    pub async fn delete_log(&self, log: &NutritionLog) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.delete_log(log).await,
            Self::Memory(db) => {
                db.delete_log(log);
                Ok(())
            }
        }
    }

    /// Id of the log holding the user's claim on `day`.
    pub async fn get_day_claim(&self, user_id: &str, day: &str) -> Result<Option<String>, AppError> {
        match self {
            Self::Firestore(db) => db.get_day_claim(user_id, day).await,
            Self::Memory(db) => Ok(db.get_day_claim(user_id, day)),
        }
    }

    // ─── Goals ───────────────────────────────────────────────────

    pub async fn query_goals(&self, user_id: &str) -> Result<Vec<Goal>, AppError> {
        match self {
            Self::Firestore(db) => db.query_goals(user_id).await,
            Self::Memory(db) => Ok(db.query_goals(user_id)),
        }
    }

    pub async fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>, AppError> {
        match self {
            Self::Firestore(db) => db.get_goal(goal_id).await,
            Self::Memory(db) => Ok(db.get_goal(goal_id)),
        }
    }

    pub async fn set_goal(&self, goal: &Goal) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.set_goal(goal).await,
            Self::Memory(db) => {
                db.set_goal(goal);
                Ok(())
            }
        }
    }

    pub async fn delete_goal(&self, goal_id: &str) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.delete_goal(goal_id).await,
            Self::Memory(db) => {
                db.delete_goal(goal_id);
                Ok(())
            }
        }
    }

    // ─── Workouts ────────────────────────────────────────────────

    /// Scheduled workouts at or after `after`, soonest first.
    pub async fn query_scheduled_workouts(
        &self,
        user_id: &str,
        after: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<ScheduledWorkout>, AppError> {
        match self {
            Self::Firestore(db) => db.query_scheduled_workouts(user_id, after, limit).await,
            Self::Memory(db) => Ok(db.query_scheduled_workouts(user_id, after, limit)),
        }
    }

    pub async fn get_scheduled_workout(
        &self,
        id: &str,
    ) -> Result<Option<ScheduledWorkout>, AppError> {
        match self {
            Self::Firestore(db) => db.get_scheduled_workout(id).await,
            Self::Memory(db) => Ok(db.get_scheduled_workout(id)),
        }
    }

    pub async fn set_scheduled_workout(&self, workout: &ScheduledWorkout) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.set_scheduled_workout(workout).await,
            Self::Memory(db) => {
                db.set_scheduled_workout(workout);
                Ok(())
            }
        }
    }

    pub async fn get_workout_template(
        &self,
        id: &str,
    ) -> Result<Option<WorkoutTemplate>, AppError> {
        match self {
            Self::Firestore(db) => db.get_workout_template(id).await,
            Self::Memory(db) => Ok(db.get_workout_template(id)),
        }
    }

    pub async fn set_workout_template(&self, template: &WorkoutTemplate) -> Result<(), AppError> {
        match self {
            Self::Firestore(db) => db.set_workout_template(template).await,
            Self::Memory(db) => {
                db.set_workout_template(template);
                Ok(())
            }
        }
    }
}
