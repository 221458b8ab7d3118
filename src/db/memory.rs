//! In-process document store for tests and local development.
//!
//! Day claims go through `DashMap::entry`, which holds the shard lock while
//! checking and inserting, so concurrent creates for one day cannot both win.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::db::{day_claim_id, DateRange};
use crate::error::AppError;
use crate::models::{Goal, NutritionLog, ScheduledWorkout, WorkoutTemplate};

#[derive(Default)]
struct Collections {
    logs: DashMap<String, NutritionLog>,
    /// claim id -> log id
    log_days: DashMap<String, String>,
    goals: DashMap<String, Goal>,
    scheduled_workouts: DashMap<String, ScheduledWorkout>,
    workouts: DashMap<String, WorkoutTemplate>,
}

/// Cloneable handle to the shared in-memory collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Collections>,
}

impl MemoryStore {
    // ─── Nutrition Logs ──────────────────────────────────────────

    pub fn query_logs(&self, user_id: &str, range: DateRange) -> Vec<NutritionLog> {
        let mut logs: Vec<NutritionLog> = self
            .inner
            .logs
            .iter()
            .filter(|entry| entry.user_id == user_id && range.contains(entry.date))
            .map(|entry| entry.value().clone())
            .collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        logs
    }

    pub fn get_log(&self, log_id: &str) -> Option<NutritionLog> {
        self.inner.logs.get(log_id).map(|entry| entry.value().clone())
    }

    pub fn find_log_between(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Option<NutritionLog> {
        self.inner
            .logs
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.date >= from && entry.date < to)
            .min_by_key(|entry| entry.date)
            .map(|entry| entry.value().clone())
    }

    pub fn get_day_claim(&self, user_id: &str, day: &str) -> Option<String> {
        self.inner
            .log_days
            .get(&day_claim_id(user_id, day))
            .map(|entry| entry.value().clone())
    }

    /// Claim `day` for `log`, or report the log that already holds it.
    fn claim_day(&self, log: &NutritionLog) -> Result<(), AppError> {
        match self.inner.log_days.entry(day_claim_id(&log.user_id, &log.day_key())) {
            Entry::Occupied(existing) if existing.get() != &log.id => Err(AppError::LogExists {
                existing_log_id: existing.get().clone(),
            }),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(log.id.clone());
                Ok(())
            }
        }
    }

    pub fn insert_log(&self, log: &NutritionLog) -> Result<(), AppError> {
        self.claim_day(log)?;
        self.inner.logs.insert(log.id.clone(), log.clone());
        Ok(())
    }

    pub fn update_log(&self, log: &NutritionLog, previous_day: &str) -> Result<(), AppError> {
        if log.day_key() != previous_day {
            self.claim_day(log)?;
            self.inner
                .log_days
                .remove(&day_claim_id(&log.user_id, previous_day));
        }
        self.inner.logs.insert(log.id.clone(), log.clone());
        Ok(())
    }

    pub fn delete_log(&self, log: &NutritionLog) {
        self.inner.logs.remove(&log.id);
        self.inner
            .log_days
            .remove_if(&day_claim_id(&log.user_id, &log.day_key()), |_, id| {
                id == &log.id
            });
    }

    // ─── Goals ───────────────────────────────────────────────────

    pub fn query_goals(&self, user_id: &str) -> Vec<Goal> {
        let mut goals: Vec<Goal> = self
            .inner
            .goals
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        goals.sort_by(|a, b| a.target_date.cmp(&b.target_date));
        goals
    }

    pub fn get_goal(&self, goal_id: &str) -> Option<Goal> {
        self.inner.goals.get(goal_id).map(|entry| entry.value().clone())
    }

    pub fn set_goal(&self, goal: &Goal) {
        self.inner.goals.insert(goal.id.clone(), goal.clone());
    }

    pub fn delete_goal(&self, goal_id: &str) {
        self.inner.goals.remove(goal_id);
    }

    // ─── Workouts ────────────────────────────────────────────────

    pub fn query_scheduled_workouts(
        &self,
        user_id: &str,
        after: DateTime<Utc>,
        limit: u32,
    ) -> Vec<ScheduledWorkout> {
        let mut workouts: Vec<ScheduledWorkout> = self
            .inner
            .scheduled_workouts
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.scheduled_for >= after)
            .map(|entry| entry.value().clone())
            .collect();
        workouts.sort_by(|a, b| a.scheduled_for.cmp(&b.scheduled_for));
        workouts.truncate(limit as usize);
        workouts
    }

    pub fn get_scheduled_workout(&self, id: &str) -> Option<ScheduledWorkout> {
        self.inner
            .scheduled_workouts
            .get(id)
            .map(|entry| entry.value().clone())
    }

    pub fn set_scheduled_workout(&self, workout: &ScheduledWorkout) {
        self.inner
            .scheduled_workouts
            .insert(workout.id.clone(), workout.clone());
    }

    pub fn get_workout_template(&self, id: &str) -> Option<WorkoutTemplate> {
        self.inner.workouts.get(id).map(|entry| entry.value().clone())
    }

    pub fn set_workout_template(&self, template: &WorkoutTemplate) {
        self.inner
            .workouts
            .insert(template.id.clone(), template.clone());
    }
}
