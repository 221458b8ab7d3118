// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-side access to scheduled workouts for the dashboard.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::workout::UpcomingWorkout;
use crate::models::ScheduledWorkout;

pub const DEFAULT_UPCOMING_LIMIT: u32 = 5;
pub const MAX_UPCOMING_LIMIT: u32 = 50;

/// Name shown when neither the entry nor its template has one.
const FALLBACK_NAME: &str = "Workout";

#[derive(Clone)]
pub struct WorkoutService {
    db: DocumentStore,
}

impl WorkoutService {
    pub fn new(db: DocumentStore) -> Self {
        Self { db }
    }

    /// The user's next scheduled workouts, soonest first.
    pub async fn upcoming(
        &self,
        user_id: &str,
        limit: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<Vec<UpcomingWorkout>> {
        let limit = limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
        if !(1..=MAX_UPCOMING_LIMIT).contains(&limit) {
            return Err(AppError::InvalidData(format!(
                "limit must be between 1 and {}",
                MAX_UPCOMING_LIMIT
            )));
        }

        let scheduled = self.db.query_scheduled_workouts(user_id, now, limit).await?;

        let mut template_names: HashMap<String, Option<String>> = HashMap::new();
        let mut upcoming = Vec::with_capacity(scheduled.len());
        for workout in scheduled {
            let template_name = match &workout.workout_id {
                Some(id) => match template_names.get(id) {
                    Some(name) => name.clone(),
                    None => {
                        let name = self.template_name(id, user_id).await?;
                        template_names.insert(id.clone(), name.clone());
                        name
                    }
                },
                None => None,
            };
            upcoming.push(display(workout, template_name));
        }

        Ok(upcoming)
    }

    pub async fn get(&self, id: &str, user_id: &str) -> Result<UpcomingWorkout> {
        let workout = self
            .db
            .get_scheduled_workout(id)
            .await?
            .ok_or(AppError::WorkoutNotFound)?;

        if workout.user_id != user_id {
            tracing::warn!(id, user_id, "Rejected cross-user workout access");
            return Err(AppError::Forbidden(
                "Not authorized to access this workout".to_string(),
            ));
        }

        let template_name = match &workout.workout_id {
            Some(template_id) => self.template_name(template_id, user_id).await?,
            None => None,
        };
        Ok(display(workout, template_name))
    }

    /// Name of a template the user owns.
    async fn template_name(&self, template_id: &str, user_id: &str) -> Result<Option<String>> {
        let template = self.db.get_workout_template(template_id).await?;
        Ok(template
            .filter(|t| t.user_id == user_id)
            .map(|t| t.name)
            .filter(|n| !n.trim().is_empty()))
    }
}

fn display(workout: ScheduledWorkout, template_name: Option<String>) -> UpcomingWorkout {
    let name = workout
        .name
        .filter(|n| !n.trim().is_empty())
        .or(template_name)
        .unwrap_or_else(|| FALLBACK_NAME.to_string());

    UpcomingWorkout {
        id: workout.id,
        name,
        scheduled_for: workout.scheduled_for,
        workout_id: workout.workout_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkoutTemplate;
    use chrono::Duration;

    fn scheduled(id: &str, name: Option<&str>, in_hours: i64, template: Option<&str>) -> ScheduledWorkout {
        ScheduledWorkout {
            id: id.to_string(),
            user_id: "u1".to_string(),
            name: name.map(str::to_string),
            scheduled_for: Utc::now() + Duration::hours(in_hours),
            workout_id: template.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_upcoming_resolves_display_names() {
        let db = DocumentStore::in_memory();
        db.set_workout_template(&WorkoutTemplate {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            name: "Leg Day".to_string(),
        })
        .await
        .unwrap();

        db.set_scheduled_workout(&scheduled("past", Some("Old"), -2, None)).await.unwrap();
        db.set_scheduled_workout(&scheduled("a", Some("Morning Run"), 1, Some("t1"))).await.unwrap();
        db.set_scheduled_workout(&scheduled("b", None, 2, Some("t1"))).await.unwrap();
        db.set_scheduled_workout(&scheduled("c", None, 3, None)).await.unwrap();

        let svc = WorkoutService::new(db);
        let upcoming = svc.upcoming("u1", None, Utc::now()).await.unwrap();
        let names: Vec<&str> = upcoming.iter().map(|w| w.name.as_str()).collect();

        assert_eq!(names, vec!["Morning Run", "Leg Day", "Workout"]);

        let one = svc.upcoming("u1", Some(1), Utc::now()).await.unwrap();
        assert_eq!(one.len(), 1);

        assert!(matches!(
            svc.upcoming("u1", Some(0), Utc::now()).await,
            Err(AppError::InvalidData(_))
        ));
    }

    #[tokio::test]
    async fn test_get_checks_ownership() {
        let db = DocumentStore::in_memory();
        db.set_scheduled_workout(&scheduled("a", None, 1, None)).await.unwrap();
        let svc = WorkoutService::new(db);

        assert_eq!(svc.get("a", "u1").await.unwrap().name, "Workout");
        assert!(matches!(svc.get("a", "u2").await, Err(AppError::Forbidden(_))));
        assert!(matches!(svc.get("zzz", "u1").await, Err(AppError::WorkoutNotFound)));
    }
}
