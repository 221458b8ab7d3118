// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal service: CRUD over a user's fitness goals.

use chrono::{DateTime, NaiveDate, Utc};

use crate::db::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::{CreateGoalRequest, Goal, GoalStatus, Patch, UpdateGoalRequest};

#[derive(Clone)]
pub struct GoalService {
    db: DocumentStore,
}

impl GoalService {
    pub fn new(db: DocumentStore) -> Self {
        Self { db }
    }

    /// Goals ordered by target date, optionally restricted to one status.
    pub async fn list(&self, user_id: &str, status: Option<GoalStatus>) -> Result<Vec<Goal>> {
        let mut goals = self.db.query_goals(user_id).await?;
        if let Some(status) = status {
            goals.retain(|g| g.status == status);
        }
        goals.sort_by(|a, b| a.target_date.cmp(&b.target_date));
        Ok(goals)
    }

    pub async fn get(&self, goal_id: &str, user_id: &str) -> Result<Goal> {
        let goal = self
            .db
            .get_goal(goal_id)
            .await?
            .ok_or(AppError::GoalNotFound)?;

        if goal.user_id != user_id {
            tracing::warn!(goal_id, user_id, "Rejected cross-user goal access");
            return Err(AppError::Forbidden(
                "Not authorized to access this goal".to_string(),
            ));
        }
        Ok(goal)
    }

    /// Create a goal. New goals start active unless the current value
    /// already meets the target.
    pub async fn create(
        &self,
        user_id: &str,
        req: CreateGoalRequest,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Goal> {
        validate_target(req.target_value)?;
        validate_unit(&req.unit)?;
        if !req.current_value.is_finite() || req.current_value < 0.0 {
            return Err(AppError::InvalidData(
                "currentValue must not be negative".to_string(),
            ));
        }
        if req.current_value > req.target_value {
            return Err(AppError::InvalidData(
                "currentValue cannot exceed targetValue".to_string(),
            ));
        }
        validate_target_date(req.target_date, today)?;

        let mut goal = Goal {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            goal_type: req.goal_type,
            title: req.title.filter(|t| !t.trim().is_empty()),
            target_value: req.target_value,
            current_value: 0.0,
            unit: req.unit.trim().to_string(),
            target_date: req.target_date,
            status: GoalStatus::Active,
            created_at: now,
            updated_at: now,
        };
        goal.set_progress(req.current_value);

        self.db.set_goal(&goal).await?;

        tracing::info!(user_id, goal_id = %goal.id, goal_type = %goal.goal_type, "Created goal");

        Ok(goal)
    }

    pub async fn update(
        &self,
        goal_id: &str,
        user_id: &str,
        req: UpdateGoalRequest,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Goal> {
        let mut goal = self.get(goal_id, user_id).await?;

        match req.title {
            Patch::Missing => {}
            Patch::Null => goal.title = None,
            Patch::Value(t) => {
                goal.title = Some(t).filter(|t| !t.trim().is_empty());
            }
        }
        if let Some(target) = req.target_value.value() {
            validate_target(target)?;
            goal.target_value = target;
        }
        if let Some(unit) = req.unit.value() {
            validate_unit(&unit)?;
            goal.unit = unit.trim().to_string();
        }
        if let Some(date) = req.target_date.value() {
            validate_target_date(date, today)?;
            goal.target_date = date;
        }
        if let Some(status) = req.status.value() {
            goal.status = status;
        }
        if let Some(progress) = req.current_value.value() {
            if goal.status.is_terminal() {
                return Err(AppError::InvalidData(format!(
                    "Cannot record progress on a goal that is {}",
                    status_name(goal.status)
                )));
            }
            if !progress.is_finite() || progress < 0.0 {
                return Err(AppError::InvalidData(
                    "currentValue must not be negative".to_string(),
                ));
            }
            goal.current_value = progress;
        }
        // A lowered target can be met by progress already recorded.
        if goal.status == GoalStatus::Active {
            goal.set_progress(goal.current_value);
        }
        goal.updated_at = now;

        self.db.set_goal(&goal).await?;

        tracing::info!(user_id, goal_id, status = status_name(goal.status), "Updated goal");

        Ok(goal)
    }

    pub async fn delete(&self, goal_id: &str, user_id: &str) -> Result<()> {
        self.get(goal_id, user_id).await?;
        self.db.delete_goal(goal_id).await?;

        tracing::info!(user_id, goal_id, "Deleted goal");
        Ok(())
    }
}

fn validate_target(target: f64) -> Result<()> {
    if !target.is_finite() || target <= 0.0 {
        return Err(AppError::InvalidData(
            "targetValue must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_unit(unit: &str) -> Result<()> {
    if unit.trim().is_empty() {
        return Err(AppError::InvalidData("unit is required".to_string()));
    }
    Ok(())
}

fn validate_target_date(date: NaiveDate, today: NaiveDate) -> Result<()> {
    if date < today {
        return Err(AppError::InvalidData(
            "targetDate cannot be in the past".to_string(),
        ));
    }
    Ok(())
}

fn status_name(status: GoalStatus) -> &'static str {
    match status {
        GoalStatus::Active => "active",
        GoalStatus::Achieved => "achieved",
        GoalStatus::Abandoned => "abandoned",
    }
}
