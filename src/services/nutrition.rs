// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nutrition log service.
//!
//! Owns the business rules around daily logs: one log per user per UTC day,
//! no future-dated logs, ownership checks, derived totals, and the
//! find-or-create water intake upsert.

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::config::DayBoundary;
use crate::db::{DateRange, DocumentStore};
use crate::error::{AppError, Result};
use crate::models::nutrition::{
    CreateLogRequest, MealInput, UpdateLogRequest, UpdateMealRequest, WaterIntakeRequest,
};
use crate::models::{Meal, NutritionLog, NutritionStats};
use crate::response::Pagination;
use crate::time_utils::{day_window, offset_day, parse_client_date, start_of_utc_day};

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// One page of a user's logs.
#[derive(Debug)]
pub struct LogPage {
    pub logs: Vec<NutritionLog>,
    pub pagination: Pagination,
}

#[derive(Clone)]
pub struct NutritionService {
    db: DocumentStore,
    water_day_boundary: DayBoundary,
}

impl NutritionService {
    pub fn new(db: DocumentStore, water_day_boundary: DayBoundary) -> Self {
        Self {
            db,
            water_day_boundary,
        }
    }

    /// Page through a user's logs, newest first.
    pub async fn list(
        &self,
        user_id: &str,
        range: DateRange,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<LogPage> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if page == 0 {
            return Err(AppError::InvalidData("page must be at least 1".to_string()));
        }
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(AppError::InvalidData(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }

        let all = self.db.query_logs(user_id, range).await?;
        let pagination = Pagination::new(page, limit, all.len());
        let logs: Vec<NutritionLog> = all
            .into_iter()
            .skip(pagination.offset())
            .take(limit as usize)
            .collect();

        tracing::debug!(user_id, page, limit, total = pagination.total, "Listed nutrition logs");

        Ok(LogPage { logs, pagination })
    }

    pub async fn get(&self, log_id: &str, user_id: &str) -> Result<NutritionLog> {
        self.load_owned(log_id, user_id, "access").await
    }

    /// Create the log for a past or present UTC day.
    pub async fn create(
        &self,
        user_id: &str,
        req: CreateLogRequest,
        now: DateTime<Utc>,
    ) -> Result<NutritionLog> {
        req.validate()?;

        let raw_date = req
            .date
            .as_deref()
            .ok_or_else(|| AppError::InvalidData("Date is required".to_string()))?;
        let date = normalize_log_date(raw_date, now)?;

        let mut log = NutritionLog::new(user_id, date, now);
        if let Some(inputs) = req.meals {
            log.meals = build_meals(inputs, now)?;
        }
        log.water_intake = req.water_intake.unwrap_or(0.0);
        log.notes = req.notes.unwrap_or_default();
        log.touch(now);

        self.db.insert_log(&log).await?;

        tracing::info!(user_id, log_id = %log.id, day = %log.day_key(), "Created nutrition log");

        Ok(log)
    }

    /// Apply a partial update. Changing `date` moves the log to another day,
    /// subject to the same rules as creation.
    pub async fn update(
        &self,
        log_id: &str,
        user_id: &str,
        req: UpdateLogRequest,
        now: DateTime<Utc>,
    ) -> Result<NutritionLog> {
        let mut log = self.load_owned(log_id, user_id, "update").await?;
        let previous_day = log.day_key();

        if let Some(raw_date) = req.date.value() {
            log.date = normalize_log_date(&raw_date, now)?;
        }
        if let Some(inputs) = req.meals.value() {
            log.meals = build_meals(inputs, now)?;
        }
        if req.water_intake.as_value().is_some_and(|v| *v < 0.0) {
            return Err(AppError::InvalidData(
                "waterIntake must not be negative".to_string(),
            ));
        }
        req.water_intake.apply_or_clear(&mut log.water_intake, 0.0);
        req.notes.apply_or_clear(&mut log.notes, String::new());

        log.touch(now);
        self.db.update_log(&log, &previous_day).await?;

        tracing::info!(user_id, log_id, "Updated nutrition log");

        Ok(log)
    }

    pub async fn delete(&self, log_id: &str, user_id: &str) -> Result<()> {
        let log = self.load_owned(log_id, user_id, "delete").await?;
        self.db.delete_log(&log).await?;

        tracing::info!(user_id, log_id, "Deleted nutrition log");
        Ok(())
    }

    /// Append a meal; returns the new meal and the updated log.
    pub async fn add_meal(
        &self,
        log_id: &str,
        user_id: &str,
        input: MealInput,
        now: DateTime<Utc>,
    ) -> Result<(Meal, NutritionLog)> {
        input.validate()?;
        let meal = input.into_meal(now).ok_or_else(meal_required_fields)?;

        let mut log = self.load_owned(log_id, user_id, "update").await?;
        log.meals.push(meal.clone());
        log.touch(now);

        let day = log.day_key();
        self.db.update_log(&log, &day).await?;

        tracing::info!(user_id, log_id, meal_id = %meal.id, "Added meal");

        Ok((meal, log))
    }

    pub async fn update_meal(
        &self,
        log_id: &str,
        meal_id: &str,
        user_id: &str,
        req: UpdateMealRequest,
        now: DateTime<Utc>,
    ) -> Result<(Meal, NutritionLog)> {
        let mut log = self.load_owned(log_id, user_id, "update").await?;
        let idx = log.meal_index(meal_id).ok_or(AppError::MealNotFound)?;

        if let Some(foods) = req.foods.as_value() {
            if foods.is_empty() {
                return Err(meal_required_fields());
            }
            for food in foods {
                food.validate()?;
            }
        }

        let meal = &mut log.meals[idx];
        if let Some(meal_type) = req.meal_type.value() {
            meal.meal_type = meal_type;
        }
        if let Some(time) = req.time.value() {
            meal.time = time;
        }
        if let Some(foods) = req.foods.value() {
            meal.foods = foods;
        }
        req.notes.apply_or_clear(&mut meal.notes, String::new());
        let meal = meal.clone();

        log.touch(now);
        let day = log.day_key();
        self.db.update_log(&log, &day).await?;

        tracing::info!(user_id, log_id, meal_id, "Updated meal");

        Ok((meal, log))
    }

    pub async fn delete_meal(
        &self,
        log_id: &str,
        meal_id: &str,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<NutritionLog> {
        let mut log = self.load_owned(log_id, user_id, "update").await?;
        let idx = log.meal_index(meal_id).ok_or(AppError::MealNotFound)?;
        log.meals.remove(idx);
        log.touch(now);

        let day = log.day_key();
        self.db.update_log(&log, &day).await?;

        tracing::info!(user_id, log_id, meal_id, "Deleted meal");

        Ok(log)
    }

    /// Set the water intake for the day containing `req.date` (default now),
    /// creating that day's log if it does not exist.
    pub async fn upsert_water_intake(
        &self,
        user_id: &str,
        req: WaterIntakeRequest,
        now: DateTime<Utc>,
    ) -> Result<NutritionLog> {
        let amount = req
            .amount
            .ok_or_else(|| AppError::InvalidData("Water amount is required".to_string()))?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(AppError::InvalidData(
                "Water amount must not be negative".to_string(),
            ));
        }

        let instant = match req.date.as_deref() {
            Some(raw) => parse_client_date(raw)
                .ok_or_else(|| AppError::InvalidData(format!("Invalid date: {}", raw)))?,
            None => now,
        };
        let day = offset_day(instant, self.water_day_boundary.offset_at(instant));
        let (from, to) = day_window(day);

        if let Some(log) = self.db.find_log_between(user_id, from, to).await? {
            return self.set_water(log, amount, now).await;
        }

        let mut log = NutritionLog::new(user_id, day, now);
        log.water_intake = amount;
        log.touch(now);

        match self.db.insert_log(&log).await {
            Ok(()) => {
                tracing::info!(user_id, log_id = %log.id, amount, "Created log for water intake");
                Ok(log)
            }
            // Lost a race for this day's claim.
            Err(AppError::LogExists { existing_log_id }) => {
                let existing = self
                    .db
                    .get_log(&existing_log_id)
                    .await?
                    .ok_or(AppError::LogNotFound)?;
                self.set_water(existing, amount, now).await
            }
            Err(e) => Err(e),
        }
    }

    /// Aggregate views over the user's logs in `range`.
    pub async fn stats(&self, user_id: &str, range: DateRange) -> Result<NutritionStats> {
        let logs = self.db.query_logs(user_id, range).await?;
        tracing::debug!(user_id, logs = logs.len(), "Computing nutrition stats");
        Ok(NutritionStats::from_logs(&logs))
    }

    // ─── Helpers ─────────────────────────────────────────────────

    async fn load_owned(&self, log_id: &str, user_id: &str, action: &str) -> Result<NutritionLog> {
        let log = self
            .db
            .get_log(log_id)
            .await?
            .ok_or(AppError::LogNotFound)?;

        if log.user_id != user_id {
            tracing::warn!(log_id, user_id, owner = %log.user_id, "Rejected cross-user log access");
            return Err(AppError::Forbidden(format!(
                "Not authorized to {} this nutrition log",
                action
            )));
        }
        Ok(log)
    }

    async fn set_water(
        &self,
        mut log: NutritionLog,
        amount: f64,
        now: DateTime<Utc>,
    ) -> Result<NutritionLog> {
        log.water_intake = amount;
        log.touch(now);

        let day = log.day_key();
        self.db.update_log(&log, &day).await?;

        tracing::info!(user_id = %log.user_id, log_id = %log.id, amount, "Updated water intake");
        Ok(log)
    }
}

/// Parse, truncate to UTC midnight and reject days after today.
fn normalize_log_date(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let parsed = parse_client_date(raw)
        .ok_or_else(|| AppError::InvalidData(format!("Invalid date: {}", raw)))?;
    let date = start_of_utc_day(parsed);
    if date > start_of_utc_day(now) {
        return Err(AppError::FutureDate);
    }
    Ok(date)
}

fn build_meals(inputs: Vec<MealInput>, now: DateTime<Utc>) -> Result<Vec<Meal>> {
    inputs
        .into_iter()
        .map(|input| {
            input.validate()?;
            input.into_meal(now).ok_or_else(meal_required_fields)
        })
        .collect()
}

fn meal_required_fields() -> AppError {
    AppError::InvalidData("Meal type and at least one food item are required".to_string())
}
