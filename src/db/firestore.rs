// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Nutrition logs (plus their per-day uniqueness claims)
//! - Goals
//! - Scheduled workouts and workout templates

use chrono::{DateTime, Utc};
use firestore::{FirestoreQueryDirection, FirestoreWritePrecondition};

use crate::db::{collections, day_claim_id, DateRange, LogDayClaim};
use crate::error::AppError;
use crate::models::{Goal, NutritionLog, ScheduledWorkout, WorkoutTemplate};
use crate::time_utils::format_utc_rfc3339;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── Nutrition Log Operations ────────────────────────────────

    pub async fn query_logs(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<NutritionLog>, AppError> {
        let user_id = user_id.to_string();
        let start = range.start.map(format_utc_rfc3339);
        let end = range.end.map(format_utc_rfc3339);

        self.client
            .fluent()
            .select()
            .from(collections::NUTRITION_LOGS)
            .filter(move |q| {
                q.for_all([
                    q.field("userId").eq(user_id.clone()),
                    start
                        .clone()
                        .and_then(|s| q.field("date").greater_than_or_equal(s)),
                    end.clone().and_then(|e| q.field("date").less_than_or_equal(e)),
                ])
            })
            .order_by([("date", FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_log(&self, log_id: &str) -> Result<Option<NutritionLog>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::NUTRITION_LOGS)
            .obj()
            .one(log_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn find_log_between(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Option<NutritionLog>, AppError> {
        let user_id = user_id.to_string();
        let from = format_utc_rfc3339(from);
        let to = format_utc_rfc3339(to);

        let mut logs: Vec<NutritionLog> = self
            .client
            .fluent()
            .select()
            .from(collections::NUTRITION_LOGS)
            .filter(move |q| {
                q.for_all([
                    q.field("userId").eq(user_id.clone()),
                    q.field("date").greater_than_or_equal(from.clone()),
                    q.field("date").less_than(to.clone()),
                ])
            })
            .order_by([("date", FirestoreQueryDirection::Ascending)])
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(logs.pop())
    }

    pub async fn get_day_claim(&self, user_id: &str, day: &str) -> Result<Option<String>, AppError> {
        let claim: Option<LogDayClaim> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::NUTRITION_LOG_DAYS)
            .obj()
            .one(&day_claim_id(user_id, day))
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(claim.map(|c| c.log_id))
    }

    /// Add a create-only write of the day claim for `log` to `transaction`.
    fn claim_day_in_transaction(
        &self,
        log: &NutritionLog,
        transaction: &mut firestore::FirestoreTransaction<'_>,
    ) -> Result<(), AppError> {
        let day = log.day_key();
        let claim = LogDayClaim {
            user_id: log.user_id.clone(),
            day: day.clone(),
            log_id: log.id.clone(),
        };

        self.client
            .fluent()
            .update()
            .in_col(collections::NUTRITION_LOG_DAYS)
            .precondition(FirestoreWritePrecondition::Exists(false))
            .document_id(day_claim_id(&log.user_id, &day))
            .object(&claim)
            .add_to_transaction(transaction)
            .map_err(|e| AppError::Database(format!("Failed to add day claim to transaction: {}", e)))?;

        Ok(())
    }

    /// Translate a failed claim commit into `LogExists` when the day is taken.
    async fn claim_conflict(
        &self,
        log: &NutritionLog,
        err: impl std::fmt::Display,
    ) -> AppError {
        match self.get_day_claim(&log.user_id, &log.day_key()).await {
            Ok(Some(existing_log_id)) if existing_log_id != log.id => {
                AppError::LogExists { existing_log_id }
            }
            _ => AppError::Database(format!("Transaction commit failed: {}", err)),
        }
    }

    /// Atomically store a new log together with its day claim.
    pub async fn insert_log(&self, log: &NutritionLog) -> Result<(), AppError> {
        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        self.claim_day_in_transaction(log, &mut transaction)?;

        self.client
            .fluent()
            .update()
            .in_col(collections::NUTRITION_LOGS)
            .document_id(&log.id)
            .object(log)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add log to transaction: {}", e)))?;

        if let Err(e) = transaction.commit().await {
            return Err(self.claim_conflict(log, e).await);
        }

        tracing::debug!(log_id = %log.id, day = %log.day_key(), "Nutrition log inserted");
        Ok(())
    }

    pub async fn update_log(&self, log: &NutritionLog, previous_day: &str) -> Result<(), AppError> {
        if log.day_key() == previous_day {
            let _: () = self
                .client
                .fluent()
                .update()
                .in_col(collections::NUTRITION_LOGS)
                .document_id(&log.id)
                .object(log)
                .execute()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(());
        }

        // Day changed: claim the new day, release the old one, write the log.
        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        self.claim_day_in_transaction(log, &mut transaction)?;

        self.client
            .fluent()
            .delete()
            .from(collections::NUTRITION_LOG_DAYS)
            .document_id(day_claim_id(&log.user_id, previous_day))
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                AppError::Database(format!("Failed to add claim release to transaction: {}", e))
            })?;

        self.client
            .fluent()
            .update()
            .in_col(collections::NUTRITION_LOGS)
            .document_id(&log.id)
            .object(log)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(format!("Failed to add log to transaction: {}", e)))?;

        if let Err(e) = transaction.commit().await {
            return Err(self.claim_conflict(log, e).await);
        }

        Ok(())
    }

    pub async fn delete_log(&self, log: &NutritionLog) -> Result<(), AppError> {
        let mut transaction = self
            .client
            .begin_transaction()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        self.client
            .fluent()
            .delete()
            .from(collections::NUTRITION_LOGS)
            .document_id(&log.id)
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.client
            .fluent()
            .delete()
            .from(collections::NUTRITION_LOG_DAYS)
            .document_id(day_claim_id(&log.user_id, &log.day_key()))
            .add_to_transaction(&mut transaction)
            .map_err(|e| AppError::Database(e.to_string()))?;

        transaction
            .commit()
            .await
            .map_err(|e| AppError::Database(format!("Transaction commit failed: {}", e)))?;

        Ok(())
    }

    // ─── Goal Operations ─────────────────────────────────────────

    pub async fn query_goals(&self, user_id: &str) -> Result<Vec<Goal>, AppError> {
        let user_id = user_id.to_string();
        self.client
            .fluent()
            .select()
            .from(collections::GOALS)
            .filter(move |q| q.for_all([q.field("userId").eq(user_id.clone())]))
            .order_by([("targetDate", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_goal(&self, goal_id: &str) -> Result<Option<Goal>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::GOALS)
            .obj()
            .one(goal_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn set_goal(&self, goal: &Goal) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::GOALS)
            .document_id(&goal.id)
            .object(goal)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn delete_goal(&self, goal_id: &str) -> Result<(), AppError> {
        self.client
            .fluent()
            .delete()
            .from(collections::GOALS)
            .document_id(goal_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Workout Operations ──────────────────────────────────────

    pub async fn query_scheduled_workouts(
        &self,
        user_id: &str,
        after: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<ScheduledWorkout>, AppError> {
        let user_id = user_id.to_string();
        let after = format_utc_rfc3339(after);

        self.client
            .fluent()
            .select()
            .from(collections::SCHEDULED_WORKOUTS)
            .filter(move |q| {
                q.for_all([
                    q.field("userId").eq(user_id.clone()),
                    q.field("scheduledFor").greater_than_or_equal(after.clone()),
                ])
            })
            .order_by([("scheduledFor", FirestoreQueryDirection::Ascending)])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn get_scheduled_workout(
        &self,
        id: &str,
    ) -> Result<Option<ScheduledWorkout>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::SCHEDULED_WORKOUTS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn set_scheduled_workout(&self, workout: &ScheduledWorkout) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::SCHEDULED_WORKOUTS)
            .document_id(&workout.id)
            .object(workout)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn get_workout_template(
        &self,
        id: &str,
    ) -> Result<Option<WorkoutTemplate>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::WORKOUTS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn set_workout_template(&self, template: &WorkoutTemplate) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::WORKOUTS)
            .document_id(&template.id)
            .object(template)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
