// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Every failure leaves the service as a JSON envelope:
//! `{ "success": false, "error": { "code": "...", "message": "..." } }`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Nutrition log not found")]
    LogNotFound,

    #[error("Meal not found")]
    MealNotFound,

    #[error("Goal not found")]
    GoalNotFound,

    #[error("Scheduled workout not found")]
    WorkoutNotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error("Cannot create nutrition log for future dates")]
    FutureDate,

    #[error("A nutrition log already exists for this date")]
    LogExists { existing_log_id: String },

    #[error("{0}")]
    InvalidData(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code carried in the response envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::LogNotFound => "LOG_NOT_FOUND",
            AppError::MealNotFound => "MEAL_NOT_FOUND",
            AppError::GoalNotFound => "GOAL_NOT_FOUND",
            AppError::WorkoutNotFound => "WORKOUT_NOT_FOUND",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::FutureDate => "FUTURE_DATE",
            AppError::LogExists { .. } => "LOG_EXISTS",
            AppError::InvalidData(_) => "INVALID_DATA",
            AppError::Database(_) | AppError::Internal(_) => "SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::LogNotFound
            | AppError::MealNotFound
            | AppError::GoalNotFound
            | AppError::WorkoutNotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::FutureDate | AppError::LogExists { .. } | AppError::InvalidData(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors(&errors, "", &mut fields);
        if fields.is_empty() {
            return AppError::InvalidData("Invalid request data".to_string());
        }
        fields.sort();
        AppError::InvalidData(fields.join("; "))
    }
}

/// Flatten nested validation errors into `path reason` strings, with paths
/// like `meals[0].foods[1].calories`.
fn collect_field_errors(
    errors: &validator::ValidationErrors,
    prefix: &str,
    out: &mut Vec<String>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let reason = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is invalid".to_string());
                out.push(format!("{} {}", path, reason));
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidData(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidData(rejection.body_text())
    }
}

/// JSON error body nested inside the envelope.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    existing_log_id: Option<String>,
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: ErrorBody,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures never leak internal detail to the caller.
        let message = match &self {
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                "Server error".to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                "Server error".to_string()
            }
            other => other.to_string(),
        };

        let existing_log_id = match &self {
            AppError::LogExists { existing_log_id } => Some(existing_log_id.clone()),
            _ => None,
        };

        let body = ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: self.code(),
                message,
                existing_log_id,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
