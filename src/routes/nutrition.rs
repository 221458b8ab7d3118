// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nutrition log routes (require authentication).

use crate::db::DateRange;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::nutrition::{
    CreateLogRequest, MealInput, UpdateLogRequest, UpdateMealRequest, WaterIntakeRequest,
};
use crate::models::{Meal, NutritionLog, NutritionStats};
use crate::response::ApiResponse;
use crate::time_utils::parse_client_date;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, patch, post, put},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/nutrition/logs", get(list_logs).post(create_log))
        .route(
            "/api/nutrition/logs/{id}",
            get(get_log).put(update_log).delete(delete_log),
        )
        .route("/api/nutrition/logs/{id}/meals", post(add_meal))
        .route(
            "/api/nutrition/logs/{id}/meals/{meal_id}",
            put(update_meal).delete(delete_meal),
        )
        .route("/api/nutrition/water", patch(upsert_water))
        .route("/api/nutrition/stats", get(get_stats))
}

// ─── Query parameters ────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Build an inclusive range from optional `startDate`/`endDate` strings.
fn date_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange> {
    let parse = |raw: &str| {
        parse_client_date(raw).ok_or_else(|| AppError::InvalidData(format!("Invalid date: {}", raw)))
    };
    Ok(DateRange {
        start: start.map(parse).transpose()?,
        end: end.map(parse).transpose()?,
    })
}

// ─── Logs ────────────────────────────────────────────────────

async fn list_logs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<LogsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<NutritionLog>>>> {
    let Query(query) = query?;
    let range = date_range(query.start_date.as_deref(), query.end_date.as_deref())?;

    let page = state
        .nutrition
        .list(&user.user_id, range, query.page, query.limit)
        .await?;

    let count = page.logs.len();
    Ok(Json(
        ApiResponse::ok(page.logs).with_pagination(count, page.pagination),
    ))
}

async fn get_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<NutritionLog>>> {
    let log = state.nutrition.get(&id, &user.user_id).await?;
    Ok(Json(ApiResponse::ok(log)))
}

async fn create_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<CreateLogRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<NutritionLog>>)> {
    let Json(req) = body?;
    let log = state.nutrition.create(&user.user_id, req, Utc::now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(log).with_message("Nutrition log created successfully")),
    ))
}

async fn update_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateLogRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<NutritionLog>>> {
    let Json(req) = body?;
    let log = state
        .nutrition
        .update(&id, &user.user_id, req, Utc::now())
        .await?;
    Ok(Json(
        ApiResponse::ok(log).with_message("Nutrition log updated successfully"),
    ))
}

async fn delete_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.nutrition.delete(&id, &user.user_id).await?;
    Ok(Json(ApiResponse::message_only(
        "Nutrition log deleted successfully",
    )))
}

// ─── Meals ───────────────────────────────────────────────────

async fn add_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    body: std::result::Result<Json<MealInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Meal>>)> {
    let Json(input) = body?;
    let (meal, log) = state
        .nutrition
        .add_meal(&id, &user.user_id, input, Utc::now())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(meal)
                .with_message("Meal added successfully")
                .with_log(log),
        ),
    ))
}

async fn update_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, meal_id)): Path<(String, String)>,
    body: std::result::Result<Json<UpdateMealRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Meal>>> {
    let Json(req) = body?;
    let (meal, log) = state
        .nutrition
        .update_meal(&id, &meal_id, &user.user_id, req, Utc::now())
        .await?;
    Ok(Json(
        ApiResponse::ok(meal)
            .with_message("Meal updated successfully")
            .with_log(log),
    ))
}

async fn delete_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((id, meal_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<NutritionLog>>> {
    let log = state
        .nutrition
        .delete_meal(&id, &meal_id, &user.user_id, Utc::now())
        .await?;
    Ok(Json(
        ApiResponse::ok(log).with_message("Meal deleted successfully"),
    ))
}

// ─── Water & Stats ───────────────────────────────────────────

async fn upsert_water(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<WaterIntakeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<NutritionLog>>> {
    let Json(req) = body?;
    let log = state
        .nutrition
        .upsert_water_intake(&user.user_id, req, Utc::now())
        .await?;
    Ok(Json(
        ApiResponse::ok(log).with_message("Water intake updated successfully"),
    ))
}

async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<NutritionStats>>> {
    let Query(query) = query?;
    let range = date_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let stats = state.nutrition.stats(&user.user_id, range).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
