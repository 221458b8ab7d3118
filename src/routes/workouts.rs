// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Scheduled workout routes (read-only, require authentication).

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::UpcomingWorkout;
use crate::response::ApiResponse;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    // The static segment takes precedence over the capture.
    Router::new()
        .route("/api/workouts/scheduled/upcoming", get(upcoming))
        .route("/api/workouts/scheduled/{id}", get(get_scheduled))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpcomingQuery {
    pub limit: Option<u32>,
}

async fn upcoming(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<UpcomingQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<UpcomingWorkout>>>> {
    let Query(query) = query?;
    let workouts = state
        .workouts
        .upcoming(&user.user_id, query.limit, Utc::now())
        .await?;
    Ok(Json(ApiResponse::ok(workouts)))
}

async fn get_scheduled(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UpcomingWorkout>>> {
    let workout = state.workouts.get(&id, &user.user_id).await?;
    Ok(Json(ApiResponse::ok(workout)))
}
