// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal routes (require authentication).

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::{CreateGoalRequest, Goal, GoalStatus, UpdateGoalRequest};
use crate::response::ApiResponse;
use crate::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/goals", get(list_goals).post(create_goal))
        .route(
            "/api/goals/{id}",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
}

#[derive(Debug, Default, Deserialize)]
pub struct GoalsQuery {
    pub status: Option<GoalStatus>,
}

async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<GoalsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Goal>>>> {
    let Query(query) = query?;
    let goals = state.goals.list(&user.user_id, query.status).await?;
    Ok(Json(ApiResponse::ok(goals)))
}

async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Goal>>> {
    let goal = state.goals.get(&id, &user.user_id).await?;
    Ok(Json(ApiResponse::ok(goal)))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<CreateGoalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Goal>>)> {
    let Json(req) = body?;
    let now = Utc::now();
    let goal = state
        .goals
        .create(&user.user_id, req, now.date_naive(), now)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(goal))))
}

async fn update_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateGoalRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Goal>>> {
    let Json(req) = body?;
    let now = Utc::now();
    let goal = state
        .goals
        .update(&id, &user.user_id, req, now.date_naive(), now)
        .await?;
    Ok(Json(ApiResponse::ok(goal)))
}

async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.goals.delete(&id, &user.user_id).await?;
    Ok(Json(ApiResponse::message_only("Goal deleted successfully")))
}
