// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end nutrition log tests against the in-memory store.

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;

mod common;
use common::{create_test_app, send};

async fn create_log(app: &axum::Router, user: &str, date: &str) -> serde_json::Value {
    let (status, json) = send(
        app,
        Method::POST,
        "/api/nutrition/logs",
        user,
        Some(json!({ "date": date })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    assert_eq!(json["message"], "Nutrition log created successfully");
    json["data"].clone()
}

fn lunch(calories: f64) -> serde_json::Value {
    json!({
        "type": "lunch",
        "foods": [{ "name": "burrito", "calories": calories, "protein": 30, "carbs": 60, "fat": 20 }],
        "notes": "big"
    })
}

#[tokio::test]
async fn test_log_lifecycle_with_meal_and_stats() {
    let (app, _) = create_test_app();

    let log = create_log(&app, "alice", "2024-01-01").await;
    let log_id = log["id"].as_str().unwrap().to_string();
    assert_eq!(log["date"], "2024-01-01T00:00:00Z");
    assert_eq!(log["waterIntake"], 0.0);
    assert_eq!(log["meals"].as_array().unwrap().len(), 0);

    // Duplicate day reports the existing log.
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/nutrition/logs",
        "alice",
        Some(json!({ "date": "2024-01-01T15:30:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "LOG_EXISTS");
    assert_eq!(json["error"]["existingLogId"], log_id.as_str());

    let (status, json) = send(
        &app,
        Method::POST,
        &format!("/api/nutrition/logs/{}/meals", log_id),
        "alice",
        Some(lunch(500.0)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["type"], "lunch");
    assert_eq!(json["message"], "Meal added successfully");
    assert_eq!(json["nutritionLog"]["totalCalories"], 500.0);

    let (status, json) = send(
        &app,
        Method::GET,
        &format!("/api/nutrition/logs/{}", log_id),
        "alice",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["meals"].as_array().unwrap().len(), 1);

    let (status, json) = send(&app, Method::GET, "/api/nutrition/stats", "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["dailyAverages"]["avgCalories"], 500.0);
    assert_eq!(json["data"]["macroDistribution"]["protein"], 30.0);
    assert_eq!(json["data"]["caloriesTrend"][0]["date"], "2024-01-01");
    assert_eq!(json["data"]["mealTypeDistribution"][0]["type"], "lunch");
    assert_eq!(json["data"]["mealTypeDistribution"][0]["count"], 1);

    let (status, json) = send(
        &app,
        Method::DELETE,
        &format!("/api/nutrition/logs/{}", log_id),
        "alice",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (status, json) = send(
        &app,
        Method::GET,
        &format!("/api/nutrition/logs/{}", log_id),
        "alice",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "LOG_NOT_FOUND");

    // The day is free again.
    create_log(&app, "alice", "2024-01-01").await;
}

#[tokio::test]
async fn test_future_date_is_rejected() {
    let (app, _) = create_test_app();
    let tomorrow = (Utc::now() + Duration::days(2)).format("%Y-%m-%d").to_string();

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/nutrition/logs",
        "alice",
        Some(json!({ "date": tomorrow })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "FUTURE_DATE");
}

#[tokio::test]
async fn test_other_users_log_is_forbidden() {
    let (app, _) = create_test_app();
    let log = create_log(&app, "alice", "2024-02-01").await;
    let uri = format!("/api/nutrition/logs/{}", log["id"].as_str().unwrap());

    for method in [Method::GET, Method::DELETE] {
        let (status, json) = send(&app, method, &uri, "mallory", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["error"]["code"], "FORBIDDEN");
    }

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        "mallory",
        Some(json!({ "notes": "mine now" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Same calendar day is independent per user.
    create_log(&app, "mallory", "2024-02-01").await;
}

#[tokio::test]
async fn test_meal_update_and_delete() {
    let (app, _) = create_test_app();
    let log = create_log(&app, "alice", "2024-03-01").await;
    let log_id = log["id"].as_str().unwrap();

    let (_, json) = send(
        &app,
        Method::POST,
        &format!("/api/nutrition/logs/{}/meals", log_id),
        "alice",
        Some(lunch(500.0)),
    )
    .await;
    let meal_id = json["data"]["id"].as_str().unwrap().to_string();
    let meal_uri = format!("/api/nutrition/logs/{}/meals/{}", log_id, meal_id);

    let (status, json) = send(
        &app,
        Method::PUT,
        &meal_uri,
        "alice",
        Some(json!({ "type": "dinner", "notes": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["type"], "dinner");
    assert_eq!(json["message"], "Meal updated successfully");
    assert_eq!(json["data"]["notes"], "");
    assert_eq!(json["data"]["foods"][0]["name"], "burrito");
    assert_eq!(json["nutritionLog"]["meals"].as_array().unwrap().len(), 1);

    let (status, json) = send(&app, Method::DELETE, &meal_uri, "alice", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["meals"].as_array().unwrap().len(), 0);
    assert_eq!(json["data"]["totalCalories"], 0.0);

    let (status, json) = send(&app, Method::DELETE, &meal_uri, "alice", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "MEAL_NOT_FOUND");

    let (status, json) = send(
        &app,
        Method::PUT,
        &meal_uri,
        "alice",
        Some(json!({ "notes": "gone" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "MEAL_NOT_FOUND");
}

#[tokio::test]
async fn test_add_meal_requires_type_and_foods() {
    let (app, _) = create_test_app();
    let log = create_log(&app, "alice", "2024-03-02").await;
    let uri = format!("/api/nutrition/logs/{}/meals", log["id"].as_str().unwrap());

    for body in [
        json!({ "foods": [{ "name": "apple", "calories": 95 }] }),
        json!({ "type": "snack", "foods": [] }),
        json!({ "type": "snack" }),
    ] {
        let (status, json) = send(&app, Method::POST, &uri, "alice", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "INVALID_DATA");
    }
}

#[tokio::test]
async fn test_update_distinguishes_null_from_absent() {
    let (app, _) = create_test_app();
    let (_, json) = send(
        &app,
        Method::POST,
        "/api/nutrition/logs",
        "alice",
        Some(json!({ "date": "2024-04-01", "notes": "rest day", "waterIntake": 2.0 })),
    )
    .await;
    let uri = format!("/api/nutrition/logs/{}", json["data"]["id"].as_str().unwrap());

    let (status, json) = send(
        &app,
        Method::PUT,
        &uri,
        "alice",
        Some(json!({ "waterIntake": 3.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Nutrition log updated successfully");
    assert_eq!(json["data"]["notes"], "rest day");
    assert_eq!(json["data"]["waterIntake"], 3.0);

    let (_, json) = send(
        &app,
        Method::PUT,
        &uri,
        "alice",
        Some(json!({ "notes": null, "waterIntake": null, "meals": null })),
    )
    .await;
    assert_eq!(json["data"]["notes"], "");
    assert_eq!(json["data"]["waterIntake"], 0.0);
    assert_eq!(json["data"]["date"], "2024-04-01T00:00:00Z");
}

#[tokio::test]
async fn test_water_intake_upsert() {
    let (app, _) = create_test_app();

    let (status, json) = send(
        &app,
        Method::PATCH,
        "/api/nutrition/water",
        "alice",
        Some(json!({ "date": "2024-05-05T09:00:00Z", "amount": 1.25 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let log_id = json["data"]["id"].clone();
    assert_eq!(json["message"], "Water intake updated successfully");
    assert_eq!(json["data"]["waterIntake"], 1.25);
    assert_eq!(json["data"]["date"], "2024-05-05T00:00:00Z");

    let (_, json) = send(
        &app,
        Method::PATCH,
        "/api/nutrition/water",
        "alice",
        Some(json!({ "date": "2024-05-05T21:00:00Z", "amount": 2.0 })),
    )
    .await;
    assert_eq!(json["data"]["id"], log_id);
    assert_eq!(json["data"]["waterIntake"], 2.0);

    // Creating a log for that day now collides with the upserted one.
    let (status, json) = send(
        &app,
        Method::POST,
        "/api/nutrition/logs",
        "alice",
        Some(json!({ "date": "2024-05-05" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["existingLogId"], log_id);

    let (status, json) = send(
        &app,
        Method::PATCH,
        "/api/nutrition/water",
        "alice",
        Some(json!({ "date": "2024-05-05" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_DATA");
}

#[tokio::test]
async fn test_stats_for_empty_range() {
    let (app, _) = create_test_app();
    create_log(&app, "alice", "2024-01-10").await;

    let (status, json) = send(
        &app,
        Method::GET,
        "/api/nutrition/stats?startDate=2023-01-01&endDate=2023-12-31",
        "alice",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["data"]["dailyAverages"].is_null());
    assert!(json["data"]["macroDistribution"].is_null());
    assert_eq!(json["data"]["caloriesTrend"], json!([]));
    assert_eq!(json["data"]["mealTypeDistribution"], json!([]));
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let (app, _) = create_test_app();

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/nutrition/logs",
        "alice",
        Some(json!({ "date": "2024-01-01", "waterIntake": "lots" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "INVALID_DATA");
}

#[tokio::test]
async fn test_invalid_nested_food_names_the_field() {
    let (app, _) = create_test_app();

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/nutrition/logs",
        "alice",
        Some(json!({
            "date": "2024-01-01",
            "meals": [{ "type": "breakfast", "foods": [{ "name": "toast", "calories": -5 }] }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_DATA");
    assert_eq!(
        json["error"]["message"],
        "meals[0].foods[0].calories must not be negative"
    );
}
