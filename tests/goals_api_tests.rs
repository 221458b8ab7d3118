// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal routes, and the goal wizard submitting over real HTTP.

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use fitness_tracker::models::{GoalStatus, GoalType};
use fitness_tracker::wizard::{ClientError, GoalWizard, GoalsClient, WizardStep};
use serde_json::json;

mod common;
use common::{create_test_app, send, token_for};

fn days_from_now(days: i64) -> String {
    (Utc::now() + Duration::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

/// Serve the test app on an ephemeral port and return its base URL.
async fn spawn_server() -> String {
    let (app, _) = create_test_app();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_goal_crud() {
    let (app, _) = create_test_app();

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/goals",
        "alice",
        Some(json!({
            "type": "endurance",
            "targetValue": 60,
            "currentValue": 20,
            "unit": "min",
            "targetDate": days_from_now(30),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    assert_eq!(json["data"]["status"], "active");
    let uri = format!("/api/goals/{}", json["data"]["id"].as_str().unwrap());

    let (status, json) = send(
        &app,
        Method::PUT,
        &uri,
        "alice",
        Some(json!({ "currentValue": 60 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "achieved");

    let (status, json) = send(&app, Method::GET, &uri, "bob", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"]["code"], "FORBIDDEN");

    let (_, json) = send(&app, Method::GET, "/api/goals?status=achieved", "alice", None).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    let (_, json) = send(&app, Method::GET, "/api/goals?status=active", "alice", None).await;
    assert_eq!(json["data"], json!([]));

    let (status, _) = send(&app, Method::DELETE, &uri, "alice", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, Method::GET, &uri, "alice", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "GOAL_NOT_FOUND");
}

#[tokio::test]
async fn test_goal_with_past_target_date_is_rejected() {
    let (app, _) = create_test_app();

    let (status, json) = send(
        &app,
        Method::POST,
        "/api/goals",
        "alice",
        Some(json!({
            "type": "weight",
            "targetValue": 70,
            "unit": "kg",
            "targetDate": days_from_now(-3),
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_DATA");
}

#[tokio::test]
async fn test_wizard_submits_through_client() {
    let base_url = spawn_server().await;
    let client = GoalsClient::new(&base_url, token_for("alice"));

    let mut wizard = GoalWizard::new(Utc::now().date_naive());
    wizard.select_type(GoalType::Strength);
    wizard.next().unwrap();
    wizard.set_target_value("225");
    wizard.set_current_value("185");
    wizard.next().unwrap();
    wizard.set_target_date(days_from_now(60));
    assert_eq!(wizard.next().unwrap(), WizardStep::Review);

    let goal = wizard
        .submit(|req| {
            let client = client.clone();
            async move { client.create_goal(&req).await }
        })
        .await
        .unwrap();

    assert_eq!(goal.goal_type, GoalType::Strength);
    assert_eq!(goal.unit, "lbs");
    assert_eq!(goal.target_value, 225.0);
    assert_eq!(goal.status, GoalStatus::Active);
    assert_eq!(wizard.step(), WizardStep::Completed);
}

#[tokio::test]
async fn test_client_surfaces_api_errors() {
    let base_url = spawn_server().await;
    let client = GoalsClient::new(&base_url, "not-a-token");

    let mut wizard = GoalWizard::new(Utc::now().date_naive());
    wizard.select_type(GoalType::Habit);
    wizard.next().unwrap();
    wizard.set_target_value("12");
    wizard.next().unwrap();
    wizard.set_target_date(days_from_now(14));
    wizard.next().unwrap();

    let req = wizard.begin_submit().unwrap();
    let outcome = client.create_goal(&req).await;
    match &outcome {
        Err(ClientError::Api { code, .. }) => assert_eq!(code, "UNAUTHORIZED"),
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert!(wizard.finish_submit(outcome).is_err());
    assert_eq!(wizard.step(), WizardStep::Review);
    assert_eq!(wizard.submit_error(), Some("Authentication required"));
    assert!(!wizard.is_loading());
}
