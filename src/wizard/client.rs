// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client the wizard uses to post goals to the API.

use serde::Deserialize;

use crate::models::{CreateGoalRequest, Goal};

/// Goals API client authenticated with a session token.
#[derive(Clone)]
pub struct GoalsClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { code: String, message: String },

    #[error("Response did not include a goal")]
    MissingData,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

impl GoalsClient {
    /// `base_url` is the API origin, e.g. `http://localhost:8080`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// POST /api/goals
    pub async fn create_goal(&self, req: &CreateGoalRequest) -> Result<Goal, ClientError> {
        let url = format!("{}/api/goals", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(req)
            .send()
            .await?;

        let status = response.status();
        let envelope: Envelope<Goal> = response.json().await?;

        if let Some(err) = envelope.error {
            tracing::warn!(%status, code = %err.code, "Goal creation rejected");
            return Err(ClientError::Api {
                code: err.code,
                message: err.message,
            });
        }

        envelope.data.ok_or(ClientError::MissingData)
    }
}
