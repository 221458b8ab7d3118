// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fitness Tracker: nutrition logging, goals and workout scheduling.
//!
//! This crate provides the backend API for the fitness tracker web client,
//! plus the client-side goal creation wizard state machine.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod time_utils;
pub mod wizard;

use config::Config;
use db::DocumentStore;
use services::{GoalService, NutritionService, WorkoutService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: DocumentStore,
    pub nutrition: NutritionService,
    pub goals: GoalService,
    pub workouts: WorkoutService,
}

impl AppState {
    /// Wire every service to the same document store.
    pub fn new(config: Config, db: DocumentStore) -> Self {
        Self {
            nutrition: NutritionService::new(db.clone(), config.water_day_boundary),
            goals: GoalService::new(db.clone()),
            workouts: WorkoutService::new(db.clone()),
            config,
            db,
        }
    }
}
