// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Goal creation wizard.
//!
//! A linear state machine driven by the client UI:
//!
//! ```text
//! TypeSelect -> DetailsEntry -> DateSelect -> Review -> Completed
//! ```
//!
//! `next` only advances when the current step's fields are valid; every
//! invalid field is reported at once. `back` never validates. Submission is
//! split into `begin_submit`/`finish_submit` so a UI can hold the `loading`
//! flag across its own network call; `submit` runs both around a closure.

pub mod client;

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use crate::models::{CreateGoalRequest, Goal, GoalStatus, GoalType};

pub use client::{ClientError, GoalsClient};

/// Wizard steps in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    TypeSelect,
    DetailsEntry,
    DateSelect,
    Review,
    /// Goal created; terminal
    Completed,
}

impl WizardStep {
    fn forward(self) -> Option<Self> {
        match self {
            WizardStep::TypeSelect => Some(WizardStep::DetailsEntry),
            WizardStep::DetailsEntry => Some(WizardStep::DateSelect),
            WizardStep::DateSelect => Some(WizardStep::Review),
            WizardStep::Review | WizardStep::Completed => None,
        }
    }

    fn backward(self) -> Option<Self> {
        match self {
            WizardStep::DetailsEntry => Some(WizardStep::TypeSelect),
            WizardStep::DateSelect => Some(WizardStep::DetailsEntry),
            WizardStep::Review => Some(WizardStep::DateSelect),
            WizardStep::TypeSelect | WizardStep::Completed => None,
        }
    }
}

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardField {
    Type,
    TargetValue,
    CurrentValue,
    Unit,
    TargetDate,
}

impl WizardField {
    /// Wire name used by the client form.
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardField::Type => "type",
            WizardField::TargetValue => "targetValue",
            WizardField::CurrentValue => "currentValue",
            WizardField::Unit => "unit",
            WizardField::TargetDate => "targetDate",
        }
    }
}

impl fmt::Display for WizardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type FieldErrors = BTreeMap<WizardField, String>;

/// Raw form state, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalForm {
    pub goal_type: Option<GoalType>,
    pub target_value: String,
    pub current_value: String,
    pub unit: String,
    pub target_date: String,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{} field(s) need attention", .0.len())]
    Invalid(FieldErrors),

    #[error("Goal can only be submitted from the review step")]
    NotOnReview,

    #[error("A submission is already in progress")]
    SubmitInFlight,

    #[error("Failed to create goal: {0}")]
    Submit(String),
}

/// What the review step shows before submission.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalSummary {
    pub title: String,
    pub days_until_target: i64,
    /// Starting progress, clamped to 100
    pub progress_percent: u32,
}

#[derive(Debug, Clone)]
pub struct GoalWizard {
    step: WizardStep,
    form: GoalForm,
    errors: FieldErrors,
    loading: bool,
    submit_error: Option<String>,
    created: Option<Goal>,
    today: NaiveDate,
}

impl GoalWizard {
    /// Start a wizard; `today` bounds the earliest allowed target date.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            step: WizardStep::TypeSelect,
            form: GoalForm::default(),
            errors: FieldErrors::new(),
            loading: false,
            submit_error: None,
            created: None,
            today,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &GoalForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: WizardField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn created_goal(&self) -> Option<&Goal> {
        self.created.as_ref()
    }

    // ─── Field edits ─────────────────────────────────────────────

    /// Pick a goal type. Changing the type pre-fills its default unit.
    pub fn select_type(&mut self, goal_type: GoalType) {
        if self.form.goal_type != Some(goal_type) {
            self.form.goal_type = Some(goal_type);
            self.form.unit = goal_type.default_unit().to_string();
        }
        self.errors.remove(&WizardField::Type);
    }

    pub fn set_target_value(&mut self, value: impl Into<String>) {
        self.form.target_value = value.into();
        self.errors.remove(&WizardField::TargetValue);
    }

    pub fn set_current_value(&mut self, value: impl Into<String>) {
        self.form.current_value = value.into();
        self.errors.remove(&WizardField::CurrentValue);
    }

    pub fn set_unit(&mut self, unit: impl Into<String>) {
        self.form.unit = unit.into();
        self.errors.remove(&WizardField::Unit);
    }

    pub fn set_target_date(&mut self, date: impl Into<String>) {
        self.form.target_date = date.into();
        self.errors.remove(&WizardField::TargetDate);
    }

    // ─── Transitions ─────────────────────────────────────────────

    /// Advance one step if the current step validates.
    ///
    /// From `Review` and `Completed` this is a no-op; use `submit`.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let Some(target) = self.step.forward() else {
            return Ok(self.step);
        };

        let errors = self.validate_step(self.step);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(WizardError::Invalid(errors));
        }

        self.errors.clear();
        self.step = target;
        Ok(self.step)
    }

    /// Go back one step. No-op on the first step and once completed.
    pub fn back(&mut self) -> WizardStep {
        if let Some(target) = self.step.backward() {
            self.step = target;
            self.submit_error = None;
        }
        self.step
    }

    /// Validation messages for the fields owned by `step`.
    pub fn validate_step(&self, step: WizardStep) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            WizardStep::TypeSelect => {
                if self.form.goal_type.is_none() {
                    errors.insert(WizardField::Type, "Please select a goal type".to_string());
                }
            }
            WizardStep::DetailsEntry => self.validate_details(&mut errors),
            WizardStep::DateSelect => self.validate_date(&mut errors),
            WizardStep::Review | WizardStep::Completed => {}
        }
        errors
    }

    fn validate_details(&self, errors: &mut FieldErrors) {
        let target = match self.form.target_value.trim() {
            "" => {
                errors.insert(
                    WizardField::TargetValue,
                    "Target value is required".to_string(),
                );
                None
            }
            raw => match parse_decimal(raw) {
                None => {
                    errors.insert(
                        WizardField::TargetValue,
                        "Please enter a valid number".to_string(),
                    );
                    None
                }
                Some(v) if v <= 0.0 => {
                    errors.insert(
                        WizardField::TargetValue,
                        "Target value must be greater than 0".to_string(),
                    );
                    None
                }
                Some(v) => Some(v),
            },
        };

        if self.form.unit.trim().is_empty() {
            errors.insert(WizardField::Unit, "Unit is required".to_string());
        }

        let current = self.form.current_value.trim();
        if !current.is_empty() {
            match parse_decimal(current) {
                None => {
                    errors.insert(
                        WizardField::CurrentValue,
                        "Please enter a valid number".to_string(),
                    );
                }
                Some(c) if target.is_some_and(|t| c > t) => {
                    errors.insert(
                        WizardField::CurrentValue,
                        "Current value cannot exceed target value".to_string(),
                    );
                }
                Some(_) => {}
            }
        }
    }

    fn validate_date(&self, errors: &mut FieldErrors) {
        let raw = self.form.target_date.trim();
        if raw.is_empty() {
            errors.insert(
                WizardField::TargetDate,
                "Target date is required".to_string(),
            );
            return;
        }
        match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Err(_) => {
                errors.insert(
                    WizardField::TargetDate,
                    "Please enter a valid date".to_string(),
                );
            }
            Ok(date) if date < self.today => {
                errors.insert(
                    WizardField::TargetDate,
                    "Target date cannot be in the past".to_string(),
                );
            }
            Ok(_) => {}
        }
    }

    fn validate_all(&self) -> FieldErrors {
        let mut errors = self.validate_step(WizardStep::TypeSelect);
        errors.extend(self.validate_step(WizardStep::DetailsEntry));
        errors.extend(self.validate_step(WizardStep::DateSelect));
        errors
    }

    // ─── Review & submit ─────────────────────────────────────────

    /// Summary for the review step, once every field is valid.
    pub fn review_summary(&self) -> Option<GoalSummary> {
        let req = self.to_request().ok()?;

        let title = goal_title(req.goal_type, req.target_value, &req.unit);
        let days_until_target = (req.target_date - self.today).num_days().abs();
        let progress = (req.current_value / req.target_value * 100.0).round();

        Some(GoalSummary {
            title,
            days_until_target,
            progress_percent: progress.clamp(0.0, 100.0) as u32,
        })
    }

    /// Convert the form into the create request the API expects.
    pub fn to_request(&self) -> Result<CreateGoalRequest, WizardError> {
        let errors = self.validate_all();
        if !errors.is_empty() {
            return Err(WizardError::Invalid(errors));
        }

        let invalid = |field: WizardField| {
            let mut errors = FieldErrors::new();
            errors.insert(field, "Please enter a valid number".to_string());
            WizardError::Invalid(errors)
        };

        let goal_type = self.form.goal_type.ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.insert(WizardField::Type, "Please select a goal type".to_string());
            WizardError::Invalid(errors)
        })?;
        let target_value = parse_decimal(self.form.target_value.trim())
            .ok_or_else(|| invalid(WizardField::TargetValue))?;
        let current_value = match self.form.current_value.trim() {
            "" => 0.0,
            raw => parse_decimal(raw).ok_or_else(|| invalid(WizardField::CurrentValue))?,
        };
        let target_date = NaiveDate::parse_from_str(self.form.target_date.trim(), "%Y-%m-%d")
            .map_err(|_| {
                let mut errors = FieldErrors::new();
                errors.insert(
                    WizardField::TargetDate,
                    "Please enter a valid date".to_string(),
                );
                WizardError::Invalid(errors)
            })?;

        Ok(CreateGoalRequest {
            goal_type,
            title: None,
            target_value,
            current_value,
            unit: self.form.unit.trim().to_string(),
            target_date,
            status: GoalStatus::Active,
        })
    }

    /// Enter the loading state and hand back the request to post.
    pub fn begin_submit(&mut self) -> Result<CreateGoalRequest, WizardError> {
        if self.step != WizardStep::Review {
            return Err(WizardError::NotOnReview);
        }
        if self.loading {
            return Err(WizardError::SubmitInFlight);
        }

        let req = match self.to_request() {
            Ok(req) => req,
            Err(e) => {
                if let WizardError::Invalid(errors) = &e {
                    self.errors = errors.clone();
                }
                return Err(e);
            }
        };

        self.loading = true;
        self.submit_error = None;
        Ok(req)
    }

    /// Record the outcome of the request started by `begin_submit`.
    ///
    /// Success completes the wizard; failure keeps it on `Review` with the
    /// error recorded.
    pub fn finish_submit<E: fmt::Display>(
        &mut self,
        outcome: Result<Goal, E>,
    ) -> Result<&Goal, WizardError> {
        self.loading = false;
        match outcome {
            Ok(goal) => {
                self.step = WizardStep::Completed;
                Ok(self.created.insert(goal))
            }
            Err(e) => {
                let message = e.to_string();
                self.submit_error = Some(message.clone());
                Err(WizardError::Submit(message))
            }
        }
    }

    /// Submit through `post`, managing the loading flag around the call.
    pub async fn submit<F, Fut, E>(&mut self, post: F) -> Result<&Goal, WizardError>
    where
        F: FnOnce(CreateGoalRequest) -> Fut,
        Fut: Future<Output = Result<Goal, E>>,
        E: fmt::Display,
    {
        let req = self.begin_submit()?;
        let outcome = post(req).await;
        self.finish_submit(outcome)
    }
}

/// Non-negative decimal: digits with at most one `.`, no sign or exponent.
fn parse_decimal(raw: &str) -> Option<f64> {
    let mut dots = 0;
    let mut digits = 0;
    for c in raw.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return None,
        }
    }
    if digits == 0 || dots > 1 {
        return None;
    }
    raw.parse().ok()
}

fn goal_title(goal_type: GoalType, target: f64, unit: &str) -> String {
    match goal_type {
        GoalType::Weight => format!("Reach {} {} weight", target, unit),
        GoalType::Strength => format!("Increase strength to {} {}", target, unit),
        GoalType::Endurance => format!("Build endurance to {} {}", target, unit),
        GoalType::Habit => format!("Complete {} {}", target, unit),
        GoalType::Nutrition => format!("Maintain {} {} diet", target, unit),
        GoalType::Custom => format!("Custom goal: {} {}", target, unit),
    }
}
