// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use std::env;
use std::str::FromStr;

/// Which document store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Google Cloud Firestore (or the emulator when FIRESTORE_EMULATOR_HOST is set)
    Firestore,
    /// In-process store, lost on restart
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firestore" => Ok(StoreBackend::Firestore),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(ConfigError::Invalid("STORE_BACKEND", s.to_string())),
        }
    }
}

/// Calendar-day boundary used when the water-intake upsert picks the day a
/// timestamp belongs to.
///
/// The chosen day is always stored as its UTC-midnight date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBoundary {
    Utc,
    /// Server-local midnight
    Local,
    /// Midnight at a fixed UTC offset, e.g. `+09:00`
    Offset(FixedOffset),
}

impl DayBoundary {
    /// UTC offset in effect at `instant`.
    pub fn offset_at(self, instant: DateTime<Utc>) -> FixedOffset {
        match self {
            DayBoundary::Utc => Utc.fix(),
            DayBoundary::Local => chrono::Local
                .offset_from_utc_datetime(&instant.naive_utc())
                .fix(),
            DayBoundary::Offset(offset) => offset,
        }
    }
}

impl FromStr for DayBoundary {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "utc" => Ok(DayBoundary::Utc),
            "local" => Ok(DayBoundary::Local),
            _ => DateTime::parse_from_rfc3339(&format!("2000-01-01T00:00:00{}", trimmed))
                .map(|dt| DayBoundary::Offset(*dt.offset()))
                .map_err(|_| ConfigError::Invalid("WATER_DAY_BOUNDARY", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL (allowed CORS origin)
    pub frontend_url: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Document store backend
    pub store_backend: StoreBackend,
    /// Day boundary for water-intake upserts
    pub water_day_boundary: DayBoundary,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:5173".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            store_backend: StoreBackend::Memory,
            water_day_boundary: DayBoundary::Utc,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            store_backend: env::var("STORE_BACKEND")
                .map(|v| v.parse())
                .unwrap_or(Ok(StoreBackend::Firestore))?,
            water_day_boundary: env::var("WATER_DAY_BOUNDARY")
                .map(|v| v.parse())
                .unwrap_or(Ok(DayBoundary::Utc))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("STORE_BACKEND", "memory");
        env::remove_var("WATER_DAY_BOUNDARY");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.water_day_boundary, DayBoundary::Utc);
        assert_eq!(config.jwt_signing_key, b"test_jwt_key_32_bytes_minimum!!");
    }

    #[test]
    fn test_day_boundary_parsing() {
        assert_eq!("LOCAL".parse::<DayBoundary>().unwrap(), DayBoundary::Local);
        assert_eq!(" utc ".parse::<DayBoundary>().unwrap(), DayBoundary::Utc);
        assert_eq!(
            "+09:00".parse::<DayBoundary>().unwrap(),
            DayBoundary::Offset(FixedOffset::east_opt(9 * 3600).unwrap())
        );
        assert_eq!(
            "-05:30".parse::<DayBoundary>().unwrap(),
            DayBoundary::Offset(FixedOffset::west_opt(5 * 3600 + 1800).unwrap())
        );
        assert!("pacific".parse::<DayBoundary>().is_err());
        assert!("+9".parse::<DayBoundary>().is_err());
    }
}
