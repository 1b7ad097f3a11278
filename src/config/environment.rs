// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Typed store URLs, log levels, and runtime configuration parsing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Environment-based configuration

use crate::constants::{defaults, env_config};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Type-safe store location configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum StoreUrl {
    /// Concurrent in-process map, nothing persisted
    #[default]
    Memory,
    /// SQLite database file on disk
    Sqlite {
        /// Database file location
        path: PathBuf,
    },
    /// In-memory SQLite, exercising the relational path without a file
    SqliteMemory,
}

impl StoreUrl {
    /// Parse from a connection string.
    ///
    /// Accepted forms are `memory:`, `sqlite:<path>`, and
    /// `sqlite::memory:`; these are exactly the URLs the store factory
    /// recognizes.
    ///
    /// # Errors
    ///
    /// Returns an error on any other scheme
    pub fn parse(s: &str) -> Result<Self> {
        if s.starts_with("memory:") {
            Ok(Self::Memory)
        } else if let Some(rest) = s.strip_prefix("sqlite:") {
            if rest == ":memory:" {
                Ok(Self::SqliteMemory)
            } else if rest.is_empty() {
                Err(anyhow::anyhow!("sqlite: store URL needs a file path"))
            } else {
                Ok(Self::Sqlite {
                    path: PathBuf::from(rest),
                })
            }
        } else {
            Err(anyhow::anyhow!(
                "Unrecognized store URL: {s}. Supported formats: memory:, sqlite:path/to/meals.db, sqlite::memory:"
            ))
        }
    }

    /// Convert to the connection string the store factory consumes
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::Memory => "memory:".to_owned(),
            Self::Sqlite { path } => format!("sqlite:{}", path.display()),
            Self::SqliteMemory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is the in-process map store
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }

    /// Check if this is a SQLite store (file-backed or in-memory)
    #[must_use]
    pub const fn is_sqlite(&self) -> bool {
        matches!(self, Self::Sqlite { .. } | Self::SqliteMemory)
    }
}

impl std::fmt::Display for StoreUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Store backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Where meals live (in-process map or SQLite location)
    pub url: StoreUrl,
    /// Run schema migrations on startup
    pub auto_migrate: bool,
}

/// Meal bookkeeping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealsConfig {
    /// Daily calorie budget for the current user
    pub calories_per_day: u32,
    /// Starting value of the meal id sequence; assigned ids are
    /// strictly greater
    pub id_seed: i64,
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log level
    pub log_level: LogLevel,
    /// Store configuration
    pub store: StoreConfig,
    /// Meal bookkeeping settings
    pub meals: MealsConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when `MEALTRACK_STORE_URL` has an unrecognized
    /// scheme, `MEALTRACK_AUTO_MIGRATE` is not a boolean, or validation
    /// fails
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            log_level: LogLevel::from_str_or_default(&env_config::log_level()),
            store: StoreConfig {
                url: StoreUrl::parse(&env_config::store_url())?,
                auto_migrate: env_var_or("MEALTRACK_AUTO_MIGRATE", "true")?
                    .parse()
                    .context("Invalid MEALTRACK_AUTO_MIGRATE value")?,
            },
            meals: MealsConfig {
                calories_per_day: env_config::calories_per_day(),
                id_seed: env_config::id_seed(),
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error when the calorie budget is zero or the id seed
    /// is negative
    pub fn validate(&self) -> Result<()> {
        if self.meals.calories_per_day == 0 {
            return Err(anyhow::anyhow!(
                "MEALTRACK_CALORIES_PER_DAY must be positive"
            ));
        }
        if self.meals.id_seed < 0 {
            return Err(anyhow::anyhow!("MEALTRACK_ID_SEED must not be negative"));
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Mealtrack Configuration:\n\
             - Log Level: {}\n\
             - Store: {}\n\
             - Auto-migrate: {}\n\
             - Calories per day: {}\n\
             - Id seed: {}",
            self.log_level,
            self.store.url,
            self.store.auto_migrate,
            self.meals.calories_per_day,
            self.meals.id_seed
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            store: StoreConfig {
                url: StoreUrl::default(),
                auto_migrate: true,
            },
            meals: MealsConfig {
                calories_per_day: defaults::CALORIES_PER_DAY,
                id_seed: defaults::ID_SEED,
            },
        }
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> Result<String> {
    Ok(env::var(key).unwrap_or_else(|_| default.to_owned()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn log_level_parses_with_fallback() {
        assert_eq!(LogLevel::from_str_or_default("error"), LogLevel::Error);
        assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str_or_default("Debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("trace"), LogLevel::Trace);
        assert_eq!(LogLevel::from_str_or_default("invalid"), LogLevel::Info);
    }

    #[test]
    fn store_url_parses_supported_schemes() {
        assert!(StoreUrl::parse("memory:").unwrap().is_memory());

        let file = StoreUrl::parse("sqlite:./meals.db").unwrap();
        assert!(file.is_sqlite());
        assert_eq!(file.to_connection_string(), "sqlite:./meals.db");

        let memory_db = StoreUrl::parse("sqlite::memory:").unwrap();
        assert_eq!(memory_db, StoreUrl::SqliteMemory);
        assert!(memory_db.is_sqlite());
        assert!(!memory_db.is_memory());
    }

    #[test]
    fn store_url_rejects_unknown_schemes() {
        assert!(StoreUrl::parse("postgresql://localhost/meals").is_err());
        assert!(StoreUrl::parse("redis://localhost").is_err());
        assert!(StoreUrl::parse("sqlite:").is_err());
        assert!(StoreUrl::parse("").is_err());
    }

    #[test]
    fn store_url_display_round_trips() {
        for url in ["memory:", "sqlite:./meals.db", "sqlite::memory:"] {
            let parsed = StoreUrl::parse(url).unwrap();
            assert_eq!(StoreUrl::parse(&parsed.to_string()).unwrap(), parsed);
        }
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.meals.calories_per_day = 0;
        assert!(config.validate().is_err());

        config.meals.calories_per_day = defaults::CALORIES_PER_DAY;
        config.meals.id_seed = -1;
        assert!(config.validate().is_err());
    }
}
