// ABOUTME: System-wide constants and environment-based configuration values
// ABOUTME: Store defaults, calorie budget defaults, and date range sentinels
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Application constants and environment variable configuration.
//!
//! Hardcoded defaults live next to the `env_config` getters that can
//! override them at runtime.

/// Hardcoded defaults used when no environment override is present
pub mod defaults {
    /// Daily calorie budget used when the caller supplies none
    pub const CALORIES_PER_DAY: u32 = 2000;

    /// First value of the meal id sequence; assigned ids are strictly
    /// greater than this on every backend
    pub const ID_SEED: i64 = 100_000;

    /// Store connection string used when `MEALTRACK_STORE_URL` is unset
    pub const STORE_URL: &str = "memory:";
}

/// Environment-based configuration
pub mod env_config {
    use std::env;

    /// Get the store connection string from environment or default
    #[must_use]
    pub fn store_url() -> String {
        env::var("MEALTRACK_STORE_URL").unwrap_or_else(|_| super::defaults::STORE_URL.into())
    }

    /// Get the daily calorie budget from environment or default
    #[must_use]
    pub fn calories_per_day() -> u32 {
        env::var("MEALTRACK_CALORIES_PER_DAY")
            .unwrap_or_else(|_| super::defaults::CALORIES_PER_DAY.to_string())
            .parse()
            .unwrap_or(super::defaults::CALORIES_PER_DAY)
    }

    /// Get the meal id sequence seed from environment or default
    #[must_use]
    pub fn id_seed() -> i64 {
        env::var("MEALTRACK_ID_SEED")
            .unwrap_or_else(|_| super::defaults::ID_SEED.to_string())
            .parse()
            .unwrap_or(super::defaults::ID_SEED)
    }

    /// Get log level from environment or default
    #[must_use]
    pub fn log_level() -> String {
        env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    }
}

/// Bounds the presentation layer enforces before anything reaches a store
pub mod limits {
    /// Smallest calorie count a recorded meal may carry
    pub const MIN_CALORIES: u32 = 1;
}

/// Sentinel dates substituted for open-ended range bounds.
///
/// Both fit the four-digit-year wire format, so SQLite's lexicographic
/// DATETIME comparison stays correct.
pub mod dates {
    use chrono::NaiveDate;

    /// Earliest queryable date, used when a range has no lower bound
    #[must_use]
    pub fn min_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Day past every queryable date, used when a range has no upper bound
    #[must_use]
    pub fn max_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
    }
}
