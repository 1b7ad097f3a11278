// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides store constructors, demo owners, and the May 2015 meal week
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::wildcard_in_or_patterns,
    clippy::unwrap_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `mealtrack`
//!
//! This module provides common store setup and fixture data to reduce
//! duplication across integration tests.

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use mealtrack::{
    constants::defaults,
    models::Meal,
    store::{memory::InMemoryStore, MealStore},
};
use std::sync::Once;
use uuid::Uuid;

#[cfg(feature = "sqlite")]
use mealtrack::store::sqlite::SqliteStore;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN, // Default to WARN for quiet tests
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh owner id; every test gets its own user
pub fn test_owner() -> Uuid {
    Uuid::new_v4()
}

/// Timestamp in May 2015, the month the fixture week lives in
pub fn may_2015(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2015, 5, day, hour, minute, 0)
        .single()
        .unwrap()
}

/// Unsaved meal on a May 2015 day
pub fn may_meal(owner_id: Uuid, day: u32, hour: u32, description: &str, calories: u32) -> Meal {
    Meal::new(owner_id, may_2015(day, hour, 0), description, calories)
}

/// Standard in-memory store setup
pub async fn create_memory_store() -> Result<InMemoryStore> {
    init_test_logging();
    let store = InMemoryStore::new("memory:", defaults::ID_SEED).await?;
    store.migrate().await?;
    Ok(store)
}

/// Standard SQLite store setup (private in-memory database per call)
#[cfg(feature = "sqlite")]
pub async fn create_sqlite_store() -> Result<SqliteStore> {
    init_test_logging();
    let store = SqliteStore::new("sqlite::memory:", defaults::ID_SEED).await?;
    store.migrate().await?;
    Ok(store)
}

/// Seed one owner with a week of meals and return them in insertion order.
///
/// Day totals against the default 2000 kcal budget:
/// - May 28: 500 (under)
/// - May 30: 1500 (under)
/// - May 31: 2520 (over)
pub async fn seed_sample_week<S: MealStore>(store: &S, owner_id: Uuid) -> Result<Vec<Meal>> {
    let fixtures = [
        (28_u32, 10_u32, "Breakfast", 500_u32),
        (30, 13, "Lunch", 1000),
        (30, 20, "Dinner", 500),
        (31, 0, "Midnight snack", 510),
        (31, 10, "Breakfast", 500),
        (31, 13, "Lunch", 1000),
        (31, 20, "Dinner", 510),
    ];

    let mut saved = Vec::with_capacity(fixtures.len());
    for (day, hour, description, calories) in fixtures {
        let meal = may_meal(owner_id, day, hour, description, calories);
        let stored = store
            .save(meal, owner_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("seeding must insert, not update"))?;
        saved.push(stored);
    }
    Ok(saved)
}
