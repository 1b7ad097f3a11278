// ABOUTME: Main library entry point for the mealtrack meal tracking core
// ABOUTME: Owner-scoped meal CRUD, pluggable stores, and per-day excess analysis
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Mealtrack
//!
//! A meal-tracking core: users record meals (timestamp, description,
//! calorie count) and query them back decorated with a derived per-day
//! "excess calories" flag computed against a daily budget.
//!
//! ## Features
//!
//! - **Owner-scoped CRUD**: every operation is bound to one user, and a
//!   foreign meal is indistinguishable from a missing one
//! - **Pluggable stores**: a concurrent in-memory map and an embedded
//!   `SQLite` backend behind one async contract
//! - **Excess analysis**: per-day calorie totals computed on read,
//!   never stored
//! - **Time-of-day windows**: filtered views that hide meals without
//!   changing the totals they are judged by
//!
//! ## Architecture
//!
//! - **Store**: the persistence contract with in-memory and `SQLite`
//!   backends behind a URL-driven factory
//! - **Service**: business rules; turns a store's absent answers into
//!   `NotFound` so ownership is checked in exactly one place
//! - **API**: caller-facing operations scoped to an injected current
//!   user, with request validation and excess decoration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use mealtrack::api::{FixedUserProvider, MealApi};
//! use mealtrack::services::meals::MealService;
//! use mealtrack::store::factory::Store;
//! use mealtrack::store::MealStore;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Store::new("memory:", 100_000).await?;
//!     store.migrate().await?;
//!
//!     let api = MealApi::new(
//!         MealService::new(store),
//!         FixedUserProvider::new(Uuid::new_v4(), 2000),
//!     );
//!     for meal in api.get_all().await? {
//!         println!(
//!             "{} {} ({} kcal, excess: {})",
//!             meal.eaten_at, meal.description, meal.calories, meal.excess
//!         );
//!     }
//!     Ok(())
//! }
//! ```

/// Caller-facing meal operations scoped to the current user
pub mod api;

/// Configuration management and environment parsing
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Unified error handling for meal operations
pub mod errors;

/// Per-day calorie aggregation and excess flags
pub mod excess;

/// Production logging and structured output
pub mod logging;

/// Common data models for meals
pub mod models;

/// Domain service layer over the store contract
pub mod services;

/// Meal persistence contract, backends, and factory
pub mod store;
