// ABOUTME: Storage abstraction for meal records with pluggable backends
// ABOUTME: In-memory and SQLite implementations behind one owner-scoped trait
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Meal storage abstraction.
//!
//! Every operation is scoped to an owner: a meal belonging to someone
//! else behaves exactly like a meal that does not exist. Backends are
//! selected at runtime from a connection string via [`factory::Store`].

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::MealResult;
use crate::models::Meal;

pub mod factory;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

/// Core meal storage trait
///
/// All storage backends implement this trait to provide a consistent
/// interface for the service layer.
#[async_trait]
pub trait MealStore: Send + Sync + Clone {
    /// Create a new store from a connection string and id sequence seed
    async fn new(url: &str, id_seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Prepare backend state (schema, sequences); idempotent
    async fn migrate(&self) -> Result<()>;

    /// Persist a meal for the given owner.
    ///
    /// A meal without an id is created: the store assigns the next id,
    /// stamps the owner, and returns the stored record. A meal with an
    /// id overwrites the existing record only when that record belongs
    /// to `owner_id`; `Ok(None)` means no such meal was visible and
    /// nothing was written. Two meals of one owner can never share an
    /// `eaten_at` timestamp.
    async fn save(&self, meal: Meal, owner_id: Uuid) -> MealResult<Option<Meal>>;

    /// Remove a meal; true when an owned meal was actually deleted
    async fn delete(&self, id: i64, owner_id: Uuid) -> MealResult<bool>;

    /// Fetch a single meal visible to the owner
    async fn get(&self, id: i64, owner_id: Uuid) -> MealResult<Option<Meal>>;

    /// All meals of the owner, newest `eaten_at` first
    async fn get_all(&self, owner_id: Uuid) -> MealResult<Vec<Meal>>;

    /// Meals whose calendar date lies in the half-open range
    /// `[start_date, end_date)`, newest first; an empty range yields an
    /// empty vec
    async fn get_between(
        &self,
        owner_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> MealResult<Vec<Meal>>;
}
