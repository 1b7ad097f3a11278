// ABOUTME: Meal business logic over any MealStore backend
// ABOUTME: Turns the store's absent signals into NotFound and wires in excess analysis
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Meal service.
//!
//! This is the one place where a store's quiet "nothing there" answers
//! become [`MealError::NotFound`]. Callers above the service never see
//! an `Option` and never re-check ownership; a missing meal and a
//! foreign meal are already indistinguishable here.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::constants::dates;
use crate::errors::{MealError, MealResult};
use crate::excess;
use crate::models::{Meal, MealWithExcess};
use crate::store::MealStore;

/// Meal operations bound to an injected storage backend
#[derive(Clone)]
pub struct MealService<S: MealStore> {
    store: S,
}

impl<S: MealStore> MealService<S> {
    /// Service over the given store
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store (mainly for composition roots)
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Persist a meal for the owner.
    ///
    /// A meal without an id is created and returned with its assigned
    /// id. A meal carrying an id overwrites the owner's existing record.
    ///
    /// # Errors
    ///
    /// Returns [`MealError::NotFound`] when an id-carrying meal does not
    /// exist for this owner, [`MealError::DuplicateTimestamp`] when the
    /// owner already has another meal at the same `eaten_at`, or a
    /// storage error
    pub async fn save(&self, owner_id: Uuid, meal: Meal) -> MealResult<Meal> {
        let meal_id = meal.id;
        match self.store.save(meal, owner_id).await? {
            Some(stored) => Ok(stored),
            // The store only signals absence for id-carrying saves.
            None => Err(MealError::not_found(meal_id.unwrap_or_default())),
        }
    }

    /// Overwrite an existing meal of the owner.
    ///
    /// # Errors
    ///
    /// Returns [`MealError::Validation`] when the meal carries no id,
    /// [`MealError::NotFound`] when no owned meal with that id exists,
    /// [`MealError::DuplicateTimestamp`] on a timestamp collision, or a
    /// storage error
    pub async fn update(&self, owner_id: Uuid, meal: Meal) -> MealResult<Meal> {
        let id = meal
            .id
            .ok_or_else(|| MealError::validation("an update requires the meal id"))?;
        self.store
            .save(meal, owner_id)
            .await?
            .ok_or_else(|| MealError::not_found(id))
    }

    /// Delete an owned meal.
    ///
    /// # Errors
    ///
    /// Returns [`MealError::NotFound`] when no owned meal with that id
    /// exists (including a repeated delete), or a storage error
    pub async fn delete(&self, owner_id: Uuid, meal_id: i64) -> MealResult<()> {
        if self.store.delete(meal_id, owner_id).await? {
            Ok(())
        } else {
            Err(MealError::not_found(meal_id))
        }
    }

    /// Fetch a single owned meal.
    ///
    /// # Errors
    ///
    /// Returns [`MealError::NotFound`] when the meal is missing or
    /// belongs to someone else, or a storage error
    pub async fn get(&self, owner_id: Uuid, meal_id: i64) -> MealResult<Meal> {
        self.store
            .get(meal_id, owner_id)
            .await?
            .ok_or_else(|| MealError::not_found(meal_id))
    }

    /// All meals of the owner decorated with per-day excess flags,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the backend fails
    pub async fn get_all(
        &self,
        owner_id: Uuid,
        calories_per_day: u32,
    ) -> MealResult<Vec<MealWithExcess>> {
        let meals = self.store.get_all(owner_id).await?;
        Ok(excess::with_excess(&meals, calories_per_day))
    }

    /// Owner's meals with `eaten_at` dates in the half-open range
    /// `[start_date, end_date)`, newest first.
    ///
    /// Absent bounds mean unbounded on that side; they are clamped to
    /// sentinel dates here, so backends always receive concrete bounds.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the backend fails
    pub async fn get_between(
        &self,
        owner_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> MealResult<Vec<Meal>> {
        let start = start_date.unwrap_or_else(dates::min_date);
        let end = end_date.unwrap_or_else(dates::max_date);
        self.store.get_between(owner_id, start, end).await
    }
}
