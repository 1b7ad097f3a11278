// ABOUTME: Caller-facing meal operations scoped to the provider's current user
// ABOUTME: Validates request shape, delegates to the service, decorates reads with excess flags
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Presentation adapter over the meal service.
//!
//! The surrounding session/auth layer is an external collaborator; a
//! [`CurrentUserProvider`] stands in for it and supplies the owner id
//! and daily calorie budget of the request in flight. Every operation
//! is implicitly scoped to that user, so callers never pass owner ids.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::constants::limits;
use crate::errors::{MealError, MealResult};
use crate::excess;
use crate::models::{Meal, MealWithExcess};
use crate::services::meals::MealService;
use crate::store::MealStore;

/// Owner id and calorie budget of the request in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserContext {
    /// User every operation is scoped to
    pub user_id: Uuid,
    /// The user's configured daily calorie budget
    pub calories_per_day: u32,
}

/// Stand-in for the session/auth layer that would normally resolve the
/// caller
pub trait CurrentUserProvider: Send + Sync {
    /// The user on whose behalf the current operation runs
    fn current_user(&self) -> UserContext;
}

/// Provider pinned to a single user, for CLI wiring and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedUserProvider {
    context: UserContext,
}

impl FixedUserProvider {
    /// Provider that always answers with the given user and budget
    #[must_use]
    pub const fn new(user_id: Uuid, calories_per_day: u32) -> Self {
        Self {
            context: UserContext {
                user_id,
                calories_per_day,
            },
        }
    }
}

impl CurrentUserProvider for FixedUserProvider {
    fn current_user(&self) -> UserContext {
        self.context
    }
}

/// Incoming meal payload; owners are never client-supplied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRequest {
    /// Meal id, absent on create and required on update
    #[serde(default)]
    pub id: Option<i64>,
    /// When the meal was eaten
    pub eaten_at: DateTime<Utc>,
    /// What was eaten
    pub description: String,
    /// Calorie count
    pub calories: u32,
}

impl MealRequest {
    fn into_meal(self, owner_id: Uuid) -> Meal {
        let mut meal = Meal::new(owner_id, self.eaten_at, self.description, self.calories);
        meal.id = self.id;
        meal
    }

    fn check_calories(&self) -> MealResult<()> {
        if self.calories < limits::MIN_CALORIES {
            return Err(MealError::validation(
                "a meal needs a positive calorie count",
            ));
        }
        Ok(())
    }
}

/// Meal operations for the provider's current user
pub struct MealApi<S: MealStore, P: CurrentUserProvider> {
    service: MealService<S>,
    users: P,
}

impl<S: MealStore, P: CurrentUserProvider> MealApi<S, P> {
    /// Adapter over the given service and user provider
    pub const fn new(service: MealService<S>, users: P) -> Self {
        Self { service, users }
    }

    /// Record a new meal for the current user.
    ///
    /// # Errors
    ///
    /// Returns [`MealError::Validation`] when the request carries an id
    /// or too few calories, [`MealError::DuplicateTimestamp`] when the
    /// user already has a meal at that instant, or a storage error
    pub async fn create(&self, request: MealRequest) -> MealResult<Meal> {
        let user = self.users.current_user();
        info!(
            "create meal at {} for user {}",
            request.eaten_at, user.user_id
        );
        if request.id.is_some() {
            return Err(MealError::validation("a new meal must not carry an id"));
        }
        request.check_calories()?;
        self.service
            .save(user.user_id, request.into_meal(user.user_id))
            .await
    }

    /// Fetch one of the current user's meals.
    ///
    /// # Errors
    ///
    /// Returns [`MealError::NotFound`] when the meal is missing or not
    /// owned by the current user, or a storage error
    pub async fn get(&self, meal_id: i64) -> MealResult<Meal> {
        let user = self.users.current_user();
        info!("get meal {meal_id} for user {}", user.user_id);
        self.service.get(user.user_id, meal_id).await
    }

    /// Overwrite one of the current user's meals.
    ///
    /// The body must agree with the addressed id; a missing or
    /// mismatched body id is rejected before anything reaches the store.
    ///
    /// # Errors
    ///
    /// Returns [`MealError::Validation`] on an inconsistent request,
    /// [`MealError::NotFound`] when the meal is missing or not owned,
    /// [`MealError::DuplicateTimestamp`] on a timestamp collision, or a
    /// storage error
    pub async fn update(&self, request: MealRequest, meal_id: i64) -> MealResult<Meal> {
        let user = self.users.current_user();
        info!("update meal {meal_id} for user {}", user.user_id);
        match request.id {
            Some(id) if id == meal_id => {}
            Some(id) => {
                return Err(MealError::validation(format!(
                    "body id {id} does not match meal id {meal_id}"
                )));
            }
            None => return Err(MealError::validation("an update requires the meal id")),
        }
        request.check_calories()?;
        self.service
            .update(user.user_id, request.into_meal(user.user_id))
            .await
    }

    /// Delete one of the current user's meals.
    ///
    /// # Errors
    ///
    /// Returns [`MealError::NotFound`] when the meal is missing or not
    /// owned by the current user, or a storage error
    pub async fn delete(&self, meal_id: i64) -> MealResult<()> {
        let user = self.users.current_user();
        info!("delete meal {meal_id} for user {}", user.user_id);
        self.service.delete(user.user_id, meal_id).await
    }

    /// All of the current user's meals with per-day excess flags,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the backend fails
    pub async fn get_all(&self) -> MealResult<Vec<MealWithExcess>> {
        let user = self.users.current_user();
        info!("get all meals of user {}", user.user_id);
        self.service
            .get_all(user.user_id, user.calories_per_day)
            .await
    }

    /// The current user's meals inside the date range, narrowed to a
    /// time-of-day window, with per-day excess flags.
    ///
    /// All four bounds are optional and half-open on the end side. The
    /// excess flags are computed from every meal of each selected day;
    /// the time window only decides which meals appear in the output.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the backend fails
    pub async fn get_between(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> MealResult<Vec<MealWithExcess>> {
        let user = self.users.current_user();
        info!(
            "filter meals of user {} from {start_date:?} to {end_date:?}",
            user.user_id
        );
        let meals = self
            .service
            .get_between(user.user_id, start_date, end_date)
            .await?;
        Ok(excess::with_excess_window(
            &meals,
            user.calories_per_day,
            start_time,
            end_time,
        ))
    }
}
