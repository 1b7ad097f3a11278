// ABOUTME: Core domain models for meal tracking
// ABOUTME: Persisted Meal records and the derived per-day excess view
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Domain models shared by stores, the meal service, and the API layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recorded meal belonging to exactly one owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
    /// Store-assigned identifier, `None` until the meal is persisted.
    /// Immutable once assigned.
    pub id: Option<i64>,
    /// Owner of this meal; set by the store on save, never by callers
    pub owner_id: Uuid,
    /// Moment the meal was eaten; the calendar date of this timestamp
    /// is what the per-day excess analysis groups by
    pub eaten_at: DateTime<Utc>,
    /// Free-form description ("Breakfast", "Late snack", ...)
    pub description: String,
    /// Energy content in kilocalories, always positive
    pub calories: u32,
}

impl Meal {
    /// New unsaved meal (no id yet)
    pub fn new(
        owner_id: Uuid,
        eaten_at: DateTime<Utc>,
        description: impl Into<String>,
        calories: u32,
    ) -> Self {
        Self {
            id: None,
            owner_id,
            eaten_at,
            description: description.into(),
            calories,
        }
    }

    /// True while the meal has not been persisted yet
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Calendar date this meal counts towards
    #[must_use]
    pub fn eaten_date(&self) -> NaiveDate {
        self.eaten_at.date_naive()
    }
}

/// A meal decorated with the excess flag of its day.
///
/// Derived on every read, never stored: `excess` is true when the total
/// calories of all meals the owner ate that calendar day exceed the daily
/// budget. Every meal of a given day carries the same flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealWithExcess {
    /// Identifier of the underlying meal
    pub id: i64,
    /// Moment the meal was eaten
    pub eaten_at: DateTime<Utc>,
    /// Free-form description
    pub description: String,
    /// Energy content of this meal alone, in kilocalories
    pub calories: u32,
    /// Whether the whole day went over the calorie budget
    pub excess: bool,
}

impl MealWithExcess {
    /// Decorate a persisted meal with its day's excess flag.
    ///
    /// Meals coming out of a store always carry an id; an unsaved meal
    /// maps to id 0.
    #[must_use]
    pub fn from_meal(meal: &Meal, excess: bool) -> Self {
        Self {
            id: meal.id.unwrap_or_default(),
            eaten_at: meal.eaten_at,
            description: meal.description.clone(),
            calories: meal.calories,
            excess,
        }
    }
}
