// ABOUTME: In-memory meal store backed by DashMap with atomic id assignment
// ABOUTME: Timestamp uniqueness is enforced through an entry-claimed index, race-free
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! In-memory [`MealStore`] backend.
//!
//! Meals live in a concurrent map keyed by id; a second map keyed by
//! `(owner, eaten_at)` backs the duplicate-timestamp constraint. Writers
//! claim the timestamp slot through the `DashMap` entry API before
//! touching the primary map, so two racing saves can never both win the
//! same timestamp. Scans iterate without a global lock and may observe a
//! concurrently mutated snapshot.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::MealStore;
use crate::constants::defaults;
use crate::errors::{MealError, MealResult};
use crate::models::Meal;

/// In-memory meal store, cheap to clone and safe to share across tasks
#[derive(Clone)]
pub struct InMemoryStore {
    /// Primary storage keyed by meal id
    meals: Arc<DashMap<i64, Meal>>,
    /// Uniqueness index: which meal id holds each (owner, timestamp) slot
    by_timestamp: Arc<DashMap<(Uuid, DateTime<Utc>), i64>>,
    /// Id sequence; assigned ids are strictly greater than the seed
    sequence: Arc<AtomicI64>,
}

impl InMemoryStore {
    /// Empty store whose id sequence starts just above `id_seed`
    #[must_use]
    pub fn with_seed(id_seed: i64) -> Self {
        Self {
            meals: Arc::new(DashMap::new()),
            by_timestamp: Arc::new(DashMap::new()),
            sequence: Arc::new(AtomicI64::new(id_seed)),
        }
    }

    fn next_id(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Claim the (owner, timestamp) slot for `id`.
    ///
    /// A slot already held by a different meal is a duplicate; a slot
    /// held by `id` itself is fine (an update keeping its timestamp).
    fn claim_timestamp(&self, owner_id: Uuid, eaten_at: DateTime<Utc>, id: i64) -> MealResult<()> {
        match self.by_timestamp.entry((owner_id, eaten_at)) {
            Entry::Occupied(slot) if *slot.get() != id => {
                Err(MealError::duplicate_timestamp(eaten_at))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }

    /// Release a slot, but only if `id` still holds it
    fn release_timestamp(&self, owner_id: Uuid, eaten_at: DateTime<Utc>, id: i64) {
        self.by_timestamp
            .remove_if(&(owner_id, eaten_at), |_, held_by| *held_by == id);
    }

    fn insert_new(&self, mut meal: Meal) -> MealResult<Meal> {
        let id = self.next_id();
        meal.id = Some(id);
        self.claim_timestamp(meal.owner_id, meal.eaten_at, id)?;
        self.meals.insert(id, meal.clone());
        Ok(meal)
    }

    fn overwrite(&self, id: i64, meal: Meal) -> MealResult<Option<Meal>> {
        // Ownership pre-check, also remembering the timestamp the meal
        // currently occupies.
        let previous_eaten_at = match self.meals.get(&id) {
            Some(existing) if existing.owner_id == meal.owner_id => existing.eaten_at,
            _ => return Ok(None),
        };

        let timestamp_moved = meal.eaten_at != previous_eaten_at;
        if timestamp_moved {
            self.claim_timestamp(meal.owner_id, meal.eaten_at, id)?;
        }

        // Re-check under the per-key guard; the meal may have been
        // deleted between the pre-check and now.
        let overwritten = match self.meals.entry(id) {
            Entry::Occupied(mut slot) if slot.get().owner_id == meal.owner_id => {
                slot.insert(meal.clone());
                true
            }
            _ => false,
        };

        if overwritten {
            if timestamp_moved {
                self.release_timestamp(meal.owner_id, previous_eaten_at, id);
            }
            Ok(Some(meal))
        } else {
            if timestamp_moved {
                // Lost the race; give the claimed slot back.
                self.release_timestamp(meal.owner_id, meal.eaten_at, id);
            }
            Ok(None)
        }
    }

    fn collect_sorted(&self, owner_id: Uuid, range: Option<(NaiveDate, NaiveDate)>) -> Vec<Meal> {
        let mut meals: Vec<Meal> = self
            .meals
            .iter()
            .filter(|entry| {
                let meal = entry.value();
                meal.owner_id == owner_id
                    && range.is_none_or(|(start, end)| {
                        let date = meal.eaten_date();
                        date >= start && date < end
                    })
            })
            .map(|entry| entry.value().clone())
            .collect();
        meals.sort_by(|a, b| b.eaten_at.cmp(&a.eaten_at));
        meals
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::with_seed(defaults::ID_SEED)
    }
}

#[async_trait]
impl MealStore for InMemoryStore {
    /// The connection string carries no state for this backend and is
    /// ignored; only the seed matters.
    async fn new(_url: &str, id_seed: i64) -> Result<Self> {
        Ok(Self::with_seed(id_seed))
    }

    async fn migrate(&self) -> Result<()> {
        Ok(())
    }

    async fn save(&self, mut meal: Meal, owner_id: Uuid) -> MealResult<Option<Meal>> {
        meal.owner_id = owner_id;
        match meal.id {
            None => self.insert_new(meal).map(Some),
            Some(id) => self.overwrite(id, meal),
        }
    }

    async fn delete(&self, id: i64, owner_id: Uuid) -> MealResult<bool> {
        match self.meals.remove_if(&id, |_, meal| meal.owner_id == owner_id) {
            Some((_, meal)) => {
                self.release_timestamp(owner_id, meal.eaten_at, id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get(&self, id: i64, owner_id: Uuid) -> MealResult<Option<Meal>> {
        Ok(self.meals.get(&id).and_then(|entry| {
            (entry.value().owner_id == owner_id).then(|| entry.value().clone())
        }))
    }

    async fn get_all(&self, owner_id: Uuid) -> MealResult<Vec<Meal>> {
        Ok(self.collect_sorted(owner_id, None))
    }

    async fn get_between(
        &self,
        owner_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> MealResult<Vec<Meal>> {
        Ok(self.collect_sorted(owner_id, Some((start_date, end_date))))
    }
}
