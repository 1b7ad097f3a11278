// ABOUTME: SQLite meal store built on sqlx with in-code schema migration
// ABOUTME: A unique (user_id, eaten_at) index backs the duplicate-timestamp constraint
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! SQLite-backed [`MealStore`].
//!
//! The schema is created on construction; the `sqlite_sequence` row for
//! the meals table is primed with the id seed so AUTOINCREMENT hands out
//! ids from the same space as the in-memory backend. Ownership checks
//! and timestamp uniqueness ride on single statements, so they hold
//! under concurrent writers without explicit transactions.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::MealStore;
use crate::errors::{MealError, MealResult};
use crate::models::Meal;

/// SQLite meal store; clones share one connection pool
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    id_seed: i64,
}

impl SqliteStore {
    /// Get a reference to the connection pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Ensure SQLite creates the database file if it doesn't exist.
    /// In-memory databases and URLs that already carry options are left
    /// untouched.
    fn connection_options(database_url: &str) -> String {
        if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
            && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        }
    }

    /// Create the meals table, its indexes, and prime the id sequence
    async fn migrate_meals(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS meals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                eaten_at DATETIME NOT NULL,
                description TEXT NOT NULL,
                calories INTEGER NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_meals_user_eaten_at \
             ON meals(user_id, eaten_at)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_meals_user_id ON meals(user_id)")
            .execute(&self.pool)
            .await?;

        // Prime AUTOINCREMENT so assigned ids start above the seed. The
        // sequence row only exists after a first insert, so this is a
        // no-op on every migration after data exists.
        sqlx::query(
            r"
            INSERT INTO sqlite_sequence (name, seq)
            SELECT 'meals', $1
            WHERE NOT EXISTS (SELECT 1 FROM sqlite_sequence WHERE name = 'meals')
            ",
        )
        .bind(self.id_seed)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Map a constraint violation on (user_id, eaten_at) to the
    /// duplicate-timestamp outcome; everything else is a storage failure
    fn map_conflict(err: sqlx::Error, eaten_at: DateTime<Utc>) -> MealError {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                MealError::duplicate_timestamp(eaten_at)
            }
            _ => MealError::storage(err),
        }
    }

    fn row_to_meal(row: &SqliteRow) -> MealResult<Meal> {
        let id: i64 = row.try_get("id").map_err(MealError::storage)?;
        let user_id: String = row.try_get("user_id").map_err(MealError::storage)?;
        let owner_id = Uuid::parse_str(&user_id).map_err(MealError::storage)?;
        let eaten_at: DateTime<Utc> = row.try_get("eaten_at").map_err(MealError::storage)?;
        let description: String = row.try_get("description").map_err(MealError::storage)?;
        let calories: u32 = row.try_get("calories").map_err(MealError::storage)?;

        Ok(Meal {
            id: Some(id),
            owner_id,
            eaten_at,
            description,
            calories,
        })
    }

    async fn insert_new(&self, mut meal: Meal) -> MealResult<Meal> {
        let result = sqlx::query(
            r"
            INSERT INTO meals (user_id, eaten_at, description, calories)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(meal.owner_id.to_string())
        .bind(meal.eaten_at)
        .bind(&meal.description)
        .bind(meal.calories)
        .execute(&self.pool)
        .await
        .map_err(|err| Self::map_conflict(err, meal.eaten_at))?;

        meal.id = Some(result.last_insert_rowid());
        Ok(meal)
    }

    async fn overwrite(&self, id: i64, meal: Meal) -> MealResult<Option<Meal>> {
        // One conditional statement: the WHERE clause is the ownership
        // check, the unique index is the duplicate check.
        let result = sqlx::query(
            r"
            UPDATE meals
            SET eaten_at = $3, description = $4, calories = $5
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(meal.owner_id.to_string())
        .bind(meal.eaten_at)
        .bind(&meal.description)
        .bind(meal.calories)
        .execute(&self.pool)
        .await
        .map_err(|err| Self::map_conflict(err, meal.eaten_at))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(meal))
    }

    fn day_start(date: NaiveDate) -> DateTime<Utc> {
        date.and_time(NaiveTime::MIN).and_utc()
    }
}

#[async_trait]
impl MealStore for SqliteStore {
    async fn new(database_url: &str, id_seed: i64) -> Result<Self> {
        let pool = SqlitePool::connect(&Self::connection_options(database_url)).await?;
        let store = Self { pool, id_seed };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        self.migrate_meals().await
    }

    async fn save(&self, mut meal: Meal, owner_id: Uuid) -> MealResult<Option<Meal>> {
        meal.owner_id = owner_id;
        match meal.id {
            None => self.insert_new(meal).await.map(Some),
            Some(id) => self.overwrite(id, meal).await,
        }
    }

    async fn delete(&self, id: i64, owner_id: Uuid) -> MealResult<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(MealError::storage)?;

        Ok(result.rows_affected() > 0)
    }

    async fn get(&self, id: i64, owner_id: Uuid) -> MealResult<Option<Meal>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, eaten_at, description, calories
            FROM meals
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(id)
        .bind(owner_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(MealError::storage)?;

        row.as_ref().map(Self::row_to_meal).transpose()
    }

    async fn get_all(&self, owner_id: Uuid) -> MealResult<Vec<Meal>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, eaten_at, description, calories
            FROM meals
            WHERE user_id = $1
            ORDER BY eaten_at DESC
            ",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(MealError::storage)?;

        rows.iter().map(Self::row_to_meal).collect()
    }

    async fn get_between(
        &self,
        owner_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> MealResult<Vec<Meal>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, eaten_at, description, calories
            FROM meals
            WHERE user_id = $1 AND eaten_at >= $2 AND eaten_at < $3
            ORDER BY eaten_at DESC
            ",
        )
        .bind(owner_id.to_string())
        .bind(Self::day_start(start_date))
        .bind(Self::day_start(end_date))
        .fetch_all(&self.pool)
        .await
        .map_err(MealError::storage)?;

        rows.iter().map(Self::row_to_meal).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_urls_get_create_mode() {
        assert_eq!(
            SqliteStore::connection_options("sqlite:./data/meals.db"),
            "sqlite:./data/meals.db?mode=rwc"
        );
    }

    #[test]
    fn memory_and_parameterized_urls_are_untouched() {
        assert_eq!(
            SqliteStore::connection_options("sqlite::memory:"),
            "sqlite::memory:"
        );
        assert_eq!(
            SqliteStore::connection_options("sqlite:meals.db?mode=ro"),
            "sqlite:meals.db?mode=ro"
        );
    }
}
