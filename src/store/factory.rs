// ABOUTME: Store factory with runtime backend selection from connection strings
// ABOUTME: Provides a unified Store enum delegating to in-memory or SQLite backends
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Store factory for creating meal store backends.
//!
//! This module provides automatic backend detection and creation based
//! on connection strings.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use super::memory::InMemoryStore;
use super::MealStore;
use crate::errors::MealResult;
use crate::models::Meal;

#[cfg(feature = "sqlite")]
use super::sqlite::SqliteStore;

/// Supported store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// Process-local, nothing survives a restart
    Memory,
    /// Embedded SQLite database file (or `sqlite::memory:`)
    Sqlite,
}

/// Store instance wrapper that delegates to the appropriate backend
#[derive(Clone)]
pub enum Store {
    /// In-memory backend
    Memory(InMemoryStore),
    /// SQLite backend
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteStore),
}

impl Store {
    /// Get a descriptive string for the current store backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Memory(_) => "In-Memory (Ephemeral)",
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "SQLite (Embedded)",
        }
    }

    /// Get the store type enum
    #[must_use]
    pub const fn store_type(&self) -> StoreType {
        match self {
            Self::Memory(_) => StoreType::Memory,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => StoreType::Sqlite,
        }
    }

    /// Get detailed backend information for logging/monitoring
    #[must_use]
    pub fn info_summary(&self) -> String {
        match self {
            Self::Memory(_) => "Store Backend: In-Memory\n\
                     Type: Process-local concurrent maps\n\
                     Use Case: Tests, demos, ephemeral deployments\n\
                     Features: Lock-free reads, atomic id assignment"
                .to_string(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "Store Backend: SQLite\n\
                     Type: Embedded file-based database\n\
                     Use Case: Single-node durable deployments\n\
                     Features: Zero-configuration, serverless, lightweight"
                .to_string(),
        }
    }
}

/// Automatically detect the store type from a connection string
///
/// # Errors
///
/// Returns an error if:
/// - The URL format is not recognized (must start with `memory:` or `sqlite:`)
/// - A `sqlite:` URL is provided but the `sqlite` feature is not enabled
/// - A PostgreSQL URL is provided (no PostgreSQL backend ships with this crate)
pub fn detect_store_type(store_url: &str) -> Result<StoreType> {
    if store_url.starts_with("memory:") {
        Ok(StoreType::Memory)
    } else if store_url.starts_with("sqlite:") {
        #[cfg(feature = "sqlite")]
        return Ok(StoreType::Sqlite);

        #[cfg(not(feature = "sqlite"))]
        return Err(anyhow!(
            "SQLite connection string detected, but SQLite support is not enabled. \
             Enable the 'sqlite' feature flag in Cargo.toml"
        ));
    } else if store_url.starts_with("postgresql://") || store_url.starts_with("postgres://") {
        Err(anyhow!(
            "PostgreSQL connection string detected, but no PostgreSQL backend ships \
             with this crate. Use memory: or sqlite:path/to/meals.db"
        ))
    } else {
        Err(anyhow!(
            "Unsupported store URL format: {store_url}. \
             Supported formats: memory:, sqlite:path/to/meals.db"
        ))
    }
}

// Implement MealStore for the enum by delegating to the appropriate backend
#[async_trait]
impl MealStore for Store {
    /// Create a new store based on the connection string
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The store URL format is unsupported
    /// - The backend connection fails
    /// - Schema migration fails
    async fn new(store_url: &str, id_seed: i64) -> Result<Self> {
        debug!("Detecting store type from URL: {}", store_url);
        let store_type = detect_store_type(store_url)?;
        info!("Detected store type: {:?}", store_type);

        match store_type {
            StoreType::Memory => {
                info!("Initializing in-memory meal store");
                let store = InMemoryStore::new(store_url, id_seed).await?;
                Ok(Self::Memory(store))
            }
            #[cfg(feature = "sqlite")]
            StoreType::Sqlite => {
                info!("Initializing SQLite meal store");
                let store = SqliteStore::new(store_url, id_seed).await?;
                info!("SQLite meal store initialized successfully");
                Ok(Self::Sqlite(store))
            }
            #[cfg(not(feature = "sqlite"))]
            StoreType::Sqlite => {
                let err_msg = "SQLite support not enabled. Enable the 'sqlite' feature flag.";
                tracing::error!("{}", err_msg);
                Err(anyhow!(err_msg))
            }
        }
    }

    /// Prepare backend state (schema, sequences)
    ///
    /// # Errors
    ///
    /// Returns an error if schema statements fail to execute or the
    /// connection is lost
    async fn migrate(&self) -> Result<()> {
        match self {
            Self::Memory(store) => store.migrate().await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.migrate().await,
        }
    }

    /// Persist a meal for the given owner
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::MealError::DuplicateTimestamp`] when the
    /// owner already has a different meal at the same `eaten_at`, or a
    /// storage error when the backend fails
    async fn save(&self, meal: Meal, owner_id: Uuid) -> MealResult<Option<Meal>> {
        match self {
            Self::Memory(store) => store.save(meal, owner_id).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.save(meal, owner_id).await,
        }
    }

    async fn delete(&self, id: i64, owner_id: Uuid) -> MealResult<bool> {
        match self {
            Self::Memory(store) => store.delete(id, owner_id).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.delete(id, owner_id).await,
        }
    }

    async fn get(&self, id: i64, owner_id: Uuid) -> MealResult<Option<Meal>> {
        match self {
            Self::Memory(store) => store.get(id, owner_id).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.get(id, owner_id).await,
        }
    }

    async fn get_all(&self, owner_id: Uuid) -> MealResult<Vec<Meal>> {
        match self {
            Self::Memory(store) => store.get_all(owner_id).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.get_all(owner_id).await,
        }
    }

    async fn get_between(
        &self,
        owner_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> MealResult<Vec<Meal>> {
        match self {
            Self::Memory(store) => store.get_between(owner_id, start_date, end_date).await,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(store) => store.get_between(owner_id, start_date, end_date).await,
        }
    }
}
