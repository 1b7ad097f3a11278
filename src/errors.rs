// ABOUTME: Unified error handling for meal storage and service operations
// ABOUTME: Every failure is a tagged outcome callers can match on, never a bare string
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Unified error type for the meal tracking core.
//!
//! All fallible operations in this crate return [`MealResult`], so the
//! interesting outcomes (not found, duplicate timestamp, rejected input)
//! are part of every signature and cannot be silently ignored.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type used by every meal operation in this crate
pub type MealResult<T> = Result<T, MealError>;

/// Errors produced by meal stores, the meal service, and the API layer
#[derive(Debug, Error)]
pub enum MealError {
    /// No meal with this id is visible to the requesting owner.
    ///
    /// A meal that exists but belongs to someone else is reported exactly
    /// like a meal that never existed, so ownership cannot be probed.
    #[error("meal {id} not found")]
    NotFound {
        /// Identifier the caller asked for
        id: i64,
    },

    /// The owner already has a meal recorded at this exact timestamp
    #[error("a meal is already recorded at {eaten_at}")]
    DuplicateTimestamp {
        /// Timestamp that collided
        eaten_at: DateTime<Utc>,
    },

    /// Input was rejected before reaching the store
    #[error("invalid meal data: {0}")]
    Validation(String),

    /// The storage backend failed (connection, query, corruption)
    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl MealError {
    /// Not-found error for the given meal id
    #[must_use]
    pub const fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    /// Duplicate-timestamp error for the given moment
    #[must_use]
    pub const fn duplicate_timestamp(eaten_at: DateTime<Utc>) -> Self {
        Self::DuplicateTimestamp { eaten_at }
    }

    /// Validation error with a caller-facing message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Storage error wrapping a backend failure
    pub fn storage(err: impl Into<anyhow::Error>) -> Self {
        Self::Storage(err.into())
    }

    /// HTTP status code this error maps to at a web boundary
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::DuplicateTimestamp { .. } => 409,
            Self::Validation(_) => 400,
            Self::Storage(_) => 500,
        }
    }

    /// True when this is a not-found outcome
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True when this is a duplicate-timestamp outcome
    #[must_use]
    pub const fn is_duplicate_timestamp(&self) -> bool {
        matches!(self, Self::DuplicateTimestamp { .. })
    }
}
