// ABOUTME: Domain service layer for meal business logic
// ABOUTME: The single choke point for ownership and not-found semantics
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Domain service layer.
//!
//! Services sit between storage backends and any caller-facing surface.
//! Business rules live here, so every entry point observes identical
//! semantics regardless of the backend in use.

/// Meal lifecycle operations: CRUD, excess analysis, date-range queries
pub mod meals;
