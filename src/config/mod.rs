// ABOUTME: Configuration management module for centralized application settings
// ABOUTME: Environment parsing, typed store URLs, and validated runtime options
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Configuration module.
//!
//! Everything the application reads from the environment funnels
//! through here: the store location, the calorie budget, the id seed,
//! and the log level.

/// Environment and application configuration
pub mod environment;

pub use environment::{AppConfig, LogLevel, MealsConfig, StoreConfig, StoreUrl};
