// ABOUTME: Per-day calorie aggregation and excess flag computation
// ABOUTME: Pure functions, no storage access; derived flags are never persisted
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Excess-calorie analysis over a set of meals.
//!
//! Meals are grouped by the calendar date of `eaten_at`; a day is in
//! excess when its calorie total is strictly greater than the daily
//! budget. Every meal of that day carries the day's flag, so the result
//! is independent of input order.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};

use crate::models::{Meal, MealWithExcess};

/// Decorate each meal with the excess flag of its calendar day.
///
/// Input order is preserved in the output. Day totals are summed in
/// `u64`, so a day of many `u32` meals cannot overflow.
#[must_use]
pub fn with_excess(meals: &[Meal], calories_per_day: u32) -> Vec<MealWithExcess> {
    with_excess_window(meals, calories_per_day, None, None)
}

/// Decorate meals with excess flags, keeping only those inside a
/// time-of-day window.
///
/// The window is half-open: a meal is visible when `start_time <= t <
/// end_time`, with `None` meaning unbounded on that side. Day totals are
/// always computed over *all* supplied meals; the window decides which
/// meals appear in the output, never which calories count.
#[must_use]
pub fn with_excess_window(
    meals: &[Meal],
    calories_per_day: u32,
    start_time: Option<NaiveTime>,
    end_time: Option<NaiveTime>,
) -> Vec<MealWithExcess> {
    let totals = day_totals(meals);
    let budget = u64::from(calories_per_day);

    meals
        .iter()
        .filter(|meal| in_window(meal.eaten_at.time(), start_time, end_time))
        .map(|meal| {
            let day_total = totals.get(&meal.eaten_date()).copied().unwrap_or(0);
            MealWithExcess::from_meal(meal, day_total > budget)
        })
        .collect()
}

/// Sum calories per calendar day
fn day_totals(meals: &[Meal]) -> HashMap<NaiveDate, u64> {
    let mut totals = HashMap::new();
    for meal in meals {
        *totals.entry(meal.eaten_date()).or_insert(0_u64) += u64::from(meal.calories);
    }
    totals
}

/// Half-open time-of-day membership check
fn in_window(time: NaiveTime, start: Option<NaiveTime>, end: Option<NaiveTime>) -> bool {
    start.is_none_or(|s| time >= s) && end.is_none_or(|e| time < e)
}
