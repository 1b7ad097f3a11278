// ABOUTME: Integration tests for the in-memory meal store
// ABOUTME: Covers CRUD, owner isolation, timestamp uniqueness, and range queries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use anyhow::Result;
use chrono::NaiveDate;
use mealtrack::{constants::defaults, errors::MealError, store::MealStore};

mod common;

#[tokio::test]
async fn test_save_assigns_ids_above_the_seed() -> Result<()> {
    let store = common::create_memory_store().await?;
    let owner = common::test_owner();

    let first = store
        .save(common::may_meal(owner, 30, 13, "Lunch", 1000), owner)
        .await?
        .unwrap();
    let second = store
        .save(common::may_meal(owner, 30, 20, "Dinner", 500), owner)
        .await?
        .unwrap();

    assert_eq!(first.id, Some(defaults::ID_SEED + 1));
    assert_eq!(second.id, Some(defaults::ID_SEED + 2));
    assert_eq!(first.owner_id, owner);

    Ok(())
}

#[tokio::test]
async fn test_save_with_unknown_id_writes_nothing() -> Result<()> {
    let store = common::create_memory_store().await?;
    let owner = common::test_owner();

    let mut phantom = common::may_meal(owner, 30, 13, "Lunch", 1000);
    phantom.id = Some(defaults::ID_SEED + 777);

    assert!(store.save(phantom, owner).await?.is_none());
    assert!(store.get_all(owner).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_update_keeps_the_id_and_replaces_fields() -> Result<()> {
    let store = common::create_memory_store().await?;
    let owner = common::test_owner();

    let saved = store
        .save(common::may_meal(owner, 30, 13, "Lunch", 1000), owner)
        .await?
        .unwrap();
    let id = saved.id.unwrap();

    let mut changed = saved;
    changed.description = "Updated lunch".into();
    changed.calories = 200;

    let updated = store.save(changed, owner).await?.unwrap();
    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.description, "Updated lunch");
    assert_eq!(updated.calories, 200);

    // The stored record reflects the update
    let fetched = store.get(id, owner).await?.unwrap();
    assert_eq!(fetched.calories, 200);

    Ok(())
}

#[tokio::test]
async fn test_update_of_foreign_meal_writes_nothing() -> Result<()> {
    let store = common::create_memory_store().await?;
    let owner = common::test_owner();
    let stranger = common::test_owner();

    let saved = store
        .save(common::may_meal(owner, 30, 13, "Lunch", 1000), owner)
        .await?
        .unwrap();

    let mut hijacked = saved.clone();
    hijacked.description = "Not yours".into();
    assert!(store.save(hijacked, stranger).await?.is_none());

    // Original untouched
    let fetched = store.get(saved.id.unwrap(), owner).await?.unwrap();
    assert_eq!(fetched.description, "Lunch");

    Ok(())
}

#[tokio::test]
async fn test_duplicate_timestamp_is_rejected_per_owner() -> Result<()> {
    let store = common::create_memory_store().await?;
    let owner = common::test_owner();
    let other = common::test_owner();

    store
        .save(common::may_meal(owner, 30, 13, "Lunch", 1000), owner)
        .await?;

    // Same owner, same instant: rejected
    let err = store
        .save(common::may_meal(owner, 30, 13, "Second lunch", 300), owner)
        .await
        .unwrap_err();
    assert!(matches!(err, MealError::DuplicateTimestamp { .. }));

    // Different owner, same instant: fine
    assert!(store
        .save(common::may_meal(other, 30, 13, "Lunch", 700), other)
        .await?
        .is_some());

    Ok(())
}

#[tokio::test]
async fn test_update_to_own_timestamp_is_allowed() -> Result<()> {
    let store = common::create_memory_store().await?;
    let owner = common::test_owner();

    let saved = store
        .save(common::may_meal(owner, 30, 13, "Lunch", 1000), owner)
        .await?
        .unwrap();

    // Re-saving the meal at its own timestamp must not collide with itself
    let mut changed = saved;
    changed.calories = 900;
    assert!(store.save(changed, owner).await?.is_some());

    Ok(())
}

#[tokio::test]
async fn test_update_onto_another_meals_timestamp_is_rejected() -> Result<()> {
    let store = common::create_memory_store().await?;
    let owner = common::test_owner();

    store
        .save(common::may_meal(owner, 30, 13, "Lunch", 1000), owner)
        .await?;
    let dinner = store
        .save(common::may_meal(owner, 30, 20, "Dinner", 500), owner)
        .await?
        .unwrap();

    let mut moved = dinner;
    moved.eaten_at = common::may_2015(30, 13, 0);
    let err = store.save(moved, owner).await.unwrap_err();
    assert!(matches!(err, MealError::DuplicateTimestamp { .. }));

    Ok(())
}

#[tokio::test]
async fn test_get_is_scoped_to_the_owner() -> Result<()> {
    let store = common::create_memory_store().await?;
    let owner = common::test_owner();
    let stranger = common::test_owner();

    let saved = store
        .save(common::may_meal(owner, 30, 13, "Lunch", 1000), owner)
        .await?
        .unwrap();
    let id = saved.id.unwrap();

    assert!(store.get(id, owner).await?.is_some());
    assert!(store.get(id, stranger).await?.is_none());
    assert!(store.get(id + 999, owner).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_delete_reports_whether_something_was_removed() -> Result<()> {
    let store = common::create_memory_store().await?;
    let owner = common::test_owner();
    let stranger = common::test_owner();

    let saved = store
        .save(common::may_meal(owner, 30, 13, "Lunch", 1000), owner)
        .await?
        .unwrap();
    let id = saved.id.unwrap();

    // A stranger cannot delete it
    assert!(!store.delete(id, stranger).await?);
    assert!(store.get(id, owner).await?.is_some());

    // The owner can, exactly once
    assert!(store.delete(id, owner).await?);
    assert!(!store.delete(id, owner).await?);
    assert!(store.get(id, owner).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_get_all_returns_newest_first_for_one_owner() -> Result<()> {
    let store = common::create_memory_store().await?;
    let owner = common::test_owner();
    let other = common::test_owner();

    common::seed_sample_week(&store, owner).await?;
    store
        .save(common::may_meal(other, 30, 13, "Other lunch", 700), other)
        .await?;

    let meals = store.get_all(owner).await?;
    assert_eq!(meals.len(), 7);
    assert!(meals.iter().all(|m| m.owner_id == owner));
    assert!(meals.windows(2).all(|w| w[0].eaten_at >= w[1].eaten_at));
    assert_eq!(meals[0].description, "Dinner");
    assert_eq!(meals[6].description, "Breakfast");

    Ok(())
}

#[tokio::test]
async fn test_get_between_is_half_open_on_dates() -> Result<()> {
    let store = common::create_memory_store().await?;
    let owner = common::test_owner();
    common::seed_sample_week(&store, owner).await?;

    let may = |day| NaiveDate::from_ymd_opt(2015, 5, day).unwrap();

    // [May 30, May 31) keeps only the two May 30 meals
    let meals = store.get_between(owner, may(30), may(31)).await?;
    assert_eq!(meals.len(), 2);
    assert!(meals.iter().all(|m| m.eaten_date() == may(30)));

    // The midnight meal sits on the lower bound and is included
    let meals = store.get_between(owner, may(31), may(31).succ_opt().unwrap()).await?;
    assert_eq!(meals.len(), 4);

    // Empty and inverted ranges yield nothing
    assert!(store.get_between(owner, may(30), may(30)).await?.is_empty());
    assert!(store.get_between(owner, may(31), may(28)).await?.is_empty());

    Ok(())
}
