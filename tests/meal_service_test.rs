// ABOUTME: Integration tests for the meal service layer
// ABOUTME: Validates NotFound unification, update rules, and excess decoration
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use anyhow::Result;
use chrono::NaiveDate;
use mealtrack::{constants::defaults, errors::MealError, services::meals::MealService};

mod common;

#[tokio::test]
async fn test_save_creates_and_returns_the_stored_meal() -> Result<()> {
    let service = MealService::new(common::create_memory_store().await?);
    let owner = common::test_owner();

    let saved = service
        .save(owner, common::may_meal(owner, 30, 13, "Lunch", 1000))
        .await?;

    assert_eq!(saved.id, Some(defaults::ID_SEED + 1));
    assert_eq!(saved.description, "Lunch");

    Ok(())
}

#[tokio::test]
async fn test_save_with_unknown_id_is_not_found() -> Result<()> {
    let service = MealService::new(common::create_memory_store().await?);
    let owner = common::test_owner();

    let mut phantom = common::may_meal(owner, 30, 13, "Lunch", 1000);
    phantom.id = Some(defaults::ID_SEED + 777);

    let err = service.save(owner, phantom).await.unwrap_err();
    assert!(matches!(err, MealError::NotFound { id } if id == defaults::ID_SEED + 777));

    Ok(())
}

#[tokio::test]
async fn test_update_without_an_id_is_rejected() -> Result<()> {
    let service = MealService::new(common::create_memory_store().await?);
    let owner = common::test_owner();

    let err = service
        .update(owner, common::may_meal(owner, 30, 13, "Lunch", 1000))
        .await
        .unwrap_err();
    assert!(matches!(err, MealError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn test_update_of_a_foreign_meal_is_not_found() -> Result<()> {
    let service = MealService::new(common::create_memory_store().await?);
    let owner = common::test_owner();
    let stranger = common::test_owner();

    let saved = service
        .save(owner, common::may_meal(owner, 30, 13, "Lunch", 1000))
        .await?;
    let id = saved.id.unwrap();

    let mut hijacked = saved;
    hijacked.description = "Not yours".into();
    let err = service.update(stranger, hijacked).await.unwrap_err();
    assert!(matches!(err, MealError::NotFound { id: missing } if missing == id));

    // The owner still sees the original
    assert_eq!(service.get(owner, id).await?.description, "Lunch");

    Ok(())
}

#[tokio::test]
async fn test_update_of_an_owned_meal_succeeds() -> Result<()> {
    let service = MealService::new(common::create_memory_store().await?);
    let owner = common::test_owner();

    let saved = service
        .save(owner, common::may_meal(owner, 30, 13, "Lunch", 1000))
        .await?;

    let mut changed = saved.clone();
    changed.calories = 200;
    let updated = service.update(owner, changed).await?;

    assert_eq!(updated.id, saved.id);
    assert_eq!(updated.calories, 200);

    Ok(())
}

#[tokio::test]
async fn test_delete_is_not_found_the_second_time() -> Result<()> {
    let service = MealService::new(common::create_memory_store().await?);
    let owner = common::test_owner();
    let stranger = common::test_owner();

    let saved = service
        .save(owner, common::may_meal(owner, 30, 13, "Lunch", 1000))
        .await?;
    let id = saved.id.unwrap();

    // A stranger deleting it is indistinguishable from a missing meal
    let err = service.delete(stranger, id).await.unwrap_err();
    assert!(matches!(err, MealError::NotFound { .. }));

    service.delete(owner, id).await?;
    let err = service.delete(owner, id).await.unwrap_err();
    assert!(matches!(err, MealError::NotFound { id: missing } if missing == id));

    Ok(())
}

#[tokio::test]
async fn test_get_unifies_missing_and_foreign_meals() -> Result<()> {
    let service = MealService::new(common::create_memory_store().await?);
    let owner = common::test_owner();
    let stranger = common::test_owner();

    let saved = service
        .save(owner, common::may_meal(owner, 30, 13, "Lunch", 1000))
        .await?;
    let id = saved.id.unwrap();

    let foreign = service.get(stranger, id).await.unwrap_err();
    let missing = service.get(owner, id + 999).await.unwrap_err();
    assert!(matches!(foreign, MealError::NotFound { .. }));
    assert!(matches!(missing, MealError::NotFound { .. }));

    Ok(())
}

#[tokio::test]
async fn test_get_all_flags_only_days_over_the_budget() -> Result<()> {
    let store = common::create_memory_store().await?;
    let owner = common::test_owner();
    common::seed_sample_week(&store, owner).await?;
    let service = MealService::new(store);

    let meals = service.get_all(owner, defaults::CALORIES_PER_DAY).await?;
    assert_eq!(meals.len(), 7);
    assert!(meals.windows(2).all(|w| w[0].eaten_at >= w[1].eaten_at));

    let may_31 = NaiveDate::from_ymd_opt(2015, 5, 31).unwrap();
    for meal in &meals {
        // May 31 totals 2520 kcal, every other day stays under 2000
        assert_eq!(meal.excess, meal.eaten_at.date_naive() == may_31);
    }

    Ok(())
}

#[tokio::test]
async fn test_get_between_treats_missing_bounds_as_unbounded() -> Result<()> {
    let store = common::create_memory_store().await?;
    let owner = common::test_owner();
    common::seed_sample_week(&store, owner).await?;
    let service = MealService::new(store);

    let may = |day| NaiveDate::from_ymd_opt(2015, 5, day).unwrap();

    assert_eq!(service.get_between(owner, None, None).await?.len(), 7);
    assert_eq!(
        service.get_between(owner, Some(may(31)), None).await?.len(),
        4
    );
    assert_eq!(
        service.get_between(owner, None, Some(may(31))).await?.len(),
        3
    );
    assert_eq!(
        service
            .get_between(owner, Some(may(30)), Some(may(31)))
            .await?
            .len(),
        2
    );

    Ok(())
}

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn test_service_runs_on_the_sqlite_backend() -> Result<()> {
    let store = common::create_sqlite_store().await?;
    let owner = common::test_owner();
    common::seed_sample_week(&store, owner).await?;
    let service = MealService::new(store);

    let meals = service.get_all(owner, defaults::CALORIES_PER_DAY).await?;
    assert_eq!(meals.len(), 7);
    assert!(meals.iter().any(|m| m.excess));
    assert!(meals.iter().any(|m| !m.excess));

    Ok(())
}
