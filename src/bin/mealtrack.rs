// ABOUTME: Mealtrack CLI - seeds demo meals and lists them with excess flags
// ABOUTME: Composition root wiring config, logging, store factory, service, and API
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Mealtrack CLI
//!
//! Usage:
//! ```bash
//! # Seed the configured store with the demo dataset and print it back
//! mealtrack seed
//!
//! # Persist the demo data in a SQLite file instead
//! mealtrack --store-url sqlite:./meals.db seed
//!
//! # List the demo user's meals with excess flags
//! mealtrack --store-url sqlite:./meals.db list
//!
//! # Windowed view: one day, working hours only
//! mealtrack --store-url sqlite:./meals.db list \
//!     --from 2015-05-31 --to 2015-06-01 --start-time 07:00 --end-time 19:00
//!
//! # JSON output
//! mealtrack --store-url sqlite:./meals.db list --json
//! ```

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use mealtrack::{
    api::{FixedUserProvider, MealApi},
    config::AppConfig,
    errors::MealError,
    logging::LoggingConfig,
    models::{Meal, MealWithExcess},
    services::meals::MealService,
    store::{factory::Store, MealStore},
};
use tracing::info;
use uuid::Uuid;

/// Primary demo user; `list` reads this user's meals
const DEMO_USER_ID: Uuid = Uuid::from_u128(1);

/// Second demo user, present to demonstrate owner isolation
const DEMO_ADMIN_ID: Uuid = Uuid::from_u128(2);

#[derive(Parser)]
#[command(
    name = "mealtrack",
    about = "Mealtrack meal tracking CLI",
    long_about = "Seed demo meals into a configured store and list them back with per-day excess calorie flags."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Store URL override (memory:, sqlite:path/to/meals.db, sqlite::memory:)
    #[arg(long, global = true)]
    store_url: Option<String>,

    /// Daily calorie budget override
    #[arg(long, global = true)]
    calories_per_day: Option<u32>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Populate the store with the demo dataset and print the result
    Seed,

    /// List the demo user's meals with excess flags
    List {
        /// Lower date bound, inclusive (e.g. 2015-05-31)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Upper date bound, exclusive
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Start of the time-of-day window, inclusive (e.g. 07:00)
        #[arg(long)]
        start_time: Option<NaiveTime>,

        /// End of the time-of-day window, exclusive
        #[arg(long)]
        end_time: Option<NaiveTime>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Demo meal configuration
struct DemoMeal {
    owner_id: Uuid,
    date: (i32, u32, u32),
    time: (u32, u32),
    description: &'static str,
    calories: u32,
}

/// Two days of meals for the demo user plus a small set for the second
/// user. The 2015-05-31 day totals 2520 kcal, so it trips the default
/// 2000 kcal budget while the other days stay under it.
fn demo_meals() -> Vec<DemoMeal> {
    vec![
        DemoMeal {
            owner_id: DEMO_USER_ID,
            date: (2015, 5, 28),
            time: (10, 0),
            description: "Breakfast",
            calories: 500,
        },
        DemoMeal {
            owner_id: DEMO_USER_ID,
            date: (2015, 5, 30),
            time: (13, 0),
            description: "Lunch",
            calories: 1000,
        },
        DemoMeal {
            owner_id: DEMO_USER_ID,
            date: (2015, 5, 30),
            time: (20, 0),
            description: "Dinner",
            calories: 500,
        },
        DemoMeal {
            owner_id: DEMO_USER_ID,
            date: (2015, 5, 31),
            time: (0, 0),
            description: "Midnight snack",
            calories: 510,
        },
        DemoMeal {
            owner_id: DEMO_USER_ID,
            date: (2015, 5, 31),
            time: (10, 0),
            description: "Breakfast",
            calories: 500,
        },
        DemoMeal {
            owner_id: DEMO_USER_ID,
            date: (2015, 5, 31),
            time: (13, 0),
            description: "Lunch",
            calories: 1000,
        },
        DemoMeal {
            owner_id: DEMO_USER_ID,
            date: (2015, 5, 31),
            time: (20, 0),
            description: "Dinner",
            calories: 510,
        },
        DemoMeal {
            owner_id: DEMO_ADMIN_ID,
            date: (2015, 6, 1),
            time: (14, 0),
            description: "Admin lunch",
            calories: 510,
        },
        DemoMeal {
            owner_id: DEMO_ADMIN_ID,
            date: (2015, 6, 1),
            time: (21, 0),
            description: "Admin dinner",
            calories: 1500,
        },
    ]
}

fn demo_timestamp(demo: &DemoMeal) -> Result<DateTime<Utc>> {
    let (year, month, day) = demo.date;
    let (hour, minute) = demo.time;
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .ok_or_else(|| anyhow::anyhow!("invalid demo timestamp {:?} {:?}", demo.date, demo.time))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let config = AppConfig::from_env()?;

    // Initialize production logging
    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    info!("Starting Mealtrack CLI");
    info!("{}", config.summary());

    let store_url = cli
        .store_url
        .unwrap_or_else(|| config.store.url.to_connection_string());
    let calories_per_day = cli
        .calories_per_day
        .unwrap_or(config.meals.calories_per_day);

    let store = Store::new(&store_url, config.meals.id_seed).await?;
    info!("Store initialized successfully: {}", store.backend_info());
    if config.store.auto_migrate {
        info!("Running store migrations...");
        store.migrate().await?;
    }

    let service = MealService::new(store);
    let api = MealApi::new(
        service.clone(),
        FixedUserProvider::new(DEMO_USER_ID, calories_per_day),
    );

    match cli.command {
        Command::Seed => {
            seed(&service).await?;
            println!("\nDemo user's meals:");
            print_meals(&api.get_all().await?, false)?;
        }
        Command::List {
            from,
            to,
            start_time,
            end_time,
            json,
        } => {
            let meals = if from.is_none()
                && to.is_none()
                && start_time.is_none()
                && end_time.is_none()
            {
                api.get_all().await?
            } else {
                api.get_between(from, to, start_time, end_time).await?
            };
            print_meals(&meals, json)?;
        }
    }

    Ok(())
}

/// Insert the demo dataset, skipping meals that are already present.
///
/// Re-running `seed` against a persistent store is safe: the store's
/// per-owner timestamp uniqueness turns every repeat into a skip.
async fn seed<S: MealStore>(service: &MealService<S>) -> Result<()> {
    info!("Seeding demo meals for two users");

    let mut created = 0_usize;
    let mut skipped = 0_usize;
    for demo in demo_meals() {
        let eaten_at = demo_timestamp(&demo)?;
        let meal = Meal::new(demo.owner_id, eaten_at, demo.description, demo.calories);
        match service.save(demo.owner_id, meal).await {
            Ok(saved) => {
                info!(
                    "Created meal {} at {} ({}, {} kcal)",
                    saved.id.unwrap_or_default(),
                    saved.eaten_at,
                    saved.description,
                    saved.calories
                );
                created += 1;
            }
            Err(MealError::DuplicateTimestamp { eaten_at }) => {
                info!("Meal at {eaten_at} already present, skipping");
                skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!("Seeded {created} demo meals ({skipped} already present)");
    Ok(())
}

/// Print meals as a table or as JSON
fn print_meals(meals: &[MealWithExcess], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(meals)?);
    } else if meals.is_empty() {
        println!("No meals recorded");
    } else {
        for meal in meals {
            let marker = if meal.excess { "over budget" } else { "ok" };
            println!(
                "{}  {:<16} {:>5} kcal  [{marker}]",
                meal.eaten_at.format("%Y-%m-%d %H:%M"),
                meal.description,
                meal.calories
            );
        }
    }
    Ok(())
}
