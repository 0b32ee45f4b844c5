//! Shared test utilities for `GoHabit`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use chrono::{NaiveDate, NaiveTime};
use sea_orm::{DatabaseConnection, Set, prelude::*};

use crate::core::{auth, habit, progress, task};
use crate::entities::{self, AccessoryRarity, HabitFrequency};
use crate::errors::Result;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A fixed UTC instant for deterministic timestamps in tests.
#[allow(clippy::unwrap_used)]
pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTimeUtc {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
        .and_utc()
}

/// Registers a test user as `<name>@example.com` with a valid password.
pub async fn create_test_user(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::user::Model> {
    auth::register(db, name, &format!("{name}@example.com"), "password123").await
}

/// Grants coins to a user without touching xp or level.
pub async fn give_coins(db: &DatabaseConnection, user_id: i64, coins: i64) -> Result<()> {
    progress::award(db, user_id, 0, coins).await?;
    Ok(())
}

/// Creates a test habit with sensible defaults (DAILY, no description).
pub async fn create_test_habit(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
) -> Result<entities::habit::Model> {
    habit::create(db, user_id, name, None, HabitFrequency::Daily).await
}

/// Creates a test habit with a specific cadence.
pub async fn create_custom_habit(
    db: &DatabaseConnection,
    user_id: i64,
    name: &str,
    frequency: HabitFrequency,
) -> Result<entities::habit::Model> {
    habit::create(db, user_id, name, None, frequency).await
}

/// Creates a test task with no description or due date.
pub async fn create_test_task(
    db: &DatabaseConnection,
    user_id: i64,
    title: &str,
) -> Result<entities::task::Model> {
    task::create(db, user_id, title, None, None).await
}

/// Inserts an accessory catalog entry directly, bypassing config.toml.
pub async fn create_test_accessory(
    db: &DatabaseConnection,
    name: &str,
    rarity: AccessoryRarity,
) -> Result<entities::accessory::Model> {
    let model = entities::accessory::ActiveModel {
        name: Set(name.to_string()),
        rarity: Set(rarity.as_str().to_string()),
        image_url: Set(format!("/assets/accessories/{name}.png")),
        ..Default::default()
    };
    model.insert(db).await.map_err(Into::into)
}
