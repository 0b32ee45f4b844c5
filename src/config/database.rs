//! Database configuration module for `GoHabit`.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables based on the entity definitions. Table creation uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to generate SQL from the entity models, so
//! the database schema always matches the Rust struct definitions without manual SQL.

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

use crate::entities::{Accessory, Avatar, Friendship, Habit, HabitLog, Task, User, UserAccessory};
use crate::errors::Result;

/// Gets the database URL from environment variable or returns the default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/gohabit.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// Creates tables for users, habits, habit logs, tasks, avatars, the accessory
/// catalog, accessory ownership and friendships.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut tables = [
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Habit),
        schema.create_table_from_entity(HabitLog),
        schema.create_table_from_entity(Task),
        schema.create_table_from_entity(Avatar),
        schema.create_table_from_entity(Accessory),
        schema.create_table_from_entity(UserAccessory),
        schema.create_table_from_entity(Friendship),
    ];

    for table in &mut tables {
        table.if_not_exists();
        db.execute(builder.build(&*table)).await?;
    }

    Ok(())
}
