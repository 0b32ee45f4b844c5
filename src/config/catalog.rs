//! Accessory catalog loading from config.toml
//!
//! This module provides functionality to load the accessory catalog from a TOML
//! configuration file. The accessories defined in config.toml are used to seed
//! the database on first run or when catalog entries are missing; seeding is
//! idempotent, keyed by accessory name.

use std::path::Path;
use std::str::FromStr;

use sea_orm::{DatabaseConnection, Set, prelude::*};
use serde::Deserialize;

use crate::entities::{Accessory, AccessoryRarity, accessory};
use crate::errors::{Error, Result};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Catalog {
    /// List of accessory catalog entries to seed
    pub accessories: Vec<AccessoryConfig>,
}

/// Configuration for a single accessory
#[derive(Debug, Deserialize, Clone)]
pub struct AccessoryConfig {
    /// Unique catalog name of the accessory
    pub name: String,
    /// Rarity tier; must parse as [`AccessoryRarity`]
    pub rarity: String,
    /// Where the client finds the sprite
    pub image_url: String,
}

/// Loads the accessory catalog from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("failed to read catalog file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("failed to parse config.toml: {e}"),
    })
}

/// Loads the accessory catalog from the default location (./config.toml)
pub fn load_default_catalog() -> Result<Catalog> {
    load_catalog("config.toml")
}

/// Seeds the accessory catalog into the database, skipping entries that
/// already exist (matched by name). Returns the number of rows inserted.
///
/// Rarity strings are validated against the closed rarity set before any row
/// is written, so a typo in config.toml aborts the whole seed.
pub async fn seed_catalog(db: &DatabaseConnection, catalog: &Catalog) -> Result<usize> {
    // Validate the full catalog up front
    for entry in &catalog.accessories {
        AccessoryRarity::from_str(&entry.rarity)?;
    }

    let mut inserted = 0;
    for entry in &catalog.accessories {
        let existing = Accessory::find()
            .filter(accessory::Column::Name.eq(entry.name.as_str()))
            .one(db)
            .await?;
        if existing.is_some() {
            continue;
        }

        let model = accessory::ActiveModel {
            name: Set(entry.name.clone()),
            rarity: Set(entry.rarity.clone()),
            image_url: Set(entry.image_url.clone()),
            ..Default::default()
        };
        model.insert(db).await?;
        inserted += 1;
    }

    Ok(inserted)
}
