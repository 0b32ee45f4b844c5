/// Database configuration and connection management
pub mod database;

/// Accessory catalog loading from config.toml
pub mod catalog;
