//! Service bootstrap: initializes logging, configuration, the database and
//! the accessory catalog. The web layer consuming the `gohabit` library is a
//! separate deployment; this binary prepares everything it needs.

use dotenvy::dotenv;
use gohabit::config::{catalog, database};
use gohabit::errors::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Connect to the database and create missing tables
    let db = database::create_connection()
        .await
        .inspect(|_| info!("database connection established"))
        .inspect_err(|e| error!("failed to connect to database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("failed to create tables: {e}"))?;

    // 4. Seed the accessory catalog from config.toml
    let accessory_catalog = catalog::load_default_catalog()
        .inspect_err(|e| error!("failed to load accessory catalog: {e}"))?;
    let inserted = catalog::seed_catalog(&db, &accessory_catalog)
        .await
        .inspect_err(|e| error!("failed to seed accessory catalog: {e}"))?;
    info!(inserted, "accessory catalog seeded");

    info!("gohabit data layer ready at {}", database::get_database_url());
    Ok(())
}
