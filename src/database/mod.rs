use anyhow::Result;
use sqlx::{PgPool, Postgres, migrate::MigrateDatabase, postgres::PgPoolOptions};

pub mod models;
pub mod repositories;
pub mod utils;

pub async fn init_database(database_url: &str) -> Result<PgPool> {
    // Create database if it doesn't exist
    if !Postgres::database_exists(database_url).await.unwrap_or(false) {
        log::info!("Creating database {}", database_url);
        Postgres::create_database(database_url).await?;
    }

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Migrations completed successfully");

    Ok(pool)
}

/// Pool that only connects on first use. Lets the app boot (and tests run)
/// for routes that never reach the database.
pub fn lazy_pool(database_url: &str) -> Result<PgPool> {
    Ok(PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy(database_url)?)
}
