use crate::models::Db;
use anyhow::{Context, Result};
use sethorize_migrations::postgres_migrator;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};

impl Db {
    /// Connect to PostgreSQL and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        debug!(target = "sethorize_server", "connecting to database");
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .connect(database_url)
            .await
            .context("failed to connect to database")?;
        debug!("running migrations");
        postgres_migrator()
            .run(&pool)
            .await
            .context("failed running migrations")?;
        info!(target = "sethorize_server", "database initialized");
        Ok(Self { pool })
    }

    /// Wrap an existing pool. Used by tests that manage their own database.
    pub fn from_pool(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}
