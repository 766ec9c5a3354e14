use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::{Result, StoryError};

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    if database_url.is_empty() {
        return Err(StoryError::Config("database URL is empty".into()));
    }

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
