//! Story record persistence.
//!
//! Records are insert-only: there is no update or delete.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, StoryError};
use crate::models::{StoryMeta, StoryRecord};

#[async_trait]
pub trait StoryStore: Send + Sync {
    /// Persist a new record. Fails if the id already exists.
    async fn insert(&self, record: &StoryRecord) -> Result<()>;

    async fn get(&self, id: Uuid) -> Result<Option<StoryRecord>>;

    /// Records newest first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<StoryRecord>>;

    async fn count(&self) -> Result<i64>;
}

/// Process-local store, used when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryStoryStore {
    records: RwLock<Vec<StoryRecord>>,
}

impl MemoryStoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoryStore for MemoryStoryStore {
    async fn insert(&self, record: &StoryRecord) -> Result<()> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(StoryError::Conflict(format!(
                "story {} already exists",
                record.id
            )));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoryRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<StoryRecord>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let offset = usize::try_from(offset).unwrap_or(0);
        let records = self.records.read().await;
        Ok(records.iter().rev().skip(offset).take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<i64> {
        let records = self.records.read().await;
        Ok(i64::try_from(records.len()).unwrap_or(i64::MAX))
    }
}

/// PostgreSQL-backed store over the `stories` table.
#[derive(Debug, Clone)]
pub struct PgStoryStore {
    pool: PgPool,
}

impl PgStoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl StoryStore for PgStoryStore {
    async fn insert(&self, record: &StoryRecord) -> Result<()> {
        insert_story(&self.pool, record).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<StoryRecord>> {
        get_story(&self.pool, id).await
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<StoryRecord>> {
        list_stories(&self.pool, limit, offset).await
    }

    async fn count(&self) -> Result<i64> {
        count_stories(&self.pool).await
    }
}

#[derive(sqlx::FromRow)]
struct StoryRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    text: String,
    meta: Json<StoryMeta>,
}

impl From<StoryRow> for StoryRecord {
    fn from(row: StoryRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            text: row.text,
            meta: row.meta.0,
        }
    }
}

#[tracing::instrument(skip(executor, record), fields(story_id = %record.id))]
pub async fn insert_story<'e, E>(executor: E, record: &StoryRecord) -> Result<()>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO stories (id, created_at, text, meta)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(record.id)
    .bind(record.created_at)
    .bind(&record.text)
    .bind(Json(&record.meta))
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoryError::Conflict(format!(
            "story {} already exists",
            record.id
        )));
    }

    tracing::info!("story stored");
    Ok(())
}

#[tracing::instrument(skip(executor))]
pub async fn get_story<'e, E>(executor: E, id: Uuid) -> Result<Option<StoryRecord>>
where
    E: sqlx::PgExecutor<'e>,
{
    let row = sqlx::query_as::<_, StoryRow>(
        "SELECT id, created_at, text, meta FROM stories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(StoryRecord::from))
}

#[tracing::instrument(skip(executor))]
pub async fn list_stories<'e, E>(executor: E, limit: i64, offset: i64) -> Result<Vec<StoryRecord>>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, StoryRow>(
        r#"
        SELECT id, created_at, text, meta FROM stories
        ORDER BY created_at DESC, id
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit.max(0))
    .bind(offset.max(0))
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(StoryRecord::from).collect())
}

#[tracing::instrument(skip(executor))]
pub async fn count_stories<'e, E>(executor: E) -> Result<i64>
where
    E: sqlx::PgExecutor<'e>,
{
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stories")
        .fetch_one(executor)
        .await?;
    Ok(total)
}
