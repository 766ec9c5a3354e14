//! PostgreSQL store tests. These start a Postgres container and need Docker:
//! `cargo test -p dreamtales-story --test store_tests -- --ignored`.

mod common;

use pretty_assertions::assert_eq;

use dreamtales_story::store::{self, PgStoryStore, StoryStore};
use dreamtales_story::{Lang, StoryError, StoryLength, StoryMeta, StoryRecord, Tone};

fn record(text: &str) -> StoryRecord {
    StoryRecord::new(
        text,
        StoryMeta::new(Lang::Sv, StoryLength::Medium)
            .with_tone(Tone::Calm)
            .with_wind_down(true),
    )
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_insert_and_get_roundtrip() {
    let db = common::TestDb::new().await;
    let store = PgStoryStore::new(db.pool.clone());

    let rec = record("Det var en gång en liten igelkott.");
    store.insert(&rec).await.unwrap();

    let fetched = store.get(rec.id).await.unwrap().expect("stored record");
    assert_eq!(fetched, rec);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_get_missing_returns_none() {
    let db = common::TestDb::new().await;
    let found = store::get_story(&db.pool, uuid::Uuid::new_v4()).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_insert_rejected() {
    let db = common::TestDb::new().await;
    let store = PgStoryStore::new(db.pool.clone());

    let rec = record("En gång till.");
    store.insert(&rec).await.unwrap();
    let err = store.insert(&rec).await.unwrap_err();

    assert!(matches!(err, StoryError::Conflict(_)));
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_newest_first() {
    let db = common::TestDb::new().await;
    let store = PgStoryStore::new(db.pool.clone());

    let mut older = record("older");
    older.created_at -= chrono::Duration::minutes(5);
    let newer = record("newer");
    store.insert(&older).await.unwrap();
    store.insert(&newer).await.unwrap();

    let texts: Vec<String> = store
        .list(10, 0)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.text)
        .collect();
    assert_eq!(texts, vec!["newer".to_string(), "older".to_string()]);

    let page = store.list(1, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].text, "older");
    assert_eq!(store.count().await.unwrap(), 2);
}
