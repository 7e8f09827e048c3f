use super::{Store, PROFILE_KEY};
use chrono::{TimeZone, Utc};
use grace_core::action::ControlAction;
use grace_core::config::MemoryConfig;
use grace_core::profile::{Profile, Vibe};
use grace_core::traits::ProfileRepository;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    let opts = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .unwrap();
    Store::run_migrations(&pool).await.unwrap();
    Store { pool }
}

fn sample_profile() -> Profile {
    let joined = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    Profile::new("Sam", "LOOP-BETA-07", "comet", Some("they/them".into()), joined)
}

#[tokio::test]
async fn test_load_empty_store() {
    let store = test_store().await;
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_and_load_profile() {
    let store = test_store().await;
    let profile = sample_profile();
    store.save(&profile).await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded, profile);
}

#[tokio::test]
async fn test_save_replaces_previous_profile() {
    let store = test_store().await;
    let mut profile = sample_profile();
    store.save(&profile).await.unwrap();

    profile.apply_action(&ControlAction::UpdateVibe(Vibe::Growth));
    store.save(&profile).await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded.current_vibe, Vibe::Growth);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM kv_store")
        .fetch_one(&store.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_profile_stored_as_camel_case_json() {
    let store = test_store().await;
    store.save(&sample_profile()).await.unwrap();

    let raw = store.get_value(PROFILE_KEY).await.unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["name"], "Sam");
    assert_eq!(json["recoveryKey"], "LOOP-BETA-07");
    assert_eq!(json["currentVibe"], "CALM");
    assert!(json["learningPath"].is_array());
}

#[tokio::test]
async fn test_corrupt_profile_is_discarded() {
    let store = test_store().await;
    store.put_value(PROFILE_KEY, "{not json").await.unwrap();

    assert!(store.load().await.unwrap().is_none());
    // The bad row is gone, so a second load is a plain miss.
    assert!(store.get_value(PROFILE_KEY).await.unwrap().is_none());
}

#[tokio::test]
async fn test_clear_profile() {
    let store = test_store().await;
    store.save(&sample_profile()).await.unwrap();
    store.clear().await.unwrap();
    assert!(store.load().await.unwrap().is_none());

    // Clearing an empty store is fine.
    store.clear().await.unwrap();
}

#[tokio::test]
async fn test_delete_value_reports_rows() {
    let store = test_store().await;
    store.put_value("k", "v").await.unwrap();
    assert!(store.delete_value("k").await.unwrap());
    assert!(!store.delete_value("k").await.unwrap());
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let store = test_store().await;
    Store::run_migrations(&store.pool).await.unwrap();
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM _migrations")
        .fetch_one(&store.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_new_creates_file_store() {
    let dir = std::env::temp_dir().join(format!("__grace_store_{}__", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let config = MemoryConfig {
        db_path: dir.join("data/memory.db").to_string_lossy().to_string(),
    };

    let store = Store::new(&config).await.unwrap();
    store.save(&sample_profile()).await.unwrap();
    assert!(store.db_size().await.unwrap() > 0);
    drop(store);

    let reopened = Store::new(&config).await.unwrap();
    assert_eq!(reopened.load().await.unwrap().unwrap().name, "Sam");

    let _ = std::fs::remove_dir_all(&dir);
}
