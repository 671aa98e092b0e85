//! Live integration tests for shopsync-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/shopsync-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use shopsync_core::SyncAction;
use shopsync_db::{health_check, last_sync, last_syncs, record_sync};

#[sqlx::test(migrations = "../../migrations")]
async fn last_sync_is_none_before_first_record(pool: sqlx::PgPool) {
    assert!(last_sync(&pool, SyncAction::SyncProducts)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn record_sync_then_last_sync_returns_latest(pool: sqlx::PgPool) {
    let first = record_sync(&pool, SyncAction::SyncProducts).await.unwrap();
    let second = record_sync(&pool, SyncAction::SyncProducts).await.unwrap();
    assert_eq!(first.action, "sync_products");

    let last = last_sync(&pool, SyncAction::SyncProducts)
        .await
        .unwrap()
        .expect("a recorded sync");
    assert_eq!(last.id, second.id);
    assert!(last.synced_at >= first.synced_at);
}

#[sqlx::test(migrations = "../../migrations")]
async fn actions_are_tracked_independently(pool: sqlx::PgPool) {
    record_sync(&pool, SyncAction::MegaMenu).await.unwrap();

    let all = last_syncs(&pool).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].0, SyncAction::SyncProducts);
    assert!(all[0].1.is_none());
    assert_eq!(all[1].0, SyncAction::MegaMenu);
    assert!(all[1].1.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn health_check_succeeds_on_live_pool(pool: sqlx::PgPool) {
    health_check(&pool).await.unwrap();
}
