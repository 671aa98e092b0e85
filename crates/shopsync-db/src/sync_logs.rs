//! Database operations for `sync_logs`: one row per successful run.

use chrono::{DateTime, Utc};
use shopsync_core::SyncAction;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `sync_logs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SyncLogRow {
    pub id: i64,
    pub action: String,
    pub synced_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Records a successful completion of `action` at the current time.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn record_sync(pool: &PgPool, action: SyncAction) -> Result<SyncLogRow, DbError> {
    let row = sqlx::query_as::<_, SyncLogRow>(
        "INSERT INTO sync_logs (action, synced_at) \
         VALUES ($1, NOW()) \
         RETURNING id, action, synced_at, created_at",
    )
    .bind(action.as_str())
    .fetch_one(pool)
    .await?;

    tracing::debug!(action = %action, synced_at = %row.synced_at, "sync recorded");
    Ok(row)
}

/// Most recent completion of `action`, if it ever completed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn last_sync(pool: &PgPool, action: SyncAction) -> Result<Option<SyncLogRow>, DbError> {
    let row = sqlx::query_as::<_, SyncLogRow>(
        "SELECT id, action, synced_at, created_at \
         FROM sync_logs \
         WHERE action = $1 \
         ORDER BY synced_at DESC, id DESC \
         LIMIT 1",
    )
    .bind(action.as_str())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Last completion time of every known action, in [`SyncAction::ALL`] order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any query fails.
pub async fn last_syncs(
    pool: &PgPool,
) -> Result<Vec<(SyncAction, Option<DateTime<Utc>>)>, DbError> {
    let mut out = Vec::with_capacity(SyncAction::ALL.len());
    for action in SyncAction::ALL {
        let synced_at = last_sync(pool, action).await?.map(|row| row.synced_at);
        out.push((action, synced_at));
    }
    Ok(out)
}
