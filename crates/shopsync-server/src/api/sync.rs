use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use shopsync_core::SyncAction;
use shopsync_sync::SyncReport;

use crate::jobs;
use crate::middleware::RequestId;

use super::{map_db_error, map_job_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct SyncStatusItem {
    action: SyncAction,
    last_synced_at: Option<DateTime<Utc>>,
}

pub(super) async fn run_product_sync(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<SyncReport>>, ApiError> {
    tracing::info!(request_id = %req_id.0, "product sync requested");
    let report = jobs::run_sync(&state.services, &state.pool, &state.run_lock)
        .await
        .map_err(|e| map_job_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn sync_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<SyncStatusItem>>>, ApiError> {
    let rows = shopsync_db::last_syncs(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|(action, last_synced_at)| SyncStatusItem {
            action,
            last_synced_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::SyncStatusItem;
    use shopsync_core::SyncAction;

    #[test]
    fn sync_status_item_serializes_action_name() {
        let item = SyncStatusItem {
            action: SyncAction::MegaMenu,
            last_synced_at: None,
        };
        let json = serde_json::to_string(&item).expect("serialize status item");
        assert_eq!(json, r#"{"action":"mega_menu","last_synced_at":null}"#);
    }
}
