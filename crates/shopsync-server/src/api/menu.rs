use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};

use crate::jobs;
use crate::middleware::RequestId;

use super::{map_job_error, ApiError};

/// Generates the mega menu and returns it as a JSON file attachment.
pub(super) async fn download_mega_menu(
    State(state): State<super::AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Response, ApiError> {
    tracing::info!(request_id = %req_id.0, "mega menu download requested");
    let export = jobs::build_menu_export(&state.services, &state.pool, &state.run_lock)
        .await
        .map_err(|e| map_job_error(req_id.0.clone(), &e))?;

    tracing::info!(
        categories = export.stats.categories,
        bytes = export.body.len(),
        "mega menu ready for download"
    );

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        export.file_name
    ))
    .map_err(|_| ApiError::new(req_id.0.clone(), "internal_error", "invalid export file name"))?;

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.body,
    )
        .into_response())
}
