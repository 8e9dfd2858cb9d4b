use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::database::models::RequestSummary;
use crate::handlers::validation;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::ReferralService;

#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    pub user_id: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub message: String,
}

/// GET /api/admin/references - List requests across all users
///
/// Query: `user_id` narrows to one owner, `status` to one state; both are
/// optional and the unfiltered listing spans everything, page by page.
pub async fn list_all_requests(
    Query(params): Query<AdminListQuery>,
) -> ApiResult<Vec<RequestSummary>> {
    let owner = match params.user_id.as_deref() {
        None | Some("") => None,
        Some(value) => Some(validation::parse_uuid(value, "user_id")?),
    };
    let status = validation::validate_status_filter(params.status.as_deref())?;
    let (page_number, page_size) =
        validation::validate_pagination(params.page.as_deref(), params.size.as_deref())?;

    let service = ReferralService::new().await?;
    let requests = service
        .list_requests(owner, status, page_number, page_size)
        .await?;

    Ok(ApiResponse::success(requests))
}

/// PUT /api/admin/references - Move a request to a new status
///
/// Body: `{"id": ..., "status": ...}`. The status must be one of the three
/// legal states; an unknown id is a 404.
pub async fn update_request_status(
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<UpdateStatusResponse> {
    let request_id = validation::parse_uuid(&payload.id, "id")?;

    let service = ReferralService::new().await?;
    let status = service.update_request(request_id, &payload.status).await?;

    tracing::info!("request {} moved to '{}'", request_id, status);
    Ok(ApiResponse::success(UpdateStatusResponse {
        message: format!("request status updated to '{}'", status),
    }))
}
