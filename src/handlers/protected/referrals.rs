use axum::extract::{Extension, Multipart, Query};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::database::models::RequestSummary;
use crate::error::ApiError;
use crate::handlers::validation;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::ReferralService;

const CANDIDATE_NAME_FIELD: &str = "candidateName";
const CANDIDATE_SURNAME_FIELD: &str = "candidateSurname";
const FILE_FIELD: &str = "fileName";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub request_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub file_link: String,
}

/// POST /api/references - Submit a candidate with an attached document
///
/// Multipart form: `candidateName`, `candidateSurname`, and the document
/// under `fileName`. The created request belongs to the authenticated user
/// and starts out `submitted`.
pub async fn submit_candidate(
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> ApiResult<SubmitResponse> {
    let submission = read_submission(multipart).await?;

    validation::validate_person_name(&submission.candidate_name, "name")?;
    validation::validate_person_name(&submission.candidate_surname, "surname")?;

    let service = ReferralService::new().await?;
    let request_id = service
        .submit_candidate(
            user.user_id,
            &submission.candidate_name,
            &submission.candidate_surname,
            submission.document,
            &submission.content_type,
        )
        .await?;

    tracing::info!(
        "user {} submitted candidate request {}",
        user.user_id,
        request_id
    );
    Ok(ApiResponse::created(SubmitResponse { request_id }))
}

/// GET /api/references - List the authenticated user's requests
///
/// Query: `status` (optional filter), `page`, `size`.
pub async fn list_requests(
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListQuery>,
) -> ApiResult<Vec<RequestSummary>> {
    let status = validation::validate_status_filter(params.status.as_deref())?;
    let (page_number, page_size) =
        validation::validate_pagination(params.page.as_deref(), params.size.as_deref())?;

    let service = ReferralService::new().await?;
    let requests = service
        .list_requests(Some(user.user_id), status, page_number, page_size)
        .await?;

    Ok(ApiResponse::success(requests))
}

/// GET /api/cvs?id= - Resolve a request's document to a download link
///
/// Regular users can only reach documents on their own requests;
/// administrators can reach any.
pub async fn download_document(
    Extension(user): Extension<AuthUser>,
    Query(params): Query<DownloadQuery>,
) -> ApiResult<DownloadResponse> {
    let id = params
        .id
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("invalid parameter: id"))?;
    let request_id = validation::parse_uuid(id, "id")?;

    let owner = if user.is_admin {
        None
    } else {
        Some(user.user_id)
    };

    let service = ReferralService::new().await?;
    let file_link = service.download_document(request_id, owner).await?;

    Ok(ApiResponse::success(DownloadResponse { file_link }))
}

struct Submission {
    candidate_name: String,
    candidate_surname: String,
    document: Vec<u8>,
    content_type: String,
}

/// Drain the multipart form into the fields the submission needs. Unknown
/// fields are ignored; missing ones are invalid input.
async fn read_submission(mut multipart: Multipart) -> Result<Submission, ApiError> {
    let mut candidate_name = None;
    let mut candidate_surname = None;
    let mut document = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("cannot read form: {}", e)))?
    {
        match field.name() {
            Some(CANDIDATE_NAME_FIELD) => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("cannot read form: {}", e)))?;
                candidate_name = Some(value);
            }
            Some(CANDIDATE_SURNAME_FIELD) => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("cannot read form: {}", e)))?;
                candidate_surname = Some(value);
            }
            Some(FILE_FIELD) => {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("cannot read file: {}", e)))?;
                document = Some((bytes.to_vec(), content_type));
            }
            _ => {}
        }
    }

    let candidate_name =
        candidate_name.ok_or_else(|| ApiError::bad_request("invalid parameter: name"))?;
    let candidate_surname =
        candidate_surname.ok_or_else(|| ApiError::bad_request("invalid parameter: surname"))?;
    let (document, content_type) =
        document.ok_or_else(|| ApiError::bad_request("invalid parameter: file"))?;

    if document.is_empty() {
        return Err(ApiError::bad_request("invalid parameter: file is empty"));
    }
    if document.len() > config::config().api.max_upload_size_bytes {
        return Err(ApiError::bad_request("invalid parameter: file too large"));
    }

    Ok(Submission {
        candidate_name,
        candidate_surname,
        document,
        content_type,
    })
}
