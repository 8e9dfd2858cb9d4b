use uuid::Uuid;

use crate::database::models::{RequestStatus, RequestSummary};
use crate::database::requests::RequestRepository;
use crate::database::{self, DatabaseError};
use crate::storage::{Storage, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum ReferralError {
    #[error("invalid request status '{0}'")]
    InvalidStatus(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Candidate submissions and the request lifecycle around them. Identity
/// arrives as an explicit argument from the authorization boundary;
/// `owner = None` is the administrator scope.
pub struct ReferralService {
    requests: RequestRepository,
    storage: &'static Storage,
}

impl ReferralService {
    pub async fn new() -> Result<Self, DatabaseError> {
        let pool = database::pool().await?;
        Ok(Self {
            requests: RequestRepository::new(pool),
            storage: Storage::from_config(),
        })
    }

    /// Upload the candidate's document under a fresh key, then record the
    /// request. A failed upload leaves no request row behind.
    pub async fn submit_candidate(
        &self,
        owner: Uuid,
        candidate_name: &str,
        candidate_surname: &str,
        document: Vec<u8>,
        content_type: &str,
    ) -> Result<Uuid, ReferralError> {
        let document_key = Uuid::new_v4().to_string();

        self.storage
            .upload(&document_key, document, content_type)
            .await?;

        let request_id = self
            .requests
            .add_candidate_request(owner, candidate_name, candidate_surname, &document_key)
            .await?;

        Ok(request_id)
    }

    /// List requests, scoped to an owner unless called on behalf of an
    /// administrator.
    pub async fn list_requests(
        &self,
        owner: Option<Uuid>,
        status: Option<RequestStatus>,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<RequestSummary>, ReferralError> {
        let requests = self
            .requests
            .list(owner, status, page_number, page_size)
            .await?;
        Ok(requests)
    }

    /// Resolve a request's document to a signed, time-limited download URL.
    pub async fn download_document(
        &self,
        request_id: Uuid,
        owner: Option<Uuid>,
    ) -> Result<String, ReferralError> {
        let document_key = self
            .requests
            .resolve_document_key(request_id, owner)
            .await?;
        let url = self.storage.download_url(&document_key)?;
        Ok(url)
    }

    /// Validate and apply a status transition. The new value must be one of
    /// the three legal states; what the request's current state is does not
    /// restrict the move.
    pub async fn update_request(
        &self,
        request_id: Uuid,
        new_status: &str,
    ) -> Result<RequestStatus, ReferralError> {
        let status = RequestStatus::parse(new_status)
            .ok_or_else(|| ReferralError::InvalidStatus(new_status.to_string()))?;

        self.requests.update_status(request_id, status).await?;
        Ok(status)
    }
}
