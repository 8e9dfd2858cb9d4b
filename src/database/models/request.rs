use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Lifecycle states of a candidate request: `submitted` at creation, then
/// `accepted` or `rejected` by an administrator.
///
/// Validation checks only that a value is one of the three legal states, not
/// that the transition from the current state is meaningful; a decided
/// request can be re-decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Submitted,
    Accepted,
    Rejected,
}

impl RequestStatus {
    /// Parse a user-supplied status, normalizing case first.
    pub fn parse(input: &str) -> Option<RequestStatus> {
        match input.to_lowercase().as_str() {
            "submitted" => Some(RequestStatus::Submitted),
            "accepted" => Some(RequestStatus::Accepted),
            "rejected" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Submitted => "submitted",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request row as returned by listings. The document key is excluded;
/// documents are reached through the download endpoint, which enforces
/// ownership.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub candidate_name: String,
    pub candidate_surname: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
