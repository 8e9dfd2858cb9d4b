// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "INVALID_PARAMETER",
            ApiError::Unauthorized(_) => "AUTHENTICATION_FAILED",
            ApiError::Forbidden(_) => "PERMISSION_DENIED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        use crate::database::DatabaseError;

        match err {
            DatabaseError::RequestNotFound(id) => {
                ApiError::not_found(format!("no request with id '{}'", id))
            }
            DatabaseError::FileNotFound(id) => {
                ApiError::not_found(format!("no document for request '{}'", id))
            }
            DatabaseError::UserNotFound(_) => {
                // Surfaced from login flows; never confirm which part was wrong
                ApiError::unauthorized("invalid name or password")
            }
            DatabaseError::DuplicateUser(name) => {
                ApiError::conflict(format!("user '{}' already exists", name))
            }
            DatabaseError::ConfigMissing(var) => {
                tracing::error!("missing configuration: {}", var);
                ApiError::service_unavailable("service is not configured")
            }
            DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("invalid DATABASE_URL");
                ApiError::service_unavailable("service is not configured")
            }
            DatabaseError::Sqlx(e) => {
                // Log the real error but return generic message
                tracing::error!("database error: {}", e);
                ApiError::internal_server_error("an error occurred while processing your request")
            }
            DatabaseError::Migration(e) => {
                tracing::error!("migration error: {}", e);
                ApiError::service_unavailable("service is being updated, please try again later")
            }
        }
    }
}

impl From<crate::auth::TokenError> for ApiError {
    fn from(err: crate::auth::TokenError) -> Self {
        match err {
            crate::auth::TokenError::MissingSecret => {
                tracing::error!("JWT secret not configured");
                ApiError::internal_server_error("service is not configured")
            }
            crate::auth::TokenError::Signing(e) => {
                tracing::error!("JWT signing error: {}", e);
                ApiError::internal_server_error("cannot issue access token")
            }
            // Every verification failure collapses into one client-facing class;
            // the sub-cause is only interesting in logs.
            other => {
                tracing::debug!("token rejected: {}", other);
                ApiError::unauthorized("authentication failed")
            }
        }
    }
}

impl From<crate::storage::StorageError> for ApiError {
    fn from(err: crate::storage::StorageError) -> Self {
        tracing::error!("object storage error: {}", err);
        ApiError::internal_server_error("an error occurred while processing your request")
    }
}

impl From<crate::services::AuthError> for ApiError {
    fn from(err: crate::services::AuthError) -> Self {
        use crate::services::AuthError;

        match err {
            AuthError::InvalidCredentials => ApiError::unauthorized("invalid name or password"),
            AuthError::UserAlreadyExists(name) => {
                ApiError::conflict(format!("user '{}' already exists", name))
            }
            AuthError::Hashing(msg) => {
                tracing::error!("password hashing error: {}", msg);
                ApiError::internal_server_error("an error occurred while processing your request")
            }
            AuthError::Token(e) => e.into(),
            AuthError::Database(e) => e.into(),
        }
    }
}

impl From<crate::services::ReferralError> for ApiError {
    fn from(err: crate::services::ReferralError) -> Self {
        use crate::services::ReferralError;

        match err {
            ReferralError::InvalidStatus(status) => {
                ApiError::bad_request(format!("invalid request status '{}'", status))
            }
            ReferralError::Storage(e) => e.into(),
            ReferralError::Database(e) => e.into(),
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
