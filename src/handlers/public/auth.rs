use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::handlers::validation;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::AuthService;

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct LogInRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogInResponse {
    pub access_token: String,
}

/// POST /auth/signup - Register a new user
///
/// The password is hashed before it goes anywhere near the database; a taken
/// name comes back as 409.
pub async fn signup(Json(payload): Json<SignUpRequest>) -> ApiResult<SignUpResponse> {
    validation::validate_signup(&payload.name, &payload.password)?;

    let service = AuthService::new().await?;
    let id = service.sign_up(&payload.name, &payload.password).await?;

    tracing::info!("registered user '{}'", payload.name);
    Ok(ApiResponse::created(SignUpResponse { id }))
}

/// POST /auth/login - Authenticate and receive an access token
///
/// The token carries the user's administrator flag as of this moment; it is
/// not refreshed if the flag later changes.
pub async fn login(Json(payload): Json<LogInRequest>) -> ApiResult<LogInResponse> {
    validation::validate_login(&payload.name, &payload.password)?;

    let service = AuthService::new().await?;
    let access_token = service.log_in(&payload.name, &payload.password).await?;

    Ok(ApiResponse::success(LogInResponse { access_token }))
}
