use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{Claims, TokenManager};
use crate::error::ApiError;

const AUTH_HEADER_REQUIRED: &str = "authorization header required";
const INVALID_AUTH_HEADER: &str = "invalid authorization header value";
const INVALID_SECURITY_SCHEME: &str = "invalid security scheme";
const EMPTY_TOKEN: &str = "JWT token cannot be empty";

const BEARER_SCHEME: &str = "Bearer";

/// Authenticated user context extracted from a verified JWT.
///
/// Bound into request extensions by the authentication gate; handlers take it
/// as an argument and pass the identity down explicitly.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl TryFrom<Claims> for AuthUser {
    type Error = ApiError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| ApiError::unauthorized("authentication failed"))?;

        Ok(Self {
            user_id,
            is_admin: claims.admin,
        })
    }
}

/// Authentication gate: rejects the request unless it carries a valid
/// `Authorization: Bearer <token>` header, and binds the verified identity
/// into the request extensions for everything downstream.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let claims = TokenManager::from_config().parse(token).map_err(|e| {
        tracing::debug!("token rejected: {}", e);
        ApiError::unauthorized("authentication failed")
    })?;

    let auth_user = AuthUser::try_from(claims)?;
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract the bearer token from the `Authorization` header.
///
/// Each malformation gets its own rejection message: missing header, wrong
/// part count, wrong scheme, empty token.
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let header = headers
        .get("authorization")
        .ok_or(AUTH_HEADER_REQUIRED)?
        .to_str()
        .map_err(|_| INVALID_AUTH_HEADER)?;

    let parts: Vec<&str> = header.split(' ').collect();
    if parts.len() != 2 {
        return Err(INVALID_AUTH_HEADER);
    }

    let (scheme, token) = (parts[0], parts[1]);
    if scheme != BEARER_SCHEME {
        return Err(INVALID_SECURITY_SCHEME);
    }
    if token.is_empty() {
        return Err(EMPTY_TOKEN);
    }

    Ok(token)
}
