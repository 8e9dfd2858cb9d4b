use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

const PERMISSION_REQUIRED: &str = "permission required";

/// Administrator gate. Composes after the authentication gate and never the
/// reverse: it judges the identity that gate already bound, so running it
/// first would reject every request.
pub async fn require_admin_middleware(
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    check_admin(request.extensions().get::<AuthUser>())?;
    Ok(next.run(request).await)
}

/// The gate itself, separated from axum plumbing so it can be judged in
/// isolation: admits only an established administrator identity.
fn check_admin(user: Option<&AuthUser>) -> Result<(), ApiError> {
    match user {
        Some(user) if user.is_admin => Ok(()),
        Some(_) => Err(ApiError::forbidden(PERMISSION_REQUIRED)),
        None => Err(ApiError::unauthorized("authentication required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(is_admin: bool) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            is_admin,
        }
    }

    #[test]
    fn admin_identity_is_admitted() {
        assert!(check_admin(Some(&user(true))).is_ok());
    }

    #[test]
    fn non_admin_identity_is_forbidden() {
        let err = check_admin(Some(&user(false))).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn missing_identity_is_unauthorized() {
        let err = check_admin(None).unwrap_err();
        assert_eq!(err.status_code(), 401);
    }
}
