use uuid::Uuid;

use crate::auth::{password, TokenError, TokenManager};
use crate::database::users::UserRepository;
use crate::database::{self, DatabaseError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid name or password")]
    InvalidCredentials,

    #[error("user '{0}' already exists")]
    UserAlreadyExists(String),

    #[error("cannot hash password: {0}")]
    Hashing(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Sign-up and log-in flows: password hashing on the way in, hash
/// verification and token issuance on the way back.
pub struct AuthService {
    users: UserRepository,
    tokens: &'static TokenManager,
}

impl AuthService {
    pub async fn new() -> Result<Self, DatabaseError> {
        let pool = database::pool().await?;
        Ok(Self {
            users: UserRepository::new(pool),
            tokens: TokenManager::from_config(),
        })
    }

    /// Register a user and return the generated id.
    pub async fn sign_up(&self, name: &str, password: &str) -> Result<Uuid, AuthError> {
        let hash = password::hash_password(password)
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        match self.users.create(name, &hash).await {
            Ok(id) => Ok(id),
            Err(DatabaseError::DuplicateUser(name)) => Err(AuthError::UserAlreadyExists(name)),
            Err(e) => Err(e.into()),
        }
    }

    /// Authenticate a user and issue an access token carrying their
    /// administrator flag as of right now.
    ///
    /// An unknown name and a wrong password are indistinguishable to the
    /// caller.
    pub async fn log_in(&self, name: &str, password: &str) -> Result<String, AuthError> {
        let user = match self.users.find_by_name(name).await {
            Ok(user) => user,
            Err(DatabaseError::UserNotFound(_)) => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !password::verify_password(password, &user.password) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.id.to_string(), user.is_admin)?;
        Ok(token)
    }
}
