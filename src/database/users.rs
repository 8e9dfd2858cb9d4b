use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::User;
use crate::database::{is_unique_violation, DatabaseError};

/// Query access to the users table.
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a user, returning the generated id. The unique constraint on
    /// `name` is the only duplicate check; a violation comes back as a
    /// distinct duplicate-user error.
    pub async fn create(&self, name: &str, password_hash: &str) -> Result<Uuid, DatabaseError> {
        let result: Result<(Uuid,), sqlx::Error> =
            sqlx::query_as("INSERT INTO users (name, password) VALUES ($1, $2) RETURNING id")
                .bind(name)
                .bind(password_hash)
                .fetch_one(&self.pool)
                .await;

        match result {
            Ok((id,)) => Ok(id),
            Err(e) if is_unique_violation(&e) => {
                Err(DatabaseError::DuplicateUser(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch a user by display name for the login flow.
    pub async fn find_by_name(&self, name: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, password, is_admin, created_at, updated_at \
             FROM users WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::UserNotFound(name.to_string()))
    }
}
