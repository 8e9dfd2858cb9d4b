use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{RequestStatus, RequestSummary};
use crate::database::query_builder::{bind_param_query_as, QueryBuilder};
use crate::database::DatabaseError;

const SUMMARY_COLUMNS: &str =
    "id, user_id, candidate_name, candidate_surname, status, created_at, updated_at";

/// Query access to the requests table. Ownership scoping is expressed with
/// `Option<Uuid>`: `None` means "all owners" and is reserved for the
/// administrator paths.
pub struct RequestRepository {
    pool: PgPool,
}

impl RequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List requests, filtered by owner and/or status, newest first.
    ///
    /// Both predicates are optional and the placeholders renumber to match
    /// whichever subset is present; limit and offset always bind last.
    /// No matching rows is an empty list, not an error.
    pub async fn list(
        &self,
        owner: Option<Uuid>,
        status: Option<RequestStatus>,
        page_number: u32,
        page_size: u32,
    ) -> Result<Vec<RequestSummary>, DatabaseError> {
        let mut builder =
            QueryBuilder::new(format!("SELECT {} FROM requests", SUMMARY_COLUMNS));

        if let Some(owner) = owner {
            builder = builder.filter("user_id =", owner);
        }
        if let Some(status) = status {
            builder = builder.filter("status =", status.as_str());
        }

        let query = builder
            .order_by("created_at DESC")
            .paginate(i64::from(page_size), page_offset(page_number, page_size))
            .build();

        let mut q = sqlx::query_as::<_, RequestSummary>(&query.sql);
        for param in query.params.iter() {
            q = bind_param_query_as(q, param);
        }

        Ok(q.fetch_all(&self.pool).await?)
    }

    /// Insert a submitted candidate request in a single statement and return
    /// the generated id.
    pub async fn add_candidate_request(
        &self,
        owner: Uuid,
        candidate_name: &str,
        candidate_surname: &str,
        document_key: &str,
    ) -> Result<Uuid, DatabaseError> {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO requests (user_id, candidate_name, candidate_surname, document_key, status) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(owner)
        .bind(candidate_name)
        .bind(candidate_surname)
        .bind(document_key)
        .bind(RequestStatus::Submitted.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    /// Move a request to a new status.
    ///
    /// The UPDATE does not pre-check existence; the affected-row count is the
    /// correctness check, and zero rows is reported as a distinct not-found
    /// error rather than a generic database failure.
    pub async fn update_status(
        &self,
        request_id: Uuid,
        new_status: RequestStatus,
    ) -> Result<(), DatabaseError> {
        let result =
            sqlx::query("UPDATE requests SET status = $1, updated_at = now() WHERE id = $2")
                .bind(new_status.as_str())
                .bind(request_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::RequestNotFound(request_id.to_string()));
        }

        Ok(())
    }

    /// Look up the stored document key for a request. With an owner given,
    /// the lookup also constrains on ownership, so users resolve only their
    /// own documents; `None` bypasses the constraint for administrators.
    pub async fn resolve_document_key(
        &self,
        request_id: Uuid,
        owner: Option<Uuid>,
    ) -> Result<String, DatabaseError> {
        let mut builder =
            QueryBuilder::new("SELECT document_key FROM requests").filter("id =", request_id);

        if let Some(owner) = owner {
            builder = builder.filter("user_id =", owner);
        }

        let query = builder.build();

        let mut q = sqlx::query_as::<_, (String,)>(&query.sql);
        for param in query.params.iter() {
            q = bind_param_query_as(q, param);
        }

        match q.fetch_optional(&self.pool).await? {
            Some((key,)) => Ok(key),
            None => Err(DatabaseError::FileNotFound(request_id.to_string())),
        }
    }
}

/// `LIMIT page_size OFFSET (page_number - 1) * page_size`; pages are
/// 1-based and validated positive upstream.
fn page_offset(page_number: u32, page_size: u32) -> i64 {
    (i64::from(page_number) - 1) * i64::from(page_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(page_offset(1, 10), 0);
    }

    #[test]
    fn later_pages_skip_earlier_rows() {
        // 25 matching rows with size 10: page 1 takes 10, page 3 the last 5
        assert_eq!(page_offset(3, 10), 20);
        assert_eq!(page_offset(2, 25), 25);
    }
}
