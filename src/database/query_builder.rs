use sqlx::{self, postgres::PgArguments, FromRow};
use uuid::Uuid;

/// A value bound into a query parameter. Every user-supplied value travels
/// through here; nothing is ever interpolated into the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Uuid(Uuid),
    Text(String),
    Int(i64),
    Bool(bool),
}

impl From<Uuid> for SqlParam {
    fn from(v: Uuid) -> Self {
        SqlParam::Uuid(v)
    }
}

impl From<&str> for SqlParam {
    fn from(v: &str) -> Self {
        SqlParam::Text(v.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(v: String) -> Self {
        SqlParam::Text(v)
    }
}

impl From<i64> for SqlParam {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

impl From<bool> for SqlParam {
    fn from(v: bool) -> Self {
        SqlParam::Bool(v)
    }
}

/// Rendered SQL plus its parameters, in placeholder order.
#[derive(Debug, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// Ordered builder for queries whose WHERE clause depends on which filters
/// the caller supplied. Predicates accumulate as `(fragment, value)` pairs
/// and `$n` placeholders are numbered only at render time, so a query with
/// two optional filters binds `$1`/`$2` when both are present and a lone
/// `$1` when only one is.
#[derive(Debug)]
pub struct QueryBuilder {
    base: String,
    predicates: Vec<(&'static str, SqlParam)>,
    order_by: Option<&'static str>,
    page: Option<(i64, i64)>,
}

impl QueryBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            predicates: vec![],
            order_by: None,
            page: None,
        }
    }

    /// Append a predicate. The fragment carries the column and operator
    /// (e.g. `"user_id ="`); the placeholder is appended at render time.
    pub fn filter(mut self, fragment: &'static str, value: impl Into<SqlParam>) -> Self {
        self.predicates.push((fragment, value.into()));
        self
    }

    pub fn order_by(mut self, clause: &'static str) -> Self {
        self.order_by = Some(clause);
        self
    }

    /// Append `LIMIT`/`OFFSET`, bound as the final two parameters.
    pub fn paginate(mut self, limit: i64, offset: i64) -> Self {
        self.page = Some((limit, offset));
        self
    }

    pub fn build(self) -> SqlQuery {
        let mut sql = self.base;
        let mut params = Vec::with_capacity(self.predicates.len() + 2);

        for (i, (fragment, value)) in self.predicates.into_iter().enumerate() {
            let keyword = if i == 0 { " WHERE" } else { " AND" };
            sql.push_str(&format!("{} {} ${}", keyword, fragment, i + 1));
            params.push(value);
        }

        if let Some(order) = self.order_by {
            sql.push_str(&format!(" ORDER BY {}", order));
        }

        if let Some((limit, offset)) = self.page {
            sql.push_str(&format!(
                " LIMIT ${} OFFSET ${}",
                params.len() + 1,
                params.len() + 2
            ));
            params.push(SqlParam::Int(limit));
            params.push(SqlParam::Int(offset));
        }

        SqlQuery { sql, params }
    }
}

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        SqlParam::Uuid(u) => q.bind(*u),
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Int(i) => q.bind(*i),
        SqlParam::Bool(b) => q.bind(*b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "SELECT id FROM requests";

    #[test]
    fn renders_bare_query_without_where() {
        let query = QueryBuilder::new(BASE).build();
        assert_eq!(query.sql, "SELECT id FROM requests");
        assert!(query.params.is_empty());
    }

    #[test]
    fn renders_single_predicate_as_dollar_one() {
        let owner = Uuid::new_v4();
        let query = QueryBuilder::new(BASE).filter("user_id =", owner).build();

        assert_eq!(query.sql, "SELECT id FROM requests WHERE user_id = $1");
        assert_eq!(query.params, vec![SqlParam::Uuid(owner)]);
    }

    #[test]
    fn status_alone_still_binds_dollar_one() {
        // With no owner predicate ahead of it, the status placeholder must
        // renumber down rather than assume a fixed position.
        let query = QueryBuilder::new(BASE).filter("status =", "accepted").build();

        assert_eq!(query.sql, "SELECT id FROM requests WHERE status = $1");
        assert_eq!(query.params, vec![SqlParam::Text("accepted".to_string())]);
    }

    #[test]
    fn predicates_number_in_insertion_order() {
        let owner = Uuid::new_v4();
        let query = QueryBuilder::new(BASE)
            .filter("user_id =", owner)
            .filter("status =", "submitted")
            .build();

        assert_eq!(
            query.sql,
            "SELECT id FROM requests WHERE user_id = $1 AND status = $2"
        );
        assert_eq!(
            query.params,
            vec![
                SqlParam::Uuid(owner),
                SqlParam::Text("submitted".to_string())
            ]
        );
    }

    #[test]
    fn pagination_binds_after_predicates() {
        let owner = Uuid::new_v4();
        let query = QueryBuilder::new(BASE)
            .filter("user_id =", owner)
            .filter("status =", "rejected")
            .order_by("created_at DESC")
            .paginate(10, 20)
            .build();

        assert_eq!(
            query.sql,
            "SELECT id FROM requests WHERE user_id = $1 AND status = $2 \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        );
        assert_eq!(query.params.len(), 4);
        assert_eq!(query.params[2], SqlParam::Int(10));
        assert_eq!(query.params[3], SqlParam::Int(20));
    }

    #[test]
    fn pagination_without_predicates_starts_at_dollar_one() {
        let query = QueryBuilder::new(BASE)
            .order_by("created_at DESC")
            .paginate(10, 0)
            .build();

        assert_eq!(
            query.sql,
            "SELECT id FROM requests ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        assert_eq!(
            query.params,
            vec![SqlParam::Int(10), SqlParam::Int(0)]
        );
    }
}
