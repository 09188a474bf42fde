use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::PgResource;
use crate::repository::{Filter, FilterValue};
use crate::{BlogError, Repository};

pub struct PostgresRepository<R> {
    pool: PgPool,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for PostgresRepository<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: PgResource> PostgresRepository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _resource: PhantomData,
        }
    }

    fn select(filter: &Filter) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(R::SELECT);
        push_filter(&mut qb, filter);
        qb
    }

    async fn fetch_one_or_vanished(&self, id: i64) -> Result<R, BlogError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| BlogError::Database(format!("{} {id} vanished after write", R::KIND)))
    }
}

/// Appends WHERE, ORDER BY and LIMIT. Column names come from compile-time
/// constants; every value is bound.
pub(super) fn push_filter(qb: &mut QueryBuilder<'static, Postgres>, filter: &Filter) {
    for (i, predicate) in filter.predicates().iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        qb.push(predicate.column).push(predicate.op.as_sql());
        match &predicate.value {
            FilterValue::Int(v) => qb.push_bind(*v),
            FilterValue::Text(v) => qb.push_bind(v.clone()),
            FilterValue::Bool(v) => qb.push_bind(*v),
        };
    }

    if let Some(order) = filter.order() {
        qb.push(" ORDER BY ")
            .push(order.column)
            .push(order.direction.as_sql());
    }

    if let Some(limit) = filter.limit_value() {
        qb.push(" LIMIT ").push_bind(limit);
    }
}

fn map_write_error<R: PgResource>(e: sqlx::Error) -> BlogError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => BlogError::AlreadyExists(R::KIND),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            BlogError::BadRequest(format!("{} references a missing or in-use row", R::KIND))
        }
        _ => BlogError::Database(e.to_string()),
    }
}

#[async_trait]
impl<R: PgResource> Repository<R> for PostgresRepository<R> {
    async fn create(&self, draft: &R::Draft) -> Result<R, BlogError> {
        let mut qb = QueryBuilder::new("");
        R::push_insert(draft, &mut qb);

        let id: i64 = qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error::<R>)?;

        self.fetch_one_or_vanished(id).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<R>, BlogError> {
        self.find_one(&Filter::new().eq(R::ID_COLUMN, id)).await
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<R>, BlogError> {
        let mut qb = Self::select(filter);
        if filter.limit_value().is_none() {
            qb.push(" LIMIT 1");
        }

        let row: Option<R::Record> = qb
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn list(&self, filter: &Filter) -> Result<Vec<R>, BlogError> {
        let rows: Vec<R::Record> = Self::select(filter)
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BlogError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i64, changes: &R::Changes) -> Result<R, BlogError> {
        let mut qb = QueryBuilder::new("");
        R::push_update(id, changes, &mut qb);

        let updated: Option<i64> = qb
            .build_query_scalar()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error::<R>)?;

        let id = updated.ok_or(BlogError::NotFound(R::KIND))?;
        self.fetch_one_or_vanished(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), BlogError> {
        let mut qb = QueryBuilder::new("DELETE FROM ");
        qb.push(R::TABLE).push(" WHERE id = ").push_bind(id);

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_write_error::<R>)?;

        if result.rows_affected() == 0 {
            return Err(BlogError::NotFound(R::KIND));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{Direction, Op, article_columns};

    #[test]
    fn test_filter_rendering() {
        let filter = Filter::new()
            .eq(article_columns::CATEGORY_ID, 3)
            .with(article_columns::ID, Op::Lt, 100)
            .order_by(article_columns::ID, Direction::Desc)
            .limit(20);

        let mut qb = QueryBuilder::<Postgres>::new("SELECT a.id FROM articles a");
        push_filter(&mut qb, &filter);

        assert_eq!(
            qb.sql(),
            "SELECT a.id FROM articles a WHERE a.category_id = $1 AND a.id < $2 ORDER BY a.id DESC LIMIT $3"
        );
    }

    #[test]
    fn test_text_values_are_bound() {
        let filter = Filter::new().eq(crate::repository::user_columns::EMAIL, "x' OR '1'='1");

        let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM users");
        push_filter(&mut qb, &filter);

        assert_eq!(qb.sql(), "SELECT id FROM users WHERE email = $1");
    }
}
