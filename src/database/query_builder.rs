use sqlx::{self, postgres::PgArguments, FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, FilterSet, FilterValue, OrderSpec, PageWindow, SqlResult};

/// Builds and runs parameterized statements against one table.
pub struct QueryBuilder<T> {
    filter: Filter,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(table_name: impl Into<String>) -> Result<Self, DatabaseError> {
        let filter = Filter::new(table_name).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        Ok(Self { filter, _phantom: std::marker::PhantomData })
    }

    pub fn where_set(mut self, set: FilterSet) -> Self {
        self.filter.where_set(set);
        self
    }

    pub fn order(mut self, order: OrderSpec) -> Self {
        self.filter.order(order);
        self
    }

    pub fn page(mut self, page: PageWindow) -> Self {
        self.filter.page(page);
        self
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.filter.to_sql();
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(pool).await?)
    }

    pub async fn select_by_id(self, id: i64, pool: &PgPool) -> Result<Option<T>, DatabaseError> {
        let query = format!(
            "SELECT * FROM \"{}\" WHERE \"id\" = $1 AND \"deleted_at\" IS NULL",
            self.filter.table_name()
        );
        Ok(sqlx::query_as::<_, T>(&query).bind(id).fetch_optional(pool).await?)
    }

    pub async fn insert(self, columns: &[(&str, FilterValue)], pool: &PgPool) -> Result<T, DatabaseError> {
        let names: Vec<String> = columns.iter().map(|(c, _)| format!("\"{}\"", c)).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();
        let query = format!(
            "INSERT INTO \"{}\" ({}) VALUES ({}) RETURNING *",
            self.filter.table_name(),
            names.join(", "),
            placeholders.join(", ")
        );

        let mut q = sqlx::query_as::<_, T>(&query);
        for (_, v) in columns.iter() {
            q = bind_param_query_as(q, v);
        }
        Ok(q.fetch_one(pool).await?)
    }

    /// Applies `assignments` to every live row matching the where set.
    pub async fn update(self, assignments: &[(&str, FilterValue)], pool: &PgPool) -> Result<u64, DatabaseError> {
        if assignments.is_empty() {
            return Ok(0);
        }

        let sql_result = self.update_sql(assignments, None);
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        Ok(q.execute(pool).await?.rows_affected())
    }

    /// Applies `assignments` to a single live row and returns it.
    pub async fn update_by_id(
        self,
        id: i64,
        assignments: &[(&str, FilterValue)],
        pool: &PgPool,
    ) -> Result<Option<T>, DatabaseError> {
        let sql_result = self.update_sql(assignments, Some(id));
        let query = format!("{} RETURNING *", sql_result.query);
        let mut q = sqlx::query_as::<_, T>(&query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_optional(pool).await?)
    }

    /// Stamps `deleted_at` on every live row matching the where set.
    pub async fn soft_delete(self, pool: &PgPool) -> Result<u64, DatabaseError> {
        let where_result = self.filter.to_where_sql(0);
        let query = format!(
            "UPDATE \"{}\" SET \"deleted_at\" = NOW() WHERE {}",
            self.filter.table_name(),
            where_result.query
        );
        let mut q = sqlx::query(&query);
        for p in where_result.params.iter() {
            q = bind_param_query(q, p);
        }
        Ok(q.execute(pool).await?.rows_affected())
    }

    pub async fn soft_delete_by_id(self, id: i64, pool: &PgPool) -> Result<u64, DatabaseError> {
        let query = format!(
            "UPDATE \"{}\" SET \"deleted_at\" = NOW() WHERE \"id\" = $1 AND \"deleted_at\" IS NULL",
            self.filter.table_name()
        );
        Ok(sqlx::query(&query).bind(id).execute(pool).await?.rows_affected())
    }

    // SET placeholders come first; where placeholders continue the numbering.
    fn update_sql(&self, assignments: &[(&str, FilterValue)], id: Option<i64>) -> SqlResult {
        let mut set_clauses: Vec<String> = assignments
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("\"{}\" = ${}", column, i + 1))
            .collect();
        set_clauses.push("\"updated_at\" = NOW()".to_string());

        let mut params: Vec<FilterValue> = assignments.iter().map(|(_, v)| v.clone()).collect();
        let where_clause = match id {
            Some(id) => format!("\"id\" = {} AND \"deleted_at\" IS NULL", id),
            None => {
                let where_result = self.filter.to_where_sql(assignments.len());
                params.extend(where_result.params);
                where_result.query
            }
        };

        SqlResult {
            query: format!(
                "UPDATE \"{}\" SET {} WHERE {}",
                self.filter.table_name(),
                set_clauses.join(", "),
                where_clause
            ),
            params,
        }
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &FilterValue,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        FilterValue::Text(s) => q.bind(s.clone()),
        // Postgres has no unsigned types; age lives in a BIGINT column.
        FilterValue::Unsigned(u) => q.bind(i64::from(*u)),
        FilterValue::Integer(i) => q.bind(*i),
        FilterValue::Timestamp(t) => q.bind(*t),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &FilterValue,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        FilterValue::Text(s) => q.bind(s.clone()),
        FilterValue::Unsigned(u) => q.bind(i64::from(*u)),
        FilterValue::Integer(i) => q.bind(*i),
        FilterValue::Timestamp(t) => q.bind(*t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::User;
    use crate::filter::{FilterField, FilterOp};

    #[test]
    fn update_numbers_where_after_set() {
        let set = FilterSet::build([(FilterField::Age, FilterOp::Gte, FilterValue::Unsigned(18))]).unwrap();
        let builder = QueryBuilder::<User>::new("users").unwrap().where_set(set);
        let sql = builder.update_sql(
            &[("name", FilterValue::Text("Alice".into())), ("number", FilterValue::Integer(3))],
            None,
        );
        assert_eq!(
            sql.query,
            "UPDATE \"users\" SET \"name\" = $1, \"number\" = $2, \"updated_at\" = NOW() WHERE \"deleted_at\" IS NULL AND \"age\" >= $3"
        );
        assert_eq!(
            sql.params,
            vec![FilterValue::Text("Alice".into()), FilterValue::Integer(3), FilterValue::Unsigned(18)]
        );
    }

    #[test]
    fn update_by_id_targets_live_row() {
        let builder = QueryBuilder::<User>::new("users").unwrap();
        let sql = builder.update_sql(&[("age", FilterValue::Unsigned(30))], Some(7));
        assert_eq!(
            sql.query,
            "UPDATE \"users\" SET \"age\" = $1, \"updated_at\" = NOW() WHERE \"id\" = 7 AND \"deleted_at\" IS NULL"
        );
        assert_eq!(sql.params, vec![FilterValue::Unsigned(30)]);
    }

    #[test]
    fn rejects_invalid_table() {
        assert!(QueryBuilder::<User>::new("users; --").is_err());
    }
}
