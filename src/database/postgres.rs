use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{NewUser, User, UserUpdate, USERS_TABLE};
use super::persistence::Persistence;
use super::query_builder::QueryBuilder;
use crate::config::DatabaseConfig;
use crate::filter::{FilterSet, FilterValue, OrderSpec, PageWindow};

/// [`Persistence`] backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgPersistence {
    pool: PgPool,
}

impl PgPersistence {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        Ok(Self::new(DatabaseManager::connect(config).await?))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn users(&self) -> Result<QueryBuilder<User>, DatabaseError> {
        QueryBuilder::new(USERS_TABLE)
    }
}

fn assignments(updates: &[UserUpdate]) -> Vec<(&'static str, FilterValue)> {
    updates.iter().map(|u| (u.column(), u.value())).collect()
}

fn map_unique_violation(err: DatabaseError) -> DatabaseError {
    match err {
        DatabaseError::Sqlx(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            DatabaseError::Conflict("Email is already in use".to_string())
        }
        other => other,
    }
}

#[async_trait]
impl Persistence for PgPersistence {
    async fn migrate(&self) -> Result<(), DatabaseError> {
        DatabaseManager::migrate(&self.pool).await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let columns = [
            ("email", FilterValue::Text(user.email)),
            ("password", FilterValue::Text(user.password)),
            ("protection_scheme", FilterValue::Text(user.protection_scheme)),
            ("name", FilterValue::Text(user.name)),
            ("age", FilterValue::Unsigned(user.age)),
            ("number", FilterValue::Integer(user.number)),
            ("date", FilterValue::Timestamp(user.date)),
        ];
        let created = self.users()?.insert(&columns, &self.pool).await.map_err(map_unique_violation)?;
        debug!("Inserted user {}", created.id);
        Ok(created)
    }

    async fn find(&self, filter: &FilterSet, order: &OrderSpec, page: &PageWindow) -> Result<Vec<User>, DatabaseError> {
        self.users()?
            .where_set(filter.clone())
            .order(*order)
            .page(*page)
            .select_all(&self.pool)
            .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        self.users()?.select_by_id(id, &self.pool).await
    }

    async fn update_many(&self, updates: &[UserUpdate], filter: &FilterSet) -> Result<u64, DatabaseError> {
        self.users()?.where_set(filter.clone()).update(&assignments(updates), &self.pool).await
    }

    async fn delete_many(&self, filter: &FilterSet) -> Result<u64, DatabaseError> {
        self.users()?.where_set(filter.clone()).soft_delete(&self.pool).await
    }

    async fn update_fields(&self, user: &User, updates: &[UserUpdate]) -> Result<User, DatabaseError> {
        if updates.is_empty() {
            return Ok(user.clone());
        }
        self.users()?
            .update_by_id(user.id, &assignments(updates), &self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user.id)))
    }

    async fn delete(&self, user: &User) -> Result<(), DatabaseError> {
        match self.users()?.soft_delete_by_id(user.id, &self.pool).await? {
            0 => Err(DatabaseError::NotFound(format!("user {}", user.id))),
            _ => Ok(()),
        }
    }
}
