use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{NewUser, User, UserUpdate};
use crate::filter::{FilterSet, OrderSpec, PageWindow};

/// Storage for the user resource. Every read and bulk write ignores
/// soft-deleted rows.
///
/// Implementations receive only validated filter sets; values travel as
/// bound parameters, never as query text.
#[async_trait]
pub trait Persistence: Send + Sync {
    async fn migrate(&self) -> Result<(), DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Fails with [`DatabaseError::Conflict`] if the email is taken.
    async fn create(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find(&self, filter: &FilterSet, order: &OrderSpec, page: &PageWindow) -> Result<Vec<User>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError>;

    /// Returns the number of rows changed.
    async fn update_many(&self, updates: &[UserUpdate], filter: &FilterSet) -> Result<u64, DatabaseError>;

    /// Soft-deletes every match; returns the number of rows affected.
    async fn delete_many(&self, filter: &FilterSet) -> Result<u64, DatabaseError>;

    async fn update_fields(&self, user: &User, updates: &[UserUpdate]) -> Result<User, DatabaseError>;

    async fn delete(&self, user: &User) -> Result<(), DatabaseError>;
}
