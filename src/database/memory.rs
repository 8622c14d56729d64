use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::manager::DatabaseError;
use super::models::{NewUser, User, UserUpdate};
use super::persistence::Persistence;
use crate::filter::{Comparison, FilterField, FilterSet, FilterValue, OrderField, OrderSpec, PageWindow, SortDirection};

/// In-process [`Persistence`] used by the `test` environment and the
/// integration suite. Mirrors the PostgreSQL backend: soft deletes, live
/// email uniqueness and the same comparison semantics.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    last_id: i64,
    users: Vec<User>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryState {
    fn live(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| u.deleted_at.is_none())
    }

    fn live_mut<'a>(&'a mut self, filter: &'a FilterSet) -> impl Iterator<Item = &'a mut User> + 'a {
        self.users.iter_mut().filter(move |u| u.deleted_at.is_none() && matches_all(u, filter))
    }

    fn live_by_id_mut(&mut self, id: i64) -> Result<&mut User, DatabaseError> {
        self.users
            .iter_mut()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", id)))
    }
}

fn compare(user: &User, comparison: &Comparison) -> Option<Ordering> {
    match (comparison.field(), comparison.value()) {
        (FilterField::Name, FilterValue::Text(v)) => Some(user.name.as_str().cmp(v.as_str())),
        (FilterField::Email, FilterValue::Text(v)) => Some(user.email.as_str().cmp(v.as_str())),
        (FilterField::Age, FilterValue::Unsigned(v)) => Some(user.age.cmp(v)),
        (FilterField::Number, FilterValue::Integer(v)) => Some(user.number.cmp(v)),
        (FilterField::Date, FilterValue::Timestamp(v)) => Some(user.date.cmp(v)),
        _ => None,
    }
}

fn matches_all(user: &User, filter: &FilterSet) -> bool {
    filter
        .comparisons()
        .iter()
        .all(|c| compare(user, c).is_some_and(|ordering| c.operator().matches(ordering)))
}

fn sort_key(a: &User, b: &User, field: OrderField) -> Ordering {
    match field {
        OrderField::Id => a.id.cmp(&b.id),
        OrderField::Name => a.name.cmp(&b.name),
        OrderField::Age => a.age.cmp(&b.age),
        OrderField::Number => a.number.cmp(&b.number),
        OrderField::Date => a.date.cmp(&b.date),
    }
}

#[async_trait]
impl Persistence for MemoryStore {
    async fn migrate(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn create(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut state = self.state.write().await;
        if state.live().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict("Email is already in use".to_string()));
        }

        state.last_id += 1;
        let now = Utc::now();
        let created = User {
            id: state.last_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            email: user.email,
            password: user.password,
            compromised: false,
            protection_scheme: user.protection_scheme,
            name: user.name,
            age: user.age,
            number: user.number,
            date: user.date,
        };
        state.users.push(created.clone());
        Ok(created)
    }

    async fn find(&self, filter: &FilterSet, order: &OrderSpec, page: &PageWindow) -> Result<Vec<User>, DatabaseError> {
        let state = self.state.read().await;
        let mut found: Vec<User> = state.live().filter(|u| matches_all(u, filter)).cloned().collect();

        found.sort_by(|a, b| {
            let ordering = sort_key(a, b, order.field);
            match order.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        Ok(found
            .into_iter()
            .skip(page.offset().unwrap_or(0))
            .take(page.limit().unwrap_or(usize::MAX))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let state = self.state.read().await;
        let found = state.live().find(|u| u.id == id).cloned();
        Ok(found)
    }

    async fn update_many(&self, updates: &[UserUpdate], filter: &FilterSet) -> Result<u64, DatabaseError> {
        if updates.is_empty() {
            return Ok(0);
        }

        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut changed = 0;
        for user in state.live_mut(filter) {
            updates.iter().for_each(|u| u.apply(user));
            user.updated_at = now;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_many(&self, filter: &FilterSet) -> Result<u64, DatabaseError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut deleted = 0;
        for user in state.live_mut(filter) {
            user.deleted_at = Some(now);
            deleted += 1;
        }
        Ok(deleted)
    }

    async fn update_fields(&self, user: &User, updates: &[UserUpdate]) -> Result<User, DatabaseError> {
        let mut state = self.state.write().await;
        let stored = state.live_by_id_mut(user.id)?;
        if !updates.is_empty() {
            updates.iter().for_each(|u| u.apply(stored));
            stored.updated_at = Utc::now();
        }
        Ok(stored.clone())
    }

    async fn delete(&self, user: &User) -> Result<(), DatabaseError> {
        let mut state = self.state.write().await;
        state.live_by_id_mut(user.id)?.deleted_at = Some(Utc::now());
        Ok(())
    }
}
