use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::filter::FilterValue;

pub const USERS_TABLE: &str = "users";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub email: String,
    /// Protected form; never leaves the server.
    #[serde(skip_serializing)]
    pub password: String,
    pub compromised: bool,
    pub protection_scheme: String,
    pub name: String,
    #[sqlx(try_from = "i64")]
    pub age: u32,
    pub number: i32,
    pub date: DateTime<Utc>,
}

/// A user row that has not been stored yet. New rows start uncompromised.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub protection_scheme: String,
    pub name: String,
    pub age: u32,
    pub number: i32,
    pub date: DateTime<Utc>,
}

/// One typed column assignment of a partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserUpdate {
    Name(String),
    Age(u32),
    Number(i32),
    Date(DateTime<Utc>),
}

impl UserUpdate {
    pub fn column(&self) -> &'static str {
        match self {
            UserUpdate::Name(_) => "name",
            UserUpdate::Age(_) => "age",
            UserUpdate::Number(_) => "number",
            UserUpdate::Date(_) => "date",
        }
    }

    pub fn value(&self) -> FilterValue {
        match self {
            UserUpdate::Name(v) => FilterValue::Text(v.clone()),
            UserUpdate::Age(v) => FilterValue::Unsigned(*v),
            UserUpdate::Number(v) => FilterValue::Integer(*v),
            UserUpdate::Date(v) => FilterValue::Timestamp(*v),
        }
    }

    pub fn apply(&self, user: &mut User) {
        match self {
            UserUpdate::Name(v) => user.name = v.clone(),
            UserUpdate::Age(v) => user.age = *v,
            UserUpdate::Number(v) => user.number = *v,
            UserUpdate::Date(v) => user.date = *v,
        }
    }
}
