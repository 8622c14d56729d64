// Form bodies and their conversion to typed values. Empty fields count as
// absent everywhere.
use serde::Deserialize;

use crate::database::UserUpdate;
use crate::error::ApiError;
use crate::filter::value::{parse_age, parse_date, parse_number};
use crate::services::NewAccount;

#[derive(Debug, Default, Deserialize)]
pub struct AccountForm {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub age: Option<String>,
    pub number: Option<String>,
    pub date: Option<String>,
}

impl AccountForm {
    pub fn into_account(self) -> Result<NewAccount, ApiError> {
        Ok(NewAccount {
            email: required("email", self.email)?,
            password: required("password", self.password)?,
            name: required("name", self.name)?,
            age: typed("age", self.age, parse_age)?,
            number: typed("number", self.number, parse_number)?,
            date: typed("date", self.date, parse_date)?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    pub fn into_credentials(self) -> Result<(String, String), ApiError> {
        Ok((required("email", self.email)?, required("password", self.password)?))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateForm {
    pub name: Option<String>,
    pub age: Option<String>,
    pub number: Option<String>,
    pub date: Option<String>,
}

impl UpdateForm {
    /// Only the fields that were sent become updates.
    pub fn into_updates(self) -> Result<Vec<UserUpdate>, ApiError> {
        let mut updates = Vec::new();
        if let Some(name) = present(self.name) {
            updates.push(UserUpdate::Name(name));
        }
        if let Some(raw) = present(self.age) {
            updates.push(UserUpdate::Age(parse_age(&raw).ok_or_else(|| invalid("age"))?));
        }
        if let Some(raw) = present(self.number) {
            updates.push(UserUpdate::Number(parse_number(&raw).ok_or_else(|| invalid("number"))?));
        }
        if let Some(raw) = present(self.date) {
            updates.push(UserUpdate::Date(parse_date(&raw).ok_or_else(|| invalid("date"))?));
        }
        Ok(updates)
    }
}

pub fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.parse().map_err(|_| ApiError::bad_request("Invalid id"))
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(field: &str, value: Option<String>) -> Result<String, ApiError> {
    present(value).ok_or_else(|| ApiError::bad_request(format!("Parameter {} missing", field)))
}

fn typed<T>(field: &str, value: Option<String>, parse: fn(&str) -> Option<T>) -> Result<T, ApiError> {
    let raw = required(field, value)?;
    parse(&raw).ok_or_else(|| invalid(field))
}

fn invalid(field: &str) -> ApiError {
    ApiError::bad_request(format!("Invalid value for {}", field))
}
