use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::auth::{CredentialError, CredentialProtector, TokenError, TokenService, PROTECTION_SCHEME};
use crate::config::SecurityConfig;
use crate::database::{DatabaseError, NewUser, Persistence, User, UserUpdate};
use crate::filter::{FilterField, FilterOp, FilterSet, FilterValue, OrderSpec, PageWindow};

pub const MIN_NAME_LENGTH: usize = 5;
pub const MIN_AGE: u32 = 5;
pub const MAX_EMAIL_LENGTH: usize = 254;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Email or password incorrect")]
    InvalidCredentials,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(DatabaseError),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Conflict(msg) => ServiceError::Conflict(msg),
            DatabaseError::NotFound(_) => ServiceError::NotFound,
            other => ServiceError::Database(other),
        }
    }
}

/// Fields of a new account, already parsed into their typed forms.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub name: String,
    pub age: u32,
    pub number: i32,
    pub date: DateTime<Utc>,
}

/// Account use cases on top of a [`Persistence`] backend.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Persistence>,
    credentials: CredentialProtector,
    tokens: TokenService,
    password_min_length: usize,
    password_max_length: usize,
}

impl UserService {
    pub fn new(
        store: Arc<dyn Persistence>,
        credentials: CredentialProtector,
        tokens: TokenService,
        security: &SecurityConfig,
    ) -> Self {
        Self {
            store,
            credentials,
            tokens,
            password_min_length: security.password_min_length,
            password_max_length: security.password_max_length,
        }
    }

    pub async fn health_check(&self) -> Result<(), ServiceError> {
        Ok(self.store.health_check().await?)
    }

    /// Validates and stores a new account. The email check runs before key
    /// derivation so duplicate signups stay cheap.
    pub async fn create(&self, account: NewAccount) -> Result<User, ServiceError> {
        self.validate_account(&account)?;

        if self.email_in_use(&account.email).await? {
            return Err(ServiceError::Conflict("Email is already in use".to_string()));
        }

        let credentials = self.credentials.clone();
        let password = account.password;
        let protected = tokio::task::spawn_blocking(move || credentials.protect(&password))
            .await
            .map_err(|e| ServiceError::Task(e.to_string()))??;

        let user = self
            .store
            .create(NewUser {
                email: account.email,
                password: protected.encode(),
                protection_scheme: PROTECTION_SCHEME.to_string(),
                name: account.name,
                age: account.age,
                number: account.number,
                date: account.date,
            })
            .await?;

        info!("Created user {}", user.id);
        Ok(user)
    }

    pub async fn signup(&self, account: NewAccount) -> Result<(String, User), ServiceError> {
        let user = self.create(account).await?;
        let token = self.issue_token(&user)?;
        Ok((token, user))
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), ServiceError> {
        let user = match self.find_by_email(email).await {
            Ok(user) => user,
            Err(ServiceError::NotFound) => {
                debug!("Login rejected: unknown email");
                return Err(ServiceError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        let credentials = self.credentials.clone();
        let password = password.to_string();
        let scheme = user.protection_scheme.clone();
        let protected_form = user.password.clone();
        let verified = tokio::task::spawn_blocking(move || credentials.verify(&password, &scheme, &protected_form))
            .await
            .map_err(|e| ServiceError::Task(e.to_string()))??;

        if !verified {
            debug!("Login rejected: password mismatch for user {}", user.id);
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.issue_token(&user)?;
        Ok((token, user))
    }

    pub async fn find(&self, filter: &FilterSet, order: &OrderSpec, page: &PageWindow) -> Result<Vec<User>, ServiceError> {
        Ok(self.store.find(filter, order, page).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, ServiceError> {
        let filter = FilterSet::build([(FilterField::Email, FilterOp::Eq, FilterValue::Text(email.to_string()))])
            .map_err(|e| ServiceError::Validation(e.to_string()))?;
        let page = PageWindow { limit: 1, ..PageWindow::default() };
        self.store
            .find(&filter, &OrderSpec::default(), &page)
            .await?
            .into_iter()
            .next()
            .ok_or(ServiceError::NotFound)
    }

    pub async fn find_one(&self, id: u64) -> Result<User, ServiceError> {
        let id = i64::try_from(id).map_err(|_| ServiceError::NotFound)?;
        self.store.find_by_id(id).await?.ok_or(ServiceError::NotFound)
    }

    pub async fn update_many(&self, updates: &[UserUpdate], filter: &FilterSet) -> Result<u64, ServiceError> {
        if updates.is_empty() {
            return Ok(0);
        }
        updates.iter().try_for_each(validate_update)?;
        Ok(self.store.update_many(updates, filter).await?)
    }

    pub async fn delete_many(&self, filter: &FilterSet) -> Result<u64, ServiceError> {
        Ok(self.store.delete_many(filter).await?)
    }

    pub async fn update_one(&self, user: &User, updates: &[UserUpdate]) -> Result<User, ServiceError> {
        updates.iter().try_for_each(validate_update)?;
        Ok(self.store.update_fields(user, updates).await?)
    }

    pub async fn delete_one(&self, user: &User) -> Result<(), ServiceError> {
        self.store.delete(user).await?;
        info!("Deleted user {}", user.id);
        Ok(())
    }

    fn issue_token(&self, user: &User) -> Result<String, ServiceError> {
        let id = u64::try_from(user.id).map_err(|_| ServiceError::Task(format!("invalid user id {}", user.id)))?;
        Ok(self.tokens.issue(id, &user.email)?)
    }

    async fn email_in_use(&self, email: &str) -> Result<bool, ServiceError> {
        match self.find_by_email(email).await {
            Ok(_) => Ok(true),
            Err(ServiceError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn validate_account(&self, account: &NewAccount) -> Result<(), ServiceError> {
        if account.email.len() > MAX_EMAIL_LENGTH || !account.email.contains('@') {
            return Err(ServiceError::Validation("Invalid value for email".to_string()));
        }
        let password_len = account.password.chars().count();
        if password_len < self.password_min_length || password_len > self.password_max_length {
            return Err(ServiceError::Validation(format!(
                "Password must be between {} and {} characters",
                self.password_min_length, self.password_max_length
            )));
        }
        validate_update(&UserUpdate::Name(account.name.clone()))?;
        validate_update(&UserUpdate::Age(account.age))
    }
}

fn validate_update(update: &UserUpdate) -> Result<(), ServiceError> {
    match update {
        UserUpdate::Name(name) if name.chars().count() < MIN_NAME_LENGTH => Err(ServiceError::Validation(format!(
            "Name must be at least {} characters long",
            MIN_NAME_LENGTH
        ))),
        UserUpdate::Age(age) if *age < MIN_AGE => {
            Err(ServiceError::Validation(format!("Age must be at least {}", MIN_AGE)))
        }
        _ => Ok(()),
    }
}
