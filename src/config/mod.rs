use std::env;

use thiserror::Error;

/// Application configuration, built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
    /// In-memory persistence; no database required.
    Test,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Clone)]
pub struct SecurityConfig {
    pub app_name: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub password_min_length: usize,
    pub password_max_length: usize,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("app_name", &self.app_name)
            .field("jwt_secret", &"<redacted>")
            .field("cors_origins", &self.cors_origins)
            .field("password_min_length", &self.password_min_length)
            .field("password_max_length", &self.password_max_length)
            .finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {0}")]
    Invalid(&'static str),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            Ok("test") => Environment::Test,
            _ => Environment::Development,
        };

        let config = Self::preset(environment).with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().map_err(|_| ConfigError::Invalid("PORT"))?;
        }

        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().map_err(|_| ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"))?;
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout =
                v.parse().map_err(|_| ConfigError::Invalid("DATABASE_CONNECTION_TIMEOUT"))?;
        }

        if let Ok(v) = env::var("APP_NAME") {
            self.security.app_name = v;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins =
                v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        }
        if let Ok(v) = env::var("PASSWORD_MIN_LENGTH") {
            self.security.password_min_length = v.parse().map_err(|_| ConfigError::Invalid("PASSWORD_MIN_LENGTH"))?;
        }
        if let Ok(v) = env::var("PASSWORD_MAX_LENGTH") {
            self.security.password_max_length = v.parse().map_err(|_| ConfigError::Invalid("PASSWORD_MAX_LENGTH"))?;
        }

        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.security.app_name.is_empty() {
            return Err(ConfigError::Invalid("APP_NAME"));
        }
        if self.database.url.is_none() && self.environment != Environment::Test {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.security.password_min_length > self.security.password_max_length {
            return Err(ConfigError::Invalid("PASSWORD_MIN_LENGTH"));
        }
        Ok(())
    }

    /// Defaults for `environment`. The JWT secret is always left empty and
    /// must be supplied.
    pub fn preset(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self::development(),
            Environment::Staging => Self::staging(),
            Environment::Production => Self::production(),
            Environment::Test => Self::test(),
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 5001 },
            database: DatabaseConfig { url: None, max_connections: 10, connection_timeout: 30 },
            security: SecurityConfig {
                app_name: "lizard".to_string(),
                jwt_secret: String::new(),
                cors_origins: vec![],
                password_min_length: 8,
                password_max_length: 128,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig { url: None, max_connections: 20, connection_timeout: 10 },
            ..Self::development()
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig { url: None, max_connections: 50, connection_timeout: 5 },
            ..Self::development()
        }
    }

    fn test() -> Self {
        Self { environment: Environment::Test, ..Self::development() }
    }
}
