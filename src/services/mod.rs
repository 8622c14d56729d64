pub mod user_service;

pub use user_service::{NewAccount, ServiceError, UserService};
