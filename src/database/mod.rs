pub mod manager;
pub mod memory;
pub mod models;
pub mod persistence;
pub mod postgres;
pub mod query_builder;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use models::{NewUser, User, UserUpdate, USERS_TABLE};
pub use persistence::Persistence;
pub use postgres::PgPersistence;
