pub mod user;

pub use user::{NewUser, User, UserUpdate, USERS_TABLE};
