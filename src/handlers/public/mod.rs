// handlers/public - no authentication required.
// These endpoints are the only way to obtain a bearer token.
pub mod health;
pub mod login;
pub mod signup;

pub use health::health_get;
pub use login::{login_post, Session};
pub use signup::signup_post;
