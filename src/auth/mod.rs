pub mod credential;
pub mod token;

pub use credential::{CredentialError, CredentialProtector, ProtectedCredential, PROTECTION_SCHEME};
pub use token::{Claims, TokenError, TokenService, TOKEN_LIFETIME_DAYS};
