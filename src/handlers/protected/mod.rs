// handlers/protected - bearer token required.
// The auth middleware has already placed an `AuthUser` in the request
// extensions by the time these run.
pub mod collection;
pub mod me;
pub mod record;

pub use collection::{collection_delete, collection_get, collection_post, collection_put};
pub use me::{me_delete, me_get, me_put};
pub use record::{record_delete, record_get, record_put};
