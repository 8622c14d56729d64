// Handlers are split by security tier:
// public (no auth) and protected (bearer token).
pub mod forms;
pub mod protected;
pub mod public;

pub use protected::*;
pub use public::*;
