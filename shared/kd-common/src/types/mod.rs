//! Shared Types

mod role;
mod session;

pub use role::Role;
pub use session::Session;
