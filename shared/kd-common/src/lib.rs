//! Kidari Common Library
//!
//! Session and role types shared by the server and its clients.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
