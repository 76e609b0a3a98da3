// Repositories
pub mod auth;

pub use auth::*;
