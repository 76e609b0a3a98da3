// Domains module
pub mod auth;
