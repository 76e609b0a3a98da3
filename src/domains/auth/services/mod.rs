// Auth domain services
pub mod account_service;
pub mod jwt_service;
pub mod token_manager;
pub mod state;

pub use account_service::*;
pub use jwt_service::*;
pub use token_manager::*;
pub use state::*;
