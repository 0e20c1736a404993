//! Authentication module

mod extractors;
pub mod jwt;
mod manager;

pub use extractors::CurrentUser;
pub use jwt::SessionClaims;
pub use manager::AuthManager;
