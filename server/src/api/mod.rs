//! HTTP surface: page routes, sessions and flash messages

pub mod auth;
pub mod flash;
pub mod middleware;
pub mod routes;
mod server;
pub mod state;
pub mod types;

pub use auth::AuthManager;
pub use server::{ApiServer, router};
pub use state::AppState;
