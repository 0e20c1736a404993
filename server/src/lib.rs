//! Movie ratings server
//!
//! - `api` - HTTP routes, sessions and flash messages
//! - `core` - CLI, configuration, shutdown and application wiring
//! - `data` - SQLite and PostgreSQL persistence
//! - `domain` - Accounts, rating workflow and seed loading
//! - `utils` - Password hashing and key helpers

pub mod api;
mod app;
pub mod core;
pub mod data;
pub mod domain;
pub mod utils;
