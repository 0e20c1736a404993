//! PostgreSQL repositories
//!
//! Same operations as the SQLite repositories, written with `$n` placeholders.

pub mod movie;
pub mod rating;
pub mod seed;
pub mod user;
