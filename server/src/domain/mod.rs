//! Domain logic for the ratings service
//!
//! - `accounts` - registration and credential checks
//! - `ratings` - rating upsert workflow
//! - `seed` - MovieLens seed loading
//! - `error` - domain error taxonomy

pub mod accounts;
pub mod error;
pub mod ratings;
pub mod seed;

pub use error::RatingsError;
