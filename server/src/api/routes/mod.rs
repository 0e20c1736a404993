//! Route handlers

pub mod accounts;
pub mod health;
pub mod home;
pub mod movies;
pub mod users;
