//! SQLite repositories
//!
//! Types (UserRow, MovieRow, etc.) should be imported from `crate::data::types`.

pub mod movie;
pub mod rating;
pub mod seed;
pub mod user;

pub use movie::{get_movie, list_movies, replace_movies};
pub use rating::{get_rating, replace_ratings, upsert_rating};
pub use seed::replace_seed;
pub use user::{create_user, get_by_email, get_user, list_users, replace_users, sync_user_id_sequence};
