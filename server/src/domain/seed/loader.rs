//! Table replacement from seed files

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::parse;
use crate::core::constants::{SEED_MOVIES_FILE, SEED_RATINGS_FILE, SEED_USERS_FILE};
use crate::data::TransactionalRepository;
use crate::data::types::{SeedCounts, SeedData, SeedMovie, SeedRating, SeedUser};
use crate::domain::error::RatingsError;

/// Locations of the three seed files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedPaths {
    pub users: PathBuf,
    pub movies: PathBuf,
    pub ratings: PathBuf,
}

impl SeedPaths {
    /// Standard MovieLens file names inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            users: dir.join(SEED_USERS_FILE),
            movies: dir.join(SEED_MOVIES_FILE),
            ratings: dir.join(SEED_RATINGS_FILE),
        }
    }
}

/// Row counts after a full seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub users: u64,
    pub movies: u64,
    pub ratings: u64,
    pub next_user_id: i64,
}

impl From<SeedCounts> for SeedSummary {
    fn from(counts: SeedCounts) -> Self {
        Self {
            users: counts.users,
            movies: counts.movies,
            ratings: counts.ratings,
            next_user_id: counts.next_user_id,
        }
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>, RatingsError> {
    tokio::fs::read(path).await.map_err(|source| RatingsError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn read_users(path: &Path) -> Result<Vec<SeedUser>, RatingsError> {
    let bytes = read_file(path).await?;
    parse::parse_users(bytes.as_slice(), &file_label(path))
}

async fn read_movies(path: &Path) -> Result<Vec<SeedMovie>, RatingsError> {
    let bytes = read_file(path).await?;
    parse::parse_movies(bytes.as_slice(), &file_label(path))
}

async fn read_ratings(path: &Path) -> Result<Vec<SeedRating>, RatingsError> {
    let bytes = read_file(path).await?;
    parse::parse_ratings(bytes.as_slice(), &file_label(path))
}

/// Replace all users with the contents of `path`
///
/// The file is parsed completely before anything is deleted, so a malformed
/// line leaves the table untouched.
pub async fn load_users(
    repo: &dyn TransactionalRepository,
    path: &Path,
) -> Result<u64, RatingsError> {
    let users = read_users(path).await?;
    let count = repo.replace_users(&users).await?;
    tracing::info!(count, path = %path.display(), "Users loaded");
    Ok(count)
}

/// Replace all movies with the contents of `path`
pub async fn load_movies(
    repo: &dyn TransactionalRepository,
    path: &Path,
) -> Result<u64, RatingsError> {
    let movies = read_movies(path).await?;
    let count = repo.replace_movies(&movies).await?;
    tracing::info!(count, path = %path.display(), "Movies loaded");
    Ok(count)
}

/// Replace all ratings with the contents of `path`
pub async fn load_ratings(
    repo: &dyn TransactionalRepository,
    path: &Path,
) -> Result<u64, RatingsError> {
    let ratings = read_ratings(path).await?;
    let count = repo.replace_ratings(&ratings).await?;
    tracing::info!(count, path = %path.display(), "Ratings loaded");
    Ok(count)
}

/// Load users, movies and ratings, then resync the user ID counter
///
/// All three files are parsed before the store is touched, and the
/// replacement is a single transaction: any failure leaves every table as it
/// was.
pub async fn run(
    repo: &dyn TransactionalRepository,
    paths: &SeedPaths,
) -> Result<SeedSummary, RatingsError> {
    let data = SeedData {
        users: read_users(&paths.users).await?,
        movies: read_movies(&paths.movies).await?,
        ratings: read_ratings(&paths.ratings).await?,
    };
    let counts = repo.replace_seed(&data).await?;

    tracing::info!(
        users = counts.users,
        movies = counts.movies,
        ratings = counts.ratings,
        next_user_id = counts.next_user_id,
        "Seed complete"
    );
    Ok(counts.into())
}
