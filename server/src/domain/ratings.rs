//! Rating upsert workflow

use serde::Serialize;

use super::error::RatingsError;
use crate::core::constants::{MAX_SCORE, MIN_SCORE};
use crate::data::TransactionalRepository;
use crate::data::types::{RatingRow, UpsertOutcome};

/// Result of a rating submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingResult {
    pub rating: RatingRow,
    pub outcome: UpsertOutcome,
}

/// Record `score` as the current user's rating of `movie_id`
///
/// Anonymous callers are rejected before anything is read or written.
pub async fn submit_rating(
    repo: &dyn TransactionalRepository,
    user_id: Option<i64>,
    movie_id: i64,
    score: i32,
) -> Result<RatingResult, RatingsError> {
    let Some(user_id) = user_id else {
        return Err(RatingsError::NotAuthenticated);
    };

    if repo.get_movie(movie_id).await?.is_none() {
        return Err(RatingsError::NotFound {
            entity: "Movie",
            id: movie_id,
        });
    }

    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(RatingsError::Validation(format!(
            "Score must be between {} and {}",
            MIN_SCORE, MAX_SCORE
        )));
    }

    let (rating, outcome) = repo.upsert_rating(user_id, movie_id, score).await?;
    tracing::info!(user_id, movie_id, score, ?outcome, "Rating submitted");

    Ok(RatingResult { rating, outcome })
}
