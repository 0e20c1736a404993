//! Movie pages and rating submission

use axum::extract::{Path, State};
use axum::response::Redirect;
use axum::routing::get;
use axum::{Form, Json, Router};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::api::auth::CurrentUser;
use crate::api::flash::{Flash, redirect_with_flash};
use crate::api::state::AppState;
use crate::api::types::{ApiError, MovieDto, Page, display_email};
use crate::data::types::{MovieRatingRow, UpsertOutcome};
use crate::domain::RatingsError;
use crate::domain::ratings;

#[derive(Debug, Serialize)]
pub struct MoviesPage {
    pub movies: Vec<MovieDto>,
}

/// A rating shown on a movie's page
#[derive(Debug, Serialize)]
pub struct MovieRatingDto {
    pub rating_id: i64,
    pub user_id: i64,
    pub email: String,
    pub score: i32,
}

impl From<MovieRatingRow> for MovieRatingDto {
    fn from(row: MovieRatingRow) -> Self {
        Self {
            rating_id: row.rating_id,
            user_id: row.user_id,
            email: display_email(row.email),
            score: row.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieDetailPage {
    pub movie: MovieDto,
    pub ratings: Vec<MovieRatingDto>,
    /// The current user's score for this movie
    pub my_rating: Option<i32>,
}

/// Rating form; `score` is parsed by the handler so a blank field is a
/// validation message rather than a rejection
#[derive(Debug, Deserialize)]
pub struct RateForm {
    #[serde(default)]
    pub score: String,
}

pub fn routes(state: AppState) -> Router<()> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/{movie_id}", get(get_movie).post(rate_movie))
        .with_state(state)
}

pub async fn list_movies(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Page<MoviesPage>>), ApiError> {
    let movies = state
        .repository()
        .list_movies()
        .await
        .map_err(ApiError::from_data)?;

    let content = MoviesPage {
        movies: movies.into_iter().map(MovieDto::from).collect(),
    };
    Ok(Page::render(jar, &current, content))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
    current: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Page<MovieDetailPage>>), ApiError> {
    let repo = state.repository();

    let movie = repo
        .get_movie(movie_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| {
            ApiError::not_found("MOVIE_NOT_FOUND", format!("Movie {} not found", movie_id))
        })?;

    let ratings = repo
        .list_ratings_for_movie(movie_id)
        .await
        .map_err(ApiError::from_data)?;

    let my_rating = match current.user_id() {
        Some(user_id) => repo
            .get_rating(user_id, movie_id)
            .await
            .map_err(ApiError::from_data)?
            .map(|r| r.score),
        None => None,
    };

    let content = MovieDetailPage {
        movie: movie.into(),
        ratings: ratings.into_iter().map(MovieRatingDto::from).collect(),
        my_rating,
    };
    Ok(Page::render(jar, &current, content))
}

pub async fn rate_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<i64>,
    jar: CookieJar,
    Form(form): Form<RateForm>,
) -> (CookieJar, Redirect) {
    let movie_page = format!("/movies/{}", movie_id);

    let current = match CurrentUser::resolve(&state, &jar).await {
        Ok(current) => current,
        Err(e) => {
            return redirect_with_flash(jar, Flash::from(&RatingsError::from(e)), &movie_page);
        }
    };

    let result = match form.score.trim().parse::<i32>() {
        Ok(score) => {
            let repo = state.repository();
            ratings::submit_rating(repo.as_ref(), current.user_id(), movie_id, score).await
        }
        Err(_) if current.user_id().is_none() => Err(RatingsError::NotAuthenticated),
        Err(_) => Err(RatingsError::Validation(
            "Score must be a whole number".to_string(),
        )),
    };

    match result {
        Ok(rated) => {
            let message = match rated.outcome {
                UpsertOutcome::Created => "Rating saved",
                UpsertOutcome::Updated => "Rating updated",
            };
            redirect_with_flash(jar, Flash::success(message), &movie_page)
        }
        Err(e @ RatingsError::NotAuthenticated) => {
            redirect_with_flash(jar, Flash::from(&e), "/login")
        }
        Err(e @ RatingsError::NotFound { .. }) => {
            redirect_with_flash(jar, Flash::from(&e), "/movies")
        }
        Err(e) => redirect_with_flash(jar, Flash::from(&e), &movie_page),
    }
}
