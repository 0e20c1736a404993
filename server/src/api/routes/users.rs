//! User pages

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::api::auth::CurrentUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Page, UserDto};
use crate::data::types::UserRatingRow;

#[derive(Debug, Serialize)]
pub struct UsersPage {
    pub users: Vec<UserDto>,
}

/// A rating shown on a user's page
#[derive(Debug, Serialize)]
pub struct UserRatingDto {
    pub rating_id: i64,
    pub movie_id: i64,
    pub title: String,
    pub score: i32,
}

impl From<UserRatingRow> for UserRatingDto {
    fn from(row: UserRatingRow) -> Self {
        Self {
            rating_id: row.rating_id,
            movie_id: row.movie_id,
            title: row.title,
            score: row.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDetailPage {
    pub user: UserDto,
    pub ratings: Vec<UserRatingDto>,
}

pub fn routes(state: AppState) -> Router<()> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{user_id}", get(get_user))
        .with_state(state)
}

pub async fn list_users(
    State(state): State<AppState>,
    current: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Page<UsersPage>>), ApiError> {
    let users = state
        .repository()
        .list_users()
        .await
        .map_err(ApiError::from_data)?;

    let content = UsersPage {
        users: users.into_iter().map(UserDto::from).collect(),
    };
    Ok(Page::render(jar, &current, content))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    current: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Page<UserDetailPage>>), ApiError> {
    let repo = state.repository();

    let user = repo
        .get_user(user_id)
        .await
        .map_err(ApiError::from_data)?
        .ok_or_else(|| ApiError::not_found("USER_NOT_FOUND", format!("User {} not found", user_id)))?;

    let ratings = repo
        .list_ratings_for_user(user_id)
        .await
        .map_err(ApiError::from_data)?;

    let content = UserDetailPage {
        user: user.into(),
        ratings: ratings.into_iter().map(UserRatingDto::from).collect(),
    };
    Ok(Page::render(jar, &current, content))
}
