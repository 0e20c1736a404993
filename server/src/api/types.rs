//! Shared API types
//!
//! Error responses, the page envelope every GET returns, and the DTOs shared
//! between pages.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use chrono::NaiveDate;
use serde::Serialize;

use super::auth::CurrentUser;
use super::flash::{self, Flash};
use crate::core::constants::ANONYMOUS_EMAIL;
use crate::data::DataError;
use crate::data::types::{MovieRow, UserRow};

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    NotFound { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn from_data(e: DataError) -> Self {
        if e.is_connection() {
            tracing::error!(error = %e, backend = e.backend(), "Database unreachable");
            return Self::ServiceUnavailable {
                message: "Database unavailable".to_string(),
            };
        }
        tracing::error!(error = %e, backend = e.backend(), "Data error");
        Self::Internal {
            message: "Database operation failed".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

/// Envelope for every page: the page content plus session context
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    #[serde(flatten)]
    pub content: T,
    pub current_user: Option<UserDto>,
    pub flash: Option<Flash>,
}

impl<T: Serialize> Page<T> {
    /// Build the page, consuming any pending flash message
    pub fn render(jar: CookieJar, current: &CurrentUser, content: T) -> (CookieJar, Json<Self>) {
        let (jar, flash) = flash::take_flash(jar);
        let page = Self {
            content,
            current_user: current.0.clone().map(UserDto::from),
            flash,
        };
        (jar, Json(page))
    }
}

/// User presentation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDto {
    pub user_id: i64,
    /// Stored email, or `"Anonymous"` when the user has none
    pub email: String,
    pub age: Option<i32>,
    pub zipcode: Option<String>,
}

impl From<UserRow> for UserDto {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            email: display_email(row.email),
            age: row.age,
            zipcode: row.zipcode,
        }
    }
}

/// Movie presentation record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieDto {
    pub movie_id: i64,
    pub title: String,
    pub released_at: Option<NaiveDate>,
    pub imdb_url: String,
}

impl From<MovieRow> for MovieDto {
    fn from(row: MovieRow) -> Self {
        Self {
            movie_id: row.movie_id,
            title: row.title,
            released_at: row.released_at,
            imdb_url: row.imdb_url,
        }
    }
}

/// Apply the anonymous default to an optional email
pub fn display_email(email: Option<String>) -> String {
    email.unwrap_or_else(|| ANONYMOUS_EMAIL.to_string())
}

/// Static description of an HTML form
#[derive(Debug, Clone, Serialize)]
pub struct FormDescription {
    pub action: &'static str,
    pub method: &'static str,
    pub fields: &'static [&'static str],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_without_email_is_anonymous() {
        let dto = UserDto::from(UserRow {
            user_id: 3,
            email: None,
            password: None,
            age: Some(23),
            zipcode: Some("32067".to_string()),
        });
        assert_eq!(dto.email, ANONYMOUS_EMAIL);
    }

    #[test]
    fn test_user_dto_never_exposes_password() {
        let dto = UserDto::from(UserRow {
            user_id: 1,
            email: Some("a@b.c".to_string()),
            password: Some("$argon2id$secret".to_string()),
            age: None,
            zipcode: None,
        });
        let json = serde_json::to_string(&dto).unwrap();
        assert!(!json.contains("argon2"));
        assert!(json.contains("a@b.c"));
    }

    #[test]
    fn test_connection_error_maps_to_503() {
        let response = ApiError::from_data(DataError::Sqlite(sqlx::Error::PoolTimedOut)).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = ApiError::from_data(DataError::Sqlite(sqlx::Error::RowNotFound)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
