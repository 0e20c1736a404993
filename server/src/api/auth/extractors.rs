//! Session extractor for Axum handlers
//!
//! # Usage
//!
//! ```no_run
//! # use ratings_server::api::auth::CurrentUser;
//! pub async fn home(current: CurrentUser) -> String {
//!     match current.user_id() {
//!         Some(id) => format!("user {}", id),
//!         None => "anonymous".to_string(),
//!     }
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::core::constants::SESSION_COOKIE_NAME;
use crate::data::DataError;
use crate::data::types::UserRow;

/// The logged-in user, or `None` for anonymous requests
///
/// A missing, expired or forged cookie is anonymous, as is a cookie whose user
/// no longer exists. As an extractor, only a store failure rejects the request.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(pub Option<UserRow>);

impl CurrentUser {
    pub fn user_id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.user_id)
    }

    /// Look up the session user from a cookie jar
    ///
    /// Form handlers call this directly so a store failure can become a
    /// flash message instead of a JSON rejection.
    pub async fn resolve(state: &AppState, jar: &CookieJar) -> Result<Self, DataError> {
        let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
            return Ok(Self(None));
        };

        let user_id = match state
            .auth
            .validate_session(cookie.value())
            .and_then(|claims| claims.user_id())
        {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring session cookie");
                return Ok(Self(None));
            }
        };

        let user = state.repository().get_user(user_id).await?;
        if user.is_none() {
            tracing::debug!(user_id, "Session refers to a missing user");
        }
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Self::resolve(state, &jar).await.map_err(ApiError::from_data)
    }
}
