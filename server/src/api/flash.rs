//! One-shot flash messages carried in a short-lived cookie

use axum::response::Redirect;
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};

use crate::core::constants::{FLASH_COOKIE_NAME, FLASH_TTL_SECS};
use crate::domain::RatingsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    /// Hex-encoded JSON, safe for a cookie value
    fn encode(&self) -> String {
        hex::encode(serde_json::to_vec(self).unwrap_or_default())
    }

    fn decode(value: &str) -> Option<Self> {
        let bytes = hex::decode(value).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

impl From<&RatingsError> for Flash {
    fn from(err: &RatingsError) -> Self {
        match err {
            RatingsError::Connection(_)
            | RatingsError::Data(_)
            | RatingsError::Internal(_)
            | RatingsError::Io { .. } => {
                tracing::error!(error = %err, "Request failed");
                Self::error("Something went wrong, please try again")
            }
            other => Self::error(other.to_string()),
        }
    }
}

/// Queue a flash message for the next page
pub fn set_flash(jar: CookieJar, flash: Flash) -> CookieJar {
    let cookie = Cookie::build((FLASH_COOKIE_NAME, flash.encode()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(FLASH_TTL_SECS))
        .build();
    jar.add(cookie)
}

/// Read and clear the pending flash message
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(cookie) = jar.get(FLASH_COOKIE_NAME) else {
        return (jar, None);
    };
    let flash = Flash::decode(cookie.value());
    let jar = jar.remove(Cookie::build(FLASH_COOKIE_NAME).path("/"));
    (jar, flash)
}

/// Redirect after a form POST with a flash message for the target page
pub fn redirect_with_flash(jar: CookieJar, flash: Flash, to: &str) -> (CookieJar, Redirect) {
    (set_flash(jar, flash), Redirect::to(to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_take() {
        let jar = set_flash(CookieJar::new(), Flash::info("Logged out"));
        let (jar, flash) = take_flash(jar);
        assert_eq!(flash, Some(Flash::info("Logged out")));

        // Removal is recorded as an expired cookie
        let removed = jar.get(FLASH_COOKIE_NAME);
        assert!(removed.is_none() || removed.is_some_and(|c| c.value().is_empty()));
    }

    #[test]
    fn test_take_without_flash() {
        let (_, flash) = take_flash(CookieJar::new());
        assert!(flash.is_none());
    }

    #[test]
    fn test_tampered_cookie_is_ignored() {
        let jar = CookieJar::new().add(Cookie::new(FLASH_COOKIE_NAME, "zz-not-hex"));
        let (_, flash) = take_flash(jar);
        assert!(flash.is_none());
    }

    #[test]
    fn test_encoded_value_is_cookie_safe() {
        let encoded = Flash::error("Email is already registered; \"quotes\", commas").encode();
        assert!(encoded.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_internal_errors_are_not_leaked() {
        let err = RatingsError::Data(crate::data::DataError::Config("dsn password=x".into()));
        let flash = Flash::from(&err);
        assert_eq!(flash.level, FlashLevel::Error);
        assert!(!flash.message.contains("password"));

        let flash = Flash::from(&RatingsError::DuplicateEmail);
        assert_eq!(flash.message, "Email is already registered");
    }
}
