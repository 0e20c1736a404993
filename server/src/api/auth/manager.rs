//! Authentication manager

use anyhow::{Result, bail};
use axum_extra::extract::cookie::{Cookie, SameSite};

use super::jwt::{JwtError, SessionClaims, create_session_token, validate_session_token};
use crate::core::config::AuthConfig;
use crate::core::constants::{ENV_SECRET_KEY, MIN_SECRET_KEY_LEN, SESSION_COOKIE_NAME};
use crate::utils::crypto;

/// Signs and validates session cookies
pub struct AuthManager {
    signing_key: Vec<u8>,
    session_ttl_days: u32,
    secure_cookies: bool,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("signing_key", &"<redacted>")
            .field("session_ttl_days", &self.session_ttl_days)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl AuthManager {
    /// Initialize the authentication manager
    ///
    /// The secret must be at least `MIN_SECRET_KEY_LEN` bytes. Without one,
    /// dev mode signs with a random key that dies with the process.
    pub fn init(config: &AuthConfig) -> Result<Self> {
        let signing_key = match &config.secret_key {
            Some(secret) if secret.len() >= MIN_SECRET_KEY_LEN => secret.as_bytes().to_vec(),
            Some(_) => bail!(
                "{} must be at least {} bytes",
                ENV_SECRET_KEY,
                MIN_SECRET_KEY_LEN
            ),
            None if config.dev => {
                tracing::warn!(
                    "{} not set; using an ephemeral key (sessions end on restart)",
                    ENV_SECRET_KEY
                );
                crypto::generate_key(32)
            }
            None => bail!(
                "{} is required to sign session cookies (or pass --dev)",
                ENV_SECRET_KEY
            ),
        };

        tracing::debug!(
            session_ttl_days = config.session_ttl_days,
            secure_cookies = config.secure_cookies,
            "Authentication initialized"
        );
        Ok(Self {
            signing_key,
            session_ttl_days: config.session_ttl_days,
            secure_cookies: config.secure_cookies,
        })
    }

    /// Issue a signed session token for a user
    pub fn issue_session(&self, user_id: i64) -> Result<String> {
        create_session_token(&self.signing_key, user_id, self.session_ttl_days)
    }

    /// Validate a JWT session token
    pub fn validate_session(&self, jwt: &str) -> Result<SessionClaims, JwtError> {
        validate_session_token(jwt, &self.signing_key)
    }

    /// Session cookie carrying `jwt`
    pub fn session_cookie(&self, jwt: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, jwt))
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(time::Duration::days(i64::from(self.session_ttl_days)))
            .build()
    }

    /// Cookie matching the session cookie's path, for removal
    pub fn expired_session_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build()
    }
}
