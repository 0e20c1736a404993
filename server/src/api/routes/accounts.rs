//! Registration, login and logout

use axum::extract::State;
use axum::response::Redirect;
use axum::routing::get;
use axum::{Form, Json, Router};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::api::auth::CurrentUser;
use crate::api::flash::{Flash, redirect_with_flash};
use crate::api::state::AppState;
use crate::api::types::{FormDescription, Page};
use crate::domain::RatingsError;
use crate::domain::accounts::{self, Registration};

const REGISTER_FORM: FormDescription = FormDescription {
    action: "/register",
    method: "post",
    fields: &["email", "password", "age", "zipcode"],
};

const LOGIN_FORM: FormDescription = FormDescription {
    action: "/login",
    method: "post",
    fields: &["email", "password"],
};

#[derive(Debug, Serialize)]
pub struct FormPage {
    pub form: FormDescription,
}

/// Registration form; optional fields arrive as empty strings
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub zipcode: String,
}

impl RegisterForm {
    fn into_registration(self) -> Result<Registration, RatingsError> {
        let age = match self.age.trim() {
            "" => None,
            value => Some(value.parse::<i32>().map_err(|_| {
                RatingsError::Validation("Age must be a whole number".to_string())
            })?),
        };
        let zipcode = self.zipcode.trim();
        Ok(Registration {
            email: self.email.trim().to_string(),
            password: self.password,
            age,
            zipcode: (!zipcode.is_empty()).then(|| zipcode.to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

pub fn routes(state: AppState) -> Router<()> {
    Router::new()
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        .with_state(state)
}

pub async fn register_form(
    current: CurrentUser,
    jar: CookieJar,
) -> (CookieJar, Json<Page<FormPage>>) {
    Page::render(jar, &current, FormPage { form: REGISTER_FORM })
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> (CookieJar, Redirect) {
    let result = match form.into_registration() {
        Ok(registration) => {
            let repo = state.repository();
            accounts::register(repo.as_ref(), &registration).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => redirect_with_flash(
            jar,
            Flash::success("Registration complete, please log in"),
            "/login",
        ),
        Err(e) => redirect_with_flash(jar, Flash::from(&e), "/register"),
    }
}

pub async fn login_form(current: CurrentUser, jar: CookieJar) -> (CookieJar, Json<Page<FormPage>>) {
    Page::render(jar, &current, FormPage { form: LOGIN_FORM })
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> (CookieJar, Redirect) {
    let repo = state.repository();
    let user = match accounts::login(repo.as_ref(), form.email.trim(), &form.password).await {
        Ok(user) => user,
        Err(e) => return redirect_with_flash(jar, Flash::from(&e), "/login"),
    };

    let token = match state.auth.issue_session(user.user_id) {
        Ok(token) => token,
        Err(e) => {
            let err = RatingsError::Internal(format!("session for user {}: {}", user.user_id, e));
            return redirect_with_flash(jar, Flash::from(&err), "/login");
        }
    };

    tracing::info!(user_id = user.user_id, "User logged in");
    let jar = jar.add(state.auth.session_cookie(token));
    redirect_with_flash(
        jar,
        Flash::success("Logged in"),
        &format!("/users/{}", user.user_id),
    )
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(state.auth.expired_session_cookie());
    redirect_with_flash(jar, Flash::info("Logged out"), "/")
}
