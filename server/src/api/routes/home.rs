//! Landing page

use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use crate::api::auth::CurrentUser;
use crate::api::state::AppState;
use crate::api::types::Page;
use crate::core::constants::APP_NAME;

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub app: &'static str,
}

pub fn routes(state: AppState) -> Router<()> {
    Router::new().route("/", get(home)).with_state(state)
}

pub async fn home(current: CurrentUser, jar: CookieJar) -> (CookieJar, Json<Page<HomePage>>) {
    Page::render(jar, &current, HomePage { app: APP_NAME })
}
