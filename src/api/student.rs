use axum::{extract::State, middleware, response::IntoResponse, routing::get, Extension, Router};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use super::state::AppState;
use super::views::render;
use crate::auth::{student_only_middleware, AppError, OrRedirect, Rejection, UserSession};
use crate::models::{AccountView, Client};

#[derive(Debug, Serialize)]
pub struct StudentArea {
    pub account: AccountView,
    /// `None` until an instructor links this student to a client
    pub client: Option<Client>,
}

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/student", get(student_home))
        .route_layer(middleware::from_fn(student_only_middleware))
}

async fn student_home(
    State(state): State<AppState>,
    Extension(user): Extension<UserSession>,
    jar: CookieJar,
) -> Result<impl IntoResponse, Rejection> {
    let account = state
        .accounts
        .get(&user.identifier)
        .await
        .ok_or(AppError::Unauthenticated)
        .or_redirect("/login")?;
    let client = state.clients.find_by_student(&user.identifier).await;

    let area = StudentArea {
        account: AccountView::from(&account),
        client,
    };
    Ok(render(jar, "student", Some(user), area))
}
