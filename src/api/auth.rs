use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::state::AppState;
use super::views::{clear_session_cookie, notice, render, session_cookie};
use crate::auth::{AppError, OrRedirect, Rejection, Role};
use crate::models::validation::required;
use crate::models::NewAccount;

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub identifier: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    pub identifier: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Login, registration and logout; reachable without a session
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", get(logout).post(logout))
}

async fn login_page(jar: CookieJar) -> impl IntoResponse {
    render(jar, "login", None, ())
}

#[tracing::instrument(skip(state, jar, form))]
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), Rejection> {
    let identifier = required(form.identifier.as_deref(), "Identifier").or_redirect("/login")?;
    let password = form
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::validation("Password is required"))
        .or_redirect("/login")?;

    let (account, token) = state
        .auth
        .login(&identifier, &password)
        .await
        .or_redirect("/login")?;

    let jar = jar.add(session_cookie(token, state.secure_cookies));
    Ok(notice(
        jar,
        format!("Welcome, {}!", account.name),
        account.role.landing_path(),
    ))
}

async fn register_page(jar: CookieJar) -> impl IntoResponse {
    render(jar, "register", None, [Role::Student, Role::Instructor])
}

#[tracing::instrument(skip(state, jar, form))]
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<(CookieJar, Redirect), Rejection> {
    let role = match form.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => raw.parse::<Role>().map_err(AppError::validation),
        None => Ok(Role::Student),
    }
    .or_redirect("/register")?;

    let request = NewAccount {
        identifier: required(form.identifier.as_deref(), "Identifier").or_redirect("/register")?,
        name: required(form.name.as_deref(), "Name").or_redirect("/register")?,
        password: form.password.unwrap_or_default(),
        role,
    };

    let account = state.auth.register(request).await.or_redirect("/register")?;

    Ok(notice(
        jar,
        format!("Account {} created. Please log in.", account.identifier),
        "/login",
    ))
}

async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    notice(clear_session_cookie(jar), "You have been logged out.", "/login")
}
