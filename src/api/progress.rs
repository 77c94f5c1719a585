use axum::{
    extract::{Path, State},
    middleware,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Extension, Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Local;
use serde::{Deserialize, Serialize};

use super::state::AppState;
use super::views::{notice, render};
use crate::auth::{
    ensure_can_view_client, instructor_or_admin_middleware, AppError, OrRedirect, Rejection,
    UserSession,
};
use crate::models::validation::{
    optional, parse_date, parse_measurement, parse_optional_measurement, required,
};
use crate::models::{Client, ClientSummary, ProgressEntry};

#[derive(Debug, Default, Deserialize)]
pub struct ProgressForm {
    pub date: Option<String>,
    pub weight: Option<String>,
    pub waist: Option<String>,
    pub arm: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RemoveProgressForm {
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProgressView {
    pub client: ClientSummary,
    pub entries: Vec<ProgressEntry>,
}

pub fn progress_routes() -> Router<AppState> {
    Router::new()
        .route("/clients/:id/progress", get(show_progress).post(record_progress))
        .route(
            "/clients/:id/progress/remove",
            post(remove_progress).route_layer(middleware::from_fn(instructor_or_admin_middleware)),
        )
}

fn progress_path(client_id: u64) -> String {
    format!("/clients/{}/progress", client_id)
}

/// Load a client the caller is allowed to see
async fn visible_client(state: &AppState, user: &UserSession, id: u64) -> Result<Client, Rejection> {
    let landing = user.role.landing_path();
    let client = state
        .clients
        .get(id)
        .await
        .ok_or_else(|| AppError::not_found(format!("Client {} not found", id)))
        .or_redirect(landing)?;
    ensure_can_view_client(user, &client).or_redirect(landing)?;

    Ok(client)
}

async fn show_progress(
    State(state): State<AppState>,
    Extension(user): Extension<UserSession>,
    jar: CookieJar,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, Rejection> {
    let client = visible_client(&state, &user, id).await?;
    let view = ProgressView {
        client: ClientSummary::from(&client),
        entries: client.progress,
    };

    Ok(render(jar, "progress", Some(user), view))
}

/// Students may record measurements on their own record
#[tracing::instrument(skip(state, user, jar, form), fields(caller = %user.identifier))]
async fn record_progress(
    State(state): State<AppState>,
    Extension(user): Extension<UserSession>,
    jar: CookieJar,
    Path(id): Path<u64>,
    Form(form): Form<ProgressForm>,
) -> Result<(CookieJar, Redirect), Rejection> {
    visible_client(&state, &user, id).await?;
    let back = progress_path(id);

    let date = match optional(form.date.as_deref()) {
        Some(raw) => parse_date(&raw).or_redirect(&back)?,
        None => Local::now().date_naive(),
    };
    let weight = required(form.weight.as_deref(), "Weight")
        .and_then(|raw| parse_measurement(&raw, "Weight"))
        .or_redirect(&back)?;
    let entry = ProgressEntry {
        date,
        weight,
        waist: parse_optional_measurement(form.waist.as_deref(), "Waist").or_redirect(&back)?,
        arm: parse_optional_measurement(form.arm.as_deref(), "Arm").or_redirect(&back)?,
    };

    state.clients.add_progress(id, entry).await.or_redirect(&back)?;

    Ok(notice(jar, format!("Progress recorded for {}", date), &back))
}

#[tracing::instrument(skip(state, jar, form))]
async fn remove_progress(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<u64>,
    Form(form): Form<RemoveProgressForm>,
) -> Result<(CookieJar, Redirect), Rejection> {
    let back = progress_path(id);

    let date = required(form.date.as_deref(), "Date")
        .and_then(|raw| parse_date(&raw))
        .or_redirect(&back)?;
    let removed = state
        .clients
        .remove_progress(id, date)
        .await
        .or_redirect(&back)?;

    Ok(notice(
        jar,
        format!("Removed {} progress entries from {}", removed, date),
        &back,
    ))
}
